//! Filter option domains for the dashboard's selection controls

use std::collections::BTreeSet;

use serde::Serialize;
use utoipa::ToSchema;

use super::fields::Field;
use super::record::{SaleRecord, split_tags};

/// Age bounds reported when no record carries a known age
pub const DEFAULT_AGE_RANGE: AgeRange = AgeRange { min: 18, max: 100 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct AgeRange {
    pub min: i64,
    pub max: i64,
}

/// Sorted distinct values per filterable field
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub customer_regions: Vec<String>,
    pub genders: Vec<String>,
    pub product_categories: Vec<String>,
    pub payment_methods: Vec<String>,
    pub tags: Vec<String>,
    pub order_statuses: Vec<String>,
    pub delivery_types: Vec<String>,
    pub age_range: AgeRange,
}

/// Fields whose distinct values are offered verbatim
pub const OPTION_FIELDS: [Field; 6] = [
    Field::CustomerRegion,
    Field::Gender,
    Field::ProductCategory,
    Field::PaymentMethod,
    Field::OrderStatus,
    Field::DeliveryType,
];

/// Accumulates option domains from records or from per-column distinct queries
#[derive(Debug, Default)]
pub struct OptionsCollector {
    values: [BTreeSet<String>; 6],
    tags: BTreeSet<String>,
    age: Option<(i64, i64)>,
}

impl OptionsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&mut self, record: &SaleRecord) {
        for field in OPTION_FIELDS {
            if let Some(v) = record.text(field) {
                self.add_value(field, v);
            }
        }
        if let Some(tags) = record.tags.as_deref() {
            self.add_tags(tags);
        }
        self.add_age(record.age);
    }

    /// Record one distinct value; blanks and non-option fields are ignored
    pub fn add_value(&mut self, field: Field, value: &str) {
        if value.is_empty() {
            return;
        }
        if let Some(slot) = OPTION_FIELDS.iter().position(|f| *f == field) {
            self.values[slot].insert(value.to_string());
        }
    }

    /// Split a raw comma-joined tag cell into individual labels
    pub fn add_tags(&mut self, raw: &str) {
        for tag in split_tags(raw) {
            self.tags.insert(tag.to_string());
        }
    }

    /// Ages of 0 are unknown and do not widen the range
    pub fn add_age(&mut self, age: i64) {
        if age <= 0 {
            return;
        }
        self.age = Some(match self.age {
            Some((min, max)) => (min.min(age), max.max(age)),
            None => (age, age),
        });
    }

    pub fn finish(self) -> FilterOptions {
        let [regions, genders, categories, payments, statuses, deliveries] =
            self.values.map(|set| set.into_iter().collect::<Vec<_>>());
        FilterOptions {
            customer_regions: regions,
            genders,
            product_categories: categories,
            payment_methods: payments,
            tags: self.tags.into_iter().collect(),
            order_statuses: statuses,
            delivery_types: deliveries,
            age_range: self
                .age
                .map(|(min, max)| AgeRange { min, max })
                .unwrap_or(DEFAULT_AGE_RANGE),
        }
    }
}

/// Option domains over a full in-memory dataset
pub fn extract_filter_options(records: &[SaleRecord]) -> FilterOptions {
    let mut collector = OptionsCollector::new();
    for record in records {
        collector.add_record(record);
    }
    collector.finish()
}
