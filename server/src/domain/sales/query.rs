//! Storage-agnostic query model
//!
//! A [`SalesQuery`] is a plain description of predicates, sort key and page
//! window. The in-memory pipeline, the SQL builder and the document-store
//! translation all consume the same value, so matching rules live in one
//! place per adapter instead of being re-derived from raw parameters.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::fields::Field;
use super::record::{SaleRecord, parse_sale_date};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 500;

/// Recognized `sortBy` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    DateNewest,
    DateOldest,
    QuantityHigh,
    QuantityLow,
    AmountHigh,
    CustomerAz,
    CustomerZa,
    /// Surrogate id descending; used for unrecognized `sortBy` values
    IdDesc,
}

impl SortKey {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "date-newest" => SortKey::DateNewest,
            "date-oldest" => SortKey::DateOldest,
            "quantity-high" => SortKey::QuantityHigh,
            "quantity-low" => SortKey::QuantityLow,
            "amount-high" => SortKey::AmountHigh,
            "customer-az" => SortKey::CustomerAz,
            "customer-za" => SortKey::CustomerZa,
            _ => SortKey::IdDesc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::DateNewest => "date-newest",
            SortKey::DateOldest => "date-oldest",
            SortKey::QuantityHigh => "quantity-high",
            SortKey::QuantityLow => "quantity-low",
            SortKey::AmountHigh => "amount-high",
            SortKey::CustomerAz => "customer-az",
            SortKey::CustomerZa => "customer-za",
            SortKey::IdDesc => "id-desc",
        }
    }
}

/// 1-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageWindow {
    /// Clamps page to >= 1 and limit to 1..=MAX_LIMIT
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }

    pub fn total_pages(&self, total_records: u64) -> u64 {
        total_records.div_ceil(self.limit as u64)
    }
}

/// Predicates of a sales query. Every populated field narrows the result (AND).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesFilters {
    pub customer_region: Vec<String>,
    pub gender: Vec<String>,
    pub product_category: Vec<String>,
    pub tags: Vec<String>,
    pub payment_method: Vec<String>,
    pub order_status: Vec<String>,
    pub delivery_type: Vec<String>,
    pub age_min: Option<i64>,
    pub age_max: Option<i64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl SalesFilters {
    /// Exact-match membership filters, paired with the field they constrain.
    /// Tags are matched differently and are not included.
    pub fn list_filters(&self) -> [(Field, &[String]); 6] {
        [
            (Field::CustomerRegion, &self.customer_region),
            (Field::Gender, &self.gender),
            (Field::ProductCategory, &self.product_category),
            (Field::PaymentMethod, &self.payment_method),
            (Field::OrderStatus, &self.order_status),
            (Field::DeliveryType, &self.delivery_type),
        ]
    }

    /// Requested tags, trimmed and lowercased
    pub fn normalized_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn has_age_bound(&self) -> bool {
        self.age_min.is_some() || self.age_max.is_some()
    }

    pub fn has_date_bound(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }

    /// Age 0 means unknown: excluded as soon as any bound is active
    pub fn age_matches(&self, age: i64) -> bool {
        if !self.has_age_bound() {
            return true;
        }
        age > 0
            && self.age_min.is_none_or(|min| age >= min)
            && self.age_max.is_none_or(|max| age <= max)
    }

    /// Inclusive calendar-day bounds; unparsable dates fail any active bound
    pub fn date_matches(&self, date: Option<NaiveDate>) -> bool {
        if !self.has_date_bound() {
            return true;
        }
        let Some(date) = date else {
            return false;
        };
        self.date_from.is_none_or(|from| date >= from) && self.date_to.is_none_or(|to| date <= to)
    }
}

/// A complete sales query: search term, predicates, sort key and window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesQuery {
    pub search: Option<String>,
    pub filters: SalesFilters,
    pub sort: SortKey,
    pub window: PageWindow,
}

impl SalesQuery {
    /// Build a query from raw query-string pairs.
    ///
    /// Never fails: list values may be repeated, `key[]`-style or
    /// comma-separated, and malformed numbers or dates are ignored.
    pub fn from_pairs<K, V>(pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = SalesQuery::default();
        let mut page = DEFAULT_PAGE;
        let mut limit = DEFAULT_LIMIT;

        for (key, value) in pairs {
            let key = key.as_ref().trim_end_matches("[]");
            let value = value.as_ref().trim();
            let filters = &mut query.filters;
            match key {
                "search" => query.search = Some(value.to_string()).filter(|s| !s.is_empty()),
                "page" => page = parse_positive(value).unwrap_or(DEFAULT_PAGE),
                "limit" => limit = parse_positive(value).unwrap_or(DEFAULT_LIMIT),
                "sortBy" => {
                    if !value.is_empty() {
                        query.sort = SortKey::parse(value)
                    }
                }
                "customerRegion" => push_list(&mut filters.customer_region, value),
                "gender" => push_list(&mut filters.gender, value),
                "productCategory" => push_list(&mut filters.product_category, value),
                "tags" => push_list(&mut filters.tags, value),
                "paymentMethod" => push_list(&mut filters.payment_method, value),
                "orderStatus" => push_list(&mut filters.order_status, value),
                "deliveryType" => push_list(&mut filters.delivery_type, value),
                "ageMin" => filters.age_min = value.parse().ok(),
                "ageMax" => filters.age_max = value.parse().ok(),
                "dateFrom" => filters.date_from = parse_sale_date(value),
                "dateTo" => filters.date_to = parse_sale_date(value),
                _ => {}
            }
        }

        query.window = PageWindow::new(page, limit);
        query
    }

    /// Trimmed, lowercased search term; `None` when blank
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
    }
}

/// One page of matches plus the total before pagination
#[derive(Debug, Clone, Default)]
pub struct SalesPage {
    pub data: Vec<SaleRecord>,
    pub total_records: u64,
}

/// Echo of the received parameters; repeated keys collapse into arrays
pub fn applied_params<K, V>(pairs: &[(K, V)]) -> Map<String, Value>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut applied = Map::new();
    for (key, value) in pairs {
        let value = Value::String(value.as_ref().to_string());
        match applied.get_mut(key.as_ref()) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                applied.insert(key.as_ref().to_string(), value);
            }
        }
    }
    applied
}

fn parse_positive(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok().filter(|n| *n > 0)
}

fn push_list(list: &mut Vec<String>, raw: &str) {
    list.extend(
        raw.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from),
    );
}
