//! Sale record and the external/internal mapper

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use super::fields::{FIELDS, Field, FieldDef, FieldKind};

/// Date layouts accepted for the `Date` column, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d", "%d %b %Y", "%b %d, %Y"];

/// One row of the sales dataset in its internal (stored) shape
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleRecord {
    /// Surrogate key assigned at ingestion, used for default order and tie-breaks
    pub id: i64,
    pub transaction_id: Option<String>,
    pub date: Option<String>,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub age: i64,
    pub customer_region: Option<String>,
    pub customer_type: Option<String>,
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub brand: Option<String>,
    pub product_category: Option<String>,
    pub tags: Option<String>,
    pub quantity: i64,
    pub price_per_unit: f64,
    pub discount_percentage: f64,
    pub total_amount: f64,
    pub final_amount: f64,
    pub payment_method: Option<String>,
    pub order_status: Option<String>,
    pub delivery_type: Option<String>,
    pub store_id: Option<String>,
    pub store_location: Option<String>,
    pub salesperson_id: Option<String>,
    pub employee_name: Option<String>,
}

/// Borrowed view of a single field value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Integer(i64),
    Decimal(f64),
}

impl FieldValue<'_> {
    fn to_json(self) -> Value {
        match self {
            FieldValue::Text(Some(s)) => Value::String(s.to_string()),
            FieldValue::Text(None) => Value::Null,
            FieldValue::Integer(n) => Value::from(n),
            FieldValue::Decimal(f) => Value::from(f),
        }
    }
}

impl SaleRecord {
    /// Build a record from external-format values.
    ///
    /// `lookup` is asked for each field's raw text. Integers keep only their
    /// digits, decimals keep only `[0-9.-]`, both default to 0. Empty text
    /// becomes `None`.
    pub fn from_external<F>(id: i64, mut lookup: F) -> Self
    where
        F: FnMut(&'static FieldDef) -> Option<String>,
    {
        let mut record = SaleRecord {
            id,
            ..Default::default()
        };
        for def in &FIELDS {
            let raw = lookup(def);
            match def.kind {
                FieldKind::Integer => {
                    record.set_integer(def.field, safe_int(raw.as_deref().unwrap_or("")))
                }
                FieldKind::Decimal => {
                    record.set_decimal(def.field, safe_float(raw.as_deref().unwrap_or("")))
                }
                FieldKind::Text => record.set_text(def.field, raw.filter(|s| !s.is_empty())),
            }
        }
        record
    }

    /// All 26 fields keyed by external name, in column order
    pub fn to_external(&self) -> Map<String, Value> {
        FIELDS
            .iter()
            .map(|def| (def.external.to_string(), self.value(def.field).to_json()))
            .collect()
    }

    pub fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Age => FieldValue::Integer(self.age),
            Field::Quantity => FieldValue::Integer(self.quantity),
            Field::PricePerUnit => FieldValue::Decimal(self.price_per_unit),
            Field::DiscountPercentage => FieldValue::Decimal(self.discount_percentage),
            Field::TotalAmount => FieldValue::Decimal(self.total_amount),
            Field::FinalAmount => FieldValue::Decimal(self.final_amount),
            other => FieldValue::Text(self.text_slot(other).and_then(|s| s.as_deref())),
        }
    }

    /// Text value of a string field, `None` for numeric fields or absent values
    pub fn text(&self, field: Field) -> Option<&str> {
        match self.value(field) {
            FieldValue::Text(s) => s,
            _ => None,
        }
    }

    /// Parsed `Date`, `None` when absent or in an unknown layout
    pub fn sale_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_sale_date)
    }

    /// Individual labels of the comma-joined `Tags` field
    pub fn tag_list(&self) -> Vec<&str> {
        split_tags(self.tags.as_deref().unwrap_or(""))
    }

    /// Normalized tag column (`,a,b,` lowercase) used by SQL predicates
    pub fn tag_key(&self) -> Option<String> {
        let tags = self.tag_list();
        if tags.is_empty() {
            return None;
        }
        let joined: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
        Some(format!(",{},", joined.join(",")))
    }

    /// Case-folded `Customer Name`, the key for search and customer ordering
    pub fn customer_name_lower(&self) -> String {
        search_key(self.customer_name.as_deref())
    }

    /// Case-folded `Phone Number` used by search
    pub fn phone_number_lower(&self) -> String {
        search_key(self.phone_number.as_deref())
    }

    /// Amount taken off the total by the discount
    pub fn discount_amount(&self) -> f64 {
        self.total_amount - self.final_amount
    }

    fn text_slot(&self, field: Field) -> Option<&Option<String>> {
        let slot = match field {
            Field::TransactionId => &self.transaction_id,
            Field::Date => &self.date,
            Field::CustomerId => &self.customer_id,
            Field::CustomerName => &self.customer_name,
            Field::PhoneNumber => &self.phone_number,
            Field::Gender => &self.gender,
            Field::CustomerRegion => &self.customer_region,
            Field::CustomerType => &self.customer_type,
            Field::ProductId => &self.product_id,
            Field::ProductName => &self.product_name,
            Field::Brand => &self.brand,
            Field::ProductCategory => &self.product_category,
            Field::Tags => &self.tags,
            Field::PaymentMethod => &self.payment_method,
            Field::OrderStatus => &self.order_status,
            Field::DeliveryType => &self.delivery_type,
            Field::StoreId => &self.store_id,
            Field::StoreLocation => &self.store_location,
            Field::SalespersonId => &self.salesperson_id,
            Field::EmployeeName => &self.employee_name,
            Field::Age
            | Field::Quantity
            | Field::PricePerUnit
            | Field::DiscountPercentage
            | Field::TotalAmount
            | Field::FinalAmount => return None,
        };
        Some(slot)
    }

    fn set_text(&mut self, field: Field, value: Option<String>) {
        let slot = match field {
            Field::TransactionId => &mut self.transaction_id,
            Field::Date => &mut self.date,
            Field::CustomerId => &mut self.customer_id,
            Field::CustomerName => &mut self.customer_name,
            Field::PhoneNumber => &mut self.phone_number,
            Field::Gender => &mut self.gender,
            Field::CustomerRegion => &mut self.customer_region,
            Field::CustomerType => &mut self.customer_type,
            Field::ProductId => &mut self.product_id,
            Field::ProductName => &mut self.product_name,
            Field::Brand => &mut self.brand,
            Field::ProductCategory => &mut self.product_category,
            Field::Tags => &mut self.tags,
            Field::PaymentMethod => &mut self.payment_method,
            Field::OrderStatus => &mut self.order_status,
            Field::DeliveryType => &mut self.delivery_type,
            Field::StoreId => &mut self.store_id,
            Field::StoreLocation => &mut self.store_location,
            Field::SalespersonId => &mut self.salesperson_id,
            Field::EmployeeName => &mut self.employee_name,
            _ => return,
        };
        *slot = value;
    }

    fn set_integer(&mut self, field: Field, value: i64) {
        match field {
            Field::Age => self.age = value,
            Field::Quantity => self.quantity = value,
            _ => {}
        }
    }

    fn set_decimal(&mut self, field: Field, value: f64) {
        match field {
            Field::PricePerUnit => self.price_per_unit = value,
            Field::DiscountPercentage => self.discount_percentage = value,
            Field::TotalAmount => self.total_amount = value,
            Field::FinalAmount => self.final_amount = value,
            _ => {}
        }
    }
}

/// Serializes in external (wire) format
impl Serialize for SaleRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELDS.len()))?;
        for def in &FIELDS {
            match self.value(def.field) {
                FieldValue::Text(s) => map.serialize_entry(def.external, &s)?,
                FieldValue::Integer(n) => map.serialize_entry(def.external, &n)?,
                FieldValue::Decimal(f) => map.serialize_entry(def.external, &f)?,
            }
        }
        map.end()
    }
}

/// Non-negative integer from free text: non-digits are dropped, 0 on failure
pub fn safe_int(raw: &str) -> i64 {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Decimal from free text: anything outside `[0-9.-]` is dropped, 0 on failure
pub fn safe_float(raw: &str) -> f64 {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    kept.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

/// Parse a `Date` cell. Datetime strings are cut to their date part.
pub fn parse_sale_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    // 2023-05-01T10:00:00Z and similar
    if let Some(prefix) = raw.get(..10)
        && raw.len() > 10
    {
        return NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok();
    }
    None
}

/// Full Unicode lowercase of a nullable text cell; stores persist this so
/// their matching agrees with the in-memory pipeline
pub fn search_key(value: Option<&str>) -> String {
    value.unwrap_or("").to_lowercase()
}

/// Split a comma-joined tag string into trimmed non-empty labels
pub fn split_tags(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn external_row() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("Transaction ID", "T-1001"),
            ("Date", "15-03-2023"),
            ("Customer ID", "C-7"),
            ("Customer Name", "Neha Sharma"),
            ("Phone Number", "+91 98765 43210"),
            ("Gender", "Female"),
            ("Age", "34"),
            ("Customer Region", "North"),
            ("Customer Type", "Loyal"),
            ("Product ID", "P-9"),
            ("Product Name", "Headphones"),
            ("Brand", "Acme"),
            ("Product Category", "Electronics"),
            ("Tags", "wireless, Sale"),
            ("Quantity", "3"),
            ("Price per Unit", "1500.5"),
            ("Discount Percentage", "10"),
            ("Total Amount", "4501.5"),
            ("Final Amount", "4051.35"),
            ("Payment Method", "UPI"),
            ("Order Status", "Completed"),
            ("Delivery Type", "Standard"),
            ("Store ID", "S-2"),
            ("Store Location", "Delhi"),
            ("Salesperson ID", "E-11"),
            ("Employee Name", "Ravi"),
        ])
    }

    fn from_map(map: &HashMap<&'static str, &'static str>) -> SaleRecord {
        SaleRecord::from_external(1, |def| map.get(def.external).map(|s| s.to_string()))
    }

    #[test]
    fn test_from_external_maps_every_field() {
        let record = from_map(&external_row());
        assert_eq!(record.transaction_id.as_deref(), Some("T-1001"));
        assert_eq!(record.customer_name.as_deref(), Some("Neha Sharma"));
        assert_eq!(record.age, 34);
        assert_eq!(record.quantity, 3);
        assert_eq!(record.price_per_unit, 1500.5);
        assert_eq!(record.final_amount, 4051.35);
        assert_eq!(record.employee_name.as_deref(), Some("Ravi"));
    }

    #[test]
    fn test_round_trip_external_internal_external() {
        let row = external_row();
        let record = from_map(&row);
        let external = record.to_external();
        assert_eq!(external.len(), 26);

        for def in &FIELDS {
            let original = row[def.external];
            let value = &external[def.external];
            match def.kind {
                FieldKind::Text => assert_eq!(value.as_str(), Some(original)),
                FieldKind::Integer => {
                    assert_eq!(value.as_i64(), original.parse::<i64>().ok())
                }
                FieldKind::Decimal => {
                    assert_eq!(value.as_f64(), original.parse::<f64>().ok())
                }
            }
        }

        let again = SaleRecord::from_external(1, |def| match &external[def.external] {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });
        assert_eq!(again, record);
    }

    #[test]
    fn test_missing_fields_are_null() {
        let record = SaleRecord::from_external(5, |_| None);
        let external = record.to_external();
        assert_eq!(external.len(), 26);
        assert!(external["Customer Name"].is_null());
        assert_eq!(external["Age"], Value::from(0));
        assert_eq!(external["Final Amount"], Value::from(0.0));
    }

    #[test]
    fn test_serialize_matches_to_external() {
        let record = from_map(&external_row());
        let serialized = serde_json::to_value(&record).unwrap();
        assert_eq!(serialized, Value::Object(record.to_external()));
        let keys: Vec<_> = serialized.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.first().map(String::as_str), Some("Transaction ID"));
        assert_eq!(keys.last().map(String::as_str), Some("Employee Name"));
    }

    #[test]
    fn test_safe_int() {
        assert_eq!(safe_int("42"), 42);
        assert_eq!(safe_int(" 4 2 yrs"), 42);
        assert_eq!(safe_int("-7"), 7);
        assert_eq!(safe_int("abc"), 0);
        assert_eq!(safe_int(""), 0);
    }

    #[test]
    fn test_safe_float() {
        assert_eq!(safe_float("1,234.50"), 1234.5);
        assert_eq!(safe_float("₹ 99.9"), 99.9);
        assert_eq!(safe_float("-3.5"), -3.5);
        assert_eq!(safe_float("n/a"), 0.0);
        assert_eq!(safe_float("1.2.3"), 0.0);
    }

    #[test]
    fn test_parse_sale_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2023, 3, 15);
        assert_eq!(parse_sale_date("2023-03-15"), expected);
        assert_eq!(parse_sale_date("15-03-2023"), expected);
        assert_eq!(parse_sale_date("15/03/2023"), expected);
        assert_eq!(parse_sale_date("2023-03-15T08:30:00Z"), expected);
        assert_eq!(parse_sale_date("15 Mar 2023"), expected);
        assert_eq!(parse_sale_date("not a date"), None);
        assert_eq!(parse_sale_date(""), None);
    }

    #[test]
    fn test_tags() {
        let record = SaleRecord {
            tags: Some(" Electronics, Sale ,,".to_string()),
            ..Default::default()
        };
        assert_eq!(record.tag_list(), vec!["Electronics", "Sale"]);
        assert_eq!(record.tag_key().as_deref(), Some(",electronics,sale,"));
        assert_eq!(SaleRecord::default().tag_key(), None);
    }

    #[test]
    fn test_search_keys_fold_unicode() {
        let record = SaleRecord {
            customer_name: Some("ÉLODIE Ünal".to_string()),
            phone_number: Some("+91 AB".to_string()),
            ..Default::default()
        };
        assert_eq!(record.customer_name_lower(), "élodie ünal");
        assert_eq!(record.phone_number_lower(), "+91 ab");
        assert_eq!(SaleRecord::default().customer_name_lower(), "");
    }

    #[test]
    fn test_discount_amount() {
        let record = SaleRecord {
            total_amount: 100.0,
            final_amount: 90.0,
            ..Default::default()
        };
        assert_eq!(record.discount_amount(), 10.0);
    }
}
