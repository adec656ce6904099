//! Shared row types for the relational backends (SQLite, PostgreSQL)

use crate::domain::sales::SaleRecord;

/// Sale row as selected by `builder::select_columns`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SaleRow {
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

impl From<SaleRow> for SaleRecord {
    fn from(row: SaleRow) -> Self {
        SaleRecord {
            id: row.id,
            transaction_id: row.transaction_id,
            date: row.date,
            customer_id: row.customer_id,
            customer_name: row.customer_name,
            phone_number: row.phone_number,
            gender: row.gender,
            age: row.age,
            customer_region: row.customer_region,
            customer_type: row.customer_type,
            product_id: row.product_id,
            product_name: row.product_name,
            brand: row.brand,
            product_category: row.product_category,
            tags: row.tags,
            quantity: row.quantity,
            price_per_unit: row.price_per_unit,
            discount_percentage: row.discount_percentage,
            total_amount: row.total_amount,
            final_amount: row.final_amount,
            payment_method: row.payment_method,
            order_status: row.order_status,
            delivery_type: row.delivery_type,
            store_id: row.store_id,
            store_location: row.store_location,
            salesperson_id: row.salesperson_id,
            employee_name: row.employee_name,
        }
    }
}

/// Column list for INSERT, in bind order: the 26 sale fields then the derived columns
pub fn insert_columns() -> String {
    format!(
        "{}, sale_date, tag_key, customer_name_lower, phone_number_lower",
        crate::domain::sales::fields::internal_column_list()
    )
}

/// Derived column values written next to a record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedColumns {
    /// ISO `YYYY-MM-DD`, `None` when the date did not parse
    pub sale_date: Option<String>,
    /// `,a,b,` lowercase tag labels
    pub tag_key: Option<String>,
    pub customer_name_lower: String,
    pub phone_number_lower: String,
}

pub fn derived_columns(record: &SaleRecord) -> DerivedColumns {
    DerivedColumns {
        sale_date: record
            .sale_date()
            .map(|d| d.format("%Y-%m-%d").to_string()),
        tag_key: record.tag_key(),
        customer_name_lower: record.customer_name_lower(),
        phone_number_lower: record.phone_number_lower(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_columns_end_with_derived() {
        let cols = insert_columns();
        assert!(cols.starts_with("transaction_id, date, "));
        assert!(cols.ends_with(
            "employee_name, sale_date, tag_key, customer_name_lower, phone_number_lower"
        ));
        assert_eq!(cols.split(", ").count(), 30);
    }

    #[test]
    fn test_derived_columns() {
        let record = SaleRecord {
            date: Some("07-11-2023".into()),
            tags: Some("Gift, New".into()),
            customer_name: Some("ÉLODIE Ünal".into()),
            phone_number: Some("98-76".into()),
            ..Default::default()
        };
        let derived = derived_columns(&record);
        assert_eq!(derived.sale_date.as_deref(), Some("2023-11-07"));
        assert_eq!(derived.tag_key.as_deref(), Some(",gift,new,"));
        assert_eq!(derived.customer_name_lower, "élodie ünal");
        assert_eq!(derived.phone_number_lower, "98-76");
        assert_eq!(derived_columns(&SaleRecord::default()), DerivedColumns::default());
    }
}
