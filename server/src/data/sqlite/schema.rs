//! SQLite schema definitions
//!
//! Initial schema with the sales table. Migrations build on top of it.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- Sales
-- Derived at ingestion: sale_date (ISO date or NULL) from date, tag_key
-- (",a,b," lowercase) from tags, and the Unicode-lowercased search keys
-- customer_name_lower / phone_number_lower
-- =============================================================================
CREATE TABLE IF NOT EXISTS sales (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    transaction_id TEXT,
    date TEXT,
    customer_id TEXT,
    customer_name TEXT,
    phone_number TEXT,
    gender TEXT,
    age INTEGER NOT NULL DEFAULT 0,
    customer_region TEXT,
    customer_type TEXT,
    product_id TEXT,
    product_name TEXT,
    brand TEXT,
    product_category TEXT,
    tags TEXT,
    quantity INTEGER NOT NULL DEFAULT 0,
    price_per_unit REAL NOT NULL DEFAULT 0,
    discount_percentage REAL NOT NULL DEFAULT 0,
    total_amount REAL NOT NULL DEFAULT 0,
    final_amount REAL NOT NULL DEFAULT 0,
    payment_method TEXT,
    order_status TEXT,
    delivery_type TEXT,
    store_id TEXT,
    store_location TEXT,
    salesperson_id TEXT,
    employee_name TEXT,
    sale_date TEXT,
    tag_key TEXT,
    customer_name_lower TEXT NOT NULL DEFAULT '',
    phone_number_lower TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_sales_customer_name ON sales(customer_name);
CREATE INDEX IF NOT EXISTS idx_sales_customer_name_lower ON sales(customer_name_lower);
CREATE INDEX IF NOT EXISTS idx_sales_phone_number ON sales(phone_number);
CREATE INDEX IF NOT EXISTS idx_sales_customer_region ON sales(customer_region);
CREATE INDEX IF NOT EXISTS idx_sales_gender ON sales(gender);
CREATE INDEX IF NOT EXISTS idx_sales_product_category ON sales(product_category);
CREATE INDEX IF NOT EXISTS idx_sales_payment_method ON sales(payment_method);
CREATE INDEX IF NOT EXISTS idx_sales_order_status ON sales(order_status);
CREATE INDEX IF NOT EXISTS idx_sales_delivery_type ON sales(delivery_type);
CREATE INDEX IF NOT EXISTS idx_sales_age ON sales(age);
CREATE INDEX IF NOT EXISTS idx_sales_sale_date ON sales(sale_date);
CREATE INDEX IF NOT EXISTS idx_sales_quantity ON sales(quantity);
CREATE INDEX IF NOT EXISTS idx_sales_final_amount ON sales(final_amount);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_version_is_positive() {
        assert!(SCHEMA_VERSION > 0);
    }

    #[test]
    fn test_schema_contains_all_tables() {
        for table in ["schema_version", "schema_migrations", "sales"] {
            assert!(
                SCHEMA.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table)),
                "missing table {table}"
            );
        }
    }

    #[test]
    fn test_schema_has_every_sale_column() {
        for def in &crate::domain::sales::FIELDS {
            assert!(
                SCHEMA.contains(&format!("\n    {} ", def.internal)),
                "missing column {}",
                def.internal
            );
        }
    }

    #[tokio::test]
    async fn test_schema_applies() {
        let pool = sqlx::SqlitePool::connect(":memory:").await.unwrap();
        sqlx::query(SCHEMA).execute(&pool).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
