//! PostgreSQL schema definitions
//!
//! Same table layout as the SQLite schema, with native column types.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Complete schema SQL for PostgreSQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at BIGINT NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at BIGINT NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms BIGINT,
    success BOOLEAN NOT NULL DEFAULT TRUE
);

-- =============================================================================
-- Sales
-- Derived at ingestion: sale_date (ISO date or NULL) from date, tag_key
-- (",a,b," lowercase) from tags, and the Unicode-lowercased search keys
-- customer_name_lower / phone_number_lower
-- =============================================================================
CREATE TABLE IF NOT EXISTS sales (
    id BIGSERIAL PRIMARY KEY,
    transaction_id TEXT,
    date TEXT,
    customer_id TEXT,
    customer_name TEXT,
    phone_number TEXT,
    gender TEXT,
    age BIGINT NOT NULL DEFAULT 0,
    customer_region TEXT,
    customer_type TEXT,
    product_id TEXT,
    product_name TEXT,
    brand TEXT,
    product_category TEXT,
    tags TEXT,
    quantity BIGINT NOT NULL DEFAULT 0,
    price_per_unit DOUBLE PRECISION NOT NULL DEFAULT 0,
    discount_percentage DOUBLE PRECISION NOT NULL DEFAULT 0,
    total_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
    final_amount DOUBLE PRECISION NOT NULL DEFAULT 0,
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

/// Case-folded search key columns; rows are backfilled after the DDL runs
pub const MIGRATION_V2: &str = r#"
ALTER TABLE sales ADD COLUMN IF NOT EXISTS customer_name_lower TEXT NOT NULL DEFAULT '';
ALTER TABLE sales ADD COLUMN IF NOT EXISTS phone_number_lower TEXT NOT NULL DEFAULT '';
CREATE INDEX IF NOT EXISTS idx_sales_customer_name_lower ON sales(customer_name_lower);
"#;

/// Optional trigram indexes that speed up `LIKE '%term%'` search.
/// Requires the pg_trgm extension to be installable by the connecting role.
pub const TRIGRAM_SQL: &str = r#"
CREATE EXTENSION IF NOT EXISTS pg_trgm;
CREATE INDEX IF NOT EXISTS idx_sales_customer_name_lower_trgm ON sales USING GIN (customer_name_lower gin_trgm_ops);
CREATE INDEX IF NOT EXISTS idx_sales_phone_number_lower_trgm ON sales USING GIN (phone_number_lower gin_trgm_ops);
"#;
