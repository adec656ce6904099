//! Sale repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sql::builder::{build_sales_query, build_stats_query};
use crate::data::sql::{SqlValue, SqliteDialect};
use crate::data::sqlite::SqliteError;
use crate::data::types::{SaleRow, derived_columns, insert_columns};
use crate::domain::sales::options::OPTION_FIELDS;
use crate::domain::sales::{
    FilterOptions, OptionsCollector, SaleRecord, SalesPage, SalesQuery, SalesStats,
};

/// One page of matches plus the total count
pub async fn query_sales(pool: &SqlitePool, query: &SalesQuery) -> Result<SalesPage, SqliteError> {
    let sql = build_sales_query(query, &SqliteDialect);

    let mut rows_query = sqlx::query_as::<_, SaleRow>(&sql.data_sql);
    let mut count_query = sqlx::query_scalar::<_, i64>(&sql.count_sql);
    for value in &sql.params.values {
        match value {
            SqlValue::Text(s) => {
                rows_query = rows_query.bind(s.as_str());
                count_query = count_query.bind(s.as_str());
            }
            SqlValue::Int(n) => {
                rows_query = rows_query.bind(*n);
                count_query = count_query.bind(*n);
            }
        }
    }

    let rows = rows_query.fetch_all(pool).await?;
    let total: i64 = count_query.fetch_one(pool).await?;

    Ok(SalesPage {
        data: rows.into_iter().map(SaleRecord::from).collect(),
        total_records: total.max(0) as u64,
    })
}

/// Totals over the filtered set
pub async fn stats(pool: &SqlitePool, query: &SalesQuery) -> Result<SalesStats, SqliteError> {
    let (sql, params) = build_stats_query(query, &SqliteDialect);

    let mut stats_query = sqlx::query_as::<_, (i64, i64, f64, f64)>(&sql);
    for value in &params.values {
        stats_query = match value {
            SqlValue::Text(s) => stats_query.bind(s.as_str()),
            SqlValue::Int(n) => stats_query.bind(*n),
        };
    }

    let (records, units, amount, discount) = stats_query.fetch_one(pool).await?;
    Ok(SalesStats {
        total_records: records.max(0) as u64,
        total_units: units,
        total_amount: amount,
        total_discount: discount,
    })
}

/// Distinct values per option field, flattened tags and the known-age range
pub async fn filter_options(pool: &SqlitePool) -> Result<FilterOptions, SqliteError> {
    let mut collector = OptionsCollector::new();

    for field in OPTION_FIELDS {
        let col = field.internal();
        let values: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT DISTINCT {col} FROM sales WHERE {col} IS NOT NULL AND {col} <> ''"
        ))
        .fetch_all(pool)
        .await?;
        for value in &values {
            collector.add_value(field, value);
        }
    }

    let tag_cells: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT tags FROM sales WHERE tags IS NOT NULL AND tags <> ''")
            .fetch_all(pool)
            .await?;
    for cell in &tag_cells {
        collector.add_tags(cell);
    }

    let (min, max): (Option<i64>, Option<i64>) =
        sqlx::query_as("SELECT MIN(age), MAX(age) FROM sales WHERE age > 0")
            .fetch_one(pool)
            .await?;
    if let (Some(min), Some(max)) = (min, max) {
        collector.add_age(min);
        collector.add_age(max);
    }

    Ok(collector.finish())
}

/// Insert a batch inside one transaction; ids are assigned by the table
pub async fn insert_batch(pool: &SqlitePool, records: &[SaleRecord]) -> Result<u64, SqliteError> {
    if records.is_empty() {
        return Ok(0);
    }
    let columns = insert_columns();
    let placeholders = vec!["?"; columns.split(", ").count()].join(", ");
    let sql = format!("INSERT INTO sales ({columns}) VALUES ({placeholders})");

    let mut tx = pool.begin().await?;
    let mut inserted = 0;
    for record in records {
        let derived = derived_columns(record);
        let result = sqlx::query(&sql)
            .bind(&record.transaction_id)
            .bind(&record.date)
            .bind(&record.customer_id)
            .bind(&record.customer_name)
            .bind(&record.phone_number)
            .bind(&record.gender)
            .bind(record.age)
            .bind(&record.customer_region)
            .bind(&record.customer_type)
            .bind(&record.product_id)
            .bind(&record.product_name)
            .bind(&record.brand)
            .bind(&record.product_category)
            .bind(&record.tags)
            .bind(record.quantity)
            .bind(record.price_per_unit)
            .bind(record.discount_percentage)
            .bind(record.total_amount)
            .bind(record.final_amount)
            .bind(&record.payment_method)
            .bind(&record.order_status)
            .bind(&record.delivery_type)
            .bind(&record.store_id)
            .bind(&record.store_location)
            .bind(&record.salesperson_id)
            .bind(&record.employee_name)
            .bind(derived.sale_date)
            .bind(derived.tag_key)
            .bind(derived.customer_name_lower)
            .bind(derived.phone_number_lower)
            .execute(&mut *tx)
            .await?;
        inserted += result.rows_affected();
    }
    tx.commit().await?;

    tracing::debug!(inserted, "Inserted sales batch");
    Ok(inserted)
}

/// Remove all sales and restart id numbering
pub async fn delete_all(pool: &SqlitePool) -> Result<u64, SqliteError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM sales").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM sqlite_sequence WHERE name = 'sales'")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected())
}
