//! Sale repository for PostgreSQL operations

use sqlx::PgPool;

use crate::data::postgres::PostgresError;
use crate::data::sql::builder::{build_sales_query, build_stats_query};
use crate::data::sql::{PostgresDialect, SqlDialect, SqlValue};
use crate::data::types::{SaleRow, derived_columns, insert_columns};
use crate::domain::sales::options::OPTION_FIELDS;
use crate::domain::sales::{
    FilterOptions, OptionsCollector, SaleRecord, SalesPage, SalesQuery, SalesStats,
};

/// One page of matches plus the total count
pub async fn query_sales(pool: &PgPool, query: &SalesQuery) -> Result<SalesPage, PostgresError> {
    let sql = build_sales_query(query, &PostgresDialect);

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
pub async fn stats(pool: &PgPool, query: &SalesQuery) -> Result<SalesStats, PostgresError> {
    let (sql, params) = build_stats_query(query, &PostgresDialect);

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
pub async fn filter_options(pool: &PgPool) -> Result<FilterOptions, PostgresError> {
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

/// INSERT statement with numbered placeholders for every insert column
fn insert_sql() -> String {
    let columns = insert_columns();
    let placeholders: Vec<String> = (1..=columns.split(", ").count())
        .map(|i| PostgresDialect.placeholder(i))
        .collect();
    format!(
        "INSERT INTO sales ({}) VALUES ({})",
        columns,
        placeholders.join(", ")
    )
}

/// Insert a batch inside one transaction; ids come from the BIGSERIAL
pub async fn insert_batch(pool: &PgPool, records: &[SaleRecord]) -> Result<u64, PostgresError> {
    if records.is_empty() {
        return Ok(0);
    }
    let sql = insert_sql();

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

/// Remove all sales and restart the id sequence
pub async fn delete_all(pool: &PgPool) -> Result<u64, PostgresError> {
    let mut tx = pool.begin().await?;
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
        .fetch_one(&mut *tx)
        .await?;
    sqlx::query("TRUNCATE sales RESTART IDENTITY")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(count.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sql_numbers_every_column() {
        let sql = insert_sql();
        assert!(sql.starts_with("INSERT INTO sales (transaction_id, "));
        assert!(sql.contains("$1, $2, "));
        assert!(sql.ends_with("$29, $30)"));
        assert!(!sql.contains('?'));
    }

    #[test]
    fn test_query_uses_numbered_placeholders() {
        let query = SalesQuery::from_pairs(&[
            ("search", "ann"),
            ("gender", "Female,Male"),
            ("ageMin", "30"),
        ]);
        let sql = build_sales_query(&query, &PostgresDialect);
        assert!(sql.data_sql.contains("customer_name_lower LIKE $1"));
        assert!(sql.data_sql.contains("phone_number_lower LIKE $2"));
        assert!(sql.data_sql.contains("gender IN ($3, $4)"));
        assert!(sql.data_sql.contains("age >= $5"));
        assert_eq!(sql.params.values.len(), 5);
        assert!(sql.count_sql.starts_with("SELECT COUNT(*) FROM sales WHERE "));
    }

    #[test]
    fn test_date_sort_puts_missing_dates_last() {
        let query = SalesQuery::from_pairs(&[("sortBy", "date-oldest")]);
        let sql = build_sales_query(&query, &PostgresDialect);
        assert!(sql.data_sql.contains("sale_date ASC NULLS LAST, id ASC"));
    }

    #[test]
    fn test_customer_sort_ignores_database_locale() {
        let query = SalesQuery::from_pairs(&[("sortBy", "customer-az")]);
        let sql = build_sales_query(&query, &PostgresDialect);
        assert!(sql.data_sql.contains(r#"ORDER BY customer_name_lower COLLATE "C" ASC, id ASC"#));
    }
}
