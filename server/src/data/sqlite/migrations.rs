//! Database migration system
//!
//! Handles schema versioning and incremental migrations.
//! Fresh databases get the full current schema; older ones replay the
//! numbered migrations below.

use sqlx::{SqliteConnection, SqlitePool};

use super::error::SqliteError;
use super::schema::{SCHEMA, SCHEMA_VERSION};
use crate::domain::sales::record::search_key;
use crate::utils::checksum::sha256_hex;

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteError> {
    // Check if this is a fresh database
    let table_exists: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        tracing::debug!(
            "Initializing database with schema version {}",
            SCHEMA_VERSION
        );
        apply_initial_schema(pool).await?;
        return Ok(());
    }

    // Get current version
    let current_version: i32 =
        sqlx::query_scalar("SELECT version FROM schema_version WHERE id = 1")
            .fetch_optional(pool)
            .await?
            .unwrap_or(0);

    if current_version >= SCHEMA_VERSION {
        tracing::debug!(
            "Database schema is up to date (version {})",
            current_version
        );
        return Ok(());
    }

    // Apply incremental migrations
    for version in (current_version + 1)..=SCHEMA_VERSION {
        tracing::debug!("Applying migration to version {}", version);
        apply_migration(pool, version).await?;
    }

    Ok(())
}

/// Apply the initial schema (version 1)
async fn apply_initial_schema(pool: &SqlitePool) -> Result<(), SqliteError> {
    let start = std::time::Instant::now();

    let mut tx = pool.begin().await?;

    sqlx::query(SCHEMA).execute(&mut *tx).await?;

    // Record version
    let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);
    sqlx::query(
        "INSERT INTO schema_version (id, version, applied_at, description) VALUES (1, ?, ?, 'Initial schema')",
    )
    .bind(SCHEMA_VERSION)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    // Record migration
    let checksum = sha256_hex(SCHEMA);
    let elapsed_ms = start.elapsed().as_millis() as i64;
    sqlx::query(
        "INSERT INTO schema_migrations (version, name, applied_at, checksum, execution_time_ms, success) VALUES (?, ?, ?, ?, ?, 1)",
    )
    .bind(SCHEMA_VERSION)
    .bind("initial_schema")
    .bind(now)
    .bind(&checksum)
    .bind(elapsed_ms)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!("Applied initial schema in {}ms", elapsed_ms);
    Ok(())
}

/// Case-folded search key columns; rows are backfilled in the same transaction
const MIGRATION_V2: &str = "ALTER TABLE sales ADD COLUMN customer_name_lower TEXT NOT NULL DEFAULT ''; ALTER TABLE sales ADD COLUMN phone_number_lower TEXT NOT NULL DEFAULT ''; CREATE INDEX IF NOT EXISTS idx_sales_customer_name_lower ON sales(customer_name_lower)";

/// Apply a specific migration version
async fn apply_migration(pool: &SqlitePool, version: i32) -> Result<(), SqliteError> {
    match version {
        1 => {
            // Already handled by initial schema
            Ok(())
        }
        2 => apply_versioned_migration(pool, 2, "add_search_keys", MIGRATION_V2).await,
        _ => Err(SqliteError::MigrationFailed {
            version,
            name: "unknown".to_string(),
            error: format!("Unknown migration version: {}", version),
        }),
    }
}

/// Apply a versioned migration with tracking
async fn apply_versioned_migration(
    pool: &SqlitePool,
    version: i32,
    name: &str,
    sql: &str,
) -> Result<(), SqliteError> {
    let start = std::time::Instant::now();

    let mut tx = pool.begin().await?;

    // Execute migration SQL (split by semicolons for SQLite compatibility)
    for statement in sql.split(';').filter(|s| !s.trim().is_empty()) {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(&mut *tx).await.map_err(|e| {
                SqliteError::MigrationFailed {
                    version,
                    name: name.to_string(),
                    error: format!(
                        "Failed at statement: {} - {}",
                        &trimmed[..trimmed.len().min(50)],
                        e
                    ),
                }
            })?;
        }
    }

    if version == 2 {
        backfill_search_keys(&mut tx).await?;
    }

    // Update version
    let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);
    sqlx::query(
        "UPDATE schema_version SET version = ?, applied_at = ?, description = ? WHERE id = 1",
    )
    .bind(version)
    .bind(now)
    .bind(name)
    .execute(&mut *tx)
    .await?;

    // Record migration
    let checksum = sha256_hex(sql);
    let elapsed_ms = start.elapsed().as_millis() as i64;
    sqlx::query(
        "INSERT INTO schema_migrations (version, name, applied_at, checksum, execution_time_ms, success) VALUES (?, ?, ?, ?, ?, 1)",
    )
    .bind(version)
    .bind(name)
    .bind(now)
    .bind(&checksum)
    .bind(elapsed_ms)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(
        "Applied migration v{} ({}) in {}ms",
        version,
        name,
        elapsed_ms
    );
    Ok(())
}

/// Fill the search keys of existing rows with the importer's case folding
async fn backfill_search_keys(conn: &mut SqliteConnection) -> Result<(), SqliteError> {
    let rows: Vec<(i64, Option<String>, Option<String>)> =
        sqlx::query_as("SELECT id, customer_name, phone_number FROM sales")
            .fetch_all(&mut *conn)
            .await?;

    for (id, name, phone) in &rows {
        sqlx::query("UPDATE sales SET customer_name_lower = ?, phone_number_lower = ? WHERE id = ?")
            .bind(search_key(name.as_deref()))
            .bind(search_key(phone.as_deref()))
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }

    tracing::debug!(rows = rows.len(), "Backfilled sales search keys");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_pool() -> SqlitePool {
        SqlitePool::connect(":memory:").await.unwrap()
    }

    async fn version(pool: &SqlitePool) -> i32 {
        sqlx::query_scalar("SELECT version FROM schema_version WHERE id = 1")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_fresh_database_gets_current_version() {
        let pool = memory_pool().await;
        run_migrations(&pool).await.unwrap();
        assert_eq!(version(&pool).await, SCHEMA_VERSION);

        let checksum: String =
            sqlx::query_scalar("SELECT checksum FROM schema_migrations WHERE version = ?")
                .bind(SCHEMA_VERSION)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(checksum, sha256_hex(SCHEMA));
    }

    #[tokio::test]
    async fn test_rerun_is_noop() {
        let pool = memory_pool().await;
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();
        assert_eq!(version(&pool).await, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_upgrade_from_v1() {
        let pool = memory_pool().await;
        run_migrations(&pool).await.unwrap();
        // Roll the table back to its v1 shape with one existing row
        sqlx::query(
            "DROP INDEX idx_sales_customer_name_lower; \
             ALTER TABLE sales DROP COLUMN customer_name_lower; \
             ALTER TABLE sales DROP COLUMN phone_number_lower; \
             UPDATE schema_version SET version = 1 WHERE id = 1; \
             DELETE FROM schema_migrations",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO sales (transaction_id, customer_name, phone_number) VALUES ('T1', 'ÉLODIE Ünal', NULL)")
            .execute(&pool)
            .await
            .unwrap();

        run_migrations(&pool).await.unwrap();
        assert_eq!(version(&pool).await, 2);
        let name: String = sqlx::query_scalar("SELECT name FROM schema_migrations WHERE version = 2")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(name, "add_search_keys");

        let keys: (String, String) =
            sqlx::query_as("SELECT customer_name_lower, phone_number_lower FROM sales")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(keys, ("élodie ünal".to_string(), String::new()));
    }
}
