//! PostgreSQL migration management
//!
//! Handles schema initialization and versioned migrations.

use sqlx::PgPool;

use super::error::PostgresError;
use super::schema::{MIGRATION_V2, SCHEMA, SCHEMA_VERSION, TRIGRAM_SQL};
use crate::domain::sales::record::search_key;
use crate::utils::checksum::sha256_hex;

/// Run all pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), PostgresError> {
    // Check if schema_version table exists
    let table_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = 'schema_version'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        tracing::debug!("Applying initial PostgreSQL schema v{}", SCHEMA_VERSION);
        apply_initial_schema(pool).await?;
        return Ok(());
    }

    let current_version: Option<i32> =
        sqlx::query_scalar("SELECT version FROM schema_version WHERE id = 1")
            .fetch_optional(pool)
            .await?;

    match current_version {
        None => {
            // Table exists but no version row - apply schema
            tracing::debug!("Applying initial PostgreSQL schema v{}", SCHEMA_VERSION);
            apply_initial_schema(pool).await?;
        }
        Some(v) if v < SCHEMA_VERSION => {
            tracing::debug!(
                "Migrating PostgreSQL schema from v{} to v{}",
                v,
                SCHEMA_VERSION
            );
            for version in (v + 1)..=SCHEMA_VERSION {
                apply_versioned_migration(pool, version).await?;
            }
        }
        Some(v) if v > SCHEMA_VERSION => {
            tracing::warn!(
                "PostgreSQL schema version {} is newer than application version {}. This may cause issues.",
                v,
                SCHEMA_VERSION
            );
        }
        _ => {
            tracing::debug!("PostgreSQL schema is up to date (v{})", SCHEMA_VERSION);
        }
    }

    Ok(())
}

/// Create the pg_trgm extension and GIN indexes for substring search
pub async fn apply_trigram_indexes(pool: &PgPool) -> Result<(), PostgresError> {
    sqlx::query(TRIGRAM_SQL).execute(pool).await?;
    tracing::debug!("PostgreSQL trigram search indexes ready");
    Ok(())
}

/// Apply the initial schema
async fn apply_initial_schema(pool: &PgPool) -> Result<(), PostgresError> {
    let start = std::time::Instant::now();
    let now = chrono::Utc::now().timestamp();

    sqlx::query(SCHEMA).execute(pool).await?;

    sqlx::query(
        "INSERT INTO schema_version (id, version, applied_at, description)
         VALUES (1, $1, $2, 'Initial schema')
         ON CONFLICT (id) DO UPDATE SET version = $1, applied_at = $2",
    )
    .bind(SCHEMA_VERSION)
    .bind(now)
    .execute(pool)
    .await?;

    record_migration(pool, SCHEMA_VERSION, "initial_schema", SCHEMA, start, now).await?;

    tracing::debug!("PostgreSQL schema v{} applied successfully", SCHEMA_VERSION);
    Ok(())
}

/// SQL for one versioned migration
fn migration_sql(version: i32) -> Result<(&'static str, &'static str), PostgresError> {
    match version {
        2 => Ok(("add_search_keys", MIGRATION_V2)),
        _ => Err(PostgresError::MigrationFailed {
            version,
            name: "unknown".to_string(),
            error: format!("No migration defined for version {}", version),
        }),
    }
}

/// Apply a specific versioned migration
async fn apply_versioned_migration(pool: &PgPool, version: i32) -> Result<(), PostgresError> {
    let start = std::time::Instant::now();
    let now = chrono::Utc::now().timestamp();
    let (name, sql) = migration_sql(version)?;

    sqlx::query(sql)
        .execute(pool)
        .await
        .map_err(|e| PostgresError::MigrationFailed {
            version,
            name: name.to_string(),
            error: e.to_string(),
        })?;

    if version == 2 {
        backfill_search_keys(pool).await?;
    }

    record_migration(pool, version, name, sql, start, now).await?;

    sqlx::query("UPDATE schema_version SET version = $1, applied_at = $2 WHERE id = 1")
        .bind(version)
        .bind(now)
        .execute(pool)
        .await?;

    tracing::debug!(
        "PostgreSQL migration v{} ({}) applied in {}ms",
        version,
        name,
        start.elapsed().as_millis()
    );
    Ok(())
}

/// Fill the search keys of existing rows with the importer's case folding
async fn backfill_search_keys(pool: &PgPool) -> Result<(), PostgresError> {
    let rows: Vec<(i64, Option<String>, Option<String>)> =
        sqlx::query_as("SELECT id, customer_name, phone_number FROM sales")
            .fetch_all(pool)
            .await?;

    let mut tx = pool.begin().await?;
    for (id, name, phone) in &rows {
        sqlx::query("UPDATE sales SET customer_name_lower = $1, phone_number_lower = $2 WHERE id = $3")
            .bind(search_key(name.as_deref()))
            .bind(search_key(phone.as_deref()))
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    tracing::debug!(rows = rows.len(), "Backfilled sales search keys");
    Ok(())
}

async fn record_migration(
    pool: &PgPool,
    version: i32,
    name: &str,
    sql: &str,
    start: std::time::Instant,
    now: i64,
) -> Result<(), PostgresError> {
    let elapsed = start.elapsed().as_millis() as i64;
    sqlx::query(
        "INSERT INTO schema_migrations (version, name, applied_at, checksum, execution_time_ms, success)
         VALUES ($1, $2, $3, $4, $5, TRUE)
         ON CONFLICT (version) DO NOTHING",
    )
    .bind(version)
    .bind(name)
    .bind(now)
    .bind(sha256_hex(sql))
    .bind(elapsed)
    .execute(pool)
    .await?;
    Ok(())
}
