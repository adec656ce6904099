//! PostgreSQL database service
//!
//! Shared sales store for multi-instance deployments:
//! - Connection pooling with min/max bounds
//! - Idle connection cleanup
//! - Connection lifetime cycling
//! - Query timeout protection
//!
//! All schema definitions and migrations are managed here.

pub mod error;
mod migrations;
pub mod repositories;
mod repository_impl;
pub mod schema;

pub use error::PostgresError;
pub use sqlx::PgPool;

use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::log::LevelFilter;

use crate::core::config::PostgresConfig;
use crate::core::constants::{
    POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS, POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS,
    POSTGRES_DEFAULT_MAX_CONNECTIONS, POSTGRES_DEFAULT_MAX_LIFETIME_SECS,
    POSTGRES_DEFAULT_MIN_CONNECTIONS, POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
};

/// PostgreSQL database service
///
/// Handles database initialization and connection pooling.
/// Should be created once at startup and shared across handlers.
pub struct PostgresService {
    pool: PgPool,
}

/// Pool settings after applying defaults to unset (zero) config values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PoolSettings {
    max_connections: u32,
    min_connections: u32,
    acquire_timeout_secs: u64,
    idle_timeout_secs: u64,
    max_lifetime_secs: u64,
    statement_timeout_secs: u64,
}

impl PoolSettings {
    fn from_config(config: &PostgresConfig) -> Self {
        fn or_default<T: PartialEq + Default>(value: T, default: T) -> T {
            if value != T::default() { value } else { default }
        }
        Self {
            max_connections: or_default(config.max_connections, POSTGRES_DEFAULT_MAX_CONNECTIONS),
            min_connections: or_default(config.min_connections, POSTGRES_DEFAULT_MIN_CONNECTIONS),
            acquire_timeout_secs: or_default(
                config.acquire_timeout_secs,
                POSTGRES_DEFAULT_ACQUIRE_TIMEOUT_SECS,
            ),
            idle_timeout_secs: or_default(
                config.idle_timeout_secs,
                POSTGRES_DEFAULT_IDLE_TIMEOUT_SECS,
            ),
            max_lifetime_secs: or_default(
                config.max_lifetime_secs,
                POSTGRES_DEFAULT_MAX_LIFETIME_SECS,
            ),
            statement_timeout_secs: or_default(
                config.statement_timeout_secs,
                POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS,
            ),
        }
    }
}

impl PostgresService {
    /// Initialize the database service from configuration
    ///
    /// Creates a connection pool, runs migrations and, when enabled,
    /// installs the trigram search indexes.
    pub async fn init(config: &PostgresConfig) -> Result<Self, PostgresError> {
        let url = config.url.as_str();
        if url.is_empty() {
            return Err(PostgresError::Config("PostgreSQL URL is required".into()));
        }
        let settings = PoolSettings::from_config(config);

        let mut options: PgConnectOptions = url
            .parse()
            .map_err(|e| PostgresError::Config(format!("Invalid PostgreSQL URL: {}", e)))?;

        options = options.log_statements(LevelFilter::Trace);

        // Set statement timeout at connection level for query protection
        if settings.statement_timeout_secs > 0 {
            options = options.options([(
                "statement_timeout",
                format!("{}s", settings.statement_timeout_secs),
            )]);
        }

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(settings.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(settings.max_lifetime_secs))
            .connect_with(options)
            .await?;

        migrations::run_migrations(&pool).await?;
        if config.trigram_search {
            migrations::apply_trigram_indexes(&pool).await?;
        }

        tracing::debug!(
            max_connections = settings.max_connections,
            min_connections = settings.min_connections,
            acquire_timeout_secs = settings.acquire_timeout_secs,
            idle_timeout_secs = settings.idle_timeout_secs,
            max_lifetime_secs = settings.max_lifetime_secs,
            statement_timeout_secs = settings.statement_timeout_secs,
            trigram_search = config.trigram_search,
            "PostgresService initialized"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("PostgreSQL pool closed");
    }
}

#[cfg(test)]
mod tests {
    // Live PostgreSQL is not assumed; queries are covered through the builder.
    use super::*;

    #[test]
    fn test_pool_settings_fall_back_to_defaults() {
        let settings = PoolSettings::from_config(&PostgresConfig::default());
        assert_eq!(settings.max_connections, POSTGRES_DEFAULT_MAX_CONNECTIONS);
        assert_eq!(settings.min_connections, POSTGRES_DEFAULT_MIN_CONNECTIONS);
        assert_eq!(
            settings.statement_timeout_secs,
            POSTGRES_DEFAULT_STATEMENT_TIMEOUT_SECS
        );
    }

    #[test]
    fn test_pool_settings_keep_configured_values() {
        let config = PostgresConfig {
            max_connections: 4,
            idle_timeout_secs: 15,
            ..Default::default()
        };
        let settings = PoolSettings::from_config(&config);
        assert_eq!(settings.max_connections, 4);
        assert_eq!(settings.idle_timeout_secs, 15);
        assert_eq!(settings.max_lifetime_secs, POSTGRES_DEFAULT_MAX_LIFETIME_SECS);
    }

    #[tokio::test]
    async fn test_init_requires_url() {
        let err = PostgresService::init(&PostgresConfig::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, PostgresError::Config(_)));
    }

    #[tokio::test]
    async fn test_init_rejects_malformed_url() {
        let config = PostgresConfig {
            url: "not a url".into(),
            ..Default::default()
        };
        let err = PostgresService::init(&config).await.err().unwrap();
        assert!(err.to_string().contains("Invalid PostgreSQL URL"));
    }
}
