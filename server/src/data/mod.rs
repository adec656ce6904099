//! Data storage layer
//!
//! Provides the sales stores behind the API:
//! - `memory` - CSV dataset cached in process, queried by the domain pipeline
//! - `sqlite` - Embedded relational store
//! - `postgres` - Shared relational store
//! - `sql` - SQL dialects and the sales query builder
//! - `document` - Document-store translation of the same query
//! - `ingest` - CSV import into the relational stores
//! - `types` - Row types shared by the relational backends
//! - `traits` - Repository trait implemented by every store
//! - `error` - Unified error type for all backends

pub mod document;
pub mod error;
pub mod ingest;
pub mod memory;
pub mod postgres;
pub mod sql;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export backend-specific services
pub use memory::MemoryStore;
pub use postgres::PostgresService;
pub use sqlite::SqliteService;

// Re-export unified error type
pub use error::DataError;

// Re-export repository trait
pub use traits::SalesRepository;

use std::sync::Arc;

use crate::core::config::{StoreBackend, StoreConfig};

/// Sales store service enum
///
/// Wraps the configured backend. Services are stored as Arc so the
/// repository trait object can be handed out cheaply per request.
pub enum SalesService {
    /// CSV dataset held in memory (default, read-only)
    Memory(Arc<MemoryStore>),
    /// SQLite backend (embedded)
    Sqlite(Arc<SqliteService>),
    /// PostgreSQL backend (for shared deployments)
    Postgres(Arc<PostgresService>),
}

impl SalesService {
    /// Initialize the sales service based on configuration
    pub async fn init(config: &StoreConfig) -> Result<Self, DataError> {
        match config.backend {
            StoreBackend::Memory => Ok(Self::Memory(Arc::new(MemoryStore::new(
                config.csv_path.clone(),
            )))),
            StoreBackend::Sqlite => {
                let service = SqliteService::init(&config.sqlite_path).await?;
                Ok(Self::Sqlite(Arc::new(service)))
            }
            StoreBackend::Postgres => {
                let service = PostgresService::init(&config.postgres).await?;
                Ok(Self::Postgres(Arc::new(service)))
            }
        }
    }

    /// Close connections gracefully (no-op for the in-memory store)
    pub async fn close(&self) {
        match self {
            Self::Memory(_) => {}
            Self::Sqlite(s) => s.close().await,
            Self::Postgres(p) => p.close().await,
        }
    }

    /// Get the backend type
    pub fn backend(&self) -> StoreBackend {
        match self {
            Self::Memory(_) => StoreBackend::Memory,
            Self::Sqlite(_) => StoreBackend::Sqlite,
            Self::Postgres(_) => StoreBackend::Postgres,
        }
    }

    /// Get the repository trait object for data operations
    pub fn repository(&self) -> Box<dyn SalesRepository + Send + Sync> {
        match self {
            Self::Memory(m) => Box::new(Arc::clone(m)),
            Self::Sqlite(s) => Box::new(Arc::clone(s)),
            Self::Postgres(p) => Box::new(Arc::clone(p)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_memory_is_lazy() {
        let config = StoreConfig {
            csv_path: "/nonexistent/sales.csv".into(),
            ..Default::default()
        };
        let service = SalesService::init(&config).await.unwrap();
        assert_eq!(service.backend(), StoreBackend::Memory);
        assert!(service.repository().ping().await.is_err());
    }

    #[tokio::test]
    async fn test_init_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            backend: StoreBackend::Sqlite,
            sqlite_path: dir.path().join("sales.db"),
            ..Default::default()
        };
        let service = SalesService::init(&config).await.unwrap();
        assert_eq!(service.backend(), StoreBackend::Sqlite);
        service.repository().ping().await.unwrap();
        service.close().await;
    }

    #[tokio::test]
    async fn test_init_postgres_without_url_is_config_error() {
        let config = StoreConfig {
            backend: StoreBackend::Postgres,
            ..Default::default()
        };
        let err = SalesService::init(&config).await.err().unwrap();
        assert!(matches!(err, DataError::Config(_)));
    }
}
