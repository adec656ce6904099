//! Repository traits for sales stores
//!
//! This module defines the trait that provides a unified interface for sales
//! queries across stores. Each store (in-memory CSV dataset, SQLite,
//! PostgreSQL) implements it with its own adapter of the shared
//! [`SalesQuery`] model.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::domain::sales::{FilterOptions, SaleRecord, SalesPage, SalesQuery, SalesStats};

// ============================================================================
// Sales Repository Trait
// ============================================================================

/// Repository trait for sales reads and bulk loading
#[async_trait]
pub trait SalesRepository: Send + Sync {
    // ==================== Query Operations ====================

    /// One page of matching records plus the pre-pagination total
    async fn query_sales(&self, query: &SalesQuery) -> Result<SalesPage, DataError>;

    /// Distinct-value domains for the filter controls
    async fn filter_options(&self) -> Result<FilterOptions, DataError>;

    /// Totals over the filtered set
    async fn stats(&self, query: &SalesQuery) -> Result<SalesStats, DataError>;

    /// Verify the store is reachable
    async fn ping(&self) -> Result<(), DataError>;

    // ==================== Ingestion Operations ====================

    /// Remove every stored sale, returning the number removed
    async fn delete_all(&self) -> Result<u64, DataError>;

    /// Insert a batch in a single transaction, returning the number inserted
    async fn insert_batch(&self, records: &[SaleRecord]) -> Result<u64, DataError>;
}
