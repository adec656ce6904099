//! SalesRepository trait implementation for PostgreSQL
//!
//! This module implements the SalesRepository trait for Arc<PostgresService>,
//! providing a unified interface for all sales database operations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::SalesRepository;
use crate::domain::sales::{FilterOptions, SaleRecord, SalesPage, SalesQuery, SalesStats};

use super::PostgresService;
use super::repositories;

#[async_trait]
impl SalesRepository for Arc<PostgresService> {
    // ==================== Query Operations ====================

    async fn query_sales(&self, query: &SalesQuery) -> Result<SalesPage, DataError> {
        repositories::query_sales(self.pool(), query)
            .await
            .map_err(Into::into)
    }

    async fn filter_options(&self) -> Result<FilterOptions, DataError> {
        repositories::filter_options(self.pool())
            .await
            .map_err(Into::into)
    }

    async fn stats(&self, query: &SalesQuery) -> Result<SalesStats, DataError> {
        repositories::stats(self.pool(), query)
            .await
            .map_err(Into::into)
    }

    async fn ping(&self) -> Result<(), DataError> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map(|_| ())
            .map_err(DataError::from_postgres)
    }

    // ==================== Ingestion Operations ====================

    async fn delete_all(&self) -> Result<u64, DataError> {
        repositories::delete_all(self.pool())
            .await
            .map_err(Into::into)
    }

    async fn insert_batch(&self, records: &[SaleRecord]) -> Result<u64, DataError> {
        repositories::insert_batch(self.pool(), records)
            .await
            .map_err(Into::into)
    }
}
