//! In-memory sales store
//!
//! Serves queries from the cached CSV dataset through the domain pipeline.
//! Read-only: ingestion targets the relational stores.

pub mod cache;
pub mod loader;

pub use cache::{Dataset, DatasetCache};
pub use loader::{CsvLoad, load_csv, read_csv};

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::SalesRepository;
use crate::domain::sales::{
    FilterOptions, SaleRecord, SalesPage, SalesQuery, SalesStats, extract_filter_options, pipeline,
};

const BACKEND: &str = "memory";

pub struct MemoryStore {
    cache: DatasetCache,
}

impl MemoryStore {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            cache: DatasetCache::new(csv_path),
        }
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }
}

#[async_trait]
impl SalesRepository for Arc<MemoryStore> {
    async fn query_sales(&self, query: &SalesQuery) -> Result<SalesPage, DataError> {
        let records = self.cache.load().await?;
        Ok(pipeline::run_query(&records, query))
    }

    async fn filter_options(&self) -> Result<FilterOptions, DataError> {
        let records = self.cache.load().await?;
        Ok(extract_filter_options(&records))
    }

    async fn stats(&self, query: &SalesQuery) -> Result<SalesStats, DataError> {
        let records = self.cache.load().await?;
        Ok(SalesStats::from_records(pipeline::select(&records, query)))
    }

    async fn ping(&self) -> Result<(), DataError> {
        self.cache.load().await.map(|_| ())
    }

    async fn delete_all(&self) -> Result<u64, DataError> {
        Err(DataError::unsupported(BACKEND, "delete_all"))
    }

    async fn insert_batch(&self, _records: &[SaleRecord]) -> Result<u64, DataError> {
        Err(DataError::unsupported(BACKEND, "insert_batch"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(csv: &str) -> (tempfile::TempDir, Arc<MemoryStore>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(&path, csv).unwrap();
        (dir, Arc::new(MemoryStore::new(path)))
    }

    const CSV: &str = "Transaction ID,Customer Name,Age,Tags,Quantity,Total Amount,Final Amount\n\
                       1,Bob,20,\"Electronics, Sale\",2,100,90\n\
                       2,alice,35,Sale,1,50,50\n\
                       3,Charlie,50,Clearance,4,200,150\n";

    #[tokio::test]
    async fn test_query_through_cache() {
        let (_dir, store) = store_with(CSV);
        let page = store
            .query_sales(&SalesQuery::from_pairs(&[("ageMin", "25"), ("ageMax", "45")]))
            .await
            .unwrap();
        assert_eq!(page.total_records, 1);
        assert_eq!(page.data[0].customer_name.as_deref(), Some("alice"));

        store.filter_options().await.unwrap();
        store.ping().await.unwrap();
        assert_eq!(store.cache().loads(), 1);
    }

    #[tokio::test]
    async fn test_stats_respect_filters() {
        let (_dir, store) = store_with(CSV);
        let stats = store
            .stats(&SalesQuery::from_pairs(&[("tags", "sale")]))
            .await
            .unwrap();
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.total_units, 3);
        assert_eq!(stats.total_amount, 140.0);
        assert_eq!(stats.total_discount, 10.0);
    }

    #[tokio::test]
    async fn test_writes_are_unsupported() {
        let (_dir, store) = store_with(CSV);
        let err = store.delete_all().await.unwrap_err();
        assert!(matches!(err, DataError::Unsupported { backend: "memory", .. }));
        assert!(store.insert_batch(&[]).await.is_err());
    }

    #[tokio::test]
    async fn test_ping_fails_without_dataset() {
        let store = Arc::new(MemoryStore::new("/nonexistent/sales.csv"));
        assert!(store.ping().await.is_err());
    }
}
