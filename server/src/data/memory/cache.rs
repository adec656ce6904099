//! Process-scoped read-through cache of the sales dataset
//!
//! Backed by a single-entry moka cache. `try_get_with` guarantees that
//! concurrent first callers share one CSV parse instead of racing.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use moka::future::Cache;

use super::loader::load_csv;
use crate::data::error::DataError;
use crate::domain::sales::SaleRecord;

/// Shared, immutable snapshot of the loaded dataset
pub type Dataset = Arc<Vec<SaleRecord>>;

pub struct DatasetCache {
    path: PathBuf,
    cache: Cache<(), Dataset>,
    loads: AtomicUsize,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Cache::builder().max_capacity(1).build(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Return the dataset, reading the CSV on first use.
    ///
    /// Failed loads are not cached; the next call retries.
    pub async fn load(&self) -> Result<Dataset, DataError> {
        self.cache
            .try_get_with((), async {
                self.loads.fetch_add(1, Ordering::Relaxed);
                let path = self.path.clone();
                let loaded = tokio::task::spawn_blocking(move || load_csv(&path))
                    .await
                    .map_err(|e| DataError::DatasetLoad(e.to_string()))??;
                tracing::info!(
                    path = %self.path.display(),
                    records = loaded.records.len(),
                    skipped = loaded.skipped,
                    "Sales dataset loaded"
                );
                Ok::<_, DataError>(Arc::new(loaded.records))
            })
            .await
            .map_err(|e| DataError::DatasetLoad(e.to_string()))
    }

    /// Drop the cached dataset; the next `load` re-reads the file
    pub fn clear(&self) {
        self.cache.invalidate_all();
        tracing::debug!("Sales dataset cache cleared");
    }

    /// Number of loads that actually ran (cache misses)
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}
