//! CSV import into the relational stores
//!
//! Reads the sales CSV, optionally clears the table, then inserts in
//! fixed-size batches, one transaction per batch.

use std::path::Path;

use super::memory::load_csv;
use super::{DataError, SalesService};
use crate::core::constants::IMPORT_BATCH_SIZE;

/// Outcome of an import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows removed before inserting (0 with `keep_existing`)
    pub deleted: u64,
    pub inserted: u64,
    /// Rows skipped because they had no Transaction ID
    pub skipped: usize,
}

pub async fn import_csv(
    service: &SalesService,
    path: &Path,
    keep_existing: bool,
) -> Result<ImportSummary, DataError> {
    if let SalesService::Memory(_) = service {
        return Err(DataError::unsupported("memory", "import"));
    }

    let path_buf = path.to_path_buf();
    let loaded = tokio::task::spawn_blocking(move || load_csv(&path_buf))
        .await
        .map_err(|e| DataError::DatasetLoad(e.to_string()))??;

    let repo = service.repository();
    let mut summary = ImportSummary {
        skipped: loaded.skipped,
        ..Default::default()
    };

    if !keep_existing {
        summary.deleted = repo.delete_all().await?;
        tracing::debug!(deleted = summary.deleted, "Cleared existing sales");
    }

    for (batch_no, batch) in loaded.records.chunks(IMPORT_BATCH_SIZE).enumerate() {
        summary.inserted += repo.insert_batch(batch).await?;
        tracing::debug!(
            batch = batch_no + 1,
            inserted = summary.inserted,
            "Imported sales batch"
        );
    }

    tracing::info!(
        path = %path.display(),
        backend = %service.backend(),
        inserted = summary.inserted,
        skipped = summary.skipped,
        "Sales import finished"
    );
    Ok(summary)
}
