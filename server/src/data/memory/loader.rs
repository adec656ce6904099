//! CSV dataset reader
//!
//! Reads the sales CSV keyed by its header row. Columns are matched by
//! external field name, so column order in the file does not matter and
//! missing columns read as empty.

use std::io::Read;
use std::path::Path;

use crate::data::error::DataError;
use crate::domain::sales::fields::by_external;
use crate::domain::sales::{FIELDS, Field, SaleRecord};

/// Records read from a CSV plus the number of rows that were skipped
#[derive(Debug, Default)]
pub struct CsvLoad {
    pub records: Vec<SaleRecord>,
    pub skipped: usize,
}

pub fn load_csv(path: &Path) -> Result<CsvLoad, DataError> {
    let file = std::fs::File::open(path).map_err(|e| {
        DataError::DatasetLoad(format!("cannot open {}: {}", path.display(), e))
    })?;
    read_csv(file)
}

/// Parse CSV from any reader. Ids are assigned 1..n in file order over the
/// kept rows; rows without a Transaction ID are skipped and counted.
pub fn read_csv<R: Read>(reader: R) -> Result<CsvLoad, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut columns: Vec<Option<usize>> = vec![None; FIELDS.len()];
    for (pos, header) in headers.iter().enumerate() {
        match by_external(header.trim_start_matches('\u{feff}')) {
            // first occurrence wins on duplicate headers
            Some(def) => {
                columns[def.field as usize].get_or_insert(pos);
            }
            None => tracing::debug!(header, "Ignoring unknown CSV column"),
        }
    }

    let mut load = CsvLoad::default();
    for (line, row) in rdr.records().enumerate() {
        let row = row?;
        let cell = |idx: usize| columns[idx].and_then(|c| row.get(c)).map(str::to_string);

        let transaction_id = cell(Field::TransactionId as usize);
        if transaction_id.as_deref().is_none_or(str::is_empty) {
            // header is line 1
            tracing::warn!(line = line + 2, "Skipping sales row without Transaction ID");
            load.skipped += 1;
            continue;
        }

        let id = load.records.len() as i64 + 1;
        let record = SaleRecord::from_external(id, |def| cell(def.field as usize));
        load.records.push(record);
    }

    tracing::debug!(
        records = load.records.len(),
        skipped = load.skipped,
        "Parsed sales CSV"
    );
    Ok(load)
}
