//! CSV decoding of order-form exports.

use std::io::Read;
use std::path::Path;

use teamorder_core::OrderRow;

use crate::error::OrderStoreError;

/// Decodes order rows from CSV with a header line.
///
/// Cells are trimmed, short rows are tolerated, and missing columns decode
/// as empty values. Rows are not filtered here; blank emails and products
/// are handled by the aggregator.
///
/// # Errors
///
/// Returns [`OrderStoreError::Csv`] with the 1-based line number of the
/// first malformed record.
pub fn parse_orders_csv<R: Read>(reader: R) -> Result<Vec<OrderRow>, OrderStoreError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.deserialize::<OrderRow>() {
        let row = result.map_err(|e| OrderStoreError::Csv {
            line: e.position().map_or(0, csv::Position::line),
            source: e,
        })?;
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), "parsed order rows");
    Ok(rows)
}

/// Reads and decodes a CSV export from disk.
///
/// # Errors
///
/// Returns [`OrderStoreError::Io`] if the file cannot be opened, or
/// [`OrderStoreError::Csv`] if it is malformed.
pub fn load_orders_file(path: &Path) -> Result<Vec<OrderRow>, OrderStoreError> {
    let file = std::fs::File::open(path).map_err(|e| OrderStoreError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_orders_csv(file)
}
