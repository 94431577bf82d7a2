//! Column-level profile of the raw CSV files.

use crate::Result;
use crate::io::{TextTable, read_csv_inferred};
use crate::tables::RAW_FILES;
use arrow::array::{Array, RecordBatch};
use std::path::Path;
use tracing::{info, warn};

/// Columns of `raw_profile.csv`.
pub const PROFILE_HEADER: [&str; 7] = [
    "file",
    "column",
    "rows",
    "dtype",
    "null_count",
    "null_pct",
    "error",
];

/// Null percentage rounded to four decimals; 0 for an empty table.
pub fn null_pct(null_count: usize, rows: usize) -> f64 {
    if rows == 0 {
        return 0.0;
    }
    let pct = null_count as f64 / rows as f64 * 100.0;
    (pct * 10_000.0).round() / 10_000.0
}

fn profile_batch(file: &str, batch: &RecordBatch, table: &mut TextTable) {
    let rows = batch.num_rows();
    let schema = batch.schema();
    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        let null_count = column.logical_null_count();
        table.push_row([
            file.to_string(),
            field.name().clone(),
            rows.to_string(),
            field.data_type().to_string(),
            null_count.to_string(),
            null_pct(null_count, rows).to_string(),
            String::new(),
        ]);
    }
}

/// Profiles every raw file.
///
/// A file that cannot be read yields a single row carrying the error text
/// instead of failing the whole profile.
pub fn profile_raw(raw_dir: &Path) -> TextTable {
    let mut table = TextTable::new(PROFILE_HEADER);

    for file in RAW_FILES {
        match read_csv_inferred(&raw_dir.join(file)) {
            Ok(batch) => {
                info!("Profiled {} ({} columns)", file, batch.num_columns());
                profile_batch(file, &batch, &mut table);
            }
            Err(e) => {
                warn!("Could not profile {}: {}", file, e);
                table.push_row([
                    file.to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    e.to_string(),
                ]);
            }
        }
    }

    table
}

/// Profiles every raw file and writes the result to `out`.
pub fn write_profile(raw_dir: &Path, out: &Path) -> Result<TextTable> {
    let table = profile_raw(raw_dir);
    table.write_csv(out)?;
    info!("Wrote {} ({} rows)", out.display(), table.len());
    Ok(table)
}
