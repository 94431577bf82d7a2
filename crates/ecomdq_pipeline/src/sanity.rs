//! Raw input sanity check.

use crate::io::read_csv_inferred;
use crate::tables::RAW_FILES;
use crate::{PipelineError, Result};
use arrow::datatypes::DataType;
use std::path::Path;
use tracing::info;

/// Shape of one raw CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFileSummary {
    /// File name
    pub file: String,

    /// Number of data rows
    pub rows: usize,

    /// Column names with their inferred types
    pub columns: Vec<(String, DataType)>,
}

/// Raw files from [`RAW_FILES`] that do not exist in `raw_dir`.
pub fn missing_raw_files(raw_dir: &Path) -> Vec<String> {
    RAW_FILES
        .iter()
        .filter(|file| !raw_dir.join(file).is_file())
        .map(|file| file.to_string())
        .collect()
}

/// Checks that every raw file exists and can be parsed.
///
/// All missing files are reported together, before any file is read.
pub fn sanity_check(raw_dir: &Path) -> Result<Vec<RawFileSummary>> {
    let missing = missing_raw_files(raw_dir);
    if !missing.is_empty() {
        return Err(PipelineError::MissingRawFiles {
            dir: raw_dir.to_path_buf(),
            files: missing,
        });
    }

    let mut summaries = Vec::with_capacity(RAW_FILES.len());
    for file in RAW_FILES {
        let batch = read_csv_inferred(&raw_dir.join(file))?;
        let columns: Vec<(String, DataType)> = batch
            .schema()
            .fields()
            .iter()
            .map(|f| (f.name().clone(), f.data_type().clone()))
            .collect();

        info!("{}: rows={} cols={}", file, batch.num_rows(), columns.len());

        summaries.push(RawFileSummary {
            file: file.to_string(),
            rows: batch.num_rows(),
            columns,
        });
    }

    Ok(summaries)
}
