//! Column-name standardization of raw CSVs into interim parquet.

use crate::io::{read_csv_text, write_parquet};
use crate::tables::{RAW_FILES, parquet_name};
use crate::Result;
use arrow::array::RecordBatch;
use arrow::datatypes::{Field, Schema};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Trims, lowercases and replaces spaces with underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Returns `batch` with every column renamed through `rename`.
///
/// Values and types are untouched.
pub fn rename_columns<F>(batch: &RecordBatch, rename: F) -> Result<RecordBatch>
where
    F: Fn(&str) -> String,
{
    let schema = batch.schema();
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .map(|f| f.as_ref().clone().with_name(rename(f.name())))
        .collect();

    Ok(RecordBatch::try_new(
        Arc::new(Schema::new(fields)),
        batch.columns().to_vec(),
    )?)
}

/// Reads every raw CSV as text, normalizes its column names and writes
/// `<interim_dir>/<stem>.parquet`.
///
/// Stops at the first failure so no partial interim state is mistaken for
/// a complete one.
pub fn standardize(raw_dir: &Path, interim_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(RAW_FILES.len());

    for file in RAW_FILES {
        let batch = read_csv_text(&raw_dir.join(file))?;
        let batch = rename_columns(&batch, normalize_column_name)?;

        let out = interim_dir.join(parquet_name(file));
        write_parquet(&out, &batch)?;
        info!("Wrote {}", out.display());
        written.push(out);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{AsArray, StringArray};
    use ecomdq_validator::read_parquet_table;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("  Order ID "), "order_id");
        assert_eq!(normalize_column_name("Product Name Lenght"), "product_name_lenght");
        assert_eq!(normalize_column_name("already_fine"), "already_fine");
    }

    #[test]
    fn test_rename_keeps_values() {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "Seller Id",
            arrow::datatypes::DataType::Utf8,
            true,
        )]));
        let batch =
            RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(vec!["s1"]))]).unwrap();

        let renamed = rename_columns(&batch, normalize_column_name).unwrap();
        assert_eq!(renamed.schema().field(0).name(), "seller_id");
        assert_eq!(renamed.column(0).as_string::<i32>().value(0), "s1");
    }

    #[test]
    fn test_standardize_writes_interim_parquet() {
        let raw = TempDir::new().unwrap();
        let interim = TempDir::new().unwrap();
        for file in RAW_FILES {
            fs::write(raw.path().join(file), "Zip Code ,Name\n01310,a\n").unwrap();
        }

        let written = standardize(raw.path(), interim.path()).unwrap();
        assert_eq!(written.len(), RAW_FILES.len());

        let table = read_parquet_table("t", &written[0]).unwrap();
        assert_eq!(table.column_names(), vec!["zip_code", "name"]);
        assert_eq!(
            table.column("zip_code").unwrap().as_string::<i32>().value(0),
            "01310"
        );
    }

    #[test]
    fn test_standardize_stops_on_missing_file() {
        let raw = TempDir::new().unwrap();
        let interim = TempDir::new().unwrap();

        assert!(standardize(raw.path(), interim.path()).is_err());
        assert!(fs::read_dir(interim.path()).unwrap().next().is_none());
    }
}
