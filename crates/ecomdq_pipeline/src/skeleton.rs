//! Contract skeletons derived from existing parquet files.

use crate::{PipelineError, Result};
use arrow::array::Array;
use ecomdq_core::{ColumnSpecBuilder, DtypeFamily, TableSpec, TableSpecBuilder};
use ecomdq_validator::{ObservedFamily, TableData, classify, read_parquet_table};
use std::path::Path;
use tracing::{debug, info, warn};

/// Derives a table spec from the shape of loaded data.
///
/// Every column is required. A column is non-nullable when the data holds
/// no nulls for it. Columns whose storage type falls outside the three
/// families are declared as `string` and logged.
pub fn table_skeleton(data: &TableData) -> TableSpec {
    info!("Extracting table spec from {}", data.name());

    let mut builder = TableSpecBuilder::new(data.name());
    let schema = data.schema();

    for (field, array) in schema.fields().iter().zip(data.batch().columns()) {
        let family = match classify(field.data_type()) {
            ObservedFamily::Family(family) => family,
            ObservedFamily::Other(name) => {
                warn!(
                    "Column {} has storage type {}; declaring it as string",
                    field.name(),
                    name
                );
                DtypeFamily::String
            }
        };
        let nullable = array.logical_null_count() > 0;

        debug!(
            "Column {} ({} -> {}, nullable={})",
            field.name(),
            field.data_type(),
            family,
            nullable
        );

        builder = builder.column(
            ColumnSpecBuilder::new(field.name(), family)
                .nullable(nullable)
                .build(),
        );
    }

    builder.build()
}

/// Reads a parquet file and derives a table spec named after the file.
pub fn skeleton_from_parquet(path: &Path) -> Result<TableSpec> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| PipelineError::read(path, "path has no file name"))?;

    let data = read_parquet_table(&name, path).map_err(|e| PipelineError::read(path, e))?;
    Ok(table_skeleton(&data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::write_parquet;
    use arrow::array::{ArrayRef, BooleanArray, Int64Array, RecordBatch, StringArray};
    use arrow::datatypes::{Field, Schema};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn batch() -> RecordBatch {
        let columns: Vec<(&str, ArrayRef)> = vec![
            ("seller_id", Arc::new(StringArray::from(vec!["s1", "s2"]))),
            ("rating", Arc::new(Int64Array::from(vec![Some(4), None]))),
            ("active", Arc::new(BooleanArray::from(vec![true, false]))),
        ];
        let fields: Vec<Field> = columns
            .iter()
            .map(|(n, a)| Field::new(*n, a.data_type().clone(), true))
            .collect();
        let arrays = columns.into_iter().map(|(_, a)| a).collect();
        RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
    }

    #[test]
    fn test_skeleton_columns() {
        let spec = table_skeleton(&TableData::new("sellers.parquet", batch()));

        assert_eq!(spec.name, "sellers.parquet");
        assert_eq!(spec.required_columns, vec!["seller_id", "rating", "active"]);
        assert_eq!(spec.primary_key, None);

        let families: Vec<(DtypeFamily, bool)> = spec
            .columns
            .iter()
            .map(|c| (c.dtype_family, c.nullable))
            .collect();
        assert_eq!(
            families,
            vec![
                (DtypeFamily::String, false),
                (DtypeFamily::Numeric, true),
                (DtypeFamily::String, false),
            ]
        );
    }

    #[test]
    fn test_skeleton_from_parquet_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("olist_sellers_dataset.parquet");
        write_parquet(&path, &batch()).unwrap();

        let spec = skeleton_from_parquet(&path).unwrap();
        assert_eq!(spec.name, "olist_sellers_dataset.parquet");
        assert_eq!(spec.columns.len(), 3);
    }

    #[test]
    fn test_missing_parquet_file() {
        let dir = TempDir::new().unwrap();
        assert!(skeleton_from_parquet(&dir.path().join("nope.parquet")).is_err());
    }
}
