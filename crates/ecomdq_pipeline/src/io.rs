//! CSV and parquet file I/O.
//!
//! Raw inputs are read either with inferred column types (for profiling) or
//! with every column as text (for standardization, which must keep values
//! such as zip codes with leading zeros intact). Reports are small all-text
//! tables written through Arrow's CSV writer.

use crate::{PipelineError, Result};
use arrow::array::{Array, ArrayRef, AsArray, RecordBatch, StringArray};
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| PipelineError::read(path, e))
}

fn csv_format() -> Format {
    Format::default().with_header(true)
}

fn read_csv_with_schema(path: &Path, mut file: File, schema: SchemaRef) -> Result<RecordBatch> {
    file.seek(SeekFrom::Start(0))
        .map_err(|e| PipelineError::read(path, e))?;

    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_format(csv_format())
        .build(file)
        .map_err(|e| PipelineError::read(path, e))?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| PipelineError::read(path, e))?;

    let batch = concat_batches(&schema, &batches).map_err(|e| PipelineError::read(path, e))?;
    debug!("Read {} rows from {}", batch.num_rows(), path.display());
    Ok(batch)
}

/// Reads a CSV file, inferring a type for each column from its values.
///
/// Empty fields are read as nulls.
pub fn read_csv_inferred(path: &Path) -> Result<RecordBatch> {
    let mut file = open(path)?;
    let (schema, _) = csv_format()
        .infer_schema(&mut file, None)
        .map_err(|e| PipelineError::read(path, e))?;

    read_csv_with_schema(path, file, Arc::new(schema))
}

/// Reads a CSV file with every column as nullable text.
///
/// Empty fields are read as nulls.
pub fn read_csv_text(path: &Path) -> Result<RecordBatch> {
    let mut file = open(path)?;
    let (header, _) = csv_format()
        .infer_schema(&mut file, Some(1))
        .map_err(|e| PipelineError::read(path, e))?;

    let fields: Vec<Field> = header
        .fields()
        .iter()
        .map(|field| Field::new(field.name(), DataType::Utf8, true))
        .collect();

    read_csv_with_schema(path, file, Arc::new(Schema::new(fields)))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::write(path, e))?;
    }
    Ok(())
}

/// Writes a record batch as a snappy-compressed parquet file, creating the
/// parent directory if needed.
pub fn write_parquet(path: &Path, batch: &RecordBatch) -> Result<()> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| PipelineError::write(path, e))?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .map_err(|e| PipelineError::write(path, e))?;
    writer
        .write(batch)
        .map_err(|e| PipelineError::write(path, e))?;
    writer.close().map_err(|e| PipelineError::write(path, e))?;

    debug!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(())
}

/// A small all-text table used for CSV reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    /// Creates an empty table with the given column names.
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Missing trailing cells are filled with empty strings
    /// and extra cells are dropped.
    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = row.into_iter().map(Into::into).collect();
        cells.resize(self.header.len(), String::new());
        self.rows.push(cells);
    }

    /// Column names.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Converts the table into a record batch of nullable Utf8 columns.
    pub fn to_batch(&self) -> Result<RecordBatch> {
        let fields: Vec<Field> = self
            .header
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, true))
            .collect();

        let columns: Vec<ArrayRef> = (0..self.header.len())
            .map(|i| {
                let values: StringArray =
                    self.rows.iter().map(|row| Some(row[i].as_str())).collect();
                Arc::new(values) as ArrayRef
            })
            .collect();

        Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
    }

    /// Builds a table from a batch of Utf8 columns; nulls become empty cells.
    pub fn from_batch(batch: &RecordBatch) -> Result<Self> {
        let header = batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect::<Vec<_>>();

        let mut columns = Vec::with_capacity(batch.num_columns());
        for column in batch.columns() {
            let text = arrow::compute::cast(column, &DataType::Utf8)?;
            let strings = text.as_string::<i32>();
            let cells: Vec<String> = (0..strings.len())
                .map(|i| {
                    if strings.is_null(i) {
                        String::new()
                    } else {
                        strings.value(i).to_string()
                    }
                })
                .collect();
            columns.push(cells);
        }

        let rows = (0..batch.num_rows())
            .map(|row| columns.iter().map(|cells| cells[row].clone()).collect())
            .collect();

        Ok(Self { header, rows })
    }

    /// Writes the table as CSV with a header row, even when it has no rows.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        let batch = self.to_batch()?;
        let file = File::create(path).map_err(|e| PipelineError::write(path, e))?;

        let mut writer = WriterBuilder::new().with_header(true).build(file);
        writer
            .write(&batch)
            .map_err(|e| PipelineError::write(path, e))?;

        debug!("Wrote {} rows to {}", self.len(), path.display());
        Ok(())
    }

    /// Reads a CSV file written by [`write_csv`](Self::write_csv).
    pub fn read_csv(path: &Path) -> Result<Self> {
        Self::from_batch(&read_csv_text(path)?)
    }
}
