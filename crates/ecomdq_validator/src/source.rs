//! Where tables come from.
//!
//! A [`TableSource`] turns a table identifier into [`TableData`]. The
//! evaluator never reads files itself; it goes through a source wrapped in a
//! [`TableCache`](crate::TableCache).

use crate::{LoadError, TableData};
use arrow::array::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads tables by name.
pub trait TableSource {
    /// Loads the named table.
    ///
    /// Fails with [`LoadError::NotFound`] if there is no such table and
    /// [`LoadError::Read`] if it exists but cannot be read.
    fn load(&self, name: &str) -> Result<TableData, LoadError>;
}

impl<S: TableSource + ?Sized> TableSource for &S {
    fn load(&self, name: &str) -> Result<TableData, LoadError> {
        (**self).load(name)
    }
}

/// Reads each table from `<dir>/<name>` as a parquet file.
#[derive(Debug, Clone)]
pub struct ParquetDirSource {
    dir: PathBuf,
}

impl ParquetDirSource {
    /// Creates a source rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory tables are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TableSource for ParquetDirSource {
    fn load(&self, name: &str) -> Result<TableData, LoadError> {
        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(LoadError::not_found(name, path));
        }
        read_parquet_table(name, &path)
    }
}

/// Reads a whole parquet file into a single-batch table.
pub fn read_parquet_table(name: &str, path: &Path) -> Result<TableData, LoadError> {
    debug!("Reading parquet file {}", path.display());

    let file = File::open(path).map_err(|e| LoadError::read(name, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| LoadError::read(name, e))?;
    let schema = builder.schema().clone();
    let reader = builder.build().map_err(|e| LoadError::read(name, e))?;

    let batches = reader
        .collect::<Result<Vec<RecordBatch>, _>>()
        .map_err(|e| LoadError::read(name, e))?;

    TableData::from_batches(name, schema, &batches).map_err(|e| LoadError::read(name, e))
}

/// Tables held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    tables: HashMap<String, RecordBatch>,
}

impl InMemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table, builder style.
    pub fn with_table(mut self, name: impl Into<String>, batch: RecordBatch) -> Self {
        self.insert(name, batch);
        self
    }

    /// Adds or replaces a table.
    pub fn insert(&mut self, name: impl Into<String>, batch: RecordBatch) {
        self.tables.insert(name.into(), batch);
    }
}

impl TableSource for InMemorySource {
    fn load(&self, name: &str) -> Result<TableData, LoadError> {
        self.tables
            .get(name)
            .map(|batch| TableData::new(name, batch.clone()))
            .ok_or_else(|| LoadError::not_found(name, name))
    }
}
