//! Memoizing table cache.

use crate::{LoadError, TableData, TableSource};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Loads tables on demand and keeps them for the lifetime of the cache.
///
/// A table that is both evaluated and referenced by foreign keys is read
/// once. Failed loads are remembered too, so an unreadable table is tried
/// once per run. Create one cache per evaluation run.
#[derive(Debug)]
pub struct TableCache<S> {
    source: S,
    tables: HashMap<String, Arc<TableData>>,
    failures: HashMap<String, LoadError>,
}

impl<S: TableSource> TableCache<S> {
    /// Creates an empty cache over `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            tables: HashMap::new(),
            failures: HashMap::new(),
        }
    }

    /// Returns the named table, loading it on first request.
    ///
    /// A failed load returns the same error on every later request without
    /// touching the source again.
    pub fn get(&mut self, name: &str) -> Result<Arc<TableData>, LoadError> {
        if let Some(table) = self.tables.get(name) {
            debug!("Cache hit for {}", name);
            return Ok(Arc::clone(table));
        }
        if let Some(err) = self.failures.get(name) {
            debug!("Cached load failure for {}", name);
            return Err(err.clone());
        }

        match self.source.load(name) {
            Ok(table) => {
                let table = Arc::new(table);
                self.tables.insert(name.to_string(), Arc::clone(&table));
                Ok(table)
            }
            Err(err) => {
                self.failures.insert(name.to_string(), err.clone());
                Err(err)
            }
        }
    }

    /// Returns true if the table has already been loaded.
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Returns true if loading the table has already failed.
    pub fn has_failed(&self, name: &str) -> bool {
        self.failures.contains_key(name)
    }

    /// Number of tables held.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// The wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }
}
