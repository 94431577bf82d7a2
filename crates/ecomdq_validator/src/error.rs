//! Error types for loading tables.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a table for evaluation.
///
/// Both variants are recorded as failing check results by the evaluator;
/// neither aborts a run.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// The backing resource for the table does not exist
    #[error("Missing clean file: {}", path.display())]
    NotFound { table: String, path: PathBuf },

    /// The backing resource exists but could not be read as a table
    #[error("Failed to read table '{table}': {message}")]
    Read { table: String, message: String },
}

impl LoadError {
    /// Creates a new not-found error.
    pub fn not_found(table: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            table: table.into(),
            path: path.into(),
        }
    }

    /// Creates a new read error.
    pub fn read(table: impl Into<String>, message: impl ToString) -> Self {
        Self::Read {
            table: table.into(),
            message: message.to_string(),
        }
    }

    /// Name of the table that failed to load.
    pub fn table(&self) -> &str {
        match self {
            LoadError::NotFound { table, .. } | LoadError::Read { table, .. } => table,
        }
    }
}
