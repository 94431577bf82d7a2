//! Error types for pipeline stages.

use arrow::error::ArrowError;
use ecomdq_core::ContractError;
use parquet::errors::ParquetError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by pipeline stages.
///
/// Contract check failures are not errors; they are reported through
/// [`ValidationReport`](ecomdq_core::ValidationReport).
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid configuration
    #[error("Invalid pipeline configuration: {0}")]
    Configuration(String),

    /// Raw input files are missing
    #[error("Missing files in {}:\n- {}", dir.display(), files.join("\n- "))]
    MissingRawFiles { dir: PathBuf, files: Vec<String> },

    /// A file could not be read
    #[error("Failed to read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    /// A file could not be written
    #[error("Failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },

    /// Casting a column during schema enforcement failed
    #[error("Schema enforcement failed for {table}.{column}: {message}")]
    Cast {
        table: String,
        column: String,
        message: String,
    },

    /// The raw profile has not been generated yet
    #[error("Input file not found: {}\nRun `ecomdq profile` first to generate it", path.display())]
    MissingProfile { path: PathBuf },

    /// No clean tables to audit
    #[error("No clean parquet files found in {}", dir.display())]
    NoCleanFiles { dir: PathBuf },

    /// The contract definition is malformed
    #[error("Contract definition has {} problem(s):\n- {}", problems.len(), problems.join("\n- "))]
    InvalidContract { problems: Vec<String> },

    /// Invalid column-name heuristic
    #[error("Invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),

    /// Arrow error outside file I/O
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Report serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Creates a new read error.
    pub fn read(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Read {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Creates a new write error.
    pub fn write(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Write {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Collects contract definition errors into one error.
    pub fn invalid_contract(errors: Vec<ContractError>) -> Self {
        Self::InvalidContract {
            problems: errors.iter().map(ToString::to_string).collect(),
        }
    }

    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

impl From<ParquetError> for PipelineError {
    fn from(err: ParquetError) -> Self {
        PipelineError::Arrow(ArrowError::ExternalError(Box::new(err)))
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_files_message_lists_every_file() {
        let err = PipelineError::MissingRawFiles {
            dir: PathBuf::from("data/raw"),
            files: vec!["a.csv".to_string(), "b.csv".to_string()],
        };
        assert_eq!(err.to_string(), "Missing files in data/raw:\n- a.csv\n- b.csv");
    }

    #[test]
    fn test_read_error_display() {
        let err = PipelineError::read("data/raw/a.csv", "bad header");
        assert_eq!(err.to_string(), "Failed to read data/raw/a.csv: bad header");
    }

    #[test]
    fn test_invalid_contract_lists_problems() {
        let err = PipelineError::invalid_contract(vec![
            ContractError::invalid("t", "primary_key is declared but lists no columns"),
            ContractError::DuplicateTable("t".to_string()),
        ]);
        assert_eq!(
            err.to_string(),
            "Contract definition has 2 problem(s):\n\
- Invalid contract definition for 't': primary_key is declared but lists no columns\n\
- Duplicate table in contract: t"
        );
    }
}
