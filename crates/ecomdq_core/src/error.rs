//! Error types for schema contracts.
//!
//! Contract errors describe malformed contract definitions. Failed data
//! checks are not errors: they are ordinary `fail` records in a
//! [`ValidationReport`](crate::ValidationReport).

use thiserror::Error;

/// Result type for contract operations.
pub type Result<T> = std::result::Result<T, ContractError>;

/// Main error type for contract operations.
#[derive(Error, Debug)]
pub enum ContractError {
    /// The same table is declared twice
    #[error("Duplicate table in contract: {0}")]
    DuplicateTable(String),

    /// The same column is declared twice within one table
    #[error("Duplicate column '{column}' in table '{table}'")]
    DuplicateColumn {
        /// Table name
        table: String,
        /// Column name
        column: String,
    },

    /// A table or column specification is inconsistent
    #[error("Invalid contract definition for '{table}': {message}")]
    InvalidDefinition {
        /// Table the problem was found in
        table: String,
        /// Description of the problem
        message: String,
    },

    /// The contract evaluated with failing checks
    #[error("Schema contract validation failed (fails={fail_count})")]
    ValidationFailed {
        /// Number of failing check records
        fail_count: usize,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ContractError {
    /// Creates a new invalid definition error.
    pub fn invalid(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            table: table.into(),
            message: message.into(),
        }
    }
}
