//! Parser for schema contract files (YAML/TOML formats).
//!
//! This module reads schema contracts from YAML and TOML files into the
//! strongly-typed [`SchemaContract`] structure, and writes them back out as
//! YAML for `init`-style skeleton generation.
//!
//! # Example
//!
//! ```rust
//! use ecomdq_parser::parse_yaml;
//!
//! let yaml = r#"
//! name: shop
//! tables:
//!   - name: orders.parquet
//!     primary_key: [order_id]
//!     required_columns: [order_id, order_status]
//!     columns:
//!       - name: order_id
//!         dtype_family: string
//!         nullable: false
//!       - name: order_status
//!         dtype_family: string
//!         allowed_values: [created, shipped]
//! "#;
//!
//! let contract = parse_yaml(yaml).expect("Failed to parse contract");
//! assert_eq!(contract.name, "shop");
//! assert_eq!(contract.tables[0].columns.len(), 2);
//! ```

use ecomdq_core::SchemaContract;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during contract parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// The file parsed but the contract it describes is malformed
    #[error("Invalid contract: {}", .0.join("; "))]
    InvalidContract(Vec<String>),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported contract file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse a contract from a YAML string.
///
/// Only the document structure is checked here; use [`load_contract`] or
/// [`ensure_valid`] to also reject malformed definitions.
pub fn parse_yaml(content: &str) -> Result<SchemaContract> {
    let contract: SchemaContract = serde_yaml_ng::from_str(content)?;
    Ok(contract)
}

/// Parse a contract from a TOML string.
///
/// # Example
///
/// ```rust
/// use ecomdq_parser::parse_toml;
///
/// let toml = r#"
/// name = "shop"
///
/// [[tables]]
/// name = "customers.parquet"
/// primary_key = ["customer_id"]
/// required_columns = ["customer_id"]
///
/// [[tables.columns]]
/// name = "customer_id"
/// dtype_family = "string"
/// nullable = false
/// "#;
///
/// let contract = parse_toml(toml).unwrap();
/// assert_eq!(contract.tables[0].name, "customers.parquet");
/// ```
pub fn parse_toml(content: &str) -> Result<SchemaContract> {
    let contract: SchemaContract =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(contract)
}

/// Detect the contract format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `ContractFormat::Yaml`
/// * `.toml` → `ContractFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<ContractFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(ContractFormat::Yaml),
        "toml" => Ok(ContractFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a contract from a file with automatic format detection.
pub fn parse_file(path: &Path) -> Result<SchemaContract> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        ContractFormat::Yaml => parse_yaml(&content),
        ContractFormat::Toml => parse_toml(&content),
    }
}

/// Reject a contract whose definition is malformed.
pub fn ensure_valid(contract: SchemaContract) -> Result<SchemaContract> {
    let errors = contract.validate_definition();
    if errors.is_empty() {
        Ok(contract)
    } else {
        Err(ParserError::InvalidContract(
            errors.iter().map(ToString::to_string).collect(),
        ))
    }
}

/// Parse a contract file and check its definition.
///
/// # Example
///
/// ```no_run
/// use ecomdq_parser::load_contract;
/// use std::path::Path;
///
/// let contract = load_contract(Path::new("contracts/olist.yml")).unwrap();
/// println!("Loaded contract: {}", contract.name);
/// ```
pub fn load_contract(path: &Path) -> Result<SchemaContract> {
    ensure_valid(parse_file(path)?)
}

/// Serialize a contract to YAML.
pub fn to_yaml(contract: &SchemaContract) -> Result<String> {
    Ok(serde_yaml_ng::to_string(contract)?)
}
