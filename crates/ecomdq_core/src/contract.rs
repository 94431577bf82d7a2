//! Schema contract types.
//!
//! A [`SchemaContract`] is a static, declarative description of the tables a
//! pipeline run is expected to produce: which columns must exist, the logical
//! type family of each column, nullability, allowed values, numeric bounds,
//! primary keys and foreign key relationships between tables.
//!
//! The contract carries no behavior beyond lookups and definition checks;
//! evaluation against real data lives in `ecomdq_validator`.

use crate::ContractError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Logical type family of a column.
///
/// Contracts are written against families instead of physical storage types
/// so that the same rules hold for CSV-derived and parquet-native data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DtypeFamily {
    /// Text or categorical data
    #[serde(alias = "str")]
    String,
    /// Integer, floating point or decimal data
    Numeric,
    /// Dates, times and timestamps
    Datetime,
}

impl DtypeFamily {
    /// Returns the canonical lowercase name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            DtypeFamily::String => "string",
            DtypeFamily::Numeric => "numeric",
            DtypeFamily::Datetime => "datetime",
        }
    }
}

impl fmt::Display for DtypeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full contract: an ordered list of table specifications.
///
/// Iteration order is the order tables were declared in; it determines the
/// order of records in a validation report and nothing else.
///
/// # Example
///
/// ```rust
/// use ecomdq_core::{ColumnSpecBuilder, DtypeFamily, SchemaContract, TableSpecBuilder};
///
/// let contract = SchemaContract::new("shop", vec![
///     TableSpecBuilder::new("customers.parquet")
///         .primary_key(["customer_id"])
///         .column(ColumnSpecBuilder::new("customer_id", DtypeFamily::String).nullable(false).build())
///         .build(),
/// ]);
///
/// assert!(contract.table("customers.parquet").is_some());
/// assert!(contract.validate_definition().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaContract {
    /// Human-readable contract name
    pub name: String,

    /// Contract version (free-form, e.g. "1.0.0")
    #[serde(default = "default_version")]
    pub version: String,

    /// Table specifications in evaluation order
    pub tables: Vec<TableSpec>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_nullable() -> bool {
    true
}

/// Expected shape of a single table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSpec {
    /// Table identifier (file name of the table in the clean data directory)
    pub name: String,

    /// Columns whose combined values must be unique, if the table has a natural key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<Vec<String>>,

    /// Columns that must be present in the loaded data
    #[serde(default)]
    pub required_columns: Vec<String>,

    /// Per-column expectations, in report order
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,

    /// References from this table to other tables
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKeySpec>,
}

/// Expectations for one column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,

    /// Expected logical type family
    pub dtype_family: DtypeFamily,

    /// Whether null values are permitted
    #[serde(default = "default_nullable")]
    pub nullable: bool,

    /// Finite set of permitted values (compared against the textual form of each cell)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,

    /// Inclusive lower bound, numeric columns only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Inclusive upper bound, numeric columns only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// A referential-integrity relationship from the owning table to `to_table`.
///
/// `from_columns` and `to_columns` are aligned by position. Composite values
/// with any null component are exempt from the check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForeignKeySpec {
    /// Referencing columns in the owning table
    pub from_columns: Vec<String>,

    /// Name of the referenced table
    pub to_table: String,

    /// Referenced columns in `to_table`
    pub to_columns: Vec<String>,
}

impl SchemaContract {
    /// Creates a contract with the default version.
    pub fn new(name: impl Into<String>, tables: Vec<TableSpec>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            tables,
        }
    }

    /// Looks up a table specification by name.
    pub fn table(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Iterates over table names in declaration order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// Checks that the contract is well-formed.
    ///
    /// Returns every problem found; an empty list means the contract can be
    /// evaluated. Data is never touched.
    pub fn validate_definition(&self) -> Vec<ContractError> {
        let mut errors = Vec::new();

        if self.tables.is_empty() {
            errors.push(ContractError::invalid("contract", "no tables defined"));
        }

        let mut seen_tables = HashSet::new();
        for table in &self.tables {
            if !seen_tables.insert(table.name.as_str()) {
                errors.push(ContractError::DuplicateTable(table.name.clone()));
            }
            errors.extend(table.validate_definition());
        }

        errors
    }

    /// Foreign key targets that are not declared as tables of this contract.
    ///
    /// These are not errors: the target may still exist on disk. Each entry
    /// is `(owning table, target table)`.
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        let declared: HashSet<&str> = self.table_names().collect();
        self.tables
            .iter()
            .flat_map(|t| {
                t.foreign_keys
                    .iter()
                    .filter(|fk| !declared.contains(fk.to_table.as_str()))
                    .map(|fk| (t.name.clone(), fk.to_table.clone()))
            })
            .collect()
    }
}

impl TableSpec {
    /// Looks up a column specification by name.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Checks this table specification in isolation.
    pub fn validate_definition(&self) -> Vec<ContractError> {
        let mut errors = Vec::new();
        let table = self.name.as_str();

        if table.trim().is_empty() {
            errors.push(ContractError::invalid("<unnamed>", "table name is empty"));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                errors.push(ContractError::DuplicateColumn {
                    table: table.to_string(),
                    column: column.name.clone(),
                });
            }
            if let Err(err) = column.validate_definition(table) {
                errors.push(err);
            }
        }

        if let Some(pk) = &self.primary_key {
            if pk.is_empty() {
                errors.push(ContractError::invalid(
                    table,
                    "primary_key is declared but lists no columns",
                ));
            }
        }

        for fk in &self.foreign_keys {
            if fk.from_columns.is_empty() || fk.to_columns.is_empty() {
                errors.push(ContractError::invalid(
                    table,
                    format!("foreign key to '{}' has no columns", fk.to_table),
                ));
            } else if fk.from_columns.len() != fk.to_columns.len() {
                errors.push(ContractError::invalid(
                    table,
                    format!(
                        "foreign key to '{}' aligns {} column(s) with {}",
                        fk.to_table,
                        fk.from_columns.len(),
                        fk.to_columns.len()
                    ),
                ));
            }
        }

        errors
    }
}

impl ColumnSpec {
    /// Checks that bounds and allowed values make sense for the declared family.
    fn validate_definition(&self, table: &str) -> Result<(), ContractError> {
        let has_bounds = self.min.is_some() || self.max.is_some();
        if has_bounds && self.dtype_family != DtypeFamily::Numeric {
            return Err(ContractError::invalid(
                table,
                format!(
                    "column '{}' declares min/max but its family is {}",
                    self.name, self.dtype_family
                ),
            ));
        }

        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(ContractError::invalid(
                    table,
                    format!("column '{}' has min {} > max {}", self.name, min, max),
                ));
            }
        }

        if let Some(values) = &self.allowed_values {
            if values.is_empty() {
                return Err(ContractError::invalid(
                    table,
                    format!("column '{}' has an empty allowed_values list", self.name),
                ));
            }
        }

        Ok(())
    }
}
