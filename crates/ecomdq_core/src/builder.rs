//! Builder pattern for creating contract tables and columns.
//!
//! This module provides ergonomic builders for constructing table and column
//! specifications with a fluent API.

use crate::{ColumnSpec, DtypeFamily, ForeignKeySpec, TableSpec};

/// Builder for creating a `TableSpec`.
///
/// Columns added with [`TableSpecBuilder::column`] are also recorded as
/// required columns unless the builder is told otherwise with
/// [`TableSpecBuilder::optional_column`].
///
/// # Example
///
/// ```rust
/// use ecomdq_core::{ColumnSpecBuilder, DtypeFamily, TableSpecBuilder};
///
/// let table = TableSpecBuilder::new("orders.parquet")
///     .primary_key(["order_id"])
///     .column(ColumnSpecBuilder::new("order_id", DtypeFamily::String).nullable(false).build())
///     .column(ColumnSpecBuilder::new("customer_id", DtypeFamily::String).build())
///     .foreign_key(["customer_id"], "customers.parquet", ["customer_id"])
///     .build();
///
/// assert_eq!(table.required_columns, vec!["order_id", "customer_id"]);
/// assert_eq!(table.foreign_keys.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct TableSpecBuilder {
    name: String,
    primary_key: Option<Vec<String>>,
    required_columns: Vec<String>,
    columns: Vec<ColumnSpec>,
    foreign_keys: Vec<ForeignKeySpec>,
}

impl TableSpecBuilder {
    /// Creates a new table builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the primary key columns.
    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a column spec and marks the column as required.
    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.require(column.name.clone());
        self.columns.push(column);
        self
    }

    /// Adds a column spec without requiring the column to be present.
    pub fn optional_column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    /// Marks a column as required without declaring per-column checks.
    pub fn required_column(mut self, name: impl Into<String>) -> Self {
        self.require(name.into());
        self
    }

    /// Adds a foreign key relationship.
    pub fn foreign_key<F, T, A, B>(
        mut self,
        from_columns: F,
        to_table: impl Into<String>,
        to_columns: T,
    ) -> Self
    where
        F: IntoIterator<Item = A>,
        T: IntoIterator<Item = B>,
        A: Into<String>,
        B: Into<String>,
    {
        self.foreign_keys.push(ForeignKeySpec {
            from_columns: from_columns.into_iter().map(Into::into).collect(),
            to_table: to_table.into(),
            to_columns: to_columns.into_iter().map(Into::into).collect(),
        });
        self
    }

    fn require(&mut self, name: String) {
        if !self.required_columns.contains(&name) {
            self.required_columns.push(name);
        }
    }

    /// Builds the table spec.
    pub fn build(self) -> TableSpec {
        TableSpec {
            name: self.name,
            primary_key: self.primary_key,
            required_columns: self.required_columns,
            columns: self.columns,
            foreign_keys: self.foreign_keys,
        }
    }
}

/// Builder for creating a `ColumnSpec`.
///
/// Columns are nullable unless stated otherwise.
///
/// # Example
///
/// ```rust
/// use ecomdq_core::{ColumnSpecBuilder, DtypeFamily};
///
/// let column = ColumnSpecBuilder::new("review_score", DtypeFamily::Numeric)
///     .nullable(false)
///     .min(1.0)
///     .max(5.0)
///     .build();
///
/// assert_eq!(column.min, Some(1.0));
/// assert!(!column.nullable);
/// ```
#[derive(Debug)]
pub struct ColumnSpecBuilder {
    name: String,
    dtype_family: DtypeFamily,
    nullable: bool,
    allowed_values: Option<Vec<String>>,
    min: Option<f64>,
    max: Option<f64>,
}

impl ColumnSpecBuilder {
    /// Creates a new column builder.
    pub fn new(name: impl Into<String>, dtype_family: DtypeFamily) -> Self {
        Self {
            name: name.into(),
            dtype_family,
            nullable: true,
            allowed_values: None,
            min: None,
            max: None,
        }
    }

    /// Sets whether the column may contain nulls.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Restricts non-null values to the given set.
    pub fn allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the inclusive lower bound.
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the inclusive upper bound.
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Builds the column spec.
    pub fn build(self) -> ColumnSpec {
        ColumnSpec {
            name: self.name,
            dtype_family: self.dtype_family,
            nullable: self.nullable,
            allowed_values: self.allowed_values,
            min: self.min,
            max: self.max,
        }
    }
}
