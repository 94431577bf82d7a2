//! Check results and validation reports.
//!
//! The evaluator appends one [`CheckResult`] per executed check to a
//! [`ValidationReport`]. Reports are serialized in full once a run has
//! finished; they are never written incrementally.

use crate::ContractError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of check that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// The table could be loaded
    TableExistsAndReadable,
    /// All required columns are present
    RequiredColumns,
    /// Observed type family matches the declared family
    DtypeFamily,
    /// No nulls in a non-nullable column
    NonNull,
    /// Non-null values belong to the allowed set
    AllowedValues,
    /// Non-null values are at or above the lower bound
    MinValue,
    /// Non-null values are at or below the upper bound
    MaxValue,
    /// Every primary key column is present
    PrimaryKeyColumnsExist,
    /// Primary key tuples are unique
    PrimaryKeyUnique,
    /// Every referencing column is present
    ForeignKeyColumnsExist,
    /// The referenced table could be loaded
    ForeignKeyTargetLoad,
    /// Every referenced column is present in the target
    ForeignKeyTargetColumnsExist,
    /// Every non-null reference has a match in the target
    ForeignKeyIntegrity,
}

impl CheckKind {
    /// Returns the name used in report files.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::TableExistsAndReadable => "table_exists_and_readable",
            CheckKind::RequiredColumns => "required_columns",
            CheckKind::DtypeFamily => "dtype_family",
            CheckKind::NonNull => "non_null",
            CheckKind::AllowedValues => "allowed_values",
            CheckKind::MinValue => "min_value",
            CheckKind::MaxValue => "max_value",
            CheckKind::PrimaryKeyColumnsExist => "primary_key_columns_exist",
            CheckKind::PrimaryKeyUnique => "primary_key_unique",
            CheckKind::ForeignKeyColumnsExist => "foreign_key_columns_exist",
            CheckKind::ForeignKeyTargetLoad => "foreign_key_target_load",
            CheckKind::ForeignKeyTargetColumnsExist => "foreign_key_target_columns_exist",
            CheckKind::ForeignKeyIntegrity => "foreign_key_integrity",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "pass",
            CheckStatus::Fail => "fail",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a validation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Table the check ran against
    pub table: String,

    /// Which check produced this record
    #[serde(rename = "check")]
    pub kind: CheckKind,

    /// Column the check is about, for per-column checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    /// Pass or fail
    pub status: CheckStatus,

    /// Free-form diagnostic text; format depends on the check kind
    pub details: String,
}

impl CheckResult {
    /// Creates a passing table-level result.
    pub fn pass(table: impl Into<String>, kind: CheckKind, details: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            kind,
            column: None,
            status: CheckStatus::Pass,
            details: details.into(),
        }
    }

    /// Creates a failing table-level result.
    pub fn fail(table: impl Into<String>, kind: CheckKind, details: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            kind,
            column: None,
            status: CheckStatus::Fail,
            details: details.into(),
        }
    }

    /// Attaches the column this result is about.
    pub fn on_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Returns true if the check failed.
    pub fn is_fail(&self) -> bool {
        self.status == CheckStatus::Fail
    }
}

/// Ordered results of a contract evaluation.
///
/// The fail count is kept in step with the records: it always equals the
/// number of results whose status is `fail`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Check results in evaluation order
    pub results: Vec<CheckResult>,

    /// Number of failing results
    pub fail_count: usize,
}

impl ValidationReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result.
    pub fn push(&mut self, result: CheckResult) {
        if result.is_fail() {
            self.fail_count += 1;
        }
        self.results.push(result);
    }

    /// Appends several results in order.
    pub fn extend(&mut self, results: impl IntoIterator<Item = CheckResult>) {
        for result in results {
            self.push(result);
        }
    }

    /// Returns true if no check failed.
    pub fn passed(&self) -> bool {
        self.fail_count == 0
    }

    /// Iterates over failing results.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| r.is_fail())
    }

    /// Results recorded for one table.
    pub fn for_table<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a CheckResult> {
        self.results.iter().filter(move |r| r.table == table)
    }

    /// Converts a report with failures into an error carrying the fail count.
    pub fn into_result(self) -> crate::Result<Self> {
        if self.passed() {
            Ok(self)
        } else {
            Err(ContractError::ValidationFailed {
                fail_count: self.fail_count,
            })
        }
    }
}

impl FromIterator<CheckResult> for ValidationReport {
    fn from_iter<T: IntoIterator<Item = CheckResult>>(iter: T) -> Self {
        let mut report = Self::new();
        report.extend(iter);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fail_count_tracks_pushes() {
        let mut report = ValidationReport::new();
        report.push(CheckResult::pass("t", CheckKind::RequiredColumns, ""));
        report.push(CheckResult::fail("t", CheckKind::NonNull, "null_count=2").on_column("a"));
        report.push(CheckResult::fail("u", CheckKind::TableExistsAndReadable, "missing"));

        assert_eq!(report.fail_count, 2);
        assert!(!report.passed());
        assert_eq!(report.failures().count(), 2);
        assert_eq!(report.for_table("t").count(), 2);
    }

    #[test]
    fn test_into_result() {
        let ok: ValidationReport = vec![CheckResult::pass("t", CheckKind::DtypeFamily, "")]
            .into_iter()
            .collect();
        assert!(ok.into_result().is_ok());

        let failed: ValidationReport = vec![CheckResult::fail("t", CheckKind::DtypeFamily, "")]
            .into_iter()
            .collect();
        let err = failed.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Schema contract validation failed (fails=1)");
    }

    #[test]
    fn test_check_kind_names_match_serde() {
        let kinds = [
            CheckKind::TableExistsAndReadable,
            CheckKind::RequiredColumns,
            CheckKind::DtypeFamily,
            CheckKind::NonNull,
            CheckKind::AllowedValues,
            CheckKind::MinValue,
            CheckKind::MaxValue,
            CheckKind::PrimaryKeyColumnsExist,
            CheckKind::PrimaryKeyUnique,
            CheckKind::ForeignKeyColumnsExist,
            CheckKind::ForeignKeyTargetLoad,
            CheckKind::ForeignKeyTargetColumnsExist,
            CheckKind::ForeignKeyIntegrity,
        ];
        for kind in kinds {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_result_serialization() {
        let result = CheckResult::fail("orders", CheckKind::NonNull, "null_count=3").on_column("id");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["table"], "orders");
        assert_eq!(json["check"], "non_null");
        assert_eq!(json["column"], "id");
        assert_eq!(json["status"], "fail");
        assert_eq!(json["details"], "null_count=3");
    }
}
