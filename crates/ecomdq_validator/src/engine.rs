//! Contract evaluation engine.
//!
//! This module provides the [`ContractEvaluator`], which walks every table of
//! a [`SchemaContract`] against loaded data and records one [`CheckResult`]
//! per executed check. A failing check never stops independent checks; only a
//! table that cannot be loaded skips the rest of its own checks.

use crate::keys::{format_key, format_list, orphans};
use crate::{SAMPLE_LIMIT, TableCache, TableData, TableSource, check_column, duplicate_rows};
use ecomdq_core::{
    CheckKind, CheckResult, ContractError, ForeignKeySpec, SchemaContract, TableSpec,
    ValidationReport,
};
use tracing::{debug, info, warn};

/// Evaluates a schema contract against a table source.
///
/// Tables are processed in contract order. Foreign key targets are fetched
/// through the same cache as evaluated tables, so each table is read at most
/// once per run. Tables stay cached for the evaluator's lifetime, so build a
/// new evaluator for each run over changed data.
///
/// Construction checks the contract definition first; a malformed contract
/// is rejected with every problem found and never evaluated.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use arrow::array::{RecordBatch, StringArray};
/// use arrow::datatypes::{DataType, Field, Schema};
/// use ecomdq_core::{ColumnSpecBuilder, DtypeFamily, SchemaContract, TableSpecBuilder};
/// use ecomdq_validator::{ContractEvaluator, InMemorySource};
///
/// let schema = Arc::new(Schema::new(vec![Field::new("customer_id", DataType::Utf8, false)]));
/// let batch = RecordBatch::try_new(
///     schema,
///     vec![Arc::new(StringArray::from(vec!["c1", "c2"]))],
/// ).unwrap();
///
/// let contract = SchemaContract::new("shop", vec![
///     TableSpecBuilder::new("customers")
///         .primary_key(["customer_id"])
///         .column(ColumnSpecBuilder::new("customer_id", DtypeFamily::String).nullable(false).build())
///         .build(),
/// ]);
///
/// let source = InMemorySource::new().with_table("customers", batch);
/// let report = ContractEvaluator::new(&contract, source).unwrap().run();
///
/// assert!(report.passed());
/// ```
pub struct ContractEvaluator<'a, S> {
    contract: &'a SchemaContract,
    cache: TableCache<S>,
}

impl<'a, S: TableSource> ContractEvaluator<'a, S> {
    /// Creates an evaluator with an empty cache over `source`.
    ///
    /// Returns the definition errors of `contract` if it has any.
    pub fn new(contract: &'a SchemaContract, source: S) -> Result<Self, Vec<ContractError>> {
        let errors = contract.validate_definition();
        if !errors.is_empty() {
            warn!(
                "Contract '{}' has {} definition problem(s)",
                contract.name,
                errors.len()
            );
            return Err(errors);
        }

        Ok(Self {
            contract,
            cache: TableCache::new(source),
        })
    }

    /// Runs every check of the contract and returns the full report.
    pub fn run(&mut self) -> ValidationReport {
        let contract = self.contract;
        let mut report = ValidationReport::new();

        for spec in &contract.tables {
            info!("Contract validating {}", spec.name);
            self.evaluate_table(spec, &mut report);
        }

        info!(
            "Contract evaluation finished: {} checks, fails={}",
            report.results.len(),
            report.fail_count
        );
        report
    }

    /// The table cache used by this evaluator.
    pub fn cache(&self) -> &TableCache<S> {
        &self.cache
    }

    /// Runs all checks for one table, appending results to `report`.
    pub fn evaluate_table(&mut self, spec: &TableSpec, report: &mut ValidationReport) {
        let table_name = spec.name.as_str();

        let table = match self.cache.get(table_name) {
            Ok(table) => table,
            Err(e) => {
                warn!("Cannot load {}: {}", table_name, e);
                report.push(CheckResult::fail(
                    table_name,
                    CheckKind::TableExistsAndReadable,
                    e.to_string(),
                ));
                return;
            }
        };
        debug!("{} has {} rows", table_name, table.num_rows());

        report.push(check_required_columns(spec, &table));

        for column_spec in &spec.columns {
            // absent columns were already reported as missing if required
            let Some(array) = table.column(&column_spec.name) else {
                continue;
            };
            report.extend(check_column(table_name, column_spec, array.as_ref()));
        }

        if let Some(pk) = &spec.primary_key {
            report.push(check_primary_key(table_name, pk, &table));
        }

        for fk in &spec.foreign_keys {
            let result = self.check_foreign_key(table_name, fk, &table);
            report.push(result);
        }
    }

    fn check_foreign_key(
        &mut self,
        table_name: &str,
        fk: &ForeignKeySpec,
        table: &TableData,
    ) -> CheckResult {
        let from_cols = format_list(&fk.from_columns);
        let to_table = fk.to_table.as_str();

        if fk.from_columns.iter().any(|c| !table.has_column(c)) {
            return CheckResult::fail(
                table_name,
                CheckKind::ForeignKeyColumnsExist,
                format!("from_cols={from_cols} to_table={to_table}"),
            );
        }

        let target = match self.cache.get(to_table) {
            Ok(target) => target,
            Err(e) => {
                return CheckResult::fail(
                    table_name,
                    CheckKind::ForeignKeyTargetLoad,
                    format!("to_table={to_table} error={e}"),
                );
            }
        };

        if fk.to_columns.iter().any(|c| !target.has_column(c)) {
            return CheckResult::fail(
                table_name,
                CheckKind::ForeignKeyTargetColumnsExist,
                format!("to_table={to_table} to_cols={}", format_list(&fk.to_columns)),
            );
        }

        let keys = table
            .key_rows(&fk.from_columns)
            .and_then(|from| Ok((from, target.key_rows(&fk.to_columns)?)));
        let (from, to) = match keys {
            Ok(keys) => keys,
            Err(e) => {
                return CheckResult::fail(
                    table_name,
                    CheckKind::ForeignKeyIntegrity,
                    format!("from_cols={from_cols} to_table={to_table} error={e}"),
                );
            }
        };

        let orphaned = orphans(from, to);
        if orphaned.is_empty() {
            CheckResult::pass(
                table_name,
                CheckKind::ForeignKeyIntegrity,
                format!("from_cols={from_cols} to_table={to_table}"),
            )
        } else {
            let sample: Vec<String> = orphaned
                .iter()
                .take(SAMPLE_LIMIT)
                .map(|key| format_key(&fk.from_columns, key))
                .collect();
            CheckResult::fail(
                table_name,
                CheckKind::ForeignKeyIntegrity,
                format!(
                    "from_cols={from_cols} to_table={to_table} orphan_count={} sample=[{}]",
                    orphaned.len(),
                    sample.join(", ")
                ),
            )
        }
    }
}

fn check_required_columns(spec: &TableSpec, table: &TableData) -> CheckResult {
    let missing: Vec<String> = spec
        .required_columns
        .iter()
        .filter(|c| !table.has_column(c))
        .cloned()
        .collect();

    if missing.is_empty() {
        CheckResult::pass(&spec.name, CheckKind::RequiredColumns, "")
    } else {
        CheckResult::fail(
            &spec.name,
            CheckKind::RequiredColumns,
            format!("missing={}", format_list(&missing)),
        )
    }
}

fn check_primary_key(table_name: &str, pk: &[String], table: &TableData) -> CheckResult {
    let pk_list = format_list(pk);

    if pk.iter().any(|c| !table.has_column(c)) {
        return CheckResult::fail(
            table_name,
            CheckKind::PrimaryKeyColumnsExist,
            format!("pk={pk_list}"),
        );
    }

    match table.key_rows(pk) {
        Ok(keys) => {
            let duplicates = duplicate_rows(&keys);
            if duplicates > 0 {
                CheckResult::fail(
                    table_name,
                    CheckKind::PrimaryKeyUnique,
                    format!("pk={pk_list} duplicate_rows={duplicates}"),
                )
            } else {
                CheckResult::pass(
                    table_name,
                    CheckKind::PrimaryKeyUnique,
                    format!("pk={pk_list}"),
                )
            }
        }
        Err(e) => CheckResult::fail(
            table_name,
            CheckKind::PrimaryKeyUnique,
            format!("pk={pk_list} error={e}"),
        ),
    }
}
