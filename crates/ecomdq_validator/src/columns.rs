//! Per-column checks.
//!
//! Runs the checks a [`ColumnSpec`] asks for against one present column:
//! - `dtype_family`: always
//! - `non_null`: when the column is not nullable
//! - `allowed_values`: when an allowed set is declared
//! - `min_value` / `max_value`: when the declared family is numeric and a bound is set
//!
//! Null values are exempt from every check except `non_null`.

use crate::{DataValue, classify, column_values};
use arrow::array::Array;
use ecomdq_core::{CheckKind, CheckResult, ColumnSpec, DtypeFamily};
use std::collections::HashSet;

/// Maximum number of offending values quoted in details.
pub const SAMPLE_LIMIT: usize = 5;

/// Counts null cells.
pub fn count_nulls(values: &[DataValue]) -> usize {
    values.iter().filter(|v| v.is_null()).count()
}

/// Non-null values outside the allowed set, in row order.
///
/// Values are compared through their textual form, so `3` matches an
/// allowed entry `"3"`.
pub fn disallowed_values<'a>(values: &'a [DataValue], allowed: &[String]) -> Vec<&'a DataValue> {
    let allowed: HashSet<&str> = allowed.iter().map(String::as_str).collect();
    values
        .iter()
        .filter(|v| !v.is_null() && !allowed.contains(v.to_string().as_str()))
        .collect()
}

/// Counts numeric values strictly below `min`.
pub fn count_below(values: &[DataValue], min: f64) -> usize {
    values
        .iter()
        .filter_map(DataValue::as_f64)
        .filter(|v| *v < min)
        .count()
}

/// Counts numeric values strictly above `max`.
pub fn count_above(values: &[DataValue], max: f64) -> usize {
    values
        .iter()
        .filter_map(DataValue::as_f64)
        .filter(|v| *v > max)
        .count()
}

fn needs_values(spec: &ColumnSpec) -> bool {
    !spec.nullable || spec.allowed_values.is_some() || has_bounds(spec)
}

fn has_bounds(spec: &ColumnSpec) -> bool {
    spec.dtype_family == DtypeFamily::Numeric && (spec.min.is_some() || spec.max.is_some())
}

/// Runs every applicable check for one column.
pub fn check_column(table: &str, spec: &ColumnSpec, array: &dyn Array) -> Vec<CheckResult> {
    let mut results = Vec::new();
    let column = spec.name.as_str();
    let record = |result: CheckResult| result.on_column(column);

    let expected = spec.dtype_family;
    let observed = classify(array.data_type());
    if observed.matches(expected) {
        results.push(record(CheckResult::pass(
            table,
            CheckKind::DtypeFamily,
            format!("expected={expected} actual={observed}"),
        )));
    } else {
        results.push(record(CheckResult::fail(
            table,
            CheckKind::DtypeFamily,
            format!(
                "expected={expected} actual={observed} storage_type={}",
                array.data_type()
            ),
        )));
    }

    if !needs_values(spec) {
        return results;
    }

    let values = match column_values(array) {
        Ok(values) => values,
        Err(e) => {
            let details = format!("error={e}");
            let mut kinds = Vec::new();
            if !spec.nullable {
                kinds.push(CheckKind::NonNull);
            }
            if spec.allowed_values.is_some() {
                kinds.push(CheckKind::AllowedValues);
            }
            if has_bounds(spec) {
                if spec.min.is_some() {
                    kinds.push(CheckKind::MinValue);
                }
                if spec.max.is_some() {
                    kinds.push(CheckKind::MaxValue);
                }
            }
            results.extend(
                kinds
                    .into_iter()
                    .map(|kind| record(CheckResult::fail(table, kind, details.clone()))),
            );
            return results;
        }
    };

    if !spec.nullable {
        let null_count = count_nulls(&values);
        results.push(record(if null_count > 0 {
            CheckResult::fail(table, CheckKind::NonNull, format!("null_count={null_count}"))
        } else {
            CheckResult::pass(table, CheckKind::NonNull, "")
        }));
    }

    if let Some(allowed) = &spec.allowed_values {
        let bad = disallowed_values(&values, allowed);
        results.push(record(if bad.is_empty() {
            CheckResult::pass(table, CheckKind::AllowedValues, "")
        } else {
            let sample: Vec<String> = bad.iter().take(SAMPLE_LIMIT).map(ToString::to_string).collect();
            CheckResult::fail(
                table,
                CheckKind::AllowedValues,
                format!("bad_count={} sample={}", bad.len(), sample.join("|")),
            )
        }));
    }

    if expected == DtypeFamily::Numeric {
        if let Some(min) = spec.min {
            let bad_count = count_below(&values, min);
            results.push(record(if bad_count > 0 {
                CheckResult::fail(
                    table,
                    CheckKind::MinValue,
                    format!("min={min} bad_count={bad_count}"),
                )
            } else {
                CheckResult::pass(table, CheckKind::MinValue, format!("min={min}"))
            }));
        }
        if let Some(max) = spec.max {
            let bad_count = count_above(&values, max);
            results.push(record(if bad_count > 0 {
                CheckResult::fail(
                    table,
                    CheckKind::MaxValue,
                    format!("max={max} bad_count={bad_count}"),
                )
            } else {
                CheckResult::pass(table, CheckKind::MaxValue, format!("max={max}"))
            }));
        }
    }

    results
}
