//! Primary and foreign key computations over key tuples.
//!
//! A key tuple is one row's values for the key columns, in key order, as
//! produced by [`TableData::key_rows`](crate::TableData::key_rows).

use crate::DataValue;
use std::collections::HashSet;

/// A composite key value.
pub type KeyTuple = Vec<DataValue>;

/// Counts rows whose key tuple equals that of an earlier row.
///
/// Nulls compare equal to nulls here.
pub fn duplicate_rows(keys: &[KeyTuple]) -> usize {
    let mut seen = HashSet::with_capacity(keys.len());
    keys.iter().filter(|key| !seen.insert(*key)).count()
}

/// Distinct key tuples without any null component, in first-appearance order.
pub fn distinct_non_null(keys: Vec<KeyTuple>) -> Vec<KeyTuple> {
    let mut seen = HashSet::new();
    keys.into_iter()
        .filter(|key| !key.iter().any(DataValue::is_null))
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

/// Referencing tuples that have no match among the referenced tuples.
///
/// Both sides are reduced to distinct non-null tuples first; a tuple with
/// any null component is exempt.
pub fn orphans(from: Vec<KeyTuple>, to: Vec<KeyTuple>) -> Vec<KeyTuple> {
    let targets: HashSet<KeyTuple> = distinct_non_null(to).into_iter().collect();
    distinct_non_null(from)
        .into_iter()
        .filter(|key| !targets.contains(key))
        .collect()
}

/// Renders a key tuple as `{col=value, ..}`.
pub fn format_key(columns: &[String], key: &[DataValue]) -> String {
    let parts: Vec<String> = columns
        .iter()
        .zip(key)
        .map(|(column, value)| format!("{column}={value}"))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

/// Renders a list of names as `[a, b]`.
pub fn format_list(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}
