//! Audits of clean table types.
//!
//! Two independent reports:
//! - the cast-rule audit checks every column named by a [`CastRule`]
//!   against its target family;
//! - the heuristic audit looks at every column of every clean file and
//!   flags columns whose name suggests a different family than the one
//!   stored.

use crate::enforce::CAST_RULES;
use crate::io::TextTable;
use crate::{PipelineError, Result};
use ecomdq_core::DtypeFamily;
use ecomdq_validator::{DataValue, ObservedFamily, TableData, classify, read_parquet_table};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Columns of `clean_schema_audit.csv`.
pub const SCHEMA_AUDIT_HEADER: [&str; 5] = ["file", "column", "expected", "actual", "pass"];

/// Columns of `clean_dtypes_full.csv` and `clean_dtypes_flags.csv`.
pub const DTYPE_AUDIT_HEADER: [&str; 8] = [
    "file",
    "column",
    "dtype",
    "dtype_family",
    "expected_family_heuristic",
    "sample_values",
    "flagged",
    "flag_reason",
];

/// Number of non-null values quoted per column in the heuristic audit.
const SAMPLE_SIZE: usize = 3;

/// Result of the cast-rule audit.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaAudit {
    /// One row per ruled column, or per missing file
    pub table: TextTable,
    /// Rows that did not pass
    pub fail_count: usize,
}

/// Checks every cast-rule column of the clean tables.
///
/// A missing clean file yields one failing row with `actual` set to
/// `missing_clean_file`; a missing column yields `actual=missing`.
pub fn schema_audit(clean_dir: &Path) -> Result<SchemaAudit> {
    let mut table = TextTable::new(SCHEMA_AUDIT_HEADER);
    let mut fail_count = 0;

    for rule in &CAST_RULES {
        let path = clean_dir.join(rule.table);
        if !path.is_file() {
            error!("Missing clean file: {}", path.display());
            table.push_row([rule.table, "", "", "missing_clean_file", "false"]);
            fail_count += 1;
            continue;
        }

        info!("Auditing {}", rule.table);
        let data =
            read_parquet_table(rule.table, &path).map_err(|e| PipelineError::read(&path, e))?;

        for (column, expected) in rule.columns() {
            let actual = data
                .data_type(column)
                .map(|dt| classify(dt).to_string())
                .unwrap_or_else(|| "missing".to_string());
            let pass = actual == expected.as_str();
            if !pass {
                fail_count += 1;
            }
            table.push_row([
                rule.table.to_string(),
                column.to_string(),
                expected.to_string(),
                actual,
                pass.to_string(),
            ]);
        }
    }

    Ok(SchemaAudit { table, fail_count })
}

/// Column-name patterns that suggest a type family.
#[derive(Debug, Clone)]
pub struct DtypeHeuristics {
    id: Regex,
    datetime: Regex,
    numeric: Regex,
}

impl DtypeHeuristics {
    /// Compiles the Olist column-name patterns.
    pub fn new() -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            id: Regex::new(r"(?i).*_id$|.*zip.*|.*postal.*")?,
            datetime: Regex::new(
                r"(?i).*timestamp.*|.*_date$|.*approved_at$|.*delivered_.*|.*estimated_.*",
            )?,
            numeric: Regex::new(concat!(
                r"(?i)(^price$|^freight_value$|^payment_value$|^payment_installments$|^review_score$|",
                r".*weight.*|.*length.*|.*height.*|.*width.*|.*photos.*|",
                r".*lat.*|.*lng.*|.*longitude.*|.*latitude.*)",
            ))?,
        })
    }

    /// Family a column name suggests, if any.
    ///
    /// Patterns are tried in order: identifiers and zip codes, then dates,
    /// then measures. `order_item_id` is a sequence number, not an identifier.
    pub fn expected_family(&self, column: &str) -> Option<DtypeFamily> {
        if column == "order_item_id" {
            Some(DtypeFamily::Numeric)
        } else if self.id.is_match(column) {
            Some(DtypeFamily::String)
        } else if self.datetime.is_match(column) {
            Some(DtypeFamily::Datetime)
        } else if self.numeric.is_match(column) {
            Some(DtypeFamily::Numeric)
        } else {
            None
        }
    }

    /// Reason a column looks mis-typed, if it does.
    ///
    /// Measure-like columns are only flagged when stored as text.
    pub fn flag_reason(&self, column: &str, observed: &ObservedFamily) -> Option<&'static str> {
        match self.expected_family(column)? {
            DtypeFamily::String if !observed.matches(DtypeFamily::String) => {
                Some("expected string (id/zip-like)")
            }
            DtypeFamily::Datetime if !observed.matches(DtypeFamily::Datetime) => {
                Some("expected datetime (date-like)")
            }
            DtypeFamily::Numeric if observed.matches(DtypeFamily::String) => {
                Some("expected numeric (measure-like)")
            }
            _ => None,
        }
    }
}

/// Result of the heuristic dtype audit.
#[derive(Debug, Clone, PartialEq)]
pub struct DtypeAudit {
    /// One row per column of every clean file
    pub full: TextTable,
    /// The flagged subset of `full`
    pub flags: TextTable,
}

fn sample_values(data: &TableData, column: &str) -> String {
    let Some(Ok(values)) = data.values(column) else {
        return String::new();
    };
    values
        .iter()
        .filter(|v| !v.is_null())
        .take(SAMPLE_SIZE)
        .map(DataValue::to_string)
        .collect::<Vec<_>>()
        .join("|")
}

/// Clean parquet files in `clean_dir`, sorted by name.
pub fn clean_files(clean_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(clean_dir).map_err(|_| PipelineError::NoCleanFiles {
        dir: clean_dir.to_path_buf(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "parquet"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(PipelineError::NoCleanFiles {
            dir: clean_dir.to_path_buf(),
        });
    }
    Ok(files)
}

/// Classifies every column of every clean file and flags suspicious ones.
pub fn dtype_audit(clean_dir: &Path, heuristics: &DtypeHeuristics) -> Result<DtypeAudit> {
    let mut full = TextTable::new(DTYPE_AUDIT_HEADER);
    let mut flags = TextTable::new(DTYPE_AUDIT_HEADER);

    for path in clean_files(clean_dir)? {
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("Auditing {}", file);

        let data =
            read_parquet_table(&file, &path).map_err(|e| PipelineError::read(&path, e))?;
        let schema = data.schema();

        for field in schema.fields() {
            let column = field.name();
            let observed = classify(field.data_type());
            let expected = heuristics.expected_family(column);
            let reason = heuristics.flag_reason(column, &observed);

            let row = vec![
                file.clone(),
                column.clone(),
                field.data_type().to_string(),
                observed.to_string(),
                expected.map(|f| f.to_string()).unwrap_or_default(),
                sample_values(&data, column),
                reason.is_some().to_string(),
                reason.unwrap_or_default().to_string(),
            ];
            if reason.is_some() {
                flags.push_row(row.clone());
            }
            full.push_row(row);
        }
    }

    Ok(DtypeAudit { full, flags })
}

/// Counts from a full audit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditSummary {
    /// Failing cast-rule rows
    pub schema_failures: usize,
    /// Columns audited by the heuristics
    pub columns: usize,
    /// Columns flagged by the heuristics
    pub flagged: usize,
}

/// Runs both audits and writes their reports.
pub fn write_audits(
    clean_dir: &Path,
    schema_out: &Path,
    full_out: &Path,
    flags_out: &Path,
) -> Result<AuditSummary> {
    let schema = schema_audit(clean_dir)?;
    schema.table.write_csv(schema_out)?;
    info!("Wrote {} (fails={})", schema_out.display(), schema.fail_count);

    let heuristics = DtypeHeuristics::new()?;
    let dtypes = dtype_audit(clean_dir, &heuristics)?;
    dtypes.full.write_csv(full_out)?;
    dtypes.flags.write_csv(flags_out)?;
    info!("Wrote {} (rows={})", full_out.display(), dtypes.full.len());
    info!("Wrote {} (flags={})", flags_out.display(), dtypes.flags.len());

    Ok(AuditSummary {
        schema_failures: schema.fail_count,
        columns: dtypes.full.len(),
        flagged: dtypes.flags.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::write_parquet;
    use arrow::array::{ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use ecomdq_core::olist::{ORDER_ITEMS, SELLERS};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn heuristics() -> DtypeHeuristics {
        DtypeHeuristics::new().unwrap()
    }

    #[test]
    fn test_expected_family() {
        let h = heuristics();
        assert_eq!(h.expected_family("customer_id"), Some(DtypeFamily::String));
        assert_eq!(h.expected_family("seller_zip_code_prefix"), Some(DtypeFamily::String));
        assert_eq!(h.expected_family("order_item_id"), Some(DtypeFamily::Numeric));
        assert_eq!(h.expected_family("shipping_limit_date"), Some(DtypeFamily::Datetime));
        assert_eq!(h.expected_family("order_approved_at"), Some(DtypeFamily::Datetime));
        assert_eq!(h.expected_family("Product_Weight_G"), Some(DtypeFamily::Numeric));
        assert_eq!(h.expected_family("geolocation_lat"), Some(DtypeFamily::Numeric));
        assert_eq!(h.expected_family("price"), Some(DtypeFamily::Numeric));
        assert_eq!(h.expected_family("unit_price"), None);
        assert_eq!(h.expected_family("order_status"), None);
    }

    #[test]
    fn test_flag_reasons() {
        let h = heuristics();
        let string = ObservedFamily::Family(DtypeFamily::String);
        let numeric = ObservedFamily::Family(DtypeFamily::Numeric);
        let other = ObservedFamily::Other("Boolean".to_string());

        assert_eq!(
            h.flag_reason("customer_zip_code_prefix", &numeric),
            Some("expected string (id/zip-like)")
        );
        assert_eq!(
            h.flag_reason("review_creation_date", &string),
            Some("expected datetime (date-like)")
        );
        assert_eq!(
            h.flag_reason("price", &string),
            Some("expected numeric (measure-like)")
        );
        assert_eq!(h.flag_reason("price", &other), None);
        assert_eq!(h.flag_reason("customer_id", &string), None);
        assert_eq!(h.flag_reason("order_status", &numeric), None);
    }

    fn write(dir: &Path, name: &str, columns: Vec<(&str, ArrayRef)>) {
        let fields: Vec<Field> = columns
            .iter()
            .map(|(n, a)| Field::new(*n, a.data_type().clone(), true))
            .collect();
        let arrays = columns.into_iter().map(|(_, a)| a).collect();
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap();
        write_parquet(&dir.join(name), &batch).unwrap();
    }

    #[test]
    fn test_schema_audit_rows() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            SELLERS,
            vec![
                ("seller_id", Arc::new(StringArray::from(vec!["s1"])) as ArrayRef),
                ("seller_zip_code_prefix", Arc::new(Int64Array::from(vec![1310]))),
            ],
        );

        let audit = schema_audit(dir.path()).unwrap();
        let rows = audit.table.rows();

        let sellers: Vec<&Vec<String>> = rows.iter().filter(|r| r[0] == SELLERS).collect();
        assert_eq!(
            sellers[1],
            &vec![
                SELLERS.to_string(),
                "seller_zip_code_prefix".to_string(),
                "string".to_string(),
                "numeric".to_string(),
                "false".to_string()
            ]
        );

        let items: Vec<&Vec<String>> = rows.iter().filter(|r| r[0] == ORDER_ITEMS).collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0][3], "missing_clean_file");

        // Eight missing files plus the mistyped zip column.
        assert_eq!(audit.fail_count, CAST_RULES.len() - 1 + 1);
    }

    #[test]
    fn test_schema_audit_missing_column() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            SELLERS,
            vec![("seller_id", Arc::new(StringArray::from(vec!["s1"])) as ArrayRef)],
        );

        let audit = schema_audit(dir.path()).unwrap();
        let zip = audit
            .table
            .rows()
            .iter()
            .find(|r| r[1] == "seller_zip_code_prefix")
            .unwrap();
        assert_eq!(zip[3], "missing");
        assert_eq!(zip[4], "false");
    }

    #[test]
    fn test_dtype_audit_flags_and_samples() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "b.parquet",
            vec![
                (
                    "price",
                    Arc::new(StringArray::from(vec![
                        None,
                        Some("1.5"),
                        Some("2"),
                        Some("3"),
                        Some("4"),
                    ])) as ArrayRef,
                ),
                ("weight_g", Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0, 4.0, 5.0]))),
            ],
        );
        write(
            dir.path(),
            "a.parquet",
            vec![("customer_id", Arc::new(Int64Array::from(vec![7])) as ArrayRef)],
        );

        let audit = dtype_audit(dir.path(), &heuristics()).unwrap();

        assert_eq!(audit.full.len(), 3);
        assert_eq!(audit.full.rows()[0][0], "a.parquet");
        assert_eq!(audit.flags.len(), 2);

        let price = &audit.full.rows()[1];
        assert_eq!(
            price,
            &vec![
                "b.parquet".to_string(),
                "price".to_string(),
                DataType::Utf8.to_string(),
                "string".to_string(),
                "numeric".to_string(),
                "1.5|2|3".to_string(),
                "true".to_string(),
                "expected numeric (measure-like)".to_string()
            ]
        );
        assert_eq!(audit.full.rows()[2][6], "false");
    }

    #[test]
    fn test_no_clean_files() {
        let dir = TempDir::new().unwrap();
        let err = dtype_audit(dir.path(), &heuristics()).unwrap_err();
        assert!(matches!(err, PipelineError::NoCleanFiles { .. }));
    }
}
