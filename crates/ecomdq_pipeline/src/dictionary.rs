//! Markdown data dictionary generated from the raw profile.

use crate::io::TextTable;
use crate::tables::file_stem;
use crate::{PipelineError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

struct ProfileRow<'a> {
    column: &'a str,
    dtype: &'a str,
    null_pct: f64,
    null_count: &'a str,
}

fn cell<'a>(table: &TextTable, row: &'a [String], name: &str) -> Result<&'a str> {
    let index = table.column_index(name).ok_or_else(|| {
        PipelineError::read("raw_profile.csv", format!("missing column '{name}'"))
    })?;
    Ok(row[index].as_str())
}

/// Renders the data dictionary for a raw profile table.
///
/// Rows without a column name (read errors) are skipped. Datasets are
/// ordered by file name and columns by name.
pub fn render_dictionary(profile: &TextTable) -> Result<String> {
    let mut datasets: BTreeMap<&str, Vec<ProfileRow<'_>>> = BTreeMap::new();

    for row in profile.rows() {
        let column = cell(profile, row, "column")?;
        if column.is_empty() {
            continue;
        }
        let file = cell(profile, row, "file")?;
        datasets.entry(file).or_default().push(ProfileRow {
            column,
            dtype: cell(profile, row, "dtype")?,
            null_pct: cell(profile, row, "null_pct")?.parse().unwrap_or(0.0),
            null_count: cell(profile, row, "null_count")?,
        });
    }

    let mut lines: Vec<String> = vec!["# Data Dictionary".to_string(), String::new()];

    if datasets.is_empty() {
        warn!("No valid columns found in the raw profile");
        lines.push("No data available.".to_string());
        return Ok(lines.join("\n") + "\n");
    }

    lines.push("Derived from `reports/raw_profile.csv`.".to_string());
    lines.push(String::new());

    for (file, mut rows) in datasets {
        rows.sort_by(|a, b| a.column.cmp(b.column));

        lines.push(format!("## Dataset: {}", file_stem(file)));
        lines.push(String::new());
        lines.push("| Column | Raw Dtype | Null % | Null Count |".to_string());
        lines.push("|--------|-----------|--------|------------|".to_string());
        for row in rows {
            lines.push(format!(
                "| `{}` | `{}` | {:.4} | {} |",
                row.column, row.dtype, row.null_pct, row.null_count
            ));
        }
        lines.push(String::new());
    }

    Ok(lines.join("\n") + "\n")
}

/// Reads the raw profile at `profile_path` and writes the dictionary to `out`.
pub fn write_dictionary(profile_path: &Path, out: &Path) -> Result<()> {
    if !profile_path.is_file() {
        return Err(PipelineError::MissingProfile {
            path: profile_path.to_path_buf(),
        });
    }

    let profile = TextTable::read_csv(profile_path)?;
    let markdown = render_dictionary(&profile)?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::write(out, e))?;
    }
    fs::write(out, markdown).map_err(|e| PipelineError::write(out, e))?;

    info!("Wrote {}", out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::PROFILE_HEADER;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn profile() -> TextTable {
        let mut table = TextTable::new(PROFILE_HEADER);
        table.push_row(["orders.csv", "order_status", "4", "Utf8", "0", "0", ""]);
        table.push_row(["customers.csv", "customer_id", "2", "Utf8", "0", "0", ""]);
        table.push_row(["orders.csv", "order_approved_at", "4", "Timestamp(ns)", "1", "25", ""]);
        table.push_row(["sellers.csv", "", "", "", "", "", "Failed to read"]);
        table
    }

    #[test]
    fn test_render_sorted_sections() {
        let markdown = render_dictionary(&profile()).unwrap();
        let expected = "\
# Data Dictionary

Derived from `reports/raw_profile.csv`.

## Dataset: customers

| Column | Raw Dtype | Null % | Null Count |
|--------|-----------|--------|------------|
| `customer_id` | `Utf8` | 0.0000 | 0 |

## Dataset: orders

| Column | Raw Dtype | Null % | Null Count |
|--------|-----------|--------|------------|
| `order_approved_at` | `Timestamp(ns)` | 25.0000 | 1 |
| `order_status` | `Utf8` | 0.0000 | 0 |

";
        assert_eq!(markdown, expected);
    }

    #[test]
    fn test_render_without_columns() {
        let mut table = TextTable::new(PROFILE_HEADER);
        table.push_row(["orders.csv", "", "", "", "", "", "boom"]);

        assert_eq!(
            render_dictionary(&table).unwrap(),
            "# Data Dictionary\n\nNo data available.\n"
        );
    }

    #[test]
    fn test_missing_profile_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = write_dictionary(
            &dir.path().join("raw_profile.csv"),
            &dir.path().join("docs").join("data_dictionary.md"),
        )
        .unwrap_err();

        assert!(matches!(err, PipelineError::MissingProfile { .. }));
        assert!(err.to_string().contains("ecomdq profile"));
    }

    #[test]
    fn test_write_from_profile_file() {
        let dir = TempDir::new().unwrap();
        let profile_path = dir.path().join("raw_profile.csv");
        let out = dir.path().join("docs").join("data_dictionary.md");
        profile().write_csv(&profile_path).unwrap();

        write_dictionary(&profile_path, &out).unwrap();

        let markdown = fs::read_to_string(&out).unwrap();
        assert!(markdown.contains("## Dataset: orders"));
        assert!(!markdown.contains("sellers"));
    }
}
