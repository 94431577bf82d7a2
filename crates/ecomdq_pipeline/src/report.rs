//! Contract validation stage and its report files.

use crate::io::TextTable;
use crate::{PipelineError, Result};
use ecomdq_core::{SchemaContract, ValidationReport};
use ecomdq_validator::{ContractEvaluator, ParquetDirSource};
use std::fs;
use std::path::Path;
use tracing::info;

/// Columns of `clean_contract_audit.csv`.
pub const CONTRACT_REPORT_HEADER: [&str; 5] = ["table", "check", "column", "status", "details"];

/// Evaluates `contract` against the parquet tables in `clean_dir`.
///
/// Fails only if the contract definition is malformed; failing checks are
/// part of the returned report.
pub fn validate_clean(contract: &SchemaContract, clean_dir: &Path) -> Result<ValidationReport> {
    info!(
        "Validating {} tables in {} against contract '{}'",
        contract.tables.len(),
        clean_dir.display(),
        contract.name
    );
    let mut evaluator = ContractEvaluator::new(contract, ParquetDirSource::new(clean_dir))
        .map_err(PipelineError::invalid_contract)?;
    Ok(evaluator.run())
}

/// Tabulates a report, one row per check result in evaluation order.
pub fn report_table(report: &ValidationReport) -> TextTable {
    let mut table = TextTable::new(CONTRACT_REPORT_HEADER);
    for result in &report.results {
        table.push_row([
            result.table.clone(),
            result.kind.as_str().to_string(),
            result.column.clone().unwrap_or_default(),
            result.status.as_str().to_string(),
            result.details.clone(),
        ]);
    }
    table
}

/// Writes the report as CSV.
pub fn write_report_csv(report: &ValidationReport, path: &Path) -> Result<()> {
    report_table(report).write_csv(path)?;
    info!("Wrote {} (fails={})", path.display(), report.fail_count);
    Ok(())
}

/// Writes the report as pretty-printed JSON.
pub fn write_report_json(report: &ValidationReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PipelineError::write(path, e))?;
    }
    fs::write(path, json).map_err(|e| PipelineError::write(path, e))?;
    info!("Wrote {}", path.display());
    Ok(())
}
