use anyhow::{Context, Result, bail};
use ecomdq_core::{SchemaContract, ValidationReport, olist_contract};
use ecomdq_parser::load_contract;
use ecomdq_pipeline::{Pipeline, PipelineConfig};
use std::path::Path;
use tracing::info;

use crate::output;

fn contract_from(path: Option<&Path>) -> Result<SchemaContract> {
    match path {
        Some(path) => {
            info!("Loading contract: {}", path.display());
            load_contract(path)
                .with_context(|| format!("Failed to load contract file: {}", path.display()))
        }
        None => Ok(olist_contract()),
    }
}

fn pipeline(config: PipelineConfig, contract: Option<&Path>, json: bool) -> Result<Pipeline> {
    let contract = contract_from(contract)?;
    output::print_info(&format!(
        "Contract: {} v{} ({} tables)",
        contract.name,
        contract.version,
        contract.tables.len()
    ));
    Ok(Pipeline::new(config)
        .with_contract(contract)
        .with_json_report(json))
}

/// Prints the summary and turns a failing report into an error.
///
/// The report files are already written when this runs.
fn conclude(pipeline: &Pipeline, report: &ValidationReport) -> Result<()> {
    let report_path = pipeline.config().contract_report_path();
    output::print_contract_summary(report, &report_path);

    if report.fail_count > 0 {
        bail!(
            "Schema contract failed: {} failing checks (see {})",
            report.fail_count,
            report_path.display()
        );
    }
    Ok(())
}

pub fn execute(config: PipelineConfig, contract: Option<&Path>, json: bool) -> Result<()> {
    let pipeline = pipeline(config, contract, json)?;
    let report = pipeline
        .validate()
        .context("Failed to write contract report")?;
    conclude(&pipeline, &report)
}

pub fn run(config: PipelineConfig, contract: Option<&Path>, json: bool) -> Result<()> {
    let pipeline = pipeline(config, contract, json)?;
    let report = pipeline.run().context("Pipeline run failed")?;
    conclude(&pipeline, &report)
}
