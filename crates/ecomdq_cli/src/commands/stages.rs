use anyhow::{Context, Result};
use ecomdq_pipeline::{Pipeline, PipelineConfig};

use crate::output;

pub fn sanity(config: PipelineConfig) -> Result<()> {
    let summaries = Pipeline::new(config)
        .sanity()
        .context("Raw sanity check failed")?;

    for summary in &summaries {
        println!("\n{}", summary.file);
        println!("rows={} cols={}", summary.rows, summary.columns.len());
        for (name, data_type) in &summary.columns {
            println!("  {:<40} {}", name, data_type);
        }
    }

    output::print_success(&format!("All {} raw files present and readable", summaries.len()));
    Ok(())
}

pub fn profile(config: PipelineConfig) -> Result<()> {
    let pipeline = Pipeline::new(config);
    let table = pipeline.profile().context("Failed to profile raw files")?;

    output::print_success(&format!(
        "Wrote {} ({} rows)",
        pipeline.config().raw_profile_path().display(),
        table.len()
    ));
    Ok(())
}

pub fn dictionary(config: PipelineConfig) -> Result<()> {
    let out = Pipeline::new(config)
        .dictionary()
        .context("Failed to generate data dictionary")?;

    output::print_success(&format!("Wrote {}", out.display()));
    Ok(())
}

pub fn standardize(config: PipelineConfig) -> Result<()> {
    let written = Pipeline::new(config)
        .standardize()
        .context("Failed to standardize raw files")?;

    for path in &written {
        output::print_success(&format!("Wrote {}", path.display()));
    }
    Ok(())
}

pub fn enforce(config: PipelineConfig) -> Result<()> {
    let written = Pipeline::new(config)
        .enforce()
        .context("Failed to enforce schema")?;

    for path in &written {
        output::print_success(&format!("Wrote {}", path.display()));
    }
    Ok(())
}

pub fn audit(config: PipelineConfig) -> Result<()> {
    let pipeline = Pipeline::new(config);
    let summary = pipeline.audit().context("Failed to audit clean tables")?;
    let config = pipeline.config();

    output::print_info(&format!(
        "Wrote {} (fails={})",
        config.schema_audit_path().display(),
        summary.schema_failures
    ));
    output::print_info(&format!(
        "Wrote {} (rows={})",
        config.dtypes_full_path().display(),
        summary.columns
    ));
    output::print_info(&format!(
        "Wrote {} (flags={})",
        config.dtypes_flags_path().display(),
        summary.flagged
    ));

    if summary.schema_failures > 0 || summary.flagged > 0 {
        output::print_warning("Some clean columns do not have their expected types");
    } else {
        output::print_success("Clean table types look as expected");
    }
    Ok(())
}
