use anyhow::{Context, Result};
use ecomdq_core::SchemaContract;
use ecomdq_parser::to_yaml;
use ecomdq_pipeline::skeleton::skeleton_from_parquet;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(source: &Path, output_path: Option<&Path>) -> Result<()> {
    info!("Initializing contract from parquet file: {}", source.display());

    let table = skeleton_from_parquet(source)
        .with_context(|| format!("Failed to read parquet file: {}", source.display()))?;

    let name = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| table.name.clone());
    let contract = SchemaContract::new(name, vec![table]);

    let yaml = to_yaml(&contract).context("Failed to serialize contract to YAML")?;

    if let Some(path) = output_path {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write to file: {}", path.display()))?;
        output::print_success(&format!("Contract written to: {}", path.display()));
    } else {
        println!("{}", yaml);
    }

    Ok(())
}
