use anyhow::{Context, Result, bail};
use ecomdq_parser::parse_file;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(contract_path: &Path) -> Result<()> {
    info!("Checking contract: {}", contract_path.display());

    let contract = parse_file(contract_path).with_context(|| {
        format!("Failed to parse contract file: {}", contract_path.display())
    })?;

    output::print_info(&format!(
        "Contract loaded: {} v{}",
        contract.name, contract.version
    ));

    let errors = contract.validate_definition();
    if !errors.is_empty() {
        for error in &errors {
            println!("  - {}", error);
        }
        bail!("Contract definition has {} problem(s)", errors.len());
    }

    output::print_success("Contract definition is valid");

    let columns: usize = contract.tables.iter().map(|t| t.columns.len()).sum();
    let primary_keys = contract
        .tables
        .iter()
        .filter(|t| t.primary_key.is_some())
        .count();
    let foreign_keys: usize = contract.tables.iter().map(|t| t.foreign_keys.len()).sum();

    println!("\nContract Summary:");
    println!("  Name:         {}", contract.name);
    println!("  Version:      {}", contract.version);
    println!("  Tables:       {}", contract.tables.len());
    println!("  Columns:      {}", columns);
    println!("  Primary keys: {}", primary_keys);
    println!("  Foreign keys: {}", foreign_keys);

    for table in &contract.tables {
        println!("\n  {} ({} columns)", table.name, table.columns.len());
        if let Some(pk) = &table.primary_key {
            println!("    key: [{}]", pk.join(", "));
        }
        for fk in &table.foreign_keys {
            println!(
                "    [{}] -> {} [{}]",
                fk.from_columns.join(", "),
                fk.to_table,
                fk.to_columns.join(", ")
            );
        }
    }

    for (table, target) in contract.dangling_references() {
        output::print_warning(&format!(
            "{} references {}, which is not declared in this contract",
            table, target
        ));
    }

    Ok(())
}
