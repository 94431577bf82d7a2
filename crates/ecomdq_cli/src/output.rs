use colored::*;
use ecomdq_core::{CheckStatus, ValidationReport};
use std::path::Path;

pub fn print_contract_summary(report: &ValidationReport, report_path: &Path) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  CONTRACT VALIDATION".bold());
    println!("{}", "═".repeat(60));

    if report.passed() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "All contract checks passed".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Contract checks FAILED".red().bold()
        );
        println!("\n{}", "Failures:".red().bold());
        for (i, failure) in report.failures().enumerate() {
            let target = match &failure.column {
                Some(column) => format!("{}.{}", failure.table, column),
                None => failure.table.clone(),
            };
            println!(
                "  {}. {} {} {}",
                i + 1,
                target.bold(),
                failure.kind.as_str().red(),
                failure.details
            );
        }
    }

    let passed = report
        .results
        .iter()
        .filter(|r| r.status == CheckStatus::Pass)
        .count();

    println!("\n{}", "Summary:".bold());
    println!("  Checks: {}", report.results.len());
    println!("  Passed: {}", passed);
    println!("  Failed: {}", report.fail_count);
    println!("  Report: {}", report_path.display());
    println!("{}", "═".repeat(60));
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_warning(message: &str) {
    println!("{} {}", "!".yellow().bold(), message.yellow());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
