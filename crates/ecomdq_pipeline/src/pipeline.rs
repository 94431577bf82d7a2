//! The ordered stage runner.

use crate::audit::{AuditSummary, write_audits};
use crate::config::PipelineConfig;
use crate::dictionary::write_dictionary;
use crate::enforce::enforce;
use crate::io::TextTable;
use crate::profile::write_profile;
use crate::report::{validate_clean, write_report_csv, write_report_json};
use crate::sanity::{RawFileSummary, sanity_check};
use crate::standardize::standardize;
use crate::Result;
use ecomdq_core::{SchemaContract, ValidationReport, olist_contract};
use std::path::PathBuf;
use tracing::info;

/// Runs pipeline stages against one configuration and contract.
///
/// Stage methods can be called on their own; [`run`](Self::run) executes
/// them all in order and stops at the first stage error. Contract check
/// failures are not stage errors: they are returned in the report.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    contract: SchemaContract,
    write_json: bool,
}

impl Pipeline {
    /// Creates a pipeline that validates against the built-in Olist contract.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            contract: olist_contract(),
            write_json: false,
        }
    }

    /// Replaces the contract used by the validate stage.
    pub fn with_contract(mut self, contract: SchemaContract) -> Self {
        self.contract = contract;
        self
    }

    /// Also writes the contract report as JSON.
    pub fn with_json_report(mut self, enabled: bool) -> Self {
        self.write_json = enabled;
        self
    }

    /// The directory configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The contract used by the validate stage.
    pub fn contract(&self) -> &SchemaContract {
        &self.contract
    }

    /// Checks that every raw file exists and parses.
    pub fn sanity(&self) -> Result<Vec<RawFileSummary>> {
        info!("Stage: sanity");
        sanity_check(&self.config.raw_dir)
    }

    /// Profiles the raw files into `raw_profile.csv`.
    pub fn profile(&self) -> Result<TextTable> {
        info!("Stage: profile");
        write_profile(&self.config.raw_dir, &self.config.raw_profile_path())
    }

    /// Generates the data dictionary from the raw profile.
    pub fn dictionary(&self) -> Result<PathBuf> {
        info!("Stage: dictionary");
        let out = self.config.data_dictionary_path();
        write_dictionary(&self.config.raw_profile_path(), &out)?;
        Ok(out)
    }

    /// Writes interim parquet with normalized column names.
    pub fn standardize(&self) -> Result<Vec<PathBuf>> {
        info!("Stage: standardize");
        standardize(&self.config.raw_dir, &self.config.interim_dir)
    }

    /// Writes typed clean parquet from the interim tables.
    pub fn enforce(&self) -> Result<Vec<PathBuf>> {
        info!("Stage: enforce");
        enforce(&self.config.interim_dir, &self.config.clean_dir)
    }

    /// Writes the cast-rule and heuristic dtype audits.
    pub fn audit(&self) -> Result<AuditSummary> {
        info!("Stage: audit");
        write_audits(
            &self.config.clean_dir,
            &self.config.schema_audit_path(),
            &self.config.dtypes_full_path(),
            &self.config.dtypes_flags_path(),
        )
    }

    /// Evaluates the contract over the clean tables and writes the report.
    ///
    /// The report is written before it is returned, whatever its fail count.
    pub fn validate(&self) -> Result<ValidationReport> {
        info!("Stage: validate");
        let report = validate_clean(&self.contract, &self.config.clean_dir)?;
        write_report_csv(&report, &self.config.contract_report_path())?;
        if self.write_json {
            write_report_json(&report, &self.config.contract_json_path())?;
        }
        Ok(report)
    }

    /// Runs sanity, profile, dictionary, standardize, enforce, audit and
    /// validate in order.
    pub fn run(&self) -> Result<ValidationReport> {
        self.sanity()?;
        self.profile()?;
        self.dictionary()?;
        self.standardize()?;
        self.enforce()?;
        self.audit()?;
        self.validate()
    }
}
