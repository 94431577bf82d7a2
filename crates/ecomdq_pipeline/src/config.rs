//! Pipeline directory configuration.

use crate::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root of the data directories when nothing else is configured.
pub const DEFAULT_DATA_DIR: &str = "data";
/// Default report directory.
pub const DEFAULT_REPORTS_DIR: &str = "reports";
/// Default documentation directory.
pub const DEFAULT_DOCS_DIR: &str = "docs";

/// Directories the pipeline stages read from and write to.
///
/// Raw CSVs live in `raw_dir`, standardized parquet in `interim_dir`, typed
/// parquet in `clean_dir`. CSV reports go to `reports_dir` and the data
/// dictionary to `docs_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Raw CSV inputs
    pub raw_dir: PathBuf,

    /// Standardized, all-text parquet tables
    pub interim_dir: PathBuf,

    /// Typed parquet tables the contract is evaluated against
    pub clean_dir: PathBuf,

    /// CSV and JSON reports
    pub reports_dir: PathBuf,

    /// Generated documentation
    pub docs_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let data = Path::new(DEFAULT_DATA_DIR);
        Self {
            raw_dir: data.join("raw"),
            interim_dir: data.join("interim"),
            clean_dir: data.join("clean"),
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            docs_dir: PathBuf::from(DEFAULT_DOCS_DIR),
        }
    }
}

impl PipelineConfig {
    /// Creates a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Reads the configuration from `ECOM_*` environment variables.
    ///
    /// `ECOM_DATA_DIR` sets the root for the raw, interim and clean
    /// directories; each of `ECOM_RAW_DIR`, `ECOM_INTERIM_DIR`,
    /// `ECOM_CLEAN_DIR`, `ECOM_REPORTS_DIR` and `ECOM_DOCS_DIR` overrides a
    /// single directory.
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();
        if let Some(dir) = lookup("ECOM_DATA_DIR") {
            builder = builder.data_dir(dir);
        }
        if let Some(dir) = lookup("ECOM_RAW_DIR") {
            builder = builder.raw_dir(dir);
        }
        if let Some(dir) = lookup("ECOM_INTERIM_DIR") {
            builder = builder.interim_dir(dir);
        }
        if let Some(dir) = lookup("ECOM_CLEAN_DIR") {
            builder = builder.clean_dir(dir);
        }
        if let Some(dir) = lookup("ECOM_REPORTS_DIR") {
            builder = builder.reports_dir(dir);
        }
        if let Some(dir) = lookup("ECOM_DOCS_DIR") {
            builder = builder.docs_dir(dir);
        }
        builder.build()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let dirs = [
            ("raw_dir", &self.raw_dir),
            ("interim_dir", &self.interim_dir),
            ("clean_dir", &self.clean_dir),
            ("reports_dir", &self.reports_dir),
            ("docs_dir", &self.docs_dir),
        ];
        for (name, dir) in dirs {
            if dir.as_os_str().is_empty() {
                return Err(PipelineError::config(format!("{name} cannot be empty")));
            }
        }
        Ok(())
    }

    /// Path of the raw profile report.
    pub fn raw_profile_path(&self) -> PathBuf {
        self.reports_dir.join("raw_profile.csv")
    }

    /// Path of the generated data dictionary.
    pub fn data_dictionary_path(&self) -> PathBuf {
        self.docs_dir.join("data_dictionary.md")
    }

    /// Path of the cast-rule audit report.
    pub fn schema_audit_path(&self) -> PathBuf {
        self.reports_dir.join("clean_schema_audit.csv")
    }

    /// Path of the full heuristic dtype report.
    pub fn dtypes_full_path(&self) -> PathBuf {
        self.reports_dir.join("clean_dtypes_full.csv")
    }

    /// Path of the flagged-columns heuristic dtype report.
    pub fn dtypes_flags_path(&self) -> PathBuf {
        self.reports_dir.join("clean_dtypes_flags.csv")
    }

    /// Path of the contract validation report.
    pub fn contract_report_path(&self) -> PathBuf {
        self.reports_dir.join("clean_contract_audit.csv")
    }

    /// Path of the JSON copy of the contract validation report.
    pub fn contract_json_path(&self) -> PathBuf {
        self.reports_dir.join("clean_contract_audit.json")
    }
}

/// Builder for `PipelineConfig`.
///
/// Unset directories fall back to the data root (`data` unless
/// [`data_dir`](Self::data_dir) is called) or to the default report and
/// docs directories.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    data_dir: Option<PathBuf>,
    raw_dir: Option<PathBuf>,
    interim_dir: Option<PathBuf>,
    clean_dir: Option<PathBuf>,
    reports_dir: Option<PathBuf>,
    docs_dir: Option<PathBuf>,
}

impl PipelineConfigBuilder {
    /// Sets the root of the raw, interim and clean directories.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Sets the raw CSV directory.
    pub fn raw_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.raw_dir = Some(dir.into());
        self
    }

    /// Sets the interim parquet directory.
    pub fn interim_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.interim_dir = Some(dir.into());
        self
    }

    /// Sets the clean parquet directory.
    pub fn clean_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.clean_dir = Some(dir.into());
        self
    }

    /// Sets the report directory.
    pub fn reports_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.reports_dir = Some(dir.into());
        self
    }

    /// Sets the documentation directory.
    pub fn docs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.docs_dir = Some(dir.into());
        self
    }

    /// Builds the `PipelineConfig`.
    ///
    /// Returns an error if any directory ends up empty.
    pub fn build(self) -> Result<PipelineConfig, PipelineError> {
        let data = self
            .data_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let config = PipelineConfig {
            raw_dir: self.raw_dir.unwrap_or_else(|| data.join("raw")),
            interim_dir: self.interim_dir.unwrap_or_else(|| data.join("interim")),
            clean_dir: self.clean_dir.unwrap_or_else(|| data.join("clean")),
            reports_dir: self
                .reports_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORTS_DIR)),
            docs_dir: self
                .docs_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCS_DIR)),
        };

        config.validate()?;
        Ok(config)
    }
}
