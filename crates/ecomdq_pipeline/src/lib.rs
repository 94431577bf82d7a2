//! # E-commerce Data Quality Pipeline
//!
//! Batch stages that take the raw Olist CSV exports to typed parquet tables
//! and check them:
//!
//! 1. **sanity**: every raw file exists and parses
//! 2. **profile**: per-column row and null counts (`raw_profile.csv`)
//! 3. **dictionary**: markdown data dictionary from the profile
//! 4. **standardize**: normalized column names, all-text interim parquet
//! 5. **enforce**: renames and type casts into clean parquet
//! 6. **audit**: cast-rule and name-heuristic type audits
//! 7. **validate**: schema contract evaluation over the clean tables
//!
//! ## Example
//!
//! ```no_run
//! use ecomdq_pipeline::{Pipeline, PipelineConfig};
//!
//! # fn main() -> Result<(), ecomdq_pipeline::PipelineError> {
//! let config = PipelineConfig::from_env()?;
//! let report = Pipeline::new(config).run()?;
//! println!("contract failures: {}", report.fail_count);
//! # Ok(())
//! # }
//! ```

pub mod audit;
mod config;
pub mod dictionary;
pub mod enforce;
mod error;
pub mod io;
mod pipeline;
pub mod profile;
pub mod report;
pub mod sanity;
pub mod skeleton;
pub mod standardize;
pub mod tables;

pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use error::{PipelineError, Result};
pub use pipeline::Pipeline;
