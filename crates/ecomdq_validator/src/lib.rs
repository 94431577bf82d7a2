//! # E-commerce Data Quality Validator
//!
//! Evaluation engine for schema contracts. This crate checks loaded tables
//! against a [`SchemaContract`](ecomdq_core::SchemaContract):
//!
//! - Type-family classification of Arrow storage types
//! - Required columns, type families, nullability, allowed values and bounds
//! - Primary key uniqueness
//! - Foreign key integrity across tables, with lazily loaded, cached targets
//!
//! ## Example
//!
//! ```no_run
//! use ecomdq_core::olist_contract;
//! use ecomdq_validator::{ContractEvaluator, ParquetDirSource};
//!
//! let contract = olist_contract();
//! let report = ContractEvaluator::new(&contract, ParquetDirSource::new("data/clean"))
//!     .expect("built-in contract is well formed")
//!     .run();
//!
//! if report.passed() {
//!     println!("Contract satisfied");
//! } else {
//!     for failure in report.failures() {
//!         println!("{} {} {}", failure.table, failure.kind, failure.details);
//!     }
//! }
//! ```

mod cache;
mod classifier;
mod columns;
mod dataset;
mod engine;
mod error;
pub mod keys;
mod source;

pub use cache::*;
pub use classifier::*;
pub use columns::*;
pub use dataset::*;
pub use engine::*;
pub use error::*;
pub use keys::{KeyTuple, distinct_non_null, duplicate_rows, orphans};
pub use source::*;
