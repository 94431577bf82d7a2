//! # E-commerce Data Quality Core
//!
//! Core data structures for the e-commerce data-quality pipeline.
//!
//! This crate defines the schema contract (the declarative description of the
//! tables a pipeline run must produce) and the report types produced when a
//! contract is evaluated against real data.
//!
//! ## Key Concepts
//!
//! - **SchemaContract**: ordered list of table specifications
//! - **TableSpec**: required columns, per-column expectations, primary key and foreign keys
//! - **ColumnSpec**: type family, nullability, allowed values and numeric bounds
//! - **CheckResult / ValidationReport**: the output of an evaluation run
//!
//! ## Example
//!
//! ```rust
//! use ecomdq_core::{ColumnSpecBuilder, DtypeFamily, SchemaContract, TableSpecBuilder};
//!
//! let contract = SchemaContract::new(
//!     "shop",
//!     vec![
//!         TableSpecBuilder::new("customers.parquet")
//!             .primary_key(["customer_id"])
//!             .column(ColumnSpecBuilder::new("customer_id", DtypeFamily::String).nullable(false).build())
//!             .build(),
//!         TableSpecBuilder::new("orders.parquet")
//!             .primary_key(["order_id"])
//!             .column(ColumnSpecBuilder::new("order_id", DtypeFamily::String).nullable(false).build())
//!             .column(ColumnSpecBuilder::new("customer_id", DtypeFamily::String).build())
//!             .foreign_key(["customer_id"], "customers.parquet", ["customer_id"])
//!             .build(),
//!     ],
//! );
//!
//! assert!(contract.validate_definition().is_empty());
//! ```

pub mod builder;
pub mod contract;
pub mod error;
pub mod olist;
pub mod report;

pub use builder::*;
pub use contract::*;
pub use error::*;
pub use olist::olist_contract;
pub use report::*;
