//! tabularcompare - compare two tabular datasets on join keys
//!
//! Loads tables from CSV, JSON, or Excel files (or takes them in-memory),
//! joins them on a set of key columns, and reports rows/columns unique to
//! each side plus a "diverging subset" annotating changed cells as
//! `{old} --> {new}`. Results serialize to text, HTML, and xlsx reports.

pub mod compare;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;

pub use compare::Comparison;
pub use config::CompareOptions;
pub use error::CompareError;
pub use model::Table;
