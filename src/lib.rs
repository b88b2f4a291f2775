//! dfmkit: DFM validation and cost estimation toolkit
//!
//! Validates mechanical part designs, kept as plain text YAML files,
//! against manufacturability rules and estimates production cost across
//! competing manufacturing processes.

pub mod cli;
pub mod core;
pub mod cost;
pub mod design;
pub mod dfm;
pub mod library;
