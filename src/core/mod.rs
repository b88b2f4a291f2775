//! Core module - configuration and reference data

pub mod config;
pub mod tables;

pub use config::Config;
pub use tables::{
    Compatibility, DfmLimitTable, DfmLimits, MaterialClass, MaterialProfile, ProcessTable,
    ReferenceTables, TableError,
};
