//! Shared helper functions for CLI commands

use std::path::Path;

use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::tables::ReferenceTables;
use crate::core::Config;
use crate::design::DesignParameters;

/// Load the active reference tables: `--tables`/env first, then the
/// config file's path, then the built-ins
pub fn load_tables(global: &GlobalOpts) -> Result<ReferenceTables> {
    let configured = global
        .tables
        .clone()
        .or_else(|| Config::load().tables);

    match configured {
        Some(path) => ReferenceTables::from_path(&path).into_diagnostic(),
        None => ReferenceTables::builtin().into_diagnostic(),
    }
}

/// Load a part description from disk
pub fn load_part(path: &Path) -> Result<DesignParameters> {
    DesignParameters::from_path(path).into_diagnostic()
}

/// Format a monetary value for display
pub fn fmt_money(value: f64) -> String {
    format!("${:.2}", value)
}

/// Format a mass for display
pub fn fmt_mass(kg: f64) -> String {
    format!("{:.3} kg", kg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_money_rounds_to_cents() {
        assert_eq!(fmt_money(12.345), "$12.35");
        assert_eq!(fmt_money(0.0), "$0.00");
    }

    #[test]
    fn test_fmt_mass() {
        assert_eq!(fmt_mass(1.08), "1.080 kg");
    }
}
