//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs,
    components::ComponentsCommands,
    cost::CostArgs,
    inspect::InspectArgs,
    tables::TablesCommands,
    validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "dfmkit")]
#[command(author, version, about = "DFM validation and manufacturing cost estimation")]
#[command(
    long_about = "Validate mechanical part designs (plain-text YAML files) against \
manufacturability rules and estimate production cost across competing processes."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Replacement reference-tables file (materials, rates, limits,
    /// compatibility in one YAML document)
    #[arg(long, global = true, env = "DFMKIT_TABLES")]
    pub tables: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate part files against DFM rules
    Validate(ValidateArgs),

    /// Estimate manufacturing cost and compare processes
    Cost(CostArgs),

    /// Show the normalized geometry of a part file
    Inspect(InspectArgs),

    /// Standard component lookup (motors, bolts, bearings, connectors)
    #[command(subcommand)]
    Components(ComponentsCommands),

    /// Show the active reference tables
    #[command(subcommand)]
    Tables(TablesCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically pick based on the command
    #[default]
    Auto,
    /// Human-readable tables
    Table,
    /// YAML (full fidelity)
    Yaml,
    /// JSON (for programming)
    Json,
    /// CSV (for spreadsheets)
    Csv,
    /// Markdown
    Md,
}
