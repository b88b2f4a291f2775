//! `dfmkit cost` command - cost estimation and process comparison

use chrono::Local;
use clap::ValueEnum;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use super::write_output;
use crate::cli::helpers::{fmt_mass, fmt_money, load_part, load_tables};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::cost::{self, CostComparison, ProcessCostEstimate};
use crate::design::geometry::normalize;
use crate::design::{DesignParameters, Process};

#[derive(clap::Args, Debug)]
pub struct CostArgs {
    /// Part file to estimate
    pub part: PathBuf,

    /// Order quantity (default from config, else 100)
    #[arg(long, short = 'n')]
    pub quantity: Option<u32>,

    /// Price a specific process instead of the design's own
    #[arg(long)]
    pub process: Option<ProcessArg>,

    /// Output a markdown report to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Process selection on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum ProcessArg {
    CncMilling,
    #[value(name = "3d_printing")]
    Printing3d,
    InjectionMolding,
    SheetMetal,
}

impl From<ProcessArg> for Process {
    fn from(arg: ProcessArg) -> Self {
        match arg {
            ProcessArg::CncMilling => Process::CncMilling,
            ProcessArg::Printing3d => Process::Printing3d,
            ProcessArg::InjectionMolding => Process::InjectionMolding,
            ProcessArg::SheetMetal => Process::SheetMetal,
        }
    }
}

pub fn run(args: CostArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let tables = load_tables(global)?;
    let params = load_part(&args.part)?;
    let geom = normalize(&params, &tables).into_diagnostic()?;

    let quantity = args.quantity.unwrap_or_else(|| config.default_quantity());
    let comparison = cost::estimate(
        &params,
        &geom,
        quantity,
        args.process.map(Into::into),
        &tables,
    )
    .into_diagnostic()?;

    if args.output.is_some() || global.format == OutputFormat::Md {
        let report = render_markdown(&args.part, &params, &comparison);
        return write_output(&report, args.output);
    }

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&comparison).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&comparison).into_diagnostic()?);
        }
        OutputFormat::Csv => write_csv(&comparison)?,
        _ => print_table(&args.part, &params, &comparison, global.quiet),
    }

    Ok(())
}

fn comparison_table(comparison: &CostComparison) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "Process",
        "Unit cost",
        "Total cost",
        "Material",
        "Labor",
        "Tooling",
        "Overhead",
        "Lead time",
        "Recommended",
    ]);

    for est in &comparison.process_comparison {
        builder.push_record([
            est.process.to_string(),
            fmt_money(est.unit_cost),
            fmt_money(est.total_cost),
            fmt_money(est.breakdown.material),
            fmt_money(est.breakdown.labor),
            fmt_money(est.breakdown.tooling_amortized),
            fmt_money(est.breakdown.overhead),
            format!("{} days", est.lead_time_days),
            if est.recommended { "yes" } else { "-" }.to_string(),
        ]);
    }

    builder.build().with(Style::sharp()).to_string()
}

fn print_table(
    part: &std::path::Path,
    params: &DesignParameters,
    comparison: &CostComparison,
    quiet: bool,
) {
    let current = &comparison.current_process;

    if !quiet {
        println!(
            "{} {}  ({}, {} pcs, {})",
            style("\u{2192}").blue(),
            style(part.display()).bold(),
            params.material(),
            comparison.quantity,
            fmt_mass(current.mass_kg)
        );
        println!(
            "  current process {}: {} per unit, {} total",
            style(current.process).cyan(),
            style(fmt_money(current.unit_cost)).bold(),
            fmt_money(current.total_cost)
        );
        let recommended = &comparison.process_comparison[0];
        if recommended.process != current.process {
            println!(
                "  recommended     {}: {} per unit ({})",
                style(recommended.process).green(),
                style(fmt_money(recommended.unit_cost)).bold(),
                recommended.best_for
            );
        }
        println!();
    }

    println!("{}", comparison_table(comparison));
}

fn write_csv(comparison: &CostComparison) -> Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer
        .write_record([
            "process",
            "unit_cost",
            "total_cost",
            "material",
            "labor",
            "tooling_amortized",
            "overhead",
            "lead_time_days",
            "recommended",
        ])
        .into_diagnostic()?;

    for est in &comparison.process_comparison {
        writer
            .write_record([
                est.process.to_string(),
                format!("{:.2}", est.unit_cost),
                format!("{:.2}", est.total_cost),
                format!("{:.2}", est.breakdown.material),
                format!("{:.2}", est.breakdown.labor),
                format!("{:.2}", est.breakdown.tooling_amortized),
                format!("{:.2}", est.breakdown.overhead),
                est.lead_time_days.clone(),
                est.recommended.to_string(),
            ])
            .into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;
    Ok(())
}

fn estimate_lines(est: &ProcessCostEstimate) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "- Unit cost: {} (material {}, labor {}, tooling {}, overhead {})\n",
        fmt_money(est.unit_cost),
        fmt_money(est.breakdown.material),
        fmt_money(est.breakdown.labor),
        fmt_money(est.breakdown.tooling_amortized),
        fmt_money(est.breakdown.overhead)
    ));
    out.push_str(&format!("- Total cost: {}\n", fmt_money(est.total_cost)));
    out.push_str(&format!("- Lead time: {} days\n", est.lead_time_days));
    out.push_str(&format!("- Best for: {}\n", est.best_for));
    out
}

fn render_markdown(
    part: &std::path::Path,
    params: &DesignParameters,
    comparison: &CostComparison,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Cost estimate: {}\n\n", part.display()));
    out.push_str(&format!(
        "Generated: {}\n\n",
        Local::now().format("%Y-%m-%d %H:%M")
    ));
    out.push_str(&format!("Material: {}\n", params.material()));
    out.push_str(&format!("Quantity: {}\n", comparison.quantity));
    out.push_str(&format!(
        "Part mass: {}\n\n",
        fmt_mass(comparison.current_process.mass_kg)
    ));

    out.push_str(&format!(
        "## Current process: {}\n\n",
        comparison.current_process.process
    ));
    out.push_str(&estimate_lines(&comparison.current_process));
    out.push('\n');

    out.push_str("## Process comparison\n\n");
    let mut builder = Builder::default();
    builder.push_record(["Process", "Unit cost", "Total cost", "Lead time", "Recommended"]);
    for est in &comparison.process_comparison {
        builder.push_record([
            est.process.to_string(),
            fmt_money(est.unit_cost),
            fmt_money(est.total_cost),
            format!("{} days", est.lead_time_days),
            if est.recommended { "yes" } else { "-" }.to_string(),
        ]);
    }
    out.push_str(&builder.build().with(Style::markdown()).to_string());
    out.push('\n');
    out
}
