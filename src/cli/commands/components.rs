//! `dfmkit components` command - standard component lookup

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::design::MountingPattern;
use crate::library::{ComponentHit, ComponentLibrary, CATEGORIES};

#[derive(Subcommand, Debug)]
pub enum ComponentsCommands {
    /// Search components by name
    Search(SearchArgs),

    /// List all components in a category
    List(ListArgs),

    /// List component categories
    Categories,

    /// Print a mounting-pattern snippet for a NEMA motor face
    Pattern(PatternArgs),
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Name fragment to search for (e.g. "nema17", "m3", "608")
    pub query: String,

    /// Restrict to one category
    #[arg(long, short = 'c')]
    pub category: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Category to list (nema_motors, metric_bolts, bearings, connectors)
    pub category: String,
}

#[derive(clap::Args, Debug)]
pub struct PatternArgs {
    /// Motor name, e.g. NEMA17
    pub motor: String,

    /// Base plate length the pattern is centered on, mm
    #[arg(long, default_value_t = 100.0)]
    pub base_length: f64,

    /// Base plate width the pattern is centered on, mm
    #[arg(long, default_value_t = 80.0)]
    pub base_width: f64,
}

pub fn run(cmd: ComponentsCommands, global: &GlobalOpts) -> Result<()> {
    let library = ComponentLibrary::builtin().into_diagnostic()?;

    match cmd {
        ComponentsCommands::Search(args) => {
            let hits = library.search(&args.query, args.category.as_deref());
            print_hits(&hits, global)
        }
        ComponentsCommands::List(args) => {
            let hits = library.category(&args.category).into_diagnostic()?;
            print_hits(&hits, global)
        }
        ComponentsCommands::Categories => {
            for category in CATEGORIES {
                println!("{}", category);
            }
            Ok(())
        }
        ComponentsCommands::Pattern(args) => {
            let motor = library.motor(&args.motor).ok_or_else(|| {
                miette::miette!("unknown motor: {} (try `dfmkit components list nema_motors`)", args.motor)
            })?;
            let pattern = library.mounting_pattern_for(motor, args.base_length, args.base_width);
            print_pattern(&pattern)
        }
    }
}

fn print_hits(hits: &[ComponentHit], global: &GlobalOpts) -> Result<()> {
    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(hits).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&hits).into_diagnostic()?);
            return Ok(());
        }
        _ => {}
    }

    if hits.is_empty() {
        println!("{}", style("no components found").dim());
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Category", "Name", "Details"]);
    for hit in hits {
        builder.push_record([hit.category, hit.name.as_str(), hit.summary.as_str()]);
    }
    println!("{}", builder.build().with(Style::sharp()).to_string());

    if !global.quiet {
        println!("{} component(s) found", style(hits.len()).cyan());
    }
    Ok(())
}

/// Print a ready-to-paste part-file snippet
fn print_pattern(pattern: &MountingPattern) -> Result<()> {
    #[derive(Serialize)]
    struct Snippet<'a> {
        mounting_pattern: &'a MountingPattern,
    }

    let yaml = serde_yml::to_string(&Snippet {
        mounting_pattern: pattern,
    })
    .into_diagnostic()?;
    print!("{}", yaml);
    Ok(())
}
