//! `dfmkit inspect` command - show normalized geometry

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{fmt_mass, load_part, load_tables};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::design::geometry::normalize;

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Part file to inspect
    pub part: PathBuf,
}

pub fn run(args: InspectArgs, global: &GlobalOpts) -> Result<()> {
    let tables = load_tables(global)?;
    let params = load_part(&args.part)?;
    let geom = normalize(&params, &tables).into_diagnostic()?;

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&geom).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&geom).into_diagnostic()?);
            return Ok(());
        }
        _ => {}
    }

    println!(
        "{} {}  ({})",
        style("\u{2192}").blue(),
        style(args.part.display()).bold(),
        geom.kind
    );
    println!(
        "  bounding box: {:.1} x {:.1} x {:.1} mm",
        geom.bbox.length, geom.bbox.width, geom.bbox.height
    );
    println!("  volume:       {:.1} cm\u{b3}", geom.volume_cm3());
    println!(
        "  mass:         {} ({})",
        fmt_mass(geom.mass_kg),
        params.material()
    );
    println!("  wall:         {:.1} mm", geom.wall_mm);
    if let Some(holes) = &geom.holes {
        println!(
            "  holes:        {} x \u{2300}{:.1} mm",
            holes.positions.len(),
            holes.diameter
        );
    }
    println!("  process:      {}", params.manufacturing_process());

    if geom.defaulted.is_empty() {
        println!("  {}", style("all fields specified").green());
    } else {
        println!(
            "  {} {}",
            style("defaulted:").yellow(),
            geom.defaulted.join(", ")
        );
    }

    Ok(())
}
