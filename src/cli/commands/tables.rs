//! `dfmkit tables` command - show the active reference tables

use clap::Subcommand;
use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::load_tables;
use crate::cli::GlobalOpts;
use crate::core::tables::MaterialClass;
use crate::design::Process;

#[derive(Subcommand, Debug)]
pub enum TablesCommands {
    /// Material density and pricing
    Materials,

    /// Process rates, capability floors, and lead times
    Processes,

    /// Material-process compatibility matrix
    Compat,
}

pub fn run(cmd: TablesCommands, global: &GlobalOpts) -> Result<()> {
    let tables = load_tables(global)?;

    match cmd {
        TablesCommands::Materials => {
            let mut builder = Builder::default();
            builder.push_record(["Material", "Density (g/cm3)", "Price ($/kg)", "Class"]);
            for (material, profile) in &tables.materials {
                builder.push_record([
                    material.to_string(),
                    format!("{:.2}", profile.density_g_cm3),
                    format!("{:.2}", profile.price_per_kg),
                    match profile.class {
                        MaterialClass::Metal => "metal".to_string(),
                        MaterialClass::Thermoplastic => "thermoplastic".to_string(),
                    },
                ]);
            }
            println!("{}", builder.build().with(Style::sharp()).to_string());
        }
        TablesCommands::Processes => {
            let mut builder = Builder::default();
            builder.push_record(["Process", "Lead time", "Capability (mm)", "Best for"]);
            for process in Process::all() {
                let lead = tables.processes.lead_time_days(*process);
                builder.push_record([
                    process.to_string(),
                    format!("{}-{} days", lead[0], lead[1]),
                    format!("\u{b1}{}", tables.processes.tolerance_floor(*process)),
                    tables.processes.best_for(*process).to_string(),
                ]);
            }
            println!("{}", builder.build().with(Style::sharp()).to_string());
        }
        TablesCommands::Compat => {
            let mut builder = Builder::default();
            builder.push_record(["Process", "Compatible materials"]);
            for process in Process::all() {
                let materials: Vec<String> = crate::design::Material::all()
                    .iter()
                    .filter(|m| tables.compatibility.allows(*process, **m))
                    .map(|m| m.to_string())
                    .collect();
                builder.push_record([process.to_string(), materials.join(", ")]);
            }
            println!("{}", builder.build().with(Style::sharp()).to_string());
        }
    }

    Ok(())
}
