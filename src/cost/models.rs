//! Per-process cost models
//!
//! Each model consumes the same context and emits the uniform four-part
//! breakdown. Process time is driven by the part volume (and for sheet
//! metal, the cut perimeter); fixed tooling is amortized over the order
//! quantity.

use crate::core::tables::ReferenceTables;
use crate::cost::{CostBreakdown, ProcessCostEstimate};
use crate::design::{GeometryKind, NormalizedGeometry, Process};

/// Shared inputs for every process model
pub(crate) struct CostContext<'a> {
    pub geom: &'a NormalizedGeometry,
    /// Stock price for the part's material, USD/kg
    pub price_per_kg: f64,
    /// Labor multiplier from geometry and feature count
    pub complexity: f64,
    pub quantity: u32,
    pub tables: &'a ReferenceTables,
}

/// Price one process for one design
pub(crate) fn estimate_for(process: Process, ctx: &CostContext) -> ProcessCostEstimate {
    let breakdown = match process {
        Process::CncMilling => cnc_milling(ctx),
        Process::Printing3d => printing_3d(ctx),
        Process::InjectionMolding => injection_molding(ctx),
        Process::SheetMetal => sheet_metal(ctx),
    };

    let unit_cost = breakdown.sum();
    let lead = ctx.tables.processes.lead_time_days(process);

    ProcessCostEstimate {
        process,
        unit_cost,
        total_cost: unit_cost * ctx.quantity as f64,
        breakdown,
        lead_time_days: format!("{}-{}", lead[0], lead[1]),
        mass_kg: ctx.geom.mass_kg,
        best_for: ctx.tables.processes.best_for(process).to_string(),
        recommended: false,
    }
}

/// Volume discount ladder for machined parts
fn cnc_quantity_discount(quantity: u32) -> f64 {
    if quantity >= 1000 {
        0.70
    } else if quantity >= 500 {
        0.80
    } else if quantity >= 100 {
        0.90
    } else {
        1.0
    }
}

fn cnc_milling(ctx: &CostContext) -> CostBreakdown {
    let rates = &ctx.tables.processes.cnc_milling;

    let material = ctx.geom.mass_kg * ctx.price_per_kg;
    let minutes = rates.minutes_per_cm3 * ctx.geom.volume_cm3() + rates.setup_minutes;
    let labor = minutes / 60.0 * rates.labor_rate_per_hr * ctx.complexity;
    let tooling_amortized = rates.tooling_base / ctx.quantity as f64;
    let overhead = rates.overhead_rate * (material + labor);

    CostBreakdown {
        material,
        labor,
        tooling_amortized,
        overhead,
    }
    .scaled(cnc_quantity_discount(ctx.quantity))
}

fn printing_3d(ctx: &CostContext) -> CostBreakdown {
    let rates = &ctx.tables.processes.printing_3d;

    // Support structures consume extra filament
    let material = ctx.geom.mass_kg * ctx.price_per_kg * rates.support_factor;
    let minutes = rates.minutes_per_cm3 * ctx.geom.volume_cm3();
    let labor = minutes / 60.0 * rates.machine_rate_per_hr * ctx.complexity;
    let overhead = rates.overhead_rate * (material + labor);

    CostBreakdown {
        material,
        labor,
        tooling_amortized: 0.0,
        overhead,
    }
}

fn injection_molding(ctx: &CostContext) -> CostBreakdown {
    let rates = &ctx.tables.processes.injection_molding;

    let material = ctx.geom.mass_kg * ctx.price_per_kg;
    let parts_per_hour = 3600.0 / rates.cycle_seconds;
    let labor = rates.labor_rate_per_hr / parts_per_hour * ctx.complexity;
    let tooling_amortized = rates.mold_cost / ctx.quantity as f64;
    let overhead = rates.overhead_rate * (material + labor);

    CostBreakdown {
        material,
        labor,
        tooling_amortized,
        overhead,
    }
}

fn sheet_metal(ctx: &CostContext) -> CostBreakdown {
    let rates = &ctx.tables.processes.sheet_metal;
    let bbox = &ctx.geom.bbox;

    let material = ctx.geom.mass_kg * ctx.price_per_kg;
    let perimeter_cm = 2.0 * (bbox.length + bbox.width) / 10.0;
    let bends = match ctx.geom.kind {
        GeometryKind::Box => 4.0,
        GeometryKind::Bracket => 3.0,
        // Exclusion rules keep other shapes out of this model
        _ => 0.0,
    };
    let minutes = rates.cut_minutes_per_cm * perimeter_cm + rates.bend_minutes * bends;
    let labor = minutes / 60.0 * rates.labor_rate_per_hr * ctx.complexity;
    let tooling_amortized = rates.tooling_base / ctx.quantity as f64;
    let overhead = rates.overhead_rate * (material + labor);

    CostBreakdown {
        material,
        labor,
        tooling_amortized,
        overhead,
    }
}
