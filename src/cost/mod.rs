//! Manufacturing cost estimation and process comparison
//!
//! One cost model per process (see [`models`]); every model emits the
//! same four-part breakdown so estimates stay comparable. The comparator
//! prices every applicable process at the requested quantity and ranks
//! them with a deterministic ordering: unit cost, then minimum lead
//! time, then process name.
//!
//! The core keeps full precision throughout; money is rounded only at
//! the display layer, so the breakdown always sums to the unit cost.

pub mod models;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::tables::{MaterialClass, ReferenceTables};
use crate::design::geometry::GeometryError;
use crate::design::{DesignParameters, GeometryKind, Material, NormalizedGeometry, Process};

/// Per-unit cost breakdown, USD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub material: f64,
    pub labor: f64,
    pub tooling_amortized: f64,
    pub overhead: f64,
}

impl CostBreakdown {
    pub fn sum(&self) -> f64 {
        self.material + self.labor + self.tooling_amortized + self.overhead
    }

    /// Scale every component by the same factor (quantity discounts),
    /// keeping the sum invariant intact
    pub(crate) fn scaled(&self, factor: f64) -> Self {
        Self {
            material: self.material * factor,
            labor: self.labor * factor,
            tooling_amortized: self.tooling_amortized * factor,
            overhead: self.overhead * factor,
        }
    }
}

/// Cost estimate for one process at one quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessCostEstimate {
    pub process: Process,
    pub unit_cost: f64,
    pub total_cost: f64,
    pub breakdown: CostBreakdown,
    /// Calendar range, e.g. "5-7"
    pub lead_time_days: String,
    pub mass_kg: f64,
    pub best_for: String,
    /// True on the cheapest entry of a comparison
    #[serde(default)]
    pub recommended: bool,
}

/// Comparison of every applicable process for one design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostComparison {
    /// Estimate for the design's own (or explicitly requested) process
    pub current_process: ProcessCostEstimate,
    /// All applicable processes, ascending by unit cost
    pub process_comparison: Vec<ProcessCostEstimate>,
    pub quantity: u32,
}

/// Errors raised by cost estimation
#[derive(Debug, Error)]
pub enum CostError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("no cost profile for material {0}; pricing cannot be defaulted")]
    UnknownMaterial(Material),

    #[error("no manufacturing process is compatible with {0}")]
    NoCompatibleProcess(Material),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Labor multiplier for part complexity: geometry setup factor times a
/// per-feature surcharge
pub(crate) fn complexity_factor(kind: GeometryKind, feature_count: usize) -> f64 {
    let setup = match kind {
        GeometryKind::Box => 1.0,
        GeometryKind::Cylinder => 0.9,
        GeometryKind::Bracket => 1.15,
        GeometryKind::Gear => 1.4,
    };
    setup * (1.0 + 0.05 * feature_count as f64)
}

fn fits_build_volume(geom: &NormalizedGeometry, max_build_mm: [f64; 3]) -> bool {
    let mut dims = [geom.bbox.length, geom.bbox.width, geom.bbox.height];
    let mut build = max_build_mm;
    dims.sort_by(f64::total_cmp);
    build.sort_by(f64::total_cmp);
    dims.iter().zip(build.iter()).all(|(d, b)| d <= b)
}

/// Whether a process can make this part at all: compatibility matrix
/// first, then per-process hard geometric constraints
fn applicable(
    process: Process,
    material: Material,
    class: MaterialClass,
    geom: &NormalizedGeometry,
    tables: &ReferenceTables,
) -> bool {
    if !tables.compatibility.allows(process, material) {
        return false;
    }
    match process {
        Process::CncMilling => true,
        Process::Printing3d => fits_build_volume(geom, tables.processes.printing_3d.max_build_mm),
        Process::InjectionMolding => true,
        Process::SheetMetal => {
            matches!(geom.kind, GeometryKind::Box | GeometryKind::Bracket)
                && geom.wall_mm <= tables.processes.sheet_metal.max_wall_mm
                && class == MaterialClass::Metal
        }
    }
}

/// Estimate cost across every applicable process and rank them
///
/// `process_override` stands in for the design's own process when given
/// (the CLI's `--process` flag). Pure and side-effect-free.
pub fn estimate(
    params: &DesignParameters,
    geom: &NormalizedGeometry,
    quantity: u32,
    process_override: Option<Process>,
    tables: &ReferenceTables,
) -> Result<CostComparison, CostError> {
    if quantity == 0 {
        return Err(CostError::InvalidQuantity);
    }
    if geom.bbox.is_degenerate() {
        return Err(GeometryError::DegenerateBoundingBox {
            volume: geom.bbox.volume,
        }
        .into());
    }

    let material = params.material();
    let profile = tables
        .material(material)
        .ok_or(CostError::UnknownMaterial(material))?;

    let ctx = models::CostContext {
        geom,
        price_per_kg: profile.price_per_kg,
        complexity: complexity_factor(geom.kind, params.features.len()),
        quantity,
        tables,
    };

    let mut estimates: Vec<ProcessCostEstimate> = Process::all()
        .iter()
        .copied()
        .filter(|p| applicable(*p, material, profile.class, geom, tables))
        .map(|p| models::estimate_for(p, &ctx))
        .collect();

    if estimates.is_empty() {
        return Err(CostError::NoCompatibleProcess(material));
    }

    estimates.sort_by(|a, b| {
        a.unit_cost
            .total_cmp(&b.unit_cost)
            .then_with(|| {
                tables.processes.lead_time_days(a.process)[0]
                    .cmp(&tables.processes.lead_time_days(b.process)[0])
            })
            .then_with(|| a.process.as_str().cmp(b.process.as_str()))
    });
    estimates[0].recommended = true;

    let requested = process_override.unwrap_or_else(|| params.manufacturing_process());
    let current_process = if estimates.iter().any(|e| e.process == requested) {
        let mut current = models::estimate_for(requested, &ctx);
        current.recommended = estimates[0].process == requested;
        current
    } else {
        // The design's own process cannot make the part; the
        // recommendation stands in
        estimates[0].clone()
    };

    Ok(CostComparison {
        current_process,
        process_comparison: estimates,
        quantity,
    })
}
