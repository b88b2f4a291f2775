//! Reference tables: material profiles, process rates, DFM limit
//! profiles, and the material-process compatibility matrix
//!
//! The built-in tables ship inside the binary (embedded from `data/`).
//! A user-supplied tables file replaces them wholesale; there is no
//! per-entry merging, so a custom file is always self-describing.
//! Pricing-relevant lookups never default silently: a missing material
//! profile is an error on the cost path and an explicit fallback (with a
//! suggestion finding) on the validation path.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use serde::Deserialize;
use thiserror::Error;

use crate::design::{Material, Process};

#[derive(Embed)]
#[folder = "data/"]
pub(crate) struct BuiltinData;

/// Material class, used by process applicability checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialClass {
    Metal,
    Thermoplastic,
}

/// Density and stock pricing for one material
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialProfile {
    /// Density, g/cm^3
    pub density_g_cm3: f64,
    /// Stock price, USD/kg
    pub price_per_kg: f64,
    pub class: MaterialClass,
}

/// Generic density profile used when a material has no entry.
/// Geometry-relevant only; pricing must come from a real profile.
const GENERIC_PROFILE: MaterialProfile = MaterialProfile {
    density_g_cm3: 2.70,
    price_per_kg: 0.0,
    class: MaterialClass::Metal,
};

/// CNC milling rates
#[derive(Debug, Clone, Deserialize)]
pub struct CncRates {
    pub labor_rate_per_hr: f64,
    pub overhead_rate: f64,
    pub tooling_base: f64,
    pub minutes_per_cm3: f64,
    pub setup_minutes: f64,
    pub tolerance_floor_mm: f64,
    pub lead_time_days: [u32; 2],
    pub best_for: String,
}

/// FDM printing rates
#[derive(Debug, Clone, Deserialize)]
pub struct PrintingRates {
    pub machine_rate_per_hr: f64,
    pub overhead_rate: f64,
    pub minutes_per_cm3: f64,
    /// Extra material/time multiplier for support structures
    pub support_factor: f64,
    /// Build envelope, mm
    pub max_build_mm: [f64; 3],
    pub tolerance_floor_mm: f64,
    pub lead_time_days: [u32; 2],
    pub best_for: String,
}

/// Injection molding rates
#[derive(Debug, Clone, Deserialize)]
pub struct MoldingRates {
    /// One-time mold cost, amortized over the order quantity
    pub mold_cost: f64,
    pub cycle_seconds: f64,
    pub labor_rate_per_hr: f64,
    pub overhead_rate: f64,
    pub tolerance_floor_mm: f64,
    pub lead_time_days: [u32; 2],
    pub best_for: String,
}

/// Sheet metal fabrication rates
#[derive(Debug, Clone, Deserialize)]
pub struct SheetMetalRates {
    pub labor_rate_per_hr: f64,
    pub overhead_rate: f64,
    pub tooling_base: f64,
    pub cut_minutes_per_cm: f64,
    pub bend_minutes: f64,
    /// Maximum formable wall/sheet thickness, mm
    pub max_wall_mm: f64,
    pub tolerance_floor_mm: f64,
    pub lead_time_days: [u32; 2],
    pub best_for: String,
}

/// Per-process rate table; one named section per process so a custom
/// tables file cannot drop a process without a parse error
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessTable {
    pub cnc_milling: CncRates,
    #[serde(rename = "3d_printing")]
    pub printing_3d: PrintingRates,
    pub injection_molding: MoldingRates,
    pub sheet_metal: SheetMetalRates,
}

impl ProcessTable {
    /// Tightest tolerance the process reliably achieves, mm
    pub fn tolerance_floor(&self, process: Process) -> f64 {
        match process {
            Process::CncMilling => self.cnc_milling.tolerance_floor_mm,
            Process::Printing3d => self.printing_3d.tolerance_floor_mm,
            Process::InjectionMolding => self.injection_molding.tolerance_floor_mm,
            Process::SheetMetal => self.sheet_metal.tolerance_floor_mm,
        }
    }

    /// Lead-time range, days
    pub fn lead_time_days(&self, process: Process) -> [u32; 2] {
        match process {
            Process::CncMilling => self.cnc_milling.lead_time_days,
            Process::Printing3d => self.printing_3d.lead_time_days,
            Process::InjectionMolding => self.injection_molding.lead_time_days,
            Process::SheetMetal => self.sheet_metal.lead_time_days,
        }
    }

    pub fn best_for(&self, process: Process) -> &str {
        match process {
            Process::CncMilling => &self.cnc_milling.best_for,
            Process::Printing3d => &self.printing_3d.best_for,
            Process::InjectionMolding => &self.injection_molding.best_for,
            Process::SheetMetal => &self.sheet_metal.best_for,
        }
    }
}

/// Manufacturability thresholds for one material x process pairing
#[derive(Debug, Clone, Deserialize)]
pub struct DfmLimits {
    pub min_wall_mm: f64,
    pub recommended_wall_mm: [f64; 2],
    pub max_wall_mm: f64,
    pub min_hole_diameter_mm: f64,
    /// Multiplied by the hole diameter to give the minimum edge margin
    pub edge_distance_factor: f64,
}

/// Material x process DFM limit profiles with a generic fallback
#[derive(Debug, Clone, Deserialize)]
pub struct DfmLimitTable {
    pub generic: DfmLimits,
    #[serde(flatten)]
    pub materials: BTreeMap<Material, BTreeMap<Process, DfmLimits>>,
}

impl DfmLimitTable {
    /// Limits for a pairing; the bool is false when the generic fallback
    /// was used
    pub fn limits_for(&self, material: Material, process: Process) -> (&DfmLimits, bool) {
        match self
            .materials
            .get(&material)
            .and_then(|by_process| by_process.get(&process))
        {
            Some(limits) => (limits, true),
            None => (&self.generic, false),
        }
    }
}

/// Material-process compatibility matrix
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct Compatibility {
    allowed: BTreeMap<Process, BTreeSet<Material>>,
}

impl Compatibility {
    pub fn allows(&self, process: Process, material: Material) -> bool {
        self.allowed
            .get(&process)
            .map(|set| set.contains(&material))
            .unwrap_or(false)
    }

    /// Processes that can run the material at all
    pub fn compatible_processes(&self, material: Material) -> Vec<Process> {
        Process::all()
            .iter()
            .copied()
            .filter(|p| self.allows(*p, material))
            .collect()
    }
}

/// The complete immutable reference data set, loaded once at startup
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceTables {
    pub materials: BTreeMap<Material, MaterialProfile>,
    pub processes: ProcessTable,
    pub dfm_limits: DfmLimitTable,
    pub compatibility: Compatibility,
}

impl ReferenceTables {
    /// The tables embedded in the binary
    pub fn builtin() -> Result<Self, TableError> {
        Ok(Self {
            materials: parse_embedded("materials.yaml")?,
            processes: parse_embedded("processes.yaml")?,
            dfm_limits: parse_embedded("dfm_limits.yaml")?,
            compatibility: parse_embedded("compatibility.yaml")?,
        })
    }

    /// Load a complete replacement tables file (one YAML document with
    /// `materials`, `processes`, `dfm_limits`, and `compatibility` keys)
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let contents = std::fs::read_to_string(path).map_err(|e| TableError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_yml::from_str(&contents).map_err(|e| TableError::Parse {
            name: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Material profile, or None when the tables have no entry
    pub fn material(&self, material: Material) -> Option<&MaterialProfile> {
        self.materials.get(&material)
    }

    /// Material profile with a generic density fallback; the bool is true
    /// when the fallback was used. Only valid for geometry-relevant use.
    pub fn material_or_generic(&self, material: Material) -> (&MaterialProfile, bool) {
        match self.materials.get(&material) {
            Some(profile) => (profile, false),
            None => (&GENERIC_PROFILE, true),
        }
    }
}

fn parse_embedded<T: serde::de::DeserializeOwned + 'static>(name: &'static str) -> Result<T, TableError> {
    let file = BuiltinData::get(name).ok_or(TableError::MissingBuiltin(name))?;
    let text =
        std::str::from_utf8(file.data.as_ref()).map_err(|e| TableError::Parse {
            name: name.to_string(),
            message: e.to_string(),
        })?;
    serde_yml::from_str(text).map_err(|e| TableError::Parse {
        name: name.to_string(),
        message: e.to_string(),
    })
}

/// Errors loading or parsing reference tables. All fatal: the engine
/// refuses to run on partial reference data.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read tables file {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("failed to parse {name}: {message}")]
    Parse { name: String, message: String },

    #[error("built-in table {0} is missing from the binary")]
    MissingBuiltin(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_parse() {
        let tables = ReferenceTables::builtin().unwrap();
        assert_eq!(tables.materials.len(), 6);
        assert!(tables.material(Material::Aluminum6061T6).is_some());
    }

    #[test]
    fn test_builtin_covers_every_material() {
        let tables = ReferenceTables::builtin().unwrap();
        for mat in Material::all() {
            assert!(
                tables.material(*mat).is_some(),
                "missing profile for {}",
                mat
            );
        }
    }

    #[test]
    fn test_every_material_has_a_compatible_process() {
        let tables = ReferenceTables::builtin().unwrap();
        for mat in Material::all() {
            assert!(
                !tables.compatibility.compatible_processes(*mat).is_empty(),
                "no process can run {}",
                mat
            );
        }
    }

    #[test]
    fn test_compatibility_matrix() {
        let tables = ReferenceTables::builtin().unwrap();
        assert!(tables
            .compatibility
            .allows(Process::CncMilling, Material::Aluminum6061T6));
        assert!(!tables
            .compatibility
            .allows(Process::InjectionMolding, Material::SteelMild));
        assert!(!tables
            .compatibility
            .allows(Process::SheetMetal, Material::PlasticAbs));
    }

    #[test]
    fn test_limit_profile_fallback() {
        let tables = ReferenceTables::builtin().unwrap();

        let (limits, exact) = tables
            .dfm_limits
            .limits_for(Material::Aluminum6061T6, Process::CncMilling);
        assert!(exact);
        assert!((limits.min_wall_mm - 1.5).abs() < 1e-9);

        // Titanium has no sheet-metal profile; generic applies
        let (generic, exact) = tables
            .dfm_limits
            .limits_for(Material::Titanium, Process::SheetMetal);
        assert!(!exact);
        assert!((generic.min_wall_mm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_abs_molding_min_wall() {
        let tables = ReferenceTables::builtin().unwrap();
        let (limits, exact) = tables
            .dfm_limits
            .limits_for(Material::PlasticAbs, Process::InjectionMolding);
        assert!(exact);
        assert!((limits.min_wall_mm - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_process_table_lookups() {
        let tables = ReferenceTables::builtin().unwrap();
        assert_eq!(tables.processes.lead_time_days(Process::CncMilling), [5, 7]);
        assert!((tables.processes.tolerance_floor(Process::Printing3d) - 0.2).abs() < 1e-9);
        assert!(tables
            .processes
            .best_for(Process::InjectionMolding)
            .contains("High volume"));
    }

    #[test]
    fn test_material_or_generic_fallback_flag() {
        let mut tables = ReferenceTables::builtin().unwrap();
        tables.materials.remove(&Material::Titanium);

        let (profile, fallback) = tables.material_or_generic(Material::Titanium);
        assert!(fallback);
        assert!((profile.density_g_cm3 - 2.70).abs() < 1e-9);
        assert!(tables.material(Material::Titanium).is_none());
    }

    #[test]
    fn test_from_path_rejects_partial_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.yaml");
        std::fs::write(&path, "materials: {}\n").unwrap();

        assert!(matches!(
            ReferenceTables::from_path(&path),
            Err(TableError::Parse { .. })
        ));
    }
}
