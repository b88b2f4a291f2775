//! Part design description
//!
//! A part is a plain-text YAML file deserialized into [`DesignParameters`].
//! The description is immutable once handed to the validation/cost core;
//! all defaulting happens in one place, the geometry normalizer.

pub mod geometry;
pub mod material;
pub mod process;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use geometry::{BoundingBox, GeometryKind, NormalizedGeometry, PrimaryGeometry};
pub use material::Material;
pub use process::Process;

/// Mounting-hole pattern on the part's base plane
///
/// Positions are (x, y) in mm from the base corner, matching the bounding
/// box axes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MountingPattern {
    #[serde(default)]
    pub positions: Vec<[f64; 2]>,

    /// Bolt designation, e.g. "M3"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bolt_size: Option<String>,

    /// Clearance hole diameter, mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hole_diameter: Option<f64>,
}

/// A secondary feature on the part (rib, boss, pocket, ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feature {
    /// Feature kind, free-form (e.g. "rib", "boss", "pocket")
    #[serde(rename = "type")]
    pub kind: String,

    /// Kind-specific dimensions, mm
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// Complete normalized part description
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignParameters {
    /// Free-text description of the part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub primary_geometry: PrimaryGeometry,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mounting_pattern: Option<MountingPattern>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<Feature>,

    /// Stock material (default: aluminum_6061_t6)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<Material>,

    /// Intended process (default: cnc_milling)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturing_process: Option<Process>,

    /// Requested tolerances per named feature, mm
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tolerances: BTreeMap<String, f64>,
}

impl DesignParameters {
    /// Effective material, falling back to the documented default
    pub fn material(&self) -> Material {
        self.material.unwrap_or_default()
    }

    /// Effective process, falling back to the documented default
    pub fn manufacturing_process(&self) -> Process {
        self.manufacturing_process.unwrap_or_default()
    }

    /// Load a part description from a YAML file
    pub fn from_path(path: &Path) -> Result<Self, PartFileError> {
        let contents = std::fs::read_to_string(path).map_err(|e| PartFileError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_yml::from_str(&contents).map_err(|e| PartFileError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Errors loading a part file from disk
#[derive(Debug, Error)]
pub enum PartFileError {
    #[error("failed to read part file {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("invalid part file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
description: "motor bracket for NEMA17"
primary_geometry:
  type: bracket
  base_length: 100
  base_width: 80
  height: 45
  wall_thickness: 2.5
mounting_pattern:
  positions: [[34.65, 24.5], [65.65, 24.5], [34.65, 55.5], [65.65, 55.5]]
  bolt_size: M3
  hole_diameter: 3.2
features:
  - type: rib
    dimensions: [80, 1.5, 30]
material: aluminum_6061_t6
manufacturing_process: cnc_milling
tolerances:
  bore_diameter: 0.05
"#;

    #[test]
    fn test_part_file_roundtrip() {
        let params: DesignParameters = serde_yml::from_str(SAMPLE).unwrap();
        assert!(matches!(
            params.primary_geometry,
            PrimaryGeometry::Bracket { .. }
        ));
        assert_eq!(params.material(), Material::Aluminum6061T6);
        assert_eq!(params.manufacturing_process(), Process::CncMilling);
        assert_eq!(params.mounting_pattern.as_ref().unwrap().positions.len(), 4);
        assert_eq!(params.features.len(), 1);
        assert_eq!(params.features[0].kind, "rib");

        let yaml = serde_yml::to_string(&params).unwrap();
        let reparsed: DesignParameters = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(
            reparsed.tolerances.get("bore_diameter").copied(),
            Some(0.05)
        );
    }

    #[test]
    fn test_empty_document_gets_defaults() {
        let params: DesignParameters = serde_yml::from_str("{}").unwrap();
        assert_eq!(params.material(), Material::Aluminum6061T6);
        assert_eq!(params.manufacturing_process(), Process::CncMilling);
        assert!(matches!(params.primary_geometry, PrimaryGeometry::Box { .. }));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = DesignParameters::from_path(Path::new("/nonexistent/part.yaml")).unwrap_err();
        assert!(matches!(err, PartFileError::Io { .. }));
    }
}
