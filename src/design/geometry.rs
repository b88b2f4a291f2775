//! Geometry normalization
//!
//! Turns the per-shape parameter variants into a canonical bounding box,
//! part volume, and mass. Missing numeric fields are substituted from a
//! fixed default table exactly once, here; every substitution is recorded
//! so validation can report how much of the input was assumed rather than
//! specified. Downstream code never re-applies defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::tables::ReferenceTables;
use crate::design::DesignParameters;

/// Shape-specific dimension defaults, in mm
pub mod defaults {
    pub const BOX_LENGTH: f64 = 100.0;
    pub const BOX_WIDTH: f64 = 80.0;
    pub const BOX_HEIGHT: f64 = 50.0;
    pub const CYLINDER_RADIUS: f64 = 25.0;
    pub const CYLINDER_HEIGHT: f64 = 50.0;
    pub const GEAR_MODULE: f64 = 1.0;
    pub const GEAR_TEETH: u32 = 20;
    pub const GEAR_THICKNESS: f64 = 10.0;
    pub const GEAR_BORE: f64 = 8.0;
    pub const BRACKET_LENGTH: f64 = 100.0;
    pub const BRACKET_WIDTH: f64 = 80.0;
    pub const BRACKET_HEIGHT: f64 = 45.0;
    pub const WALL_THICKNESS: f64 = 2.0;
    pub const BRACKET_WALL_THICKNESS: f64 = 2.5;
    pub const HOLE_DIAMETER: f64 = 4.5;
}

/// Primary part geometry, tagged by shape
///
/// Every numeric field is optional; absent fields take the documented
/// defaults during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrimaryGeometry {
    /// Rectangular housing or plate
    #[serde(alias = "housing")]
    Box {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        length: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wall_thickness: Option<f64>,
    },
    Cylinder {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        radius: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wall_thickness: Option<f64>,
    },
    /// Spur gear blank (pitch geometry only, no tooth profile)
    Gear {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        module: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        num_teeth: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        thickness: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bore_diameter: Option<f64>,
    },
    /// L-shaped mounting bracket with a base plate and walls
    Bracket {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_length: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_width: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wall_thickness: Option<f64>,
    },
}

impl Default for PrimaryGeometry {
    fn default() -> Self {
        PrimaryGeometry::Box {
            length: None,
            width: None,
            height: None,
            wall_thickness: None,
        }
    }
}

/// Shape family of a normalized part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Box,
    Cylinder,
    Gear,
    Bracket,
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryKind::Box => write!(f, "box"),
            GeometryKind::Cylinder => write!(f, "cylinder"),
            GeometryKind::Gear => write!(f, "gear"),
            GeometryKind::Bracket => write!(f, "bracket"),
        }
    }
}

/// Axis-aligned bounding box, mm
///
/// `volume` is the part volume in mm^3: length x width x height for
/// box-derived shapes, the solid-of-revolution formula for cylinders and
/// gear blanks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub volume: f64,
}

impl BoundingBox {
    pub fn is_degenerate(&self) -> bool {
        !(self.volume > 0.0) || !(self.length > 0.0) || !(self.width > 0.0) || !(self.height > 0.0)
    }
}

/// Resolved mounting-hole pattern (positions in the base plane, mm)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolePattern {
    pub positions: Vec<[f64; 2]>,
    pub diameter: f64,
}

/// Canonical geometry produced by [`normalize`]
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedGeometry {
    pub kind: GeometryKind,
    pub bbox: BoundingBox,
    /// Resolved minimum wall thickness, mm (the plate thickness for gears)
    pub wall_mm: f64,
    pub mass_kg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holes: Option<HolePattern>,
    /// Names of input fields that were absent and took defaults
    pub defaulted: Vec<&'static str>,
    /// Total count of fields the input could have specified
    pub relevant_fields: usize,
    /// True when the material had no profile and a generic density was used
    pub material_fallback: bool,
}

impl NormalizedGeometry {
    pub fn volume_cm3(&self) -> f64 {
        self.bbox.volume / 1000.0
    }
}

/// Fatal geometry faults; raised before any rule or cost computation
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("{field} must be positive (got {value})")]
    NonPositiveDimension { field: &'static str, value: f64 },

    #[error("gear bore {bore} mm meets or exceeds the outer diameter {outer:.1} mm")]
    BoreTooLarge { bore: f64, outer: f64 },

    #[error("degenerate bounding box: volume {volume} mm^3")]
    DegenerateBoundingBox { volume: f64 },
}

/// Tracks default substitutions while individual fields resolve
struct FieldResolver {
    defaulted: Vec<&'static str>,
    relevant: usize,
}

impl FieldResolver {
    fn new() -> Self {
        Self {
            defaulted: Vec::new(),
            relevant: 0,
        }
    }

    fn dim(
        &mut self,
        field: &'static str,
        value: Option<f64>,
        default: f64,
    ) -> Result<f64, GeometryError> {
        self.relevant += 1;
        match value {
            Some(v) if v <= 0.0 => Err(GeometryError::NonPositiveDimension { field, value: v }),
            Some(v) => Ok(v),
            None => {
                self.defaulted.push(field);
                Ok(default)
            }
        }
    }

    fn count(&mut self, field: &'static str, value: Option<u32>, default: u32) -> u32 {
        self.relevant += 1;
        match value {
            Some(v) => v,
            None => {
                self.defaulted.push(field);
                default
            }
        }
    }

    fn note_if_absent<T>(&mut self, field: &'static str, value: &Option<T>) {
        self.relevant += 1;
        if value.is_none() {
            self.defaulted.push(field);
        }
    }
}

/// Normalize a part description into canonical geometry
///
/// Fails with [`GeometryError`] when any explicit dimension is
/// non-positive; nothing downstream runs in that case.
pub fn normalize(
    params: &DesignParameters,
    tables: &ReferenceTables,
) -> Result<NormalizedGeometry, GeometryError> {
    let mut fields = FieldResolver::new();

    let (kind, bbox, wall_mm) = match &params.primary_geometry {
        PrimaryGeometry::Box {
            length,
            width,
            height,
            wall_thickness,
        } => {
            let l = fields.dim("length", *length, defaults::BOX_LENGTH)?;
            let w = fields.dim("width", *width, defaults::BOX_WIDTH)?;
            let h = fields.dim("height", *height, defaults::BOX_HEIGHT)?;
            let wall = fields.dim("wall_thickness", *wall_thickness, defaults::WALL_THICKNESS)?;
            let bbox = BoundingBox {
                length: l,
                width: w,
                height: h,
                volume: l * w * h,
            };
            (GeometryKind::Box, bbox, wall)
        }
        PrimaryGeometry::Cylinder {
            radius,
            height,
            wall_thickness,
        } => {
            let r = fields.dim("radius", *radius, defaults::CYLINDER_RADIUS)?;
            let h = fields.dim("height", *height, defaults::CYLINDER_HEIGHT)?;
            let wall = fields.dim("wall_thickness", *wall_thickness, defaults::WALL_THICKNESS)?;
            let bbox = BoundingBox {
                length: 2.0 * r,
                width: 2.0 * r,
                height: h,
                volume: std::f64::consts::PI * r * r * h,
            };
            (GeometryKind::Cylinder, bbox, wall)
        }
        PrimaryGeometry::Gear {
            module,
            num_teeth,
            thickness,
            bore_diameter,
        } => {
            let m = fields.dim("module", *module, defaults::GEAR_MODULE)?;
            let teeth = fields.count("num_teeth", *num_teeth, defaults::GEAR_TEETH);
            let t = fields.dim("thickness", *thickness, defaults::GEAR_THICKNESS)?;
            let bore = fields.dim("bore_diameter", *bore_diameter, defaults::GEAR_BORE)?;
            // Outside diameter of a standard spur gear: pitch + 2 modules
            let outer = m * (teeth as f64 + 2.0);
            if bore >= outer {
                return Err(GeometryError::BoreTooLarge { bore, outer });
            }
            let ring = (outer / 2.0).powi(2) - (bore / 2.0).powi(2);
            let bbox = BoundingBox {
                length: outer,
                width: outer,
                height: t,
                volume: std::f64::consts::PI * ring * t,
            };
            (GeometryKind::Gear, bbox, t)
        }
        PrimaryGeometry::Bracket {
            base_length,
            base_width,
            height,
            wall_thickness,
        } => {
            let l = fields.dim("base_length", *base_length, defaults::BRACKET_LENGTH)?;
            let w = fields.dim("base_width", *base_width, defaults::BRACKET_WIDTH)?;
            let h = fields.dim("height", *height, defaults::BRACKET_HEIGHT)?;
            let wall = fields.dim(
                "wall_thickness",
                *wall_thickness,
                defaults::BRACKET_WALL_THICKNESS,
            )?;
            let bbox = BoundingBox {
                length: l,
                width: w,
                height: h,
                volume: l * w * h,
            };
            (GeometryKind::Bracket, bbox, wall)
        }
    };

    if bbox.is_degenerate() {
        return Err(GeometryError::DegenerateBoundingBox {
            volume: bbox.volume,
        });
    }

    let holes = match &params.mounting_pattern {
        Some(pattern) => {
            let diameter =
                fields.dim("hole_diameter", pattern.hole_diameter, defaults::HOLE_DIAMETER)?;
            Some(HolePattern {
                positions: pattern.positions.clone(),
                diameter,
            })
        }
        None => None,
    };

    fields.note_if_absent("material", &params.material);
    fields.note_if_absent("manufacturing_process", &params.manufacturing_process);

    let (profile, material_fallback) = tables.material_or_generic(params.material());
    let mass_kg = bbox.volume / 1000.0 * profile.density_g_cm3 / 1000.0;

    Ok(NormalizedGeometry {
        kind,
        bbox,
        wall_mm,
        mass_kg,
        holes,
        defaulted: fields.defaulted,
        relevant_fields: fields.relevant,
        material_fallback,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{DesignParameters, MountingPattern};

    fn tables() -> ReferenceTables {
        ReferenceTables::builtin().unwrap()
    }

    fn box_params(length: f64, width: f64, height: f64) -> DesignParameters {
        DesignParameters {
            primary_geometry: PrimaryGeometry::Box {
                length: Some(length),
                width: Some(width),
                height: Some(height),
                wall_thickness: Some(2.0),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_box_volume_and_mass() {
        let mut params = box_params(100.0, 80.0, 50.0);
        params.material = Some(crate::design::Material::Aluminum6061T6);
        params.manufacturing_process = Some(crate::design::Process::CncMilling);
        let geom = normalize(&params, &tables()).unwrap();

        assert_eq!(geom.kind, GeometryKind::Box);
        assert!((geom.bbox.volume - 400_000.0).abs() < 1e-9);
        // 400 cm^3 of 6061 at 2.70 g/cm^3
        assert!((geom.mass_kg - 1.08).abs() < 1e-9);
        assert!(geom.defaulted.is_empty());
        assert!(!geom.material_fallback);
    }

    #[test]
    fn test_missing_fields_take_defaults_and_are_recorded() {
        let params = DesignParameters::default();
        let geom = normalize(&params, &tables()).unwrap();

        assert!((geom.bbox.length - defaults::BOX_LENGTH).abs() < 1e-9);
        assert!((geom.bbox.width - defaults::BOX_WIDTH).abs() < 1e-9);
        assert!((geom.bbox.height - defaults::BOX_HEIGHT).abs() < 1e-9);
        assert!(geom.defaulted.contains(&"length"));
        assert!(geom.defaulted.contains(&"wall_thickness"));
        assert!(geom.defaulted.contains(&"material"));
        assert!(geom.defaulted.contains(&"manufacturing_process"));
        assert_eq!(geom.relevant_fields, 6);
    }

    #[test]
    fn test_cylinder_uses_revolution_volume() {
        let params = DesignParameters {
            primary_geometry: PrimaryGeometry::Cylinder {
                radius: Some(25.0),
                height: Some(50.0),
                wall_thickness: None,
            },
            ..Default::default()
        };
        let geom = normalize(&params, &tables()).unwrap();

        let expected = std::f64::consts::PI * 25.0 * 25.0 * 50.0;
        assert!((geom.bbox.volume - expected).abs() < 1e-6);
        assert!((geom.bbox.length - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_gear_blank_subtracts_bore() {
        let params = DesignParameters {
            primary_geometry: PrimaryGeometry::Gear {
                module: Some(1.0),
                num_teeth: Some(20),
                thickness: Some(10.0),
                bore_diameter: Some(8.0),
            },
            ..Default::default()
        };
        let geom = normalize(&params, &tables()).unwrap();

        // Outer diameter 22 mm
        assert!((geom.bbox.length - 22.0).abs() < 1e-9);
        let expected = std::f64::consts::PI * (11.0f64.powi(2) - 4.0f64.powi(2)) * 10.0;
        assert!((geom.bbox.volume - expected).abs() < 1e-6);
        // Plate thickness stands in for wall thickness
        assert!((geom.wall_mm - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_gear_bore_too_large() {
        let params = DesignParameters {
            primary_geometry: PrimaryGeometry::Gear {
                module: Some(1.0),
                num_teeth: Some(20),
                thickness: Some(10.0),
                bore_diameter: Some(30.0),
            },
            ..Default::default()
        };
        assert!(matches!(
            normalize(&params, &tables()),
            Err(GeometryError::BoreTooLarge { .. })
        ));
    }

    #[test]
    fn test_zero_height_is_fatal() {
        let params = box_params(100.0, 80.0, 0.0);
        let err = normalize(&params, &tables()).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::NonPositiveDimension {
                field: "height",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_dimension_is_fatal() {
        let params = box_params(-5.0, 80.0, 30.0);
        assert!(matches!(
            normalize(&params, &tables()),
            Err(GeometryError::NonPositiveDimension { field: "length", .. })
        ));
    }

    #[test]
    fn test_mounting_pattern_hole_diameter_default() {
        let mut params = box_params(100.0, 80.0, 30.0);
        params.mounting_pattern = Some(MountingPattern {
            positions: vec![[10.0, 10.0], [90.0, 70.0]],
            bolt_size: None,
            hole_diameter: None,
        });
        let geom = normalize(&params, &tables()).unwrap();

        let holes = geom.holes.unwrap();
        assert!((holes.diameter - defaults::HOLE_DIAMETER).abs() < 1e-9);
        assert!(geom.defaulted.contains(&"hole_diameter"));
    }

    #[test]
    fn test_housing_alias_parses_as_box() {
        let yaml = "type: housing\nlength: 60\nwidth: 40\nheight: 20\n";
        let geom: PrimaryGeometry = serde_yml::from_str(yaml).unwrap();
        assert!(matches!(geom, PrimaryGeometry::Box { .. }));
    }
}
