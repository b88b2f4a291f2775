//! Standard component library
//!
//! NEMA motors, metric bolts, deep-groove bearings, and panel
//! connectors, embedded from `data/components.yaml`. The library only
//! pre-populates mounting patterns and informs hole sizing; the
//! validation and cost core never evaluates these parts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::tables::BuiltinData;
use crate::design::MountingPattern;

/// NEMA stepper motor face dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NemaMotor {
    pub name: String,
    pub size: u32,
    pub face_width: f64,
    pub face_height: f64,
    /// Center-to-center distance of the square mounting pattern, mm
    pub hole_spacing: f64,
    pub bolt_size: String,
    pub hole_diameter: f64,
    pub shaft_diameter: f64,
    pub typical_length: f64,
}

/// Metric bolt with standard clearance holes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricBolt {
    pub name: String,
    pub diameter: f64,
    pub clearance_hole: f64,
    pub close_fit: f64,
    pub thread_pitch: f64,
}

/// Deep-groove ball bearing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bearing {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub inner_diameter: f64,
    pub outer_diameter: f64,
    pub width: f64,
    /// Dynamic load rating, N
    pub load_rating: f64,
}

/// Panel connector cutout dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pins: Option<u32>,
}

/// The embedded component catalog
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentLibrary {
    pub nema_motors: Vec<NemaMotor>,
    pub metric_bolts: Vec<MetricBolt>,
    pub bearings: Vec<Bearing>,
    pub connectors: Vec<Connector>,
}

/// One search hit, flattened for display
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHit {
    pub category: &'static str,
    pub name: String,
    pub summary: String,
}

pub const CATEGORIES: [&str; 4] = ["nema_motors", "metric_bolts", "bearings", "connectors"];

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("component library is missing from the binary")]
    Missing,

    #[error("failed to parse component library: {0}")]
    Parse(String),

    #[error("unknown component category: {0}. Use nema_motors, metric_bolts, bearings, or connectors")]
    UnknownCategory(String),
}

impl ComponentLibrary {
    /// The catalog embedded in the binary
    pub fn builtin() -> Result<Self, LibraryError> {
        let file = BuiltinData::get("components.yaml").ok_or(LibraryError::Missing)?;
        let text = std::str::from_utf8(file.data.as_ref())
            .map_err(|e| LibraryError::Parse(e.to_string()))?;
        serde_yml::from_str(text).map_err(|e| LibraryError::Parse(e.to_string()))
    }

    /// Case-insensitive substring search over component names
    pub fn search(&self, query: &str, category: Option<&str>) -> Vec<ComponentHit> {
        let query = query.to_lowercase();
        let wanted = |cat: &str| category.map(|c| c == cat).unwrap_or(true);
        let mut hits = Vec::new();

        if wanted("nema_motors") {
            for motor in &self.nema_motors {
                if motor.name.to_lowercase().contains(&query) {
                    hits.push(ComponentHit {
                        category: "nema_motors",
                        name: motor.name.clone(),
                        summary: format!(
                            "{}x{} mm face, {} holes \u{2300}{} mm, spacing {} mm",
                            motor.face_width,
                            motor.face_height,
                            motor.bolt_size,
                            motor.hole_diameter,
                            motor.hole_spacing
                        ),
                    });
                }
            }
        }
        if wanted("metric_bolts") {
            for bolt in &self.metric_bolts {
                if bolt.name.to_lowercase().contains(&query) {
                    hits.push(ComponentHit {
                        category: "metric_bolts",
                        name: bolt.name.clone(),
                        summary: format!(
                            "\u{2300}{} mm, clearance {} mm, pitch {} mm",
                            bolt.diameter, bolt.clearance_hole, bolt.thread_pitch
                        ),
                    });
                }
            }
        }
        if wanted("bearings") {
            for bearing in &self.bearings {
                if bearing.name.to_lowercase().contains(&query) {
                    hits.push(ComponentHit {
                        category: "bearings",
                        name: bearing.name.clone(),
                        summary: format!(
                            "{}x{}x{} mm, {} N",
                            bearing.inner_diameter,
                            bearing.outer_diameter,
                            bearing.width,
                            bearing.load_rating
                        ),
                    });
                }
            }
        }
        if wanted("connectors") {
            for conn in &self.connectors {
                if conn.name.to_lowercase().contains(&query) {
                    hits.push(ComponentHit {
                        category: "connectors",
                        name: conn.name.clone(),
                        summary: format!("{}x{} mm cutout", conn.width, conn.height),
                    });
                }
            }
        }

        hits
    }

    /// All hits in one category
    pub fn category(&self, category: &str) -> Result<Vec<ComponentHit>, LibraryError> {
        if !CATEGORIES.contains(&category) {
            return Err(LibraryError::UnknownCategory(category.to_string()));
        }
        Ok(self.search("", Some(category)))
    }

    pub fn motor(&self, name: &str) -> Option<&NemaMotor> {
        self.nema_motors
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Mounting pattern for a motor face, centered on a base plate
    ///
    /// Positions follow the part coordinate convention: (x, y) from the
    /// base corner.
    pub fn mounting_pattern_for(
        &self,
        motor: &NemaMotor,
        base_length: f64,
        base_width: f64,
    ) -> MountingPattern {
        let cx = base_length / 2.0;
        let cy = base_width / 2.0;
        let offset = motor.hole_spacing / 2.0;

        MountingPattern {
            positions: vec![
                [cx - offset, cy - offset],
                [cx + offset, cy - offset],
                [cx - offset, cy + offset],
                [cx + offset, cy + offset],
            ],
            bolt_size: Some(motor.bolt_size.clone()),
            hole_diameter: Some(motor.hole_diameter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> ComponentLibrary {
        ComponentLibrary::builtin().unwrap()
    }

    #[test]
    fn test_builtin_catalog_parses() {
        let lib = library();
        assert_eq!(lib.nema_motors.len(), 5);
        assert_eq!(lib.metric_bolts.len(), 7);
        assert_eq!(lib.bearings.len(), 8);
        assert_eq!(lib.connectors.len(), 5);
    }

    #[test]
    fn test_search_by_name() {
        let lib = library();
        let hits = lib.search("nema17", None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "NEMA17");

        let all_usb = lib.search("usb", Some("connectors"));
        assert_eq!(all_usb.len(), 3);
    }

    #[test]
    fn test_search_respects_category_filter() {
        let lib = library();
        // "60" matches bearings (6000 series) but not in metric_bolts
        let hits = lib.search("60", Some("metric_bolts"));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_category_rejects_unknown() {
        let lib = library();
        assert!(matches!(
            lib.category("sprockets"),
            Err(LibraryError::UnknownCategory(_))
        ));
        assert_eq!(lib.category("bearings").unwrap().len(), 8);
    }

    #[test]
    fn test_mounting_pattern_centered() {
        let lib = library();
        let motor = lib.motor("NEMA17").unwrap();
        let pattern = lib.mounting_pattern_for(motor, 100.0, 80.0);

        assert_eq!(pattern.positions.len(), 4);
        // 31 mm spacing centered on (50, 40)
        assert!((pattern.positions[0][0] - 34.5).abs() < 1e-9);
        assert!((pattern.positions[0][1] - 24.5).abs() < 1e-9);
        assert!((pattern.positions[3][0] - 65.5).abs() < 1e-9);
        assert_eq!(pattern.bolt_size.as_deref(), Some("M3"));
        assert!((pattern.hole_diameter.unwrap() - 3.2).abs() < 1e-9);
    }
}
