//! Manufacturability (DFM) validation
//!
//! A rule is a pure function of the rule context; the registry in
//! [`rules`] lists every rule with its identifier and summary. The
//! evaluator runs all rules, buckets their findings by severity, and
//! derives the DFM score and confidence. Findings are output, never
//! errors: only degenerate geometry aborts validation.

pub mod rules;

use serde::{Deserialize, Serialize};

use crate::core::tables::ReferenceTables;
use crate::design::geometry::GeometryError;
use crate::design::{DesignParameters, Material, NormalizedGeometry, Process};

/// Finding severity
///
/// Issues block manufacturability; warnings and suggestions never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Issue,
    Warning,
    Suggestion,
}

impl Severity {
    /// Score penalty per finding of this severity
    pub fn weight(&self) -> f64 {
        match self {
            Severity::Issue => 25.0,
            Severity::Warning => 10.0,
            Severity::Suggestion => 2.0,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Issue => write!(f, "issue"),
            Severity::Warning => write!(f, "warning"),
            Severity::Suggestion => write!(f, "suggestion"),
        }
    }
}

/// Stable rule identifiers
///
/// `MaterialProfile` and `RuleProfile` are emitted by the evaluator
/// itself (table-coverage findings), not by registry rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    WallThickness,
    HoleDiameter,
    HoleSpacing,
    EdgeDistance,
    Tolerance,
    MaterialProcess,
    MaterialProfile,
    RuleProfile,
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RuleId::WallThickness => "wall_thickness",
            RuleId::HoleDiameter => "hole_diameter",
            RuleId::HoleSpacing => "hole_spacing",
            RuleId::EdgeDistance => "edge_distance",
            RuleId::Tolerance => "tolerance",
            RuleId::MaterialProcess => "material_process",
            RuleId::MaterialProfile => "material_profile",
            RuleId::RuleProfile => "rule_profile",
        };
        f.write_str(s)
    }
}

/// One classified finding from a rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub rule: RuleId,
    pub severity: Severity,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
}

impl Finding {
    pub fn issue(rule: RuleId, message: impl Into<String>) -> Self {
        Self::new(rule, Severity::Issue, message)
    }

    pub fn warning(rule: RuleId, message: impl Into<String>) -> Self {
        Self::new(rule, Severity::Warning, message)
    }

    pub fn suggestion(rule: RuleId, message: impl Into<String>) -> Self {
        Self::new(rule, Severity::Suggestion, message)
    }

    fn new(rule: RuleId, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity,
            message: message.into(),
            recommendation: None,
            current_value: None,
        }
    }

    pub fn recommend(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    pub fn current(mut self, value: f64) -> Self {
        self.current_value = Some(value);
        self
    }
}

/// Result of a validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff no issue-severity findings were raised
    pub valid: bool,
    pub issues: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub suggestions: Vec<Finding>,
    /// Share of the input that was specified rather than assumed, 0..=1
    pub confidence: f64,
    /// Manufacturability score, 0..=100
    pub dfm_score: f64,
}

impl ValidationResult {
    /// All findings in severity order
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.issues
            .iter()
            .chain(self.warnings.iter())
            .chain(self.suggestions.iter())
    }

    pub fn finding_count(&self) -> usize {
        self.issues.len() + self.warnings.len() + self.suggestions.len()
    }
}

/// Suggestions alone never pull the score below this floor
const SUGGESTION_FLOOR: f64 = 85.0;

fn score(issues: usize, warnings: usize, suggestions: usize) -> f64 {
    let hard = 100.0
        - Severity::Issue.weight() * issues as f64
        - Severity::Warning.weight() * warnings as f64;
    let soft = hard - Severity::Suggestion.weight() * suggestions as f64;
    soft.max(SUGGESTION_FLOOR.min(hard)).clamp(0.0, 100.0)
}

fn confidence(geom: &NormalizedGeometry) -> f64 {
    if geom.relevant_fields == 0 {
        return 1.0;
    }
    (1.0 - geom.defaulted.len() as f64 / geom.relevant_fields as f64).clamp(0.0, 1.0)
}

/// Context handed to every rule
pub struct RuleContext<'a> {
    pub params: &'a DesignParameters,
    pub geom: &'a NormalizedGeometry,
    pub material: Material,
    pub process: Process,
    pub limits: &'a crate::core::tables::DfmLimits,
    /// Tightest tolerance the process reliably achieves, mm
    pub tolerance_floor_mm: f64,
    /// Verdict of the compatibility matrix for this pairing
    pub process_compatible: bool,
}

/// Validate a normalized design against the DFM rule registry
///
/// Pure: identical inputs produce identical results. Rules run in
/// registry order but do not observe each other's findings, so order
/// never changes the outcome.
pub fn validate(
    params: &DesignParameters,
    geom: &NormalizedGeometry,
    tables: &ReferenceTables,
) -> Result<ValidationResult, GeometryError> {
    if geom.bbox.is_degenerate() {
        return Err(GeometryError::DegenerateBoundingBox {
            volume: geom.bbox.volume,
        });
    }

    let material = params.material();
    let process = params.manufacturing_process();
    let (limits, exact_profile) = tables.dfm_limits.limits_for(material, process);

    let ctx = RuleContext {
        params,
        geom,
        material,
        process,
        limits,
        tolerance_floor_mm: tables.processes.tolerance_floor(process),
        process_compatible: tables.compatibility.allows(process, material),
    };

    let mut findings: Vec<Finding> = Vec::new();

    if !exact_profile {
        findings.push(Finding::warning(
            RuleId::RuleProfile,
            format!(
                "no limit profile for {} + {}; generic thresholds applied",
                material, process
            ),
        ));
    }
    if geom.material_fallback {
        findings.push(
            Finding::suggestion(
                RuleId::MaterialProfile,
                format!(
                    "material {} has no profile in the active tables; generic density assumed",
                    material
                ),
            )
            .recommend("add a material profile to the tables file"),
        );
    }

    for rule in rules::registry() {
        findings.extend((rule.check)(&ctx));
    }

    let mut issues = Vec::new();
    let mut warnings = Vec::new();
    let mut suggestions = Vec::new();
    for finding in findings {
        match finding.severity {
            Severity::Issue => issues.push(finding),
            Severity::Warning => warnings.push(finding),
            Severity::Suggestion => suggestions.push(finding),
        }
    }

    let dfm_score = score(issues.len(), warnings.len(), suggestions.len());

    Ok(ValidationResult {
        valid: issues.is_empty(),
        confidence: confidence(geom),
        dfm_score,
        issues,
        warnings,
        suggestions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::geometry::{normalize, PrimaryGeometry};
    use crate::design::MountingPattern;

    fn tables() -> ReferenceTables {
        ReferenceTables::builtin().unwrap()
    }

    /// Aluminum box with four 8 mm holes placed 5 mm from the edges
    fn edge_case_params() -> DesignParameters {
        DesignParameters {
            primary_geometry: PrimaryGeometry::Box {
                length: Some(100.0),
                width: Some(80.0),
                height: Some(30.0),
                wall_thickness: Some(3.0),
            },
            mounting_pattern: Some(MountingPattern {
                positions: vec![[5.0, 5.0], [95.0, 5.0], [5.0, 75.0], [95.0, 75.0]],
                bolt_size: Some("M3".to_string()),
                hole_diameter: Some(8.0),
            }),
            material: Some(Material::Aluminum6061T6),
            manufacturing_process: Some(Process::CncMilling),
            ..Default::default()
        }
    }

    #[test]
    fn test_edge_distance_scenario() {
        let tables = tables();
        let params = edge_case_params();
        let geom = normalize(&params, &tables).unwrap();
        let result = validate(&params, &geom, &tables).unwrap();

        let edge_warnings: Vec<_> = result
            .warnings
            .iter()
            .filter(|f| f.rule == RuleId::EdgeDistance)
            .collect();
        assert_eq!(edge_warnings.len(), 4);
        assert!(result.valid, "warnings must not block");
        assert!(result.dfm_score < 100.0);
    }

    #[test]
    fn test_thin_wall_molding_scenario() {
        let tables = tables();
        let params = DesignParameters {
            primary_geometry: PrimaryGeometry::Cylinder {
                radius: Some(30.0),
                height: Some(60.0),
                wall_thickness: Some(1.0),
            },
            material: Some(Material::PlasticAbs),
            manufacturing_process: Some(Process::InjectionMolding),
            ..Default::default()
        };
        let geom = normalize(&params, &tables).unwrap();
        let result = validate(&params, &geom, &tables).unwrap();

        assert!(!result.valid);
        assert!(result
            .issues
            .iter()
            .any(|f| f.rule == RuleId::WallThickness));
    }

    #[test]
    fn test_valid_iff_no_issues() {
        let tables = tables();

        let clean = edge_case_params();
        let geom = normalize(&clean, &tables).unwrap();
        let result = validate(&clean, &geom, &tables).unwrap();
        assert_eq!(result.valid, result.issues.is_empty());

        let mut bad = edge_case_params();
        bad.manufacturing_process = Some(Process::InjectionMolding);
        let geom = normalize(&bad, &tables).unwrap();
        let result = validate(&bad, &geom, &tables).unwrap();
        assert_eq!(result.valid, result.issues.is_empty());
        assert!(!result.valid);
    }

    #[test]
    fn test_score_and_confidence_ranges() {
        let tables = tables();
        let params = DesignParameters::default();
        let geom = normalize(&params, &tables).unwrap();
        let result = validate(&params, &geom, &tables).unwrap();

        assert!(result.dfm_score >= 0.0 && result.dfm_score <= 100.0);
        assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
    }

    #[test]
    fn test_added_issue_never_raises_score() {
        let tables = tables();
        let base = edge_case_params();
        let geom = normalize(&base, &tables).unwrap();
        let baseline = validate(&base, &geom, &tables).unwrap();

        // Same part, one extra issue-severity finding (impossible tolerance)
        let mut worse = edge_case_params();
        worse
            .tolerances
            .insert("bore_diameter".to_string(), 0.001);
        let geom = normalize(&worse, &tables).unwrap();
        let with_issue = validate(&worse, &geom, &tables).unwrap();

        assert_eq!(with_issue.issues.len(), baseline.issues.len() + 1);
        assert!(with_issue.dfm_score <= baseline.dfm_score);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let tables = tables();
        let params = edge_case_params();
        let geom = normalize(&params, &tables).unwrap();

        let a = validate(&params, &geom, &tables).unwrap();
        let b = validate(&params, &geom, &tables).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_degenerate_geometry_rejected() {
        let tables = tables();
        let params = edge_case_params();
        let mut geom = normalize(&params, &tables).unwrap();
        geom.bbox.volume = 0.0;

        assert!(matches!(
            validate(&params, &geom, &tables),
            Err(GeometryError::DegenerateBoundingBox { .. })
        ));
    }

    #[test]
    fn test_generic_profile_warning() {
        let tables = tables();
        // Titanium has no sheet-metal limit profile
        let params = DesignParameters {
            primary_geometry: PrimaryGeometry::Box {
                length: Some(50.0),
                width: Some(50.0),
                height: Some(10.0),
                wall_thickness: Some(2.0),
            },
            material: Some(Material::Titanium),
            manufacturing_process: Some(Process::SheetMetal),
            ..Default::default()
        };
        let geom = normalize(&params, &tables).unwrap();
        let result = validate(&params, &geom, &tables).unwrap();

        assert!(result
            .warnings
            .iter()
            .any(|f| f.rule == RuleId::RuleProfile));
    }

    #[test]
    fn test_material_fallback_suggestion() {
        let mut tables = tables();
        tables.materials.remove(&Material::Titanium);

        let params = DesignParameters {
            material: Some(Material::Titanium),
            ..edge_case_params()
        };
        let geom = normalize(&params, &tables).unwrap();
        let result = validate(&params, &geom, &tables).unwrap();

        assert!(result
            .suggestions
            .iter()
            .any(|f| f.rule == RuleId::MaterialProfile));
    }

    #[test]
    fn test_suggestion_floor() {
        // Suggestions alone cannot drag the score below the floor
        assert!(score(0, 0, 50) >= 85.0);
        // But issues can take it all the way down
        assert_eq!(score(5, 0, 0), 0.0);
        // And the floor never lifts a hard score back up
        assert!(score(2, 3, 50) <= score(2, 3, 0));
    }

    #[test]
    fn test_fully_specified_input_has_full_confidence() {
        let tables = tables();
        let params = edge_case_params();
        let geom = normalize(&params, &tables).unwrap();
        let result = validate(&params, &geom, &tables).unwrap();
        assert!((result.confidence - 1.0).abs() < 1e-9);
    }
}
