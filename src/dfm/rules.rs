//! The DFM rule registry
//!
//! Each rule is a pure function from [`RuleContext`] to zero or more
//! findings. Adding a rule means adding an entry here; the evaluator's
//! control flow never changes.

use crate::dfm::{Finding, RuleContext, RuleId};

/// A registered manufacturability rule
pub struct Rule {
    pub id: RuleId,
    pub summary: &'static str,
    pub check: fn(&RuleContext) -> Vec<Finding>,
}

/// Wall thickness within 20% of the minimum draws a warning
const NEAR_MINIMUM_BAND: f64 = 1.2;

/// Minimum center-to-center hole spacing, in hole diameters
const HOLE_SPACING_DIAMETERS: f64 = 2.0;

static REGISTRY: [Rule; 6] = [
    Rule {
        id: RuleId::WallThickness,
        summary: "wall thickness against the material/process window",
        check: wall_thickness,
    },
    Rule {
        id: RuleId::HoleDiameter,
        summary: "hole diameter against the process minimum",
        check: hole_diameter,
    },
    Rule {
        id: RuleId::HoleSpacing,
        summary: "center-to-center spacing between mounting holes",
        check: hole_spacing,
    },
    Rule {
        id: RuleId::EdgeDistance,
        summary: "margin between holes and the part edge",
        check: edge_distance,
    },
    Rule {
        id: RuleId::Tolerance,
        summary: "requested tolerances against process capability",
        check: tolerance,
    },
    Rule {
        id: RuleId::MaterialProcess,
        summary: "material/process compatibility",
        check: material_process,
    },
];

/// The full rule registry, in evaluation order
pub fn registry() -> &'static [Rule] {
    &REGISTRY
}

fn wall_thickness(ctx: &RuleContext) -> Vec<Finding> {
    let wall = ctx.geom.wall_mm;
    let limits = ctx.limits;
    let [rec_lo, rec_hi] = limits.recommended_wall_mm;

    if wall < limits.min_wall_mm {
        return vec![Finding::issue(
            RuleId::WallThickness,
            format!(
                "wall thickness {:.1} mm is below the {:.1} mm minimum for {} + {}",
                wall, limits.min_wall_mm, ctx.material, ctx.process
            ),
        )
        .recommend(format!(
            "increase wall thickness to at least {:.1} mm",
            limits.min_wall_mm
        ))
        .current(wall)];
    }

    if wall > limits.max_wall_mm {
        return vec![Finding::warning(
            RuleId::WallThickness,
            format!(
                "wall thickness {:.1} mm exceeds the {:.1} mm maximum; risk of sink marks and warping",
                wall, limits.max_wall_mm
            ),
        )
        .recommend("add ribs instead of thickening walls")
        .current(wall)];
    }

    if wall < limits.min_wall_mm * NEAR_MINIMUM_BAND {
        return vec![Finding::warning(
            RuleId::WallThickness,
            format!(
                "wall thickness {:.1} mm is within 20% of the {:.1} mm minimum",
                wall, limits.min_wall_mm
            ),
        )
        .recommend(format!("aim for {:.1}-{:.1} mm", rec_lo, rec_hi))
        .current(wall)];
    }

    if wall < rec_lo || wall > rec_hi {
        return vec![Finding::suggestion(
            RuleId::WallThickness,
            format!(
                "recommended wall thickness for {} + {} is {:.1}-{:.1} mm",
                ctx.material, ctx.process, rec_lo, rec_hi
            ),
        )
        .current(wall)];
    }

    Vec::new()
}

fn hole_diameter(ctx: &RuleContext) -> Vec<Finding> {
    let Some(holes) = &ctx.geom.holes else {
        return Vec::new();
    };
    if holes.positions.is_empty() {
        return Vec::new();
    }

    if holes.diameter < ctx.limits.min_hole_diameter_mm {
        return vec![Finding::issue(
            RuleId::HoleDiameter,
            format!(
                "hole diameter {:.1} mm is below the {:.1} mm minimum for {}",
                holes.diameter, ctx.limits.min_hole_diameter_mm, ctx.process
            ),
        )
        .recommend(format!(
            "increase hole diameter to at least {:.1} mm",
            ctx.limits.min_hole_diameter_mm
        ))
        .current(holes.diameter)];
    }

    Vec::new()
}

fn hole_spacing(ctx: &RuleContext) -> Vec<Finding> {
    let Some(holes) = &ctx.geom.holes else {
        return Vec::new();
    };
    let min_spacing = HOLE_SPACING_DIAMETERS * holes.diameter;
    let mut findings = Vec::new();

    for (i, a) in holes.positions.iter().enumerate() {
        for (j, b) in holes.positions.iter().enumerate().skip(i + 1) {
            let distance = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt();
            if distance < min_spacing {
                findings.push(
                    Finding::warning(
                        RuleId::HoleSpacing,
                        format!(
                            "holes {} and {} are {:.1} mm apart center-to-center (minimum {:.1} mm)",
                            i, j, distance, min_spacing
                        ),
                    )
                    .recommend("increase spacing or reduce hole diameter")
                    .current(distance),
                );
            }
        }
    }

    findings
}

fn edge_distance(ctx: &RuleContext) -> Vec<Finding> {
    let Some(holes) = &ctx.geom.holes else {
        return Vec::new();
    };
    let margin = ctx.limits.edge_distance_factor * holes.diameter;
    let bbox = &ctx.geom.bbox;
    let mut findings = Vec::new();

    for (i, [x, y]) in holes.positions.iter().enumerate() {
        let to_x_edge = x.min(bbox.length - x);
        let to_y_edge = y.min(bbox.width - y);
        let nearest = to_x_edge.min(to_y_edge);
        if nearest < margin {
            findings.push(
                Finding::warning(
                    RuleId::EdgeDistance,
                    format!(
                        "hole {} at ({:.1}, {:.1}) is {:.1} mm from the nearest edge (minimum {:.1} mm)",
                        i, x, y, nearest, margin
                    ),
                )
                .recommend(format!("keep hole centers at least {:.1} mm from the edge", margin))
                .current(nearest),
            );
        }
    }

    findings
}

fn tolerance(ctx: &RuleContext) -> Vec<Finding> {
    let floor = ctx.tolerance_floor_mm;
    let mut findings = Vec::new();

    for (feature, tol) in &ctx.params.tolerances {
        if *tol < floor {
            findings.push(
                Finding::issue(
                    RuleId::Tolerance,
                    format!(
                        "tolerance \u{b1}{} mm on {} is tighter than the {} capability of \u{b1}{} mm",
                        tol, feature, ctx.process, floor
                    ),
                )
                .recommend(format!("relax the tolerance to \u{b1}{} mm or switch process", floor))
                .current(*tol),
            );
        } else if (*tol - floor).abs() < 1e-12 {
            findings.push(
                Finding::suggestion(
                    RuleId::Tolerance,
                    format!(
                        "tolerance \u{b1}{} mm on {} sits exactly at the {} capability limit",
                        tol, feature, ctx.process
                    ),
                )
                .recommend("relax it if the fit allows, to protect yield")
                .current(*tol),
            );
        }
    }

    findings
}

fn material_process(ctx: &RuleContext) -> Vec<Finding> {
    if ctx.process_compatible {
        return Vec::new();
    }

    vec![Finding::issue(
        RuleId::MaterialProcess,
        format!(
            "{} cannot be run in {} without tooling changes",
            ctx.material, ctx.process
        ),
    )
    .recommend("choose a compatible process or material")]
}
