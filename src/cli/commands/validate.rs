//! `dfmkit validate` command - DFM-validate part files

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::cli::helpers::{load_part, load_tables};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::design::geometry::normalize;
use crate::dfm::{self, Finding, Severity, ValidationResult};

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Part files or directories to validate
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Strict mode - warnings fail validation too
    #[arg(long)]
    pub strict: bool,

    /// Show summary only, don't show individual findings
    #[arg(long)]
    pub summary: bool,
}

/// Validation statistics across all files
#[derive(Default)]
struct ValidationStats {
    files_checked: usize,
    files_passed: usize,
    files_failed: usize,
    total_issues: usize,
    total_warnings: usize,
    total_suggestions: usize,
}

/// Per-file result for serialized output
#[derive(Serialize)]
struct FileReport {
    file: String,
    validation: ValidationResult,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let tables = load_tables(global)?;
    let files = expand_paths(&args.paths);

    if files.is_empty() {
        return Err(miette::miette!("no part files found (expected .yaml/.yml)"));
    }

    let serialized = matches!(global.format, OutputFormat::Yaml | OutputFormat::Json);
    let mut stats = ValidationStats::default();
    let mut reports: Vec<FileReport> = Vec::new();

    for path in &files {
        stats.files_checked += 1;

        let result = load_part(path)
            .and_then(|params| {
                let geom = normalize(&params, &tables).into_diagnostic()?;
                dfm::validate(&params, &geom, &tables).into_diagnostic()
            });

        let result = match result {
            Ok(result) => result,
            Err(err) => {
                stats.files_failed += 1;
                if !global.quiet && !serialized {
                    println!("{} {} - {}", style("\u{2717}").red(), path.display(), err);
                }
                continue;
            }
        };

        stats.total_issues += result.issues.len();
        stats.total_warnings += result.warnings.len();
        stats.total_suggestions += result.suggestions.len();

        let failed = !result.valid || (args.strict && !result.warnings.is_empty());
        if failed {
            stats.files_failed += 1;
        } else {
            stats.files_passed += 1;
        }

        if serialized {
            reports.push(FileReport {
                file: path.display().to_string(),
                validation: result,
            });
        } else if !global.quiet {
            print_file_result(path, &result, args.summary);
        }
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports).into_diagnostic()?)
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&reports).into_diagnostic()?),
        _ => print_summary(&stats, args.strict),
    }

    if stats.files_failed > 0 {
        return Err(miette::miette!(
            "validation failed for {} of {} file(s)",
            stats.files_failed,
            stats.files_checked
        ));
    }
    Ok(())
}

/// Expand directories into the part files they contain
fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                let is_yaml = p
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false);
                if p.is_file() && is_yaml {
                    files.push(p.to_path_buf());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files
}

fn print_file_result(path: &std::path::Path, result: &ValidationResult, summary_only: bool) {
    let verdict = if result.valid {
        style("\u{2713}").green()
    } else {
        style("\u{2717}").red()
    };
    println!(
        "{} {}  score {:.0}  confidence {:.2}",
        verdict,
        style(path.display()).bold(),
        result.dfm_score,
        result.confidence
    );

    if !summary_only {
        for finding in result.findings() {
            print_finding(finding);
        }
    }
    if result.finding_count() > 0 || !summary_only {
        println!();
    }
}

fn print_finding(finding: &Finding) {
    let (marker, rule) = match finding.severity {
        Severity::Issue => (style("\u{2717}").red().bold(), style(finding.rule).red()),
        Severity::Warning => (style("\u{26a0}").yellow(), style(finding.rule).yellow()),
        Severity::Suggestion => (style("\u{2192}").dim(), style(finding.rule).dim()),
    };
    println!("  {} [{}] {}", marker, rule, finding.message);
    if let Some(rec) = &finding.recommendation {
        println!("      {} {}", style("\u{21b3}").dim(), style(rec).dim());
    }
}

fn print_summary(stats: &ValidationStats, strict: bool) {
    let mode = if strict { " (strict)" } else { "" };
    println!(
        "{} file(s) checked{}: {} passed, {} failed; {} issue(s), {} warning(s), {} suggestion(s)",
        stats.files_checked,
        mode,
        style(stats.files_passed).green(),
        if stats.files_failed > 0 {
            style(stats.files_failed).red()
        } else {
            style(stats.files_failed).dim()
        },
        stats.total_issues,
        stats.total_warnings,
        stats.total_suggestions
    );
}
