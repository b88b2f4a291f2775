//! Command implementations

pub mod completions;
pub mod components;
pub mod cost;
pub mod inspect;
pub mod tables;
pub mod validate;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};

/// Write report content to a file, or stdout when no path is given
pub(crate) fn write_output(content: &str, output_path: Option<PathBuf>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(&path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
