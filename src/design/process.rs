//! Manufacturing process selection

use serde::{Deserialize, Serialize};

/// Candidate manufacturing process
///
/// Rates, capability floors, and lead times live in the reference tables;
/// cost models and the comparator match on this enum exhaustively, so a
/// new process cannot be added without wiring up its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Process {
    #[serde(rename = "cnc_milling")]
    CncMilling,
    #[serde(rename = "3d_printing")]
    Printing3d,
    #[serde(rename = "injection_molding")]
    InjectionMolding,
    #[serde(rename = "sheet_metal")]
    SheetMetal,
}

impl Default for Process {
    fn default() -> Self {
        Process::CncMilling
    }
}

impl Process {
    /// All candidate processes, in comparison order
    pub fn all() -> &'static [Process] {
        &[
            Process::CncMilling,
            Process::Printing3d,
            Process::InjectionMolding,
            Process::SheetMetal,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Process::CncMilling => "cnc_milling",
            Process::Printing3d => "3d_printing",
            Process::InjectionMolding => "injection_molding",
            Process::SheetMetal => "sheet_metal",
        }
    }
}

impl std::fmt::Display for Process {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Process {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cnc_milling" | "cnc" | "milling" => Ok(Process::CncMilling),
            "3d_printing" | "printing" | "fdm" => Ok(Process::Printing3d),
            "injection_molding" | "molding" => Ok(Process::InjectionMolding),
            "sheet_metal" => Ok(Process::SheetMetal),
            _ => Err(format!(
                "Invalid process: {}. Use cnc_milling, 3d_printing, injection_molding, or sheet_metal",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_roundtrip() {
        for proc in Process::all() {
            let yaml = serde_yml::to_string(proc).unwrap();
            let parsed: Process = serde_yml::from_str(&yaml).unwrap();
            assert_eq!(parsed, *proc);
        }
    }

    #[test]
    fn test_process_serde_names() {
        let parsed: Process = serde_yml::from_str("3d_printing").unwrap();
        assert_eq!(parsed, Process::Printing3d);
        assert_eq!(Process::Printing3d.to_string(), "3d_printing");
    }

    #[test]
    fn test_process_from_str_aliases() {
        assert_eq!("cnc".parse::<Process>().unwrap(), Process::CncMilling);
        assert_eq!("fdm".parse::<Process>().unwrap(), Process::Printing3d);
        assert!("forging".parse::<Process>().is_err());
    }
}
