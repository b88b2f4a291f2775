//! Stock materials known to the built-in reference tables

use serde::{Deserialize, Serialize};

/// Stock material selection
///
/// Density and pricing live in the reference tables, not here; the enum
/// only fixes the set of names part files may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Material {
    #[serde(rename = "aluminum_6061_t6")]
    Aluminum6061T6,
    #[serde(rename = "steel_mild")]
    SteelMild,
    #[serde(rename = "stainless_304")]
    Stainless304,
    #[serde(rename = "plastic_abs")]
    PlasticAbs,
    #[serde(rename = "plastic_pla")]
    PlasticPla,
    #[serde(rename = "titanium")]
    Titanium,
}

impl Default for Material {
    fn default() -> Self {
        Material::Aluminum6061T6
    }
}

impl Material {
    /// All known materials, in display order
    pub fn all() -> &'static [Material] {
        &[
            Material::Aluminum6061T6,
            Material::SteelMild,
            Material::Stainless304,
            Material::PlasticAbs,
            Material::PlasticPla,
            Material::Titanium,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Aluminum6061T6 => "aluminum_6061_t6",
            Material::SteelMild => "steel_mild",
            Material::Stainless304 => "stainless_304",
            Material::PlasticAbs => "plastic_abs",
            Material::PlasticPla => "plastic_pla",
            Material::Titanium => "titanium",
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Material {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aluminum_6061_t6" | "aluminum" => Ok(Material::Aluminum6061T6),
            "steel_mild" | "steel" => Ok(Material::SteelMild),
            "stainless_304" | "stainless" => Ok(Material::Stainless304),
            "plastic_abs" | "abs" => Ok(Material::PlasticAbs),
            "plastic_pla" | "pla" => Ok(Material::PlasticPla),
            "titanium" => Ok(Material::Titanium),
            _ => Err(format!(
                "Invalid material: {}. Use aluminum_6061_t6, steel_mild, stainless_304, plastic_abs, plastic_pla, or titanium",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_roundtrip() {
        for mat in Material::all() {
            let yaml = serde_yml::to_string(mat).unwrap();
            let parsed: Material = serde_yml::from_str(&yaml).unwrap();
            assert_eq!(parsed, *mat);
        }
    }

    #[test]
    fn test_material_from_str_aliases() {
        assert_eq!("aluminum".parse::<Material>().unwrap(), Material::Aluminum6061T6);
        assert_eq!("abs".parse::<Material>().unwrap(), Material::PlasticAbs);
        assert!("unobtanium".parse::<Material>().is_err());
    }

    #[test]
    fn test_material_display_matches_serde() {
        let yaml = serde_yml::to_string(&Material::Stainless304).unwrap();
        assert_eq!(yaml.trim(), Material::Stainless304.to_string());
    }
}
