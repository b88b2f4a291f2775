//! User configuration with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

/// dfmkit configuration, merged from defaults, the global config file,
/// and environment variables (later layers win)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default order quantity for cost estimates
    pub default_quantity: Option<u32>,

    /// Path to a replacement reference-tables file
    pub tables: Option<PathBuf>,

    /// Default output format name
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/dfmkit/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Environment variables
        if let Ok(qty) = std::env::var("DFMKIT_QUANTITY") {
            if let Ok(qty) = qty.parse() {
                config.default_quantity = Some(qty);
            }
        }
        if let Ok(tables) = std::env::var("DFMKIT_TABLES") {
            config.tables = Some(PathBuf::from(tables));
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "dfmkit")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.default_quantity.is_some() {
            self.default_quantity = other.default_quantity;
        }
        if other.tables.is_some() {
            self.tables = other.tables;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Effective default quantity for cost estimates
    pub fn default_quantity(&self) -> u32 {
        self.default_quantity.unwrap_or(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_quantity_fallback() {
        let config = Config::default();
        assert_eq!(config.default_quantity(), 100);
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            default_quantity: Some(50),
            tables: None,
            default_format: Some("table".to_string()),
        };
        base.merge(Config {
            default_quantity: Some(250),
            tables: Some(PathBuf::from("/tmp/tables.yaml")),
            default_format: None,
        });

        assert_eq!(base.default_quantity(), 250);
        assert_eq!(base.tables, Some(PathBuf::from("/tmp/tables.yaml")));
        assert_eq!(base.default_format.as_deref(), Some("table"));
    }

    #[test]
    fn test_parse_config_yaml() {
        let config: Config =
            serde_yml::from_str("default_quantity: 500\ntables: /etc/dfmkit/tables.yaml\n")
                .unwrap();
        assert_eq!(config.default_quantity(), 500);
        assert!(config.tables.is_some());
    }
}
