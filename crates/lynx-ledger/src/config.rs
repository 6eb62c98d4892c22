//! Configuration for the conversion ledger

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// JSON file holding every conversion record
    pub path: PathBuf,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/conversions/conversions.json"),
        }
    }
}

impl LedgerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.path.file_name().is_none() {
            return Err(format!("ledger path must name a file: {}", self.path.display()));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = LedgerConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.path.ends_with("conversions.json"));
    }

    #[test]
    fn test_directory_path_rejected() {
        let config = LedgerConfig {
            path: PathBuf::from("/"),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = LedgerConfig::from_toml(r#"path = "/var/lib/lynx/ledger.json""#).unwrap();
        assert_eq!(config.path, PathBuf::from("/var/lib/lynx/ledger.json"));
        assert_eq!(LedgerConfig::from_toml(&config.to_toml().unwrap()).unwrap(), config);
    }
}
