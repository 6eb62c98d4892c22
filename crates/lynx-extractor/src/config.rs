//! Configuration for the Extractor

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration for number extraction and document scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// File extensions (without the dot, lowercase) the scanner accepts
    #[serde(default = "default_extensions")]
    pub accepted_extensions: Vec<String>,

    /// Smallest amount kept
    #[serde(default = "default_min_value")]
    pub min_value: Decimal,

    /// Largest amount kept
    #[serde(default = "default_max_value")]
    pub max_value: Decimal,

    /// Drop candidates immediately followed by `%`
    #[serde(default = "default_skip_percentages")]
    pub skip_percentages: bool,
}

fn default_extensions() -> Vec<String> {
    vec!["docx".to_string(), "dox".to_string()]
}

fn default_min_value() -> Decimal {
    Decimal::new(1, 2)
}

fn default_max_value() -> Decimal {
    Decimal::from(999_999_999_999_i64)
}

fn default_skip_percentages() -> bool {
    true
}

impl Default for ExtractorConfig {
    /// `.docx`/`.dox` documents, amounts in `[0.01, 999999999999]`
    fn default() -> Self {
        Self {
            accepted_extensions: default_extensions(),
            min_value: default_min_value(),
            max_value: default_max_value(),
            skip_percentages: default_skip_percentages(),
        }
    }
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.accepted_extensions.is_empty() {
            return Err("accepted_extensions must not be empty".to_string());
        }
        if self.accepted_extensions.iter().any(|ext| ext.starts_with('.')) {
            return Err("accepted_extensions must not include the leading dot".to_string());
        }
        if self.min_value.is_sign_negative() {
            return Err("min_value must not be negative".to_string());
        }
        if self.min_value > self.max_value {
            return Err("min_value cannot exceed max_value".to_string());
        }
        Ok(())
    }

    /// Whether a file extension is accepted (case-insensitive)
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.accepted_extensions
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(extension))
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
