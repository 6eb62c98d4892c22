//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use lynx_converter::{PipelineConfig, ServiceConfig};
use lynx_extractor::ExtractorConfig;
use lynx_ledger::LedgerConfig;
use lynx_rates::RateConfig;
use lynx_wallet::WalletConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
///
/// Every section is optional; missing ones take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Document scanning
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Rate acquisition
    #[serde(default)]
    pub rates: RateConfig,

    /// Conversion storage
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Destination wallets
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Pipeline settings
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".lynx").join("config.toml"))
    }

    /// Load configuration from `path`, or the default location.
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::path()?,
        };
        Self::load_from(&path)
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.service_config().validate().map_err(CliError::Config)
    }

    /// Settings for the conversion pipeline.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            extractor: self.extractor.clone(),
            rates: self.rates.clone(),
            ledger: self.ledger.clone(),
            wallet: self.wallet.clone(),
            pipeline: self.pipeline.clone(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
