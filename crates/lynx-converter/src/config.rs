//! Configuration for the conversion pipeline

use lynx_extractor::ExtractorConfig;
use lynx_ledger::LedgerConfig;
use lynx_rates::RateConfig;
use lynx_wallet::WalletConfig;
use serde::{Deserialize, Serialize};

/// Pipeline settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Currency document balances are denominated in
    pub base_currency: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_currency: "USD".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let code = self.base_currency.trim();
        if code.is_empty() {
            return Err("base_currency must not be empty".to_string());
        }
        if !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!("base_currency must be a currency code: {}", code));
        }
        Ok(())
    }

    /// Whether `currency` names the base currency, ignoring case
    pub fn is_base(&self, currency: &str) -> bool {
        currency.trim().eq_ignore_ascii_case(self.base_currency.trim())
    }

    /// Base currency code in upper case
    pub fn base_code(&self) -> String {
        self.base_currency.trim().to_uppercase()
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

/// Settings for every component a [`ConverterContext`](crate::ConverterContext) wires up
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Document scanning
    pub extractor: ExtractorConfig,

    /// Rate acquisition
    pub rates: RateConfig,

    /// Conversion storage
    pub ledger: LedgerConfig,

    /// Destination wallets
    pub wallet: WalletConfig,

    /// Pipeline settings
    pub pipeline: PipelineConfig,
}

impl ServiceConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        self.extractor.validate().map_err(|e| format!("extractor: {}", e))?;
        self.rates.validate().map_err(|e| format!("rates: {}", e))?;
        self.ledger.validate().map_err(|e| format!("ledger: {}", e))?;
        self.wallet.validate().map_err(|e| format!("wallet: {}", e))?;
        self.pipeline.validate().map_err(|e| format!("pipeline: {}", e))?;
        Ok(())
    }
}
