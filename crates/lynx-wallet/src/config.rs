//! Wallet configuration

use lynx_domain::Asset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Destination addresses and transfer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Destination address per asset
    pub addresses: BTreeMap<Asset, String>,

    /// Assets the simulated transfer client accepts
    pub transfer_assets: Vec<Asset>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            addresses: BTreeMap::new(),
            transfer_assets: vec![Asset::Eth, Asset::Usdt],
        }
    }
}

impl WalletConfig {
    /// Environment variable holding the address for `asset`, e.g. `BTC_WALLET`
    pub fn env_var(asset: Asset) -> String {
        format!("{}_WALLET", asset.symbol())
    }

    /// Override addresses with any set `*_WALLET` environment variables
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Override addresses using `lookup` to resolve `*_WALLET` variables
    ///
    /// Blank values are ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        for asset in Asset::ALL {
            if let Some(address) = lookup(&Self::env_var(asset)) {
                let address = address.trim();
                if !address.is_empty() {
                    self.addresses.insert(asset, address.to_string());
                }
            }
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if let Some((asset, _)) = self.addresses.iter().find(|(_, a)| a.trim().is_empty()) {
            return Err(format!("address for {} is blank", asset));
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
