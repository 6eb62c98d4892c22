//! Configuration for rate acquisition

use lynx_domain::{Asset, IncompleteRates, RateTable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Default CoinGecko simple-price endpoint
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

/// Configuration for the rate cache and its sources
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    /// Remote price endpoint
    pub api_url: String,

    /// Quote currency requested from the remote source
    pub vs_currency: String,

    /// Assets every rate table must cover
    pub assets: Vec<Asset>,

    /// How long a fetched table is served from memory
    pub cache_ttl_secs: u64,

    /// Upper bound on a single remote fetch
    pub fetch_timeout_secs: u64,

    /// Durable fallback snapshot location
    pub snapshot_path: PathBuf,

    /// Last-resort static prices
    pub emergency_rates: BTreeMap<Asset, Decimal>,
}

impl Default for RateConfig {
    fn default() -> Self {
        let emergency_rates = [
            (Asset::Btc, Decimal::new(45_000_00, 2)),
            (Asset::Eth, Decimal::new(2_800_00, 2)),
            (Asset::Usdt, Decimal::new(1_00, 2)),
            (Asset::Sol, Decimal::new(180_00, 2)),
        ]
        .into_iter()
        .collect();

        Self {
            api_url: DEFAULT_API_URL.to_string(),
            vs_currency: "usd".to_string(),
            assets: Asset::ALL.to_vec(),
            cache_ttl_secs: 15 * 60,
            fetch_timeout_secs: 10,
            snapshot_path: PathBuf::from("data/fallback_rates.json"),
            emergency_rates,
        }
    }
}

impl RateConfig {
    /// Cache TTL as a duration
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Fetch timeout as a duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Build the emergency table for the configured assets
    pub fn emergency_table(&self) -> Result<RateTable, IncompleteRates> {
        RateTable::complete(self.emergency_rates.clone(), &self.assets)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.assets.is_empty() {
            return Err("assets must not be empty".to_string());
        }
        if self.vs_currency.trim().is_empty() {
            return Err("vs_currency must not be empty".to_string());
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be greater than 0".to_string());
        }
        self.emergency_table()
            .map_err(|e| format!("emergency_rates incomplete: {}", e))?;
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
    fn test_default_config_is_valid() {
        let config = RateConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache_ttl(), Duration::from_secs(900));
        assert_eq!(config.emergency_table().unwrap().get(Asset::Btc), Some(Decimal::from(45_000)));
    }

    #[test]
    fn test_incomplete_emergency_rates_rejected() {
        let mut config = RateConfig::default();
        config.emergency_rates.remove(&Asset::Sol);
        let err = config.validate().unwrap_err();
        assert!(err.contains("SOL"));
    }

    #[test]
    fn test_emergency_rates_may_cover_more_than_assets() {
        let config = RateConfig {
            assets: vec![Asset::Btc],
            ..RateConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.emergency_table().unwrap().len(), 1);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = RateConfig {
            fetch_timeout_secs: 0,
            ..RateConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = RateConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = RateConfig::from_toml(&toml_str).unwrap();

        assert_eq!(parsed.assets, config.assets);
        assert_eq!(parsed.emergency_rates, config.emergency_rates);
        assert_eq!(parsed.snapshot_path, config.snapshot_path);
    }

    #[test]
    fn test_partial_toml() {
        let config = RateConfig::from_toml(
            r#"
            cache_ttl_secs = 60
            assets = ["BTC", "ETH"]
            "#,
        )
        .unwrap();

        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.assets, vec![Asset::Btc, Asset::Eth]);
        assert_eq!(config.fetch_timeout_secs, 10);
    }
}
