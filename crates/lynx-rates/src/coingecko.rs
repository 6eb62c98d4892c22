//! CoinGecko price source
//!
//! Queries the `simple/price` endpoint for every requested asset in one call.
//!
//! # Examples
//!
//! ```no_run
//! use lynx_rates::{CoinGeckoSource, RateConfig};
//!
//! let source = CoinGeckoSource::from_config(&RateConfig::default()).unwrap();
//! ```

use crate::{RateConfig, RateError};
use async_trait::async_trait;
use lynx_domain::traits::PriceSource;
use lynx_domain::Asset;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Response body: `{"bitcoin": {"usd": 45123.5}, ...}`
type SimplePriceResponse = HashMap<String, HashMap<String, serde_json::Number>>;

/// Remote price source backed by the CoinGecko API
pub struct CoinGeckoSource {
    api_url: String,
    vs_currency: String,
    client: reqwest::Client,
}

impl CoinGeckoSource {
    /// Create a source for `api_url`, quoting prices in `vs_currency`
    pub fn new(
        api_url: impl Into<String>,
        vs_currency: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RateError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RateError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_url: api_url.into(),
            vs_currency: vs_currency.into().to_lowercase(),
            client,
        })
    }

    /// Create a source from the rate configuration
    pub fn from_config(config: &RateConfig) -> Result<Self, RateError> {
        Self::new(&config.api_url, &config.vs_currency, config.fetch_timeout())
    }
}

/// Pick the requested assets' prices out of a simple-price response
///
/// Assets missing from the body, or without a parseable price in
/// `vs_currency`, are left out of the result.
fn extract_prices(
    body: &SimplePriceResponse,
    assets: &[Asset],
    vs_currency: &str,
) -> BTreeMap<Asset, Decimal> {
    assets
        .iter()
        .filter_map(|asset| {
            let number = body.get(asset.coingecko_id())?.get(vs_currency)?;
            let text = number.to_string();
            let price = Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .ok()?;
            Some((*asset, price))
        })
        .collect()
}

#[async_trait]
impl PriceSource for CoinGeckoSource {
    type Error = RateError;

    async fn fetch(&self, assets: &[Asset]) -> Result<BTreeMap<Asset, Decimal>, RateError> {
        let ids: Vec<&str> = assets.iter().map(Asset::coingecko_id).collect();
        let ids = ids.join(",");

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("ids", ids.as_str()), ("vs_currencies", self.vs_currency.as_str())])
            .send()
            .await
            .map_err(|e| RateError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RateError::Communication(format!("HTTP {}: {}", status, error_text)));
        }

        let body: SimplePriceResponse = response
            .json()
            .await
            .map_err(|e| RateError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let prices = extract_prices(&body, assets, &self.vs_currency);
        debug!(requested = assets.len(), received = prices.len(), "CoinGecko prices");
        Ok(prices)
    }
}
