//! Lynx Rate Layer
//!
//! Price acquisition for the conversion targets.
//!
//! # Architecture
//!
//! [`RateCache`] serves complete rate tables through four tiers: an in-memory
//! table younger than the TTL, a fresh fetch from a [`PriceSource`], the last
//! good table persisted on disk, and a static emergency table. The tier is
//! reported with every quote so staleness stays observable.
//!
//! # Sources
//!
//! - `MockPriceSource`: Scripted prices for testing
//! - `CoinGeckoSource`: CoinGecko simple-price API
//!
//! # Examples
//!
//! ```
//! use lynx_rates::{MockPriceSource, RateCache, RateConfig};
//! use lynx_domain::{Asset, RateTier};
//!
//! # async fn example() -> Result<(), lynx_rates::RateError> {
//! let source = MockPriceSource::unavailable();
//! let config = RateConfig {
//!     snapshot_path: std::env::temp_dir().join("lynx-doc-missing").join("rates.json"),
//!     ..RateConfig::default()
//! };
//! let cache = RateCache::new(source, config)?;
//!
//! let quote = cache.get_rates().await?;
//! assert_eq!(quote.tier, RateTier::Emergency);
//! assert!(quote.rates.get(Asset::Btc).is_some());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod cache;
pub mod coingecko;
pub mod config;
pub mod snapshot;

use async_trait::async_trait;
use lynx_domain::traits::PriceSource;
use lynx_domain::Asset;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

pub use cache::{RateCache, RateQuote};
pub use coingecko::CoinGeckoSource;
pub use config::RateConfig;
pub use snapshot::RateSnapshot;

/// Errors that can occur during rate acquisition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response could not be parsed or did not cover every asset
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Remote fetch exceeded its time budget
    #[error("Rate fetch timed out after {0}s")]
    Timeout(u64),

    /// Snapshot file missing, unreadable or incomplete
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// No tier could produce a complete table
    #[error("Rates unavailable: {0}")]
    Unavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

type ScriptedResponse = Result<BTreeMap<Asset, Decimal>, String>;

/// Mock price source for deterministic testing
///
/// Scripted responses are consumed in order; once the script is empty every
/// call returns the default prices, or fails if there are none.
///
/// # Examples
///
/// ```
/// use lynx_rates::MockPriceSource;
/// use lynx_domain::Asset;
/// use rust_decimal::Decimal;
///
/// let source = MockPriceSource::new([(Asset::Btc, Decimal::from(45_000))]);
/// source.push_failure("connection reset");
/// assert_eq!(source.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockPriceSource {
    default_prices: Option<BTreeMap<Asset, Decimal>>,
    script: Arc<Mutex<VecDeque<ScriptedResponse>>>,
    call_count: Arc<Mutex<usize>>,
    delay: Option<Duration>,
}

impl MockPriceSource {
    /// Create a source that always returns `prices`
    pub fn new(prices: impl IntoIterator<Item = (Asset, Decimal)>) -> Self {
        Self {
            default_prices: Some(prices.into_iter().collect()),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
            delay: None,
        }
    }

    /// Create a source whose every call fails
    pub fn unavailable() -> Self {
        Self {
            default_prices: None,
            ..Self::new(BTreeMap::new())
        }
    }

    /// Sleep for `delay` before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a one-off successful response
    pub fn push_prices(&self, prices: impl IntoIterator<Item = (Asset, Decimal)>) {
        self.lock_script().push_back(Ok(prices.into_iter().collect()));
    }

    /// Queue a one-off failure
    pub fn push_failure(&self, message: impl Into<String>) {
        self.lock_script().push_back(Err(message.into()));
    }

    /// Get the number of times fetch was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner) = 0;
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<ScriptedResponse>> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PriceSource for MockPriceSource {
    type Error = RateError;

    async fn fetch(&self, assets: &[Asset]) -> Result<BTreeMap<Asset, Decimal>, RateError> {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self.lock_script().pop_front();
        let prices = match scripted {
            Some(Ok(prices)) => prices,
            Some(Err(message)) => return Err(RateError::Communication(message)),
            None => self
                .default_prices
                .clone()
                .ok_or_else(|| RateError::Communication("Mock source unavailable".to_string()))?,
        };

        Ok(prices
            .into_iter()
            .filter(|(asset, _)| assets.contains(asset))
            .collect())
    }
}
