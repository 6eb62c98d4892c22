//! Tiered rate acquisition
//!
//! ```text
//! cached (younger than TTL) → remote fetch → disk snapshot → emergency table
//! ```
//!
//! Every tier yields a complete [`RateTable`]; a remote response missing any
//! configured asset is treated as a failed fetch.

use crate::snapshot::RateSnapshot;
use crate::{RateConfig, RateError};
use lynx_domain::traits::PriceSource;
use lynx_domain::{RateTable, RateTier};
use serde::Serialize;
use std::sync::{PoisonError, RwLock};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// A rate table and the tier it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateQuote {
    /// Complete price table
    pub rates: RateTable,

    /// Acquisition tier
    pub tier: RateTier,
}

/// In-memory table and the instant it was fetched, always replaced together
#[derive(Debug, Clone)]
struct CachedRates {
    table: RateTable,
    fetched_at: Instant,
}

/// Rate cache with remote, snapshot and emergency fallbacks
pub struct RateCache<P> {
    source: P,
    config: RateConfig,
    state: RwLock<Option<CachedRates>>,
}

impl<P: PriceSource> RateCache<P> {
    /// Create a cache over `source`
    ///
    /// # Errors
    ///
    /// Returns [`RateError::Config`] if the configuration is invalid,
    /// including an emergency table that misses a configured asset.
    pub fn new(source: P, config: RateConfig) -> Result<Self, RateError> {
        config.validate().map_err(RateError::Config)?;
        Ok(Self {
            source,
            config,
            state: RwLock::new(None),
        })
    }

    /// Get the cache configuration
    pub fn config(&self) -> &RateConfig {
        &self.config
    }

    /// Get current rates
    ///
    /// Only fails with [`RateError::Unavailable`] if even the emergency
    /// table is incomplete.
    pub async fn get_rates(&self) -> Result<RateQuote, RateError> {
        if let Some(rates) = self.cached() {
            debug!("Using cached rates");
            return Ok(RateQuote {
                rates,
                tier: RateTier::Cached,
            });
        }

        self.refresh().await
    }

    /// Drop the in-memory table and fetch again
    pub async fn force_refresh(&self) -> Result<RateQuote, RateError> {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.refresh().await
    }

    async fn refresh(&self) -> Result<RateQuote, RateError> {
        match self.fetch_remote().await {
            Ok(rates) => {
                self.store(rates.clone());
                self.persist(&rates);
                info!(assets = rates.len(), "Fetched fresh rates");
                return Ok(RateQuote {
                    rates,
                    tier: RateTier::Fresh,
                });
            }
            Err(e) => warn!(error = %e, "Remote rate fetch failed"),
        }

        match self.load_snapshot() {
            Ok(rates) => {
                warn!(
                    path = %self.config.snapshot_path.display(),
                    "Using fallback rates from snapshot"
                );
                return Ok(RateQuote {
                    rates,
                    tier: RateTier::Snapshot,
                });
            }
            Err(e) => debug!(error = %e, "Snapshot unusable"),
        }

        let rates = self
            .config
            .emergency_table()
            .map_err(|e| RateError::Unavailable(e.to_string()))?;
        error!("No rates available from remote or snapshot, using emergency rates");
        Ok(RateQuote {
            rates,
            tier: RateTier::Emergency,
        })
    }

    fn cached(&self) -> Option<RateTable> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.config.cache_ttl())
            .map(|cached| cached.table.clone())
    }

    fn store(&self, table: RateTable) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = Some(CachedRates {
            table,
            fetched_at: Instant::now(),
        });
    }

    async fn fetch_remote(&self) -> Result<RateTable, RateError> {
        let prices = tokio::time::timeout(
            self.config.fetch_timeout(),
            self.source.fetch(&self.config.assets),
        )
        .await
        .map_err(|_| RateError::Timeout(self.config.fetch_timeout_secs))?
        .map_err(|e| RateError::Communication(e.to_string()))?;

        RateTable::complete(prices, &self.config.assets)
            .map_err(|e| RateError::InvalidResponse(e.to_string()))
    }

    fn persist(&self, table: &RateTable) {
        let path = &self.config.snapshot_path;
        match RateSnapshot::new(table).save(path) {
            Ok(()) => debug!(path = %path.display(), "Saved fallback rates"),
            Err(e) => error!(error = %e, "Failed to save fallback rates"),
        }
    }

    fn load_snapshot(&self) -> Result<RateTable, RateError> {
        let path = &self.config.snapshot_path;
        let snapshot = RateSnapshot::load(path)?
            .ok_or_else(|| RateError::Snapshot(format!("no snapshot at {}", path.display())))?;

        snapshot
            .into_table(&self.config.assets)
            .map_err(|e| RateError::Snapshot(e.to_string()))
    }
}
