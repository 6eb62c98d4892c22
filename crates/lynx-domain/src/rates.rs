//! Rates module - complete price tables and the tier they were served from

use crate::Asset;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Prices for every configured asset, in base-currency units per 1 unit of asset
///
/// A `RateTable` can only be built through [`RateTable::complete`], which
/// rejects any input missing a required asset. Partial tables never exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RateTable {
    prices: BTreeMap<Asset, Decimal>,
}

/// A price table that does not cover every required asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteRates {
    /// Assets with no usable (positive) price
    pub missing: Vec<Asset>,
}

impl fmt::Display for IncompleteRates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing: Vec<&str> = self.missing.iter().map(Asset::symbol).collect();
        write!(f, "rate table missing assets: {}", missing.join(", "))
    }
}

impl std::error::Error for IncompleteRates {}

impl RateTable {
    /// Build a table covering exactly `required`
    ///
    /// Prices for assets outside `required` are ignored. A zero or negative
    /// price counts as missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use lynx_domain::{Asset, RateTable};
    /// use rust_decimal::Decimal;
    /// use std::collections::BTreeMap;
    ///
    /// let mut prices = BTreeMap::new();
    /// prices.insert(Asset::Btc, Decimal::from(45_000));
    ///
    /// assert!(RateTable::complete(prices.clone(), &[Asset::Btc]).is_ok());
    /// assert!(RateTable::complete(prices, &Asset::ALL).is_err());
    /// ```
    pub fn complete(
        prices: BTreeMap<Asset, Decimal>,
        required: &[Asset],
    ) -> Result<Self, IncompleteRates> {
        let mut table = BTreeMap::new();
        let mut missing = Vec::new();

        for asset in required {
            match prices.get(asset) {
                Some(price) if price.is_sign_positive() && !price.is_zero() => {
                    table.insert(*asset, *price);
                }
                _ => missing.push(*asset),
            }
        }

        if !missing.is_empty() || table.is_empty() {
            return Err(IncompleteRates { missing });
        }

        Ok(Self { prices: table })
    }

    /// Price of one unit of `asset`, if the table covers it
    pub fn get(&self, asset: Asset) -> Option<Decimal> {
        self.prices.get(&asset).copied()
    }

    /// Iterate `(asset, price)` pairs in asset order
    pub fn iter(&self) -> impl Iterator<Item = (Asset, Decimal)> + '_ {
        self.prices.iter().map(|(asset, price)| (*asset, *price))
    }

    /// Assets covered by this table
    pub fn assets(&self) -> Vec<Asset> {
        self.prices.keys().copied().collect()
    }

    /// Number of assets in the table
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Always false for a constructed table; present for API symmetry
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &BTreeMap<Asset, Decimal> {
        &self.prices
    }
}

/// Which acquisition tier produced a rate table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateTier {
    /// In-memory table younger than the cache TTL
    Cached,

    /// Fetched from the remote source during this call
    Fresh,

    /// Loaded from the durable snapshot after a remote failure
    Snapshot,

    /// Static last-resort table
    Emergency,
}

impl RateTier {
    /// Tier name for logs and output
    pub fn as_str(&self) -> &'static str {
        match self {
            RateTier::Cached => "cached",
            RateTier::Fresh => "fresh",
            RateTier::Snapshot => "snapshot",
            RateTier::Emergency => "emergency",
        }
    }

    /// Whether prices from this tier may be out of date
    pub fn is_degraded(&self) -> bool {
        matches!(self, RateTier::Snapshot | RateTier::Emergency)
    }
}

impl fmt::Display for RateTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(entries: &[(Asset, i64)]) -> BTreeMap<Asset, Decimal> {
        entries
            .iter()
            .map(|(asset, price)| (*asset, Decimal::from(*price)))
            .collect()
    }

    #[test]
    fn test_complete_table() {
        let table = RateTable::complete(
            prices(&[(Asset::Btc, 45_000), (Asset::Eth, 2_800), (Asset::Usdt, 1), (Asset::Sol, 180)]),
            &Asset::ALL,
        )
        .unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.get(Asset::Eth), Some(Decimal::from(2_800)));
        assert_eq!(table.assets(), Asset::ALL.to_vec());
    }

    #[test]
    fn test_partial_table_rejected() {
        let err = RateTable::complete(
            prices(&[(Asset::Btc, 45_000), (Asset::Eth, 2_800)]),
            &Asset::ALL,
        )
        .unwrap_err();

        assert_eq!(err.missing, vec![Asset::Usdt, Asset::Sol]);
        assert!(err.to_string().contains("USDT"));
    }

    #[test]
    fn test_zero_price_counts_as_missing() {
        let err = RateTable::complete(prices(&[(Asset::Btc, 0)]), &[Asset::Btc]).unwrap_err();
        assert_eq!(err.missing, vec![Asset::Btc]);
    }

    #[test]
    fn test_extra_assets_ignored() {
        let table = RateTable::complete(
            prices(&[(Asset::Btc, 45_000), (Asset::Sol, 180)]),
            &[Asset::Btc],
        )
        .unwrap();
        assert_eq!(table.assets(), vec![Asset::Btc]);
        assert_eq!(table.get(Asset::Sol), None);
    }

    #[test]
    fn test_empty_requirement_is_not_a_table() {
        assert!(RateTable::complete(BTreeMap::new(), &[]).is_err());
    }

    #[test]
    fn test_tier_degradation() {
        assert!(!RateTier::Cached.is_degraded());
        assert!(!RateTier::Fresh.is_degraded());
        assert!(RateTier::Snapshot.is_degraded());
        assert!(RateTier::Emergency.is_degraded());
    }
}
