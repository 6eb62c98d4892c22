//! Results returned by the conversion pipeline
//!
//! Amounts stay [`Decimal`] internally and are written as JSON numbers only
//! here, at the output boundary.

use chrono::{DateTime, Utc};
use lynx_domain::{Asset, ConversionRecord, RateTier, TransferOutcome, WalletEntry};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// A single base-currency amount converted into one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SingleConversion {
    /// Amount supplied by the caller
    #[serde(with = "rust_decimal::serde::float")]
    pub original_amount: Decimal,

    /// Currency of `original_amount`
    pub original_currency: String,

    /// Amount of `target_asset` the original amount buys
    #[serde(with = "rust_decimal::serde::float")]
    pub converted_amount: Decimal,

    /// Asset converted into
    pub target_asset: Asset,

    /// Price of one unit of `target_asset`
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,

    /// Tier the rate came from
    pub rate_tier: RateTier,

    /// Human-readable arithmetic, e.g. `100 USD / 45000 USD per BTC = 0.00222222 BTC`
    pub calculation: String,

    /// When the conversion was computed
    pub timestamp: DateTime<Utc>,
}

/// Wallet coverage of one conversion
///
/// `invalid_wallets` counts every entry that is not valid, including missing
/// ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WalletSummary {
    /// Number of assets with a wallet entry
    pub total_wallets: usize,

    /// Entries with a well-formed address
    pub valid_wallets: usize,

    /// Entries without a well-formed address
    pub invalid_wallets: usize,

    /// Entries with no address at all
    pub missing_wallets: usize,
}

impl WalletSummary {
    /// Count the entries of a conversion's wallet map
    pub fn from_entries(entries: &BTreeMap<Asset, WalletEntry>) -> Self {
        let valid_wallets = entries.values().filter(|w| w.valid).count();
        Self {
            total_wallets: entries.len(),
            valid_wallets,
            invalid_wallets: entries.len() - valid_wallets,
            missing_wallets: entries.values().filter(|w| w.address.is_none()).count(),
        }
    }
}

/// A stored conversion with its wallet coverage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioSummary {
    /// The persisted conversion
    #[serde(flatten)]
    pub conversion: ConversionRecord,

    /// Wallet coverage counts
    pub wallet_summary: WalletSummary,
}

/// Result of replaying a conversion through the transfer client
///
/// Partial failure is a normal result; check `transactions` per asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendReport {
    /// Conversion that was replayed
    pub conversion_id: String,

    /// Document the conversion was computed from
    pub source_file: String,

    /// Base-currency total of the conversion
    #[serde(with = "rust_decimal::serde::float")]
    pub total_base_amount: Decimal,

    /// One outcome per asset, in asset order
    pub transactions: Vec<TransferOutcome>,

    /// Whether the conversion is now marked sent
    pub sent: bool,

    /// Why the ledger could not record an accepted send
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_error: Option<String>,
}

impl SendReport {
    /// Number of accepted transfers
    pub fn successful(&self) -> usize {
        self.transactions.iter().filter(|t| t.success).count()
    }

    /// Number of failed transfers
    pub fn failed(&self) -> usize {
        self.transactions.len() - self.successful()
    }
}
