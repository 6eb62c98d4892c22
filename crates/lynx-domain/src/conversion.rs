//! Conversion module - persisted conversion outcomes

use crate::Asset;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Destination wallet for one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletEntry {
    /// Configured address, if any
    pub address: Option<String>,

    /// Whether `address` is present and well-formed for the asset
    pub valid: bool,
}

impl WalletEntry {
    /// Entry for an asset with no configured address
    pub fn missing() -> Self {
        Self {
            address: None,
            valid: false,
        }
    }
}

/// One persisted conversion
///
/// Everything except `sent` and `sent_at` is fixed once the ledger writes the
/// record. `sent` moves from false to true at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRecord {
    /// Ledger-assigned identifier
    pub id: String,

    /// When the ledger stored the record
    pub created_at: DateTime<Utc>,

    /// Document the balances were read from
    pub source_file: String,

    /// Currency the document balances are denominated in
    #[serde(default = "default_base_currency")]
    pub base_currency: String,

    /// Sum of every extracted balance
    pub total_base_amount: Decimal,

    /// How much of each asset the total could buy
    pub per_asset_amounts: BTreeMap<Asset, Decimal>,

    /// Destination wallet per asset
    pub wallet_info: BTreeMap<Asset, WalletEntry>,

    /// Prices used for the conversion
    pub rate_snapshot: BTreeMap<Asset, Decimal>,

    /// Whether the amounts have been transferred
    #[serde(default)]
    pub sent: bool,

    /// When the record was marked sent
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
}

fn default_base_currency() -> String {
    "USD".to_string()
}

/// Listing view of a conversion record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSummary {
    /// Record identifier
    pub id: String,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Source document
    pub source_file: String,

    /// Base-currency total
    pub total_base_amount: Decimal,

    /// Assets the total was converted into
    pub assets: Vec<Asset>,

    /// Whether the record has been sent
    pub sent: bool,
}

impl From<&ConversionRecord> for ConversionSummary {
    fn from(record: &ConversionRecord) -> Self {
        Self {
            id: record.id.clone(),
            created_at: record.created_at,
            source_file: record.source_file.clone(),
            total_base_amount: record.total_base_amount,
            assets: record.per_asset_amounts.keys().copied().collect(),
            sent: record.sent,
        }
    }
}
