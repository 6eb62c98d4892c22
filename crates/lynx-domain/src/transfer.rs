//! Transfer module - results of submitting converted amounts to wallets

use crate::Asset;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Submission state reported for a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    /// Accepted by the network, not yet final
    Pending,

    /// Not broadcast; produced by a simulated client
    Simulated,

    /// Not submitted
    Failed,
}

/// Acknowledgement returned by a transfer collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Transaction hash (or simulated identifier)
    pub tx_hash: String,

    /// Submission state
    pub status: TransferStatus,
}

/// Result of transferring one asset amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOutcome {
    /// Asset transferred
    pub asset: Asset,

    /// Amount of the asset
    pub amount: Decimal,

    /// Destination address, if one could be determined
    pub destination: Option<String>,

    /// Whether the collaborator accepted the transfer
    pub success: bool,

    /// Submission state
    pub status: TransferStatus,

    /// Transaction hash on success
    pub tx_hash: Option<String>,

    /// Failure reason
    pub error: Option<String>,

    /// When the attempt was made
    pub timestamp: DateTime<Utc>,
}

impl TransferOutcome {
    /// Outcome for an accepted transfer
    pub fn accepted(asset: Asset, amount: Decimal, destination: String, receipt: TransferReceipt) -> Self {
        Self {
            asset,
            amount,
            destination: Some(destination),
            success: true,
            status: receipt.status,
            tx_hash: Some(receipt.tx_hash),
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Outcome for a transfer that was rejected or never submitted
    pub fn failed(
        asset: Asset,
        amount: Decimal,
        destination: Option<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            asset,
            amount,
            destination,
            success: false,
            status: TransferStatus::Failed,
            tx_hash: None,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }
}
