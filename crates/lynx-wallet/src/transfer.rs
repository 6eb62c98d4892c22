//! Simulated transfer client
//!
//! Signing and broadcasting are not implemented. Transfers of supported
//! assets are acknowledged with a `sim_<asset>_<YYYYMMDD_HHMMSS>` hash and
//! recorded for inspection.

use crate::WalletError;
use async_trait::async_trait;
use chrono::Utc;
use lynx_domain::traits::TransferClient;
use lynx_domain::{Asset, TransferReceipt, TransferStatus};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

/// A transfer the simulated client accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Asset sent
    pub asset: Asset,

    /// Amount sent
    pub amount: Decimal,

    /// Destination address
    pub destination: String,

    /// Hash handed back to the caller
    pub tx_hash: String,
}

/// Transfer client that acknowledges without broadcasting
#[derive(Debug, Clone)]
pub struct SimulatedTransferClient {
    supported: Vec<Asset>,
    submissions: Arc<Mutex<Vec<Submission>>>,
}

impl SimulatedTransferClient {
    /// Create a client accepting `supported` assets
    pub fn new(supported: impl IntoIterator<Item = Asset>) -> Self {
        Self {
            supported: supported.into_iter().collect(),
            submissions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Whether transfers of `asset` are accepted
    pub fn supports(&self, asset: Asset) -> bool {
        self.supported.contains(&asset)
    }

    /// Transfers accepted so far
    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for SimulatedTransferClient {
    /// Accepts ETH and USDT
    fn default() -> Self {
        Self::new([Asset::Eth, Asset::Usdt])
    }
}

#[async_trait]
impl TransferClient for SimulatedTransferClient {
    type Error = WalletError;

    async fn send(
        &self,
        asset: Asset,
        amount: Decimal,
        destination: &str,
    ) -> Result<TransferReceipt, WalletError> {
        if !self.supports(asset) {
            return Err(WalletError::Unsupported(asset));
        }
        if amount <= Decimal::ZERO {
            return Err(WalletError::InvalidAmount(amount));
        }

        let tx_hash = format!(
            "sim_{}_{}",
            asset.symbol().to_lowercase(),
            Utc::now().format("%Y%m%d_%H%M%S")
        );

        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Submission {
                asset,
                amount,
                destination: destination.to_string(),
                tx_hash: tx_hash.clone(),
            });

        info!(%asset, %amount, destination, tx_hash = %tx_hash, "Simulated transfer");
        Ok(TransferReceipt {
            tx_hash,
            status: TransferStatus::Simulated,
        })
    }
}
