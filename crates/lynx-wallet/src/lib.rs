//! Lynx Wallet Layer
//!
//! Destination wallets and transfer submission.
//!
//! # Components
//!
//! - `ConfiguredWallets`: Address book from configuration or `*_WALLET` environment variables
//! - `AddressValidator`: Per-asset address format checks
//! - `SimulatedTransferClient`: Transfer collaborator that acknowledges without broadcasting
//!
//! # Examples
//!
//! ```
//! use lynx_wallet::ConfiguredWallets;
//! use lynx_domain::traits::WalletDirectory;
//! use lynx_domain::Asset;
//! use std::collections::BTreeMap;
//!
//! let wallets = ConfiguredWallets::new(BTreeMap::new())
//!     .unwrap()
//!     .with_address(Asset::Eth, "0x742d35Cc6634C0532925a3b844Bc454e4438f44e");
//!
//! let address = wallets.address_for(Asset::Eth).unwrap();
//! assert!(wallets.is_valid_format(Asset::Eth, &address));
//! ```

#![warn(missing_docs)]

pub mod address;
mod config;
mod directory;
pub mod transfer;

use lynx_domain::Asset;
use rust_decimal::Decimal;
use thiserror::Error;

pub use address::AddressValidator;
pub use config::WalletConfig;
pub use directory::ConfiguredWallets;
pub use transfer::{SimulatedTransferClient, Submission};

/// Errors that can occur during wallet operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// The asset cannot be transferred by this client
    #[error("Currency {0} not supported for blockchain transactions")]
    Unsupported(Asset),

    /// Transfer amount must be positive
    #[error("Invalid transfer amount: {0}")]
    InvalidAmount(Decimal),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<regex::Error> for WalletError {
    fn from(e: regex::Error) -> Self {
        WalletError::Config(format!("invalid address pattern: {}", e))
    }
}
