//! Configured destination wallets

use crate::address::AddressValidator;
use crate::{WalletConfig, WalletError};
use lynx_domain::traits::WalletDirectory;
use lynx_domain::Asset;
use std::collections::BTreeMap;
use tracing::info;

/// Address book backed by configuration
#[derive(Debug, Clone)]
pub struct ConfiguredWallets {
    addresses: BTreeMap<Asset, String>,
    validator: AddressValidator,
}

impl ConfiguredWallets {
    /// Create an address book from explicit addresses
    pub fn new(addresses: BTreeMap<Asset, String>) -> Result<Self, WalletError> {
        Ok(Self {
            addresses,
            validator: AddressValidator::new()?,
        })
    }

    /// Create an address book from configuration
    pub fn from_config(config: &WalletConfig) -> Result<Self, WalletError> {
        config.validate().map_err(WalletError::Config)?;
        let wallets = Self::new(config.addresses.clone())?;
        info!(count = wallets.addresses.len(), "Loaded wallet addresses");
        Ok(wallets)
    }

    /// Create an address book from `BTC_WALLET`, `ETH_WALLET`, `USDT_WALLET`
    /// and `SOL_WALLET`
    pub fn from_env() -> Result<Self, WalletError> {
        Self::from_config(&WalletConfig::default().with_env_overrides())
    }

    /// Set the address for one asset
    pub fn with_address(mut self, asset: Asset, address: impl Into<String>) -> Self {
        self.addresses.insert(asset, address.into());
        self
    }

    /// Number of configured addresses
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Whether no address is configured
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

impl WalletDirectory for ConfiguredWallets {
    fn address_for(&self, asset: Asset) -> Option<String> {
        self.addresses.get(&asset).cloned()
    }

    fn is_valid_format(&self, asset: Asset, address: &str) -> bool {
        self.validator.is_valid(asset, address)
    }
}
