//! Address format checks
//!
//! These are shape checks only; checksums are not verified.

use crate::WalletError;
use lynx_domain::Asset;
use regex::Regex;

/// Regex-based address format validator
#[derive(Debug, Clone)]
pub struct AddressValidator {
    btc_legacy: Regex,
    btc_bech32: Regex,
    eth: Regex,
    tron: Regex,
    sol: Regex,
}

impl AddressValidator {
    /// Compile the address patterns
    pub fn new() -> Result<Self, WalletError> {
        Ok(Self {
            btc_legacy: Regex::new(r"^[13][a-km-zA-HJ-NP-Z1-9]{25,34}$")?,
            btc_bech32: Regex::new(r"^bc1[a-z0-9]{39,59}$")?,
            eth: Regex::new(r"^0x[a-fA-F0-9]{40}$")?,
            tron: Regex::new(r"^T[A-Za-z0-9]{33}$")?,
            sol: Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$")?,
        })
    }

    /// Whether `address` has a valid shape for `asset`
    ///
    /// USDT accepts both Ethereum and Tron addresses.
    pub fn is_valid(&self, asset: Asset, address: &str) -> bool {
        if address.is_empty() {
            return false;
        }

        match asset {
            Asset::Btc => self.btc_legacy.is_match(address) || self.btc_bech32.is_match(address),
            Asset::Eth => self.eth.is_match(address),
            Asset::Usdt => self.eth.is_match(address) || self.tron.is_match(address),
            Asset::Sol => self.sol.is_match(address),
        }
    }
}
