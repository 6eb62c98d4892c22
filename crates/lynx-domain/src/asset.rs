//! Asset module - the cryptocurrencies a base-currency total can be converted into

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported conversion target
///
/// Ordering follows declaration order, so maps keyed by `Asset` iterate
/// BTC, ETH, USDT, SOL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    /// Bitcoin
    Btc,

    /// Ether
    Eth,

    /// Tether (USD stablecoin)
    Usdt,

    /// Solana
    Sol,
}

impl Asset {
    /// Every supported asset, in display order
    pub const ALL: [Asset; 4] = [Asset::Btc, Asset::Eth, Asset::Usdt, Asset::Sol];

    /// Ticker symbol (e.g. `BTC`)
    pub fn symbol(&self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
            Asset::Usdt => "USDT",
            Asset::Sol => "SOL",
        }
    }

    /// Identifier used by the CoinGecko price API
    pub fn coingecko_id(&self) -> &'static str {
        match self {
            Asset::Btc => "bitcoin",
            Asset::Eth => "ethereum",
            Asset::Usdt => "tether",
            Asset::Sol => "solana",
        }
    }

    /// Parse a ticker symbol, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BTC" => Some(Asset::Btc),
            "ETH" => Some(Asset::Eth),
            "USDT" => Some(Asset::Usdt),
            "SOL" => Some(Asset::Sol),
            _ => None,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Asset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Asset::parse(s).ok_or_else(|| format!("Unknown asset: {}", s))
    }
}
