//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the conversion logic and
//! infrastructure. Implementations live in other crates.

use crate::{Asset, Document, TransferReceipt};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Why a document could not be opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// No file at the given path
    NotFound(String),

    /// The file exists but is not a readable document
    Unreadable(String),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::NotFound(path) => write!(f, "document not found: {}", path),
            DocumentError::Unreadable(reason) => write!(f, "document unreadable: {}", reason),
        }
    }
}

impl std::error::Error for DocumentError {}

/// Trait for reading structured text out of a document file
///
/// Implemented by the infrastructure layer (lynx-extractor)
pub trait DocumentSource {
    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    /// Open a document and return its paragraphs and tables
    fn open(&self, path: &Path) -> Result<Document, DocumentError>;
}

/// Trait for fetching current asset prices
///
/// Implemented by the infrastructure layer (lynx-rates)
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Error type for fetch operations
    type Error: fmt::Display + Send;

    /// Fetch base-currency prices for `assets`
    ///
    /// The returned map may be partial; callers decide whether that is usable.
    async fn fetch(&self, assets: &[Asset]) -> Result<BTreeMap<Asset, Decimal>, Self::Error>;
}

/// Trait for submitting asset transfers
///
/// Implemented by the infrastructure layer (lynx-wallet)
#[async_trait]
pub trait TransferClient: Send + Sync {
    /// Error type for transfer operations
    type Error: fmt::Display + Send;

    /// Submit a transfer of `amount` of `asset` to `destination`
    async fn send(
        &self,
        asset: Asset,
        amount: Decimal,
        destination: &str,
    ) -> Result<TransferReceipt, Self::Error>;
}

/// Trait for looking up and checking destination wallets
///
/// Implemented by the infrastructure layer (lynx-wallet)
pub trait WalletDirectory: Send + Sync {
    /// Configured address for an asset
    fn address_for(&self, asset: Asset) -> Option<String>;

    /// Whether `address` has a valid format for `asset`
    fn is_valid_format(&self, asset: Asset, address: &str) -> bool;
}
