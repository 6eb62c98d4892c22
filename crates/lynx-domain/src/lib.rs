//! Lynx Domain Layer
//!
//! Core value types and collaborator traits shared by every Lynx crate.
//!
//! ## Key Concepts
//!
//! - **BalanceMatch**: One monetary amount found in a document, with provenance
//! - **ScanSummary**: Aggregate statistics over a list of matches
//! - **Asset**: A supported cryptocurrency target (BTC, ETH, USDT, SOL)
//! - **RateTable**: A complete asset → base-currency price mapping
//! - **ConversionRecord**: The persisted outcome of one parse → price → reconcile pass
//! - **TransferOutcome**: The per-asset result of replaying a conversion
//!
//! ## Architecture
//!
//! This crate holds no I/O. Document reading, price fetching, wallet lookup and
//! transfer submission are expressed as traits in [`traits`]; implementations
//! live in the infrastructure crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod asset;
pub mod balance;
pub mod conversion;
pub mod document;
pub mod rates;
pub mod traits;
pub mod transfer;

// Re-exports for convenience
pub use asset::Asset;
pub use balance::{BalanceMatch, CurrencySymbol, ScanSummary, SourceRef};
pub use conversion::{ConversionRecord, ConversionSummary, WalletEntry};
pub use document::{Document, Table};
pub use rates::{IncompleteRates, RateTable, RateTier};
pub use transfer::{TransferOutcome, TransferReceipt, TransferStatus};
