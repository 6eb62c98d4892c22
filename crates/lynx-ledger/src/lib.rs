//! Lynx Ledger
//!
//! Durable storage of conversion results.
//!
//! # Architecture
//!
//! - One JSON file holds the list of every [`ConversionRecord`](lynx_domain::ConversionRecord)
//! - Each operation runs under a single lock spanning read, modify and write
//! - Writes go to a temp file that is renamed over the original
//!
//! Records are immutable once saved except for the `sent` flag and its
//! timestamp, which flip at most once.

#![warn(missing_docs)]

mod config;
pub mod id;
mod ledger;

use thiserror::Error;

pub use config::LedgerConfig;
pub use ledger::{ConversionDraft, ConversionLedger};

/// Errors that can occur during ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ledger file exists but is not a valid record list
    #[error("Corrupt ledger: {0}")]
    Corrupt(String),

    /// Records could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
