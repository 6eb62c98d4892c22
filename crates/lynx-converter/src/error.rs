//! Error surface of the conversion pipeline

use lynx_extractor::ExtractorError;
use lynx_ledger::LedgerError;
use lynx_rates::RateError;
use lynx_wallet::WalletError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by [`ConversionPipeline`](crate::ConversionPipeline)
///
/// Lower-layer errors are folded into these variants; callers never see an
/// `ExtractorError`, `RateError` or `LedgerError` directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// Missing document or conversion record
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document type is not accepted
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Document exists but cannot be read
    #[error("Corrupt document: {0}")]
    CorruptDocument(String),

    /// Document contains no amounts
    #[error("No valid balances found in {0}")]
    NoBalancesFound(String),

    /// No rate tier produced a table
    #[error("Rates unavailable: {0}")]
    RatesUnavailable(String),

    /// Requested asset is not in the rate table
    #[error("Rate not available for {0}")]
    RateNotAvailable(String),

    /// Currency pair is not supported
    #[error("Unsupported conversion: {0}")]
    UnsupportedConversion(String),

    /// Conversion was already transferred
    #[error("Conversion {0} has already been sent")]
    AlreadySent(String),

    /// Ledger could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Stable machine-readable error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`ConvertError::NotFound`]
    NotFound,
    /// See [`ConvertError::UnsupportedFormat`]
    UnsupportedFormat,
    /// See [`ConvertError::CorruptDocument`]
    CorruptDocument,
    /// See [`ConvertError::NoBalancesFound`]
    NoBalancesFound,
    /// See [`ConvertError::RatesUnavailable`]
    RatesUnavailable,
    /// See [`ConvertError::RateNotAvailable`]
    RateNotAvailable,
    /// See [`ConvertError::UnsupportedConversion`]
    UnsupportedConversion,
    /// See [`ConvertError::AlreadySent`]
    AlreadySent,
    /// See [`ConvertError::Storage`]
    Storage,
    /// See [`ConvertError::Config`]
    Config,
}

impl ErrorKind {
    /// Snake-case name, as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::UnsupportedFormat => "unsupported_format",
            ErrorKind::CorruptDocument => "corrupt_document",
            ErrorKind::NoBalancesFound => "no_balances_found",
            ErrorKind::RatesUnavailable => "rates_unavailable",
            ErrorKind::RateNotAvailable => "rate_not_available",
            ErrorKind::UnsupportedConversion => "unsupported_conversion",
            ErrorKind::AlreadySent => "already_sent",
            ErrorKind::Storage => "storage",
            ErrorKind::Config => "config",
        }
    }
}

/// Structured failure payload handed to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Error category
    pub error_kind: ErrorKind,

    /// Human-readable message
    pub message: String,
}

impl ConvertError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::NotFound(_) => ErrorKind::NotFound,
            ConvertError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            ConvertError::CorruptDocument(_) => ErrorKind::CorruptDocument,
            ConvertError::NoBalancesFound(_) => ErrorKind::NoBalancesFound,
            ConvertError::RatesUnavailable(_) => ErrorKind::RatesUnavailable,
            ConvertError::RateNotAvailable(_) => ErrorKind::RateNotAvailable,
            ConvertError::UnsupportedConversion(_) => ErrorKind::UnsupportedConversion,
            ConvertError::AlreadySent(_) => ErrorKind::AlreadySent,
            ConvertError::Storage(_) => ErrorKind::Storage,
            ConvertError::Config(_) => ErrorKind::Config,
        }
    }

    /// Structured `{error_kind, message}` form of this error
    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            error_kind: self.kind(),
            message: self.to_string(),
        }
    }
}

impl From<ExtractorError> for ConvertError {
    fn from(e: ExtractorError) -> Self {
        match e {
            ExtractorError::NotFound(path) => ConvertError::NotFound(format!("file {}", path)),
            ExtractorError::UnsupportedFormat(detail) => ConvertError::UnsupportedFormat(detail),
            ExtractorError::CorruptDocument(detail) => ConvertError::CorruptDocument(detail),
            ExtractorError::Config(detail) => ConvertError::Config(detail),
        }
    }
}

impl From<RateError> for ConvertError {
    fn from(e: RateError) -> Self {
        match e {
            RateError::Config(detail) => ConvertError::Config(detail),
            other => ConvertError::RatesUnavailable(other.to_string()),
        }
    }
}

impl From<LedgerError> for ConvertError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::Config(detail) => ConvertError::Config(detail),
            other => ConvertError::Storage(other.to_string()),
        }
    }
}

impl From<WalletError> for ConvertError {
    fn from(e: WalletError) -> Self {
        ConvertError::Config(e.to_string())
    }
}
