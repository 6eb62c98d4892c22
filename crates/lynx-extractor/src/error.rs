//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur while scanning a document
///
/// Number extraction itself never fails; these cover the document around it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractorError {
    /// No file at the given path
    #[error("File not found: {0}")]
    NotFound(String),

    /// File extension is not an accepted document type
    #[error("Invalid file type: {0}")]
    UnsupportedFormat(String),

    /// File exists but could not be opened or parsed as a document
    #[error("Error parsing document: {0}")]
    CorruptDocument(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<regex::Error> for ExtractorError {
    fn from(e: regex::Error) -> Self {
        ExtractorError::Config(format!("invalid amount pattern: {}", e))
    }
}
