//! Types produced by document scanning

use lynx_domain::{BalanceMatch, ScanSummary};
use serde::{Deserialize, Serialize};

/// Everything found in one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Path of the scanned document
    pub source_file: String,

    /// Matches in document order: paragraphs first, then table cells
    pub matches: Vec<BalanceMatch>,

    /// Statistics over `matches`
    pub summary: ScanSummary,
}

impl ScanReport {
    /// Whether no amounts were found
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
