//! Lynx Extractor
//!
//! Finds monetary balances in office documents.
//!
//! # Overview
//!
//! Documents arrive as free-form prose and tables. The extractor scans every
//! text unit for currency-like numerals, resolves US/EU separator ambiguity,
//! drops implausible magnitudes and reports each amount with the text it came
//! from.
//!
//! # Architecture
//!
//! ```text
//! .docx → DocxSource → Document → DocumentScanner → NumberExtractor → BalanceMatch*
//!                                        ↓
//!                                   ScanSummary
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use lynx_extractor::{DocumentScanner, DocxSource, ExtractorConfig};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let scanner = DocumentScanner::new(DocxSource::new(), ExtractorConfig::default())?;
//! let report = scanner.scan(Path::new("balances.docx"))?;
//!
//! for m in &report.matches {
//!     println!("{} ({})", m.value, m.source_ref);
//! }
//! println!("Total: {}", report.summary.total_sum);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod docx;
mod error;
mod number;
mod scanner;
mod source;
mod types;

#[cfg(test)]
mod tests;

pub use config::ExtractorConfig;
pub use docx::{parse_document_xml, DocxSource};
pub use error::ExtractorError;
pub use number::{normalize_separators, parse_amount, NumberExtractor};
pub use scanner::DocumentScanner;
pub use source::StaticDocumentSource;
pub use types::ScanReport;
