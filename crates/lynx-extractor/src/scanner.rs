//! Document scanning: walk text units and collect amounts

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::number::NumberExtractor;
use crate::types::ScanReport;
use lynx_domain::traits::{DocumentError, DocumentSource};
use lynx_domain::{BalanceMatch, Document, ScanSummary, SourceRef};
use std::path::Path;
use tracing::{debug, info};

/// Scans documents from a [`DocumentSource`] for monetary amounts
pub struct DocumentScanner<D> {
    source: D,
    extractor: NumberExtractor,
    config: ExtractorConfig,
}

impl<D: DocumentSource> DocumentScanner<D> {
    /// Create a scanner reading documents through `source`
    pub fn new(source: D, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        let extractor = NumberExtractor::new(&config)?;
        Ok(Self {
            source,
            extractor,
            config,
        })
    }

    /// Get the scanner configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Scan the document at `path`
    ///
    /// # Errors
    ///
    /// - [`ExtractorError::NotFound`] if nothing exists at `path`
    /// - [`ExtractorError::UnsupportedFormat`] if the extension is not accepted
    /// - [`ExtractorError::CorruptDocument`] if the document cannot be read
    ///
    /// A document without any amounts is a successful, empty report.
    pub fn scan(&self, path: &Path) -> Result<ScanReport, ExtractorError> {
        let source_file = path.display().to_string();

        if !self.source.exists(path) {
            return Err(ExtractorError::NotFound(source_file));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        if !self.config.accepts_extension(extension) {
            let expected: Vec<String> = self
                .config
                .accepted_extensions
                .iter()
                .map(|ext| format!(".{}", ext))
                .collect();
            return Err(ExtractorError::UnsupportedFormat(format!(
                ".{}. Expected {}",
                extension.to_lowercase(),
                expected.join(" or ")
            )));
        }

        let document = self.source.open(path).map_err(|e| match e {
            DocumentError::NotFound(p) => ExtractorError::NotFound(p),
            DocumentError::Unreadable(reason) => ExtractorError::CorruptDocument(reason),
        })?;

        let matches = self.scan_document(&document);
        let summary = ScanSummary::from_matches(&matches);

        info!(
            path = %source_file,
            count = summary.count,
            total = %summary.total_sum,
            "Scanned document"
        );

        Ok(ScanReport {
            source_file,
            matches,
            summary,
        })
    }

    /// Extract amounts from an already opened document
    ///
    /// Paragraphs are visited first, numbered from 1 including empty ones,
    /// then each table's cells row by row.
    pub fn scan_document(&self, document: &Document) -> Vec<BalanceMatch> {
        let mut matches = Vec::new();

        for (idx, paragraph) in document.paragraphs.iter().enumerate() {
            self.scan_unit(paragraph, SourceRef::Paragraph(idx + 1), &mut matches);
        }

        for table in &document.tables {
            for (row_idx, row) in table.rows.iter().enumerate() {
                for cell in row {
                    self.scan_unit(cell, SourceRef::TableRow(row_idx), &mut matches);
                }
            }
        }

        matches
    }

    fn scan_unit(&self, text: &str, source_ref: SourceRef, matches: &mut Vec<BalanceMatch>) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let before = matches.len();
        matches.extend(self.extractor.extract(text, source_ref));

        if matches.len() > before {
            debug!(source_ref = %source_ref, found = matches.len() - before, "Amounts in text unit");
        }
    }
}
