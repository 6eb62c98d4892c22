//! In-memory document source for testing

use lynx_domain::traits::{DocumentError, DocumentSource};
use lynx_domain::Document;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Document source serving fixed documents by path
///
/// Paths registered with [`with_unreadable`](Self::with_unreadable) exist but
/// fail to open, standing in for a corrupt file.
#[derive(Debug, Clone, Default)]
pub struct StaticDocumentSource {
    documents: HashMap<PathBuf, Option<Document>>,
    open_count: Arc<Mutex<usize>>,
}

impl StaticDocumentSource {
    /// Create a source with no documents
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `document` at `path`
    pub fn with_document(mut self, path: impl Into<PathBuf>, document: Document) -> Self {
        self.documents.insert(path.into(), Some(document));
        self
    }

    /// Register `path` as present but unreadable
    pub fn with_unreadable(mut self, path: impl Into<PathBuf>) -> Self {
        self.documents.insert(path.into(), None);
        self
    }

    /// Number of times a document was opened
    pub fn open_count(&self) -> usize {
        self.open_count.lock().map(|count| *count).unwrap_or(0)
    }
}

impl DocumentSource for StaticDocumentSource {
    fn exists(&self, path: &Path) -> bool {
        self.documents.contains_key(path)
    }

    fn open(&self, path: &Path) -> Result<Document, DocumentError> {
        if let Ok(mut count) = self.open_count.lock() {
            *count += 1;
        }

        match self.documents.get(path) {
            Some(Some(document)) => Ok(document.clone()),
            Some(None) => Err(DocumentError::Unreadable(format!(
                "{} is not a valid document",
                path.display()
            ))),
            None => Err(DocumentError::NotFound(path.display().to_string())),
        }
    }
}
