//! `.docx` reader
//!
//! A `.docx` file is a zip package whose main part, `word/document.xml`,
//! holds the body as WordprocessingML. Only body paragraphs and top-level
//! tables are read; text inside nested tables and text boxes is skipped.

use lynx_domain::traits::{DocumentError, DocumentSource};
use lynx_domain::{Document, Table};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

const MAIN_PART: &str = "word/document.xml";

/// Reads paragraphs and tables from `.docx` packages on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxSource;

impl DocxSource {
    /// Create a new reader
    pub fn new() -> Self {
        Self
    }
}

impl DocumentSource for DocxSource {
    fn open(&self, path: &Path) -> Result<Document, DocumentError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DocumentError::NotFound(path.display().to_string()),
            _ => DocumentError::Unreadable(e.to_string()),
        })?;

        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| DocumentError::Unreadable(format!("not a docx package: {}", e)))?;

        let mut xml = String::new();
        archive
            .by_name(MAIN_PART)
            .map_err(|e| DocumentError::Unreadable(format!("missing {}: {}", MAIN_PART, e)))?
            .read_to_string(&mut xml)
            .map_err(|e| DocumentError::Unreadable(format!("cannot read {}: {}", MAIN_PART, e)))?;

        let document = parse_document_xml(&xml).map_err(DocumentError::Unreadable)?;
        debug!(
            path = %path.display(),
            paragraphs = document.paragraphs.len(),
            tables = document.tables.len(),
            "Opened docx"
        );
        Ok(document)
    }
}

/// Parse the body of a WordprocessingML main document part
pub fn parse_document_xml(xml: &str) -> Result<Document, String> {
    let mut reader = Reader::from_str(xml);
    let mut builder = BodyBuilder::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => builder.start(e.local_name().as_ref()),
            Ok(Event::End(e)) => builder.end(e.local_name().as_ref()),
            Ok(Event::Empty(e)) => builder.empty(e.local_name().as_ref()),
            Ok(Event::Text(e)) => {
                if builder.wants_text() {
                    let text = e
                        .unescape()
                        .map_err(|err| format!("bad text at {}: {}", reader.buffer_position(), err))?;
                    builder.paragraph.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "malformed {} at {}: {}",
                    MAIN_PART,
                    reader.buffer_position(),
                    e
                ))
            }
        }
    }

    Ok(builder.document)
}

/// Event-driven accumulator for body text
#[derive(Default)]
struct BodyBuilder {
    document: Document,
    table_depth: usize,
    paragraph_depth: usize,
    in_run: bool,
    in_text: bool,
    paragraph: String,
    table: Table,
    row: Vec<String>,
    cell: Vec<String>,
}

impl BodyBuilder {
    fn start(&mut self, name: &[u8]) {
        match name {
            b"tbl" => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table = Table::default();
                }
            }
            b"tr" if self.table_depth == 1 => self.row.clear(),
            b"tc" if self.table_depth == 1 => self.cell.clear(),
            b"p" => {
                self.paragraph_depth += 1;
                if self.paragraph_depth == 1 {
                    self.paragraph.clear();
                }
            }
            b"r" => self.in_run = true,
            b"t" => self.in_text = true,
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"tbl" => {
                if self.table_depth == 1 {
                    let table = std::mem::take(&mut self.table);
                    self.document.tables.push(table);
                }
                self.table_depth = self.table_depth.saturating_sub(1);
            }
            b"tr" if self.table_depth == 1 => {
                let row = std::mem::take(&mut self.row);
                self.table.rows.push(row);
            }
            b"tc" if self.table_depth == 1 => {
                let cell = std::mem::take(&mut self.cell);
                self.row.push(cell.join("\n"));
            }
            b"p" => {
                if self.paragraph_depth == 1 {
                    self.finish_paragraph();
                }
                self.paragraph_depth = self.paragraph_depth.saturating_sub(1);
            }
            b"r" => self.in_run = false,
            b"t" => self.in_text = false,
            _ => {}
        }
    }

    fn empty(&mut self, name: &[u8]) {
        match name {
            b"p" if self.paragraph_depth == 0 => self.finish_paragraph(),
            b"tc" if self.table_depth == 1 => self.row.push(String::new()),
            b"tab" if self.in_run && self.collecting() => self.paragraph.push('\t'),
            b"br" | b"cr" if self.in_run && self.collecting() => self.paragraph.push('\n'),
            _ => {}
        }
    }

    fn collecting(&self) -> bool {
        self.paragraph_depth == 1 && self.table_depth <= 1
    }

    fn wants_text(&self) -> bool {
        self.in_text && self.collecting()
    }

    fn finish_paragraph(&mut self) {
        let text = std::mem::take(&mut self.paragraph);
        match self.table_depth {
            0 => self.document.paragraphs.push(text),
            1 => self.cell.push(text),
            _ => {}
        }
    }
}
