//! Integration tests for scanning real .docx packages
//!
//! Fixtures are built on the fly with the zip writer.

use lynx_domain::{CurrencySymbol, SourceRef};
use lynx_extractor::{DocumentScanner, DocxSource, ExtractorConfig, ExtractorError};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::TempDir;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn paragraph(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, text)
}

fn table(rows: &[&[&str]]) -> String {
    let rows: String = rows
        .iter()
        .map(|cells| {
            let cells: String = cells
                .iter()
                .map(|cell| format!("<w:tc>{}</w:tc>", paragraph(cell)))
                .collect();
            format!("<w:tr>{}</w:tr>", cells)
        })
        .collect();
    format!("<w:tbl>{}</w:tbl>", rows)
}

fn write_docx(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
        .unwrap();

    zip.start_file("word/document.xml", options).unwrap();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr/></w:body></w:document>"#,
        body
    );
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap();

    path
}

fn scanner() -> DocumentScanner<DocxSource> {
    DocumentScanner::new(DocxSource::new(), ExtractorConfig::default()).unwrap()
}

#[test]
fn test_scan_checking_and_savings() {
    let dir = TempDir::new().unwrap();
    let body = format!(
        "{}{}",
        paragraph("Checking Account: $5,250.00"),
        paragraph("Savings Account: $12,800.50")
    );
    let path = write_docx(dir.path(), "balances.docx", &body);

    let report = scanner().scan(&path).unwrap();

    assert_eq!(report.matches.len(), 2);
    assert_eq!(report.matches[0].value, dec("5250.00"));
    assert_eq!(report.matches[1].value, dec("12800.50"));
    assert_eq!(report.matches[0].currency_symbol, Some(CurrencySymbol::Dollar));
    assert_eq!(report.matches[1].source_ref, SourceRef::Paragraph(2));
    assert_eq!(report.summary.total_sum, dec("18050.50"));
}

#[test]
fn test_paragraphs_precede_tables() {
    let dir = TempDir::new().unwrap();
    let body = format!(
        "{}{}{}",
        table(&[&["Account", "Balance"], &["Savings", "€1.234,56"]]),
        paragraph(""),
        paragraph("Closing balance 300.00")
    );
    let path = write_docx(dir.path(), "mixed.dox", &body);

    let report = scanner().scan(&path).unwrap();

    assert_eq!(report.matches.len(), 2);
    assert_eq!(report.matches[0].value, dec("300.00"));
    assert_eq!(report.matches[0].source_ref, SourceRef::Paragraph(2));
    assert_eq!(report.matches[1].value, dec("1234.56"));
    assert_eq!(report.matches[1].source_ref, SourceRef::TableRow(1));
}

#[test]
fn test_document_without_amounts() {
    let dir = TempDir::new().unwrap();
    let path = write_docx(dir.path(), "empty.docx", &paragraph("Nothing to see"));

    let report = scanner().scan(&path).unwrap();
    assert!(report.is_empty());
    assert_eq!(report.summary.count, 0);
    assert!(report.summary.average.is_zero());
}

#[test]
fn test_rescan_is_identical() {
    let dir = TempDir::new().unwrap();
    let path = write_docx(dir.path(), "balances.docx", &paragraph("$1,000.00 and $2,000.00"));

    let scanner = scanner();
    assert_eq!(scanner.scan(&path).unwrap(), scanner.scan(&path).unwrap());
}

#[test]
fn test_not_a_zip_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fake.docx");
    std::fs::write(&path, b"this is plain text").unwrap();

    let err = scanner().scan(&path).unwrap_err();
    assert!(matches!(err, ExtractorError::CorruptDocument(_)));
}

#[test]
fn test_wrong_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("balances.pdf");
    std::fs::write(&path, b"%PDF-1.4").unwrap();

    let err = scanner().scan(&path).unwrap_err();
    assert!(matches!(err, ExtractorError::UnsupportedFormat(_)));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = scanner().scan(&dir.path().join("absent.docx")).unwrap_err();
    assert!(matches!(err, ExtractorError::NotFound(_)));
}
