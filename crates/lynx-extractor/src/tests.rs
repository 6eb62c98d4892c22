//! End-to-end tests for the Extractor

#[cfg(test)]
mod tests {
    use crate::{DocumentScanner, ExtractorConfig, ExtractorError, StaticDocumentSource};
    use lynx_domain::{CurrencySymbol, Document, SourceRef, Table};
    use rust_decimal::Decimal;
    use std::path::Path;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn statement() -> Document {
        Document::new()
            .with_paragraph("Quarterly Statement 2024")
            .with_paragraph("Checking Account: $5,250.00")
            .with_paragraph("Savings Account: $12,800.50")
            .with_paragraph("Interest rate: 4%")
            .with_table(Table::from_rows([
                ["Account", "Balance"],
                ["Brokerage", "€1.234,56"],
                ["Page", "0"],
            ]))
    }

    #[test]
    fn test_full_scan_flow() {
        let source = StaticDocumentSource::new().with_document("statement.docx", statement());
        let scanner = DocumentScanner::new(source, ExtractorConfig::default()).unwrap();

        let report = scanner.scan(Path::new("statement.docx")).unwrap();
        let values: Vec<Decimal> = report.matches.iter().map(|m| m.value).collect();

        assert_eq!(
            values,
            vec![dec("2024"), dec("5250.00"), dec("12800.50"), dec("1234.56")]
        );
        assert_eq!(report.matches[3].source_ref, SourceRef::TableRow(1));
        assert_eq!(report.matches[3].currency_symbol, Some(CurrencySymbol::Euro));
        assert_eq!(report.summary.count, 4);
        assert_eq!(report.summary.max_value, dec("12800.50"));
    }

    #[test]
    fn test_scan_is_idempotent() {
        let source = StaticDocumentSource::new().with_document("statement.docx", statement());
        let scanner = DocumentScanner::new(source.clone(), ExtractorConfig::default()).unwrap();

        let first = scanner.scan(Path::new("statement.docx")).unwrap();
        let second = scanner.scan(Path::new("statement.docx")).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.summary).unwrap(),
            serde_json::to_string(&second.summary).unwrap()
        );
        assert_eq!(source.open_count(), 2);
    }

    #[test]
    fn test_format_checked_before_open() {
        let source = StaticDocumentSource::new().with_document("notes.txt", statement());
        let scanner = DocumentScanner::new(source.clone(), ExtractorConfig::default()).unwrap();

        let result = scanner.scan(Path::new("notes.txt"));
        assert!(matches!(result, Err(ExtractorError::UnsupportedFormat(_))));
        assert_eq!(source.open_count(), 0);
    }

    #[test]
    fn test_custom_bounds() {
        let config = ExtractorConfig {
            min_value: dec("100"),
            ..ExtractorConfig::default()
        };
        let source = StaticDocumentSource::new().with_document("statement.docx", statement());
        let scanner = DocumentScanner::new(source, config).unwrap();

        let report = scanner.scan(Path::new("statement.docx")).unwrap();
        assert!(report.matches.iter().all(|m| m.value >= dec("100")));
        assert_eq!(report.summary.count, 4);
    }

    #[test]
    fn test_report_serializes_source_refs_as_strings() {
        let source = StaticDocumentSource::new().with_document("statement.docx", statement());
        let scanner = DocumentScanner::new(source, ExtractorConfig::default()).unwrap();

        let report = scanner.scan(Path::new("statement.docx")).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["matches"][1]["source_ref"], "2");
        assert_eq!(json["matches"][3]["source_ref"], "table-1");
        assert_eq!(json["matches"][3]["currency_symbol"], "€");
    }
}
