//! Document module - structured text units read from office documents

/// Text content of a document in reading order
///
/// `paragraphs` holds body paragraphs only; paragraphs inside table cells are
/// part of the cell text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// Body paragraphs in document order
    pub paragraphs: Vec<String>,

    /// Tables in document order
    pub tables: Vec<Table>,
}

/// A table as ordered rows of ordered cell texts
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    /// Rows, each an ordered list of cell texts
    pub rows: Vec<Vec<String>>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a paragraph
    pub fn with_paragraph(mut self, text: impl Into<String>) -> Self {
        self.paragraphs.push(text.into());
        self
    }

    /// Append a table
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }
}

impl Table {
    /// Build a table from rows of cell texts
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let doc = Document::new()
            .with_paragraph("Checking: $10.00")
            .with_table(Table::from_rows([["Account", "Balance"], ["Savings", "$20.00"]]));

        assert_eq!(doc.paragraphs.len(), 1);
        assert_eq!(doc.tables[0].rows[1][1], "$20.00");
    }
}
