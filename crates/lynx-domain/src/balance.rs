//! Balance module - monetary amounts found in documents and their aggregates

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency symbol written directly in front of an amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurrencySymbol {
    /// `$`
    #[serde(rename = "$")]
    Dollar,

    /// `€`
    #[serde(rename = "€")]
    Euro,

    /// `£`
    #[serde(rename = "£")]
    Pound,

    /// `¥`
    #[serde(rename = "¥")]
    Yen,

    /// `₹`
    #[serde(rename = "₹")]
    Rupee,
}

impl CurrencySymbol {
    /// Map a character to a symbol, if it is one of the recognized ones
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '$' => Some(CurrencySymbol::Dollar),
            '€' => Some(CurrencySymbol::Euro),
            '£' => Some(CurrencySymbol::Pound),
            '¥' => Some(CurrencySymbol::Yen),
            '₹' => Some(CurrencySymbol::Rupee),
            _ => None,
        }
    }

    /// The symbol character
    pub fn as_char(&self) -> char {
        match self {
            CurrencySymbol::Dollar => '$',
            CurrencySymbol::Euro => '€',
            CurrencySymbol::Pound => '£',
            CurrencySymbol::Yen => '¥',
            CurrencySymbol::Rupee => '₹',
        }
    }
}

impl fmt::Display for CurrencySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Where in a document a text unit came from
///
/// Paragraphs are numbered from 1 in document order. Table cells report the
/// zero-based row index within their table, rendered as `table-<row>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SourceRef {
    /// Body paragraph (1-based)
    Paragraph(usize),

    /// Table row (0-based)
    TableRow(usize),
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceRef::Paragraph(idx) => write!(f, "{}", idx),
            SourceRef::TableRow(row) => write!(f, "table-{}", row),
        }
    }
}

impl From<SourceRef> for String {
    fn from(value: SourceRef) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for SourceRef {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if let Some(row) = value.strip_prefix("table-") {
            return row
                .parse()
                .map(SourceRef::TableRow)
                .map_err(|_| format!("Invalid table row reference: {}", value));
        }
        value
            .parse()
            .map(SourceRef::Paragraph)
            .map_err(|_| format!("Invalid paragraph reference: {}", value))
    }
}

/// One monetary amount extracted from a text unit
///
/// `value` is always a successfully parsed decimal inside the extractor's
/// sanity bounds; candidates that fail to parse are never represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceMatch {
    /// Normalized amount
    pub value: Decimal,

    /// Exact substring that was matched
    pub raw_text: String,

    /// Symbol in front of the amount, if any
    pub currency_symbol: Option<CurrencySymbol>,

    /// Full text unit (paragraph or cell) the match came from
    pub context: String,

    /// Location of the text unit
    pub source_ref: SourceRef,
}

/// Aggregate statistics over a list of matches
///
/// Every field is zero for an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Number of matches
    pub count: usize,

    /// Sum of all values
    pub total_sum: Decimal,

    /// Smallest value
    pub min_value: Decimal,

    /// Largest value
    pub max_value: Decimal,

    /// Arithmetic mean
    pub average: Decimal,
}

impl ScanSummary {
    /// Compute the summary for a list of matches
    ///
    /// # Examples
    ///
    /// ```
    /// use lynx_domain::{ScanSummary, BalanceMatch};
    ///
    /// let summary = ScanSummary::from_matches(&[]);
    /// assert_eq!(summary.count, 0);
    /// assert!(summary.total_sum.is_zero());
    /// ```
    pub fn from_matches(matches: &[BalanceMatch]) -> Self {
        let Some(first) = matches.first() else {
            return Self::default();
        };

        let mut total_sum = Decimal::ZERO;
        let mut min_value = first.value;
        let mut max_value = first.value;

        for m in matches {
            total_sum += m.value;
            min_value = min_value.min(m.value);
            max_value = max_value.max(m.value);
        }

        let average = total_sum / Decimal::from(matches.len());

        Self {
            count: matches.len(),
            total_sum,
            min_value,
            max_value,
            average,
        }
    }
}
