//! Monetary amount recognition for a single text unit

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use lynx_domain::{BalanceMatch, CurrencySymbol, SourceRef};
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Optional currency symbol, then either a separator-grouped numeral or a
/// plain digit run, each with an optional two-digit fractional part.
///
/// The grouped alternative is tried first so `1.234,56` is taken whole; the
/// plain alternative consumes an entire digit run so a 13-digit number is one
/// candidate rather than several three-digit ones.
const AMOUNT_PATTERN: &str = r"(?:(?P<symbol>[$€£¥₹])\s*)?(?P<number>[0-9]{1,3}(?:[,.][0-9]{3})+(?:[.,][0-9]{2})?|[0-9]+(?:[.,][0-9]{2})?)";

/// Text after a candidate that makes it part of a percentage, including a
/// fractional digit the amount pattern left behind (`4.5%`).
const PERCENT_SUFFIX: &str = r"^[.,]?[0-9]*\s*%";

/// Finds monetary amounts in free-form text
///
/// Extraction never fails: candidates that do not parse or fall outside the
/// configured bounds are dropped.
#[derive(Debug, Clone)]
pub struct NumberExtractor {
    pattern: Regex,
    percent_suffix: Regex,
    min_value: Decimal,
    max_value: Decimal,
    skip_percentages: bool,
}

impl NumberExtractor {
    /// Create an extractor using the bounds in `config`
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        Ok(Self {
            pattern: Regex::new(AMOUNT_PATTERN)?,
            percent_suffix: Regex::new(PERCENT_SUFFIX)?,
            min_value: config.min_value,
            max_value: config.max_value,
            skip_percentages: config.skip_percentages,
        })
    }

    /// Extract every amount in `text`, left to right
    ///
    /// Each match carries the whole of `text` as its context and `source_ref`
    /// as its location. The iterator is lazy and can be consumed once.
    ///
    /// # Examples
    ///
    /// ```
    /// use lynx_extractor::{ExtractorConfig, NumberExtractor};
    /// use lynx_domain::SourceRef;
    ///
    /// let extractor = NumberExtractor::new(&ExtractorConfig::default()).unwrap();
    /// let values: Vec<String> = extractor
    ///     .extract("Checking Account: $5,250.00", SourceRef::Paragraph(1))
    ///     .map(|m| m.value.to_string())
    ///     .collect();
    ///
    /// assert_eq!(values, vec!["5250.00"]);
    /// ```
    pub fn extract<'a>(
        &'a self,
        text: &'a str,
        source_ref: SourceRef,
    ) -> impl Iterator<Item = BalanceMatch> + 'a {
        self.pattern
            .captures_iter(text)
            .filter_map(move |caps| self.candidate(text, &caps, source_ref))
    }

    fn candidate(&self, text: &str, caps: &Captures<'_>, source_ref: SourceRef) -> Option<BalanceMatch> {
        let whole = caps.get(0)?;
        let number = caps.name("number")?;

        if self.skip_percentages && self.percent_suffix.is_match(&text[whole.end()..]) {
            return None;
        }

        let value = parse_amount(number.as_str())?;
        if value < self.min_value || value > self.max_value {
            return None;
        }

        let currency_symbol = caps
            .name("symbol")
            .and_then(|m| m.as_str().chars().next())
            .and_then(CurrencySymbol::from_char);

        Some(BalanceMatch {
            value,
            raw_text: whole.as_str().to_string(),
            currency_symbol,
            context: text.to_string(),
            source_ref,
        })
    }
}

/// Parse a numeral whose separators may follow US or EU conventions
///
/// Returns `None` for anything that does not form a decimal after
/// separator resolution, including grouping separators that are not
/// followed by exactly three digits (`1.234.56`).
pub fn parse_amount(numeral: &str) -> Option<Decimal> {
    let decimal_at = decimal_point(numeral);
    let integer_part = &numeral[..decimal_at.unwrap_or(numeral.len())];
    let well_grouped = integer_part
        .split(|c: char| c == ',' || c == '.')
        .skip(1)
        .all(|group| group.len() == 3 && group.bytes().all(|b| b.is_ascii_digit()));
    if !well_grouped {
        return None;
    }

    Decimal::from_str(&strip_separators(numeral, decimal_at)).ok()
}

/// Rewrite a numeral so `.` is the only (optional) decimal point
///
/// - Both `,` and `.` present: whichever appears last is the decimal point.
/// - Only `,`: decimal point if the last group has exactly two digits,
///   otherwise every comma groups thousands.
/// - Only `.`: a single dot is the decimal point; several dots group thousands.
///
/// ```
/// use lynx_extractor::normalize_separators;
///
/// assert_eq!(normalize_separators("1.234,56"), "1234.56");
/// assert_eq!(normalize_separators("1,234.56"), "1234.56");
/// assert_eq!(normalize_separators("1,234"), "1234");
/// assert_eq!(normalize_separators("12,50"), "12.50");
/// ```
pub fn normalize_separators(numeral: &str) -> String {
    strip_separators(numeral, decimal_point(numeral))
}

/// Byte offset of the separator acting as decimal point, if any
fn decimal_point(numeral: &str) -> Option<usize> {
    let last_comma = numeral.rfind(',');
    let last_dot = numeral.rfind('.');

    match (last_comma, last_dot) {
        (Some(comma), Some(dot)) => Some(comma.max(dot)),
        (Some(comma), None) => (numeral.len() - comma - 1 == 2).then_some(comma),
        (None, Some(dot)) => (numeral.matches('.').count() == 1).then_some(dot),
        (None, None) => None,
    }
}

fn strip_separators(numeral: &str, decimal_at: Option<usize>) -> String {
    numeral
        .char_indices()
        .filter_map(|(idx, ch)| match ch {
            ',' | '.' if Some(idx) == decimal_at => Some('.'),
            ',' | '.' => None,
            _ => Some(ch),
        })
        .collect()
}
