//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use colored::*;
use lynx_converter::{PortfolioSummary, SendReport, SingleConversion};
use lynx_domain::{ConversionRecord, ConversionSummary, TransferStatus};
use lynx_extractor::ScanReport;
use lynx_rates::RateQuote;
use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const CONTEXT_WIDTH: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the balances found in a document.
    pub fn format_scan(&self, report: &ScanReport, detailed: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Quiet => Ok(money(report.summary.total_sum)),
            OutputFormat::Table => {
                if report.is_empty() {
                    return Ok(self.colorize("No balances found.", "yellow"));
                }

                let summary = &report.summary;
                let mut builder = Builder::default();
                builder.push_record(["Balances", "Total", "Minimum", "Maximum", "Average"]);
                builder.push_record([
                    summary.count.to_string(),
                    money(summary.total_sum),
                    money(summary.min_value),
                    money(summary.max_value),
                    money(summary.average),
                ]);
                let mut out = render(builder);

                if detailed {
                    let mut builder = Builder::default();
                    builder.push_record(["Location", "Amount", "Matched", "Context"]);
                    for m in &report.matches {
                        builder.push_record([
                            m.source_ref.to_string(),
                            money(m.value),
                            m.raw_text.clone(),
                            truncate(&m.context, CONTEXT_WIDTH),
                        ]);
                    }
                    out.push('\n');
                    out.push_str(&render(builder));
                }

                Ok(out)
            }
        }
    }

    /// Format a saved conversion.
    pub fn format_conversion(&self, record: &ConversionRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Quiet => Ok(record.id.clone()),
            OutputFormat::Table => Ok(self.conversion_table(record)),
        }
    }

    /// Format a conversion with its wallet coverage.
    pub fn format_portfolio(&self, portfolio: &PortfolioSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(portfolio)?),
            OutputFormat::Quiet => Ok(portfolio.conversion.id.clone()),
            OutputFormat::Table => {
                let wallets = &portfolio.wallet_summary;
                let line = format!(
                    "Wallets: {} valid, {} invalid, {} missing ({} total)",
                    wallets.valid_wallets,
                    wallets.invalid_wallets,
                    wallets.missing_wallets,
                    wallets.total_wallets
                );
                let line = if wallets.valid_wallets == wallets.total_wallets {
                    self.success(&line)
                } else {
                    self.warning(&line)
                };
                Ok(format!("{}\n{}", self.conversion_table(&portfolio.conversion), line))
            }
        }
    }

    /// Format a single-amount conversion.
    pub fn format_quote(&self, quote: &SingleConversion) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(quote)?),
            OutputFormat::Quiet => Ok(crypto(quote.converted_amount)),
            OutputFormat::Table => {
                let mut out = quote.calculation.clone();
                if quote.rate_tier.is_degraded() {
                    out.push('\n');
                    out.push_str(&self.warning(&format!(
                        "Rate served from the {} tier",
                        quote.rate_tier.as_str()
                    )));
                }
                Ok(out)
            }
        }
    }

    /// Format a rate table.
    pub fn format_rates(&self, quote: &RateQuote) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(quote)?),
            OutputFormat::Quiet => Ok(quote
                .rates
                .iter()
                .map(|(asset, price)| format!("{} {}", asset, price.normalize()))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Asset", "Price"]);
                for (asset, price) in quote.rates.iter() {
                    builder.push_record([asset.to_string(), money(price)]);
                }

                let source = format!("Source: {}", quote.tier.as_str());
                let source = if quote.tier.is_degraded() {
                    self.warning(&source)
                } else {
                    self.info(&source)
                };
                Ok(format!("{}\n{}", render(builder), source))
            }
        }
    }

    /// Format the conversion list.
    pub fn format_conversions(&self, conversions: &[ConversionSummary]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(conversions)?),
            OutputFormat::Quiet => Ok(conversions
                .iter()
                .map(|c| c.id.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if conversions.is_empty() {
                    return Ok(self.colorize("No conversions found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Created", "Source", "Total", "Assets", "Sent"]);
                for c in conversions {
                    let assets: Vec<&str> = c.assets.iter().map(|a| a.symbol()).collect();
                    builder.push_record([
                        c.id.clone(),
                        c.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                        c.source_file.clone(),
                        money(c.total_base_amount),
                        assets.join(", "),
                        yes_no(c.sent).to_string(),
                    ]);
                }
                Ok(render(builder))
            }
        }
    }

    /// Format the outcome of sending a conversion.
    pub fn format_send(&self, report: &SendReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Quiet => Ok(report
                .transactions
                .iter()
                .filter_map(|t| t.tx_hash.as_deref())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Asset", "Amount", "Destination", "Status", "Result"]);
                for t in &report.transactions {
                    let result = match (&t.tx_hash, &t.error) {
                        (Some(hash), _) => hash.clone(),
                        (None, Some(error)) => error.clone(),
                        (None, None) => String::new(),
                    };
                    builder.push_record([
                        t.asset.to_string(),
                        crypto(t.amount),
                        t.destination.clone().unwrap_or_else(|| "-".to_string()),
                        status(t.status).to_string(),
                        result,
                    ]);
                }

                let line = if report.sent {
                    self.success(&format!(
                        "Conversion {} marked sent ({} of {} transfers accepted)",
                        report.conversion_id,
                        report.successful(),
                        report.transactions.len()
                    ))
                } else if let Some(mark_error) = &report.mark_error {
                    self.error(&format!(
                        "{} of {} transfers accepted but conversion {} could not be marked sent: {}",
                        report.successful(),
                        report.transactions.len(),
                        report.conversion_id,
                        mark_error
                    ))
                } else if report.successful() > 0 {
                    self.warning(&format!(
                        "{} of {} transfers accepted; conversion {} is no longer stored",
                        report.successful(),
                        report.transactions.len(),
                        report.conversion_id
                    ))
                } else {
                    self.warning(&format!(
                        "No transfers accepted; conversion {} remains unsent",
                        report.conversion_id
                    ))
                };
                Ok(format!("{}\n{}", render(builder), line))
            }
        }
    }

    /// Format an error for display.
    ///
    /// Pipeline errors are written as a `{error_kind, message}` object in JSON
    /// mode.
    pub fn format_error(&self, error: &CliError) -> String {
        if let (OutputFormat::Json, CliError::Convert(e)) = (self.format, error) {
            if let Ok(json) = serde_json::to_string_pretty(&e.to_payload()) {
                return json;
            }
        }
        self.error(&error.to_string())
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn conversion_table(&self, record: &ConversionRecord) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Asset", "Rate", "Amount", "Wallet", "Valid"]);
        for (asset, amount) in &record.per_asset_amounts {
            let rate = record
                .rate_snapshot
                .get(asset)
                .map(|r| money(*r))
                .unwrap_or_default();
            let wallet = record.wallet_info.get(asset);
            builder.push_record([
                asset.to_string(),
                rate,
                crypto(*amount),
                wallet
                    .and_then(|w| w.address.clone())
                    .unwrap_or_else(|| "-".to_string()),
                yes_no(wallet.is_some_and(|w| w.valid)).to_string(),
            ]);
        }

        format!(
            "{}\n{}\n{}",
            self.success(&format!("Conversion saved: {}", record.id)),
            self.info(&format!(
                "Total: {} {} from {}",
                money(record.total_base_amount),
                record.base_currency,
                record.source_file
            )),
            render(builder)
        )
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn render(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// Base-currency amount with two decimals.
fn money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Asset amount with at most eight decimals.
fn crypto(value: Decimal) -> String {
    value.round_dp(8).normalize().to_string()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn status(status: TransferStatus) -> &'static str {
    match status {
        TransferStatus::Pending => "pending",
        TransferStatus::Simulated => "simulated",
        TransferStatus::Failed => "failed",
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
