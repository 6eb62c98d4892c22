//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Lynx - Convert document balances into cryptocurrency amounts.
#[derive(Debug, Parser)]
#[command(name = "lynx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "LYNX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log pipeline activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs and bare amounts only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract balances from a document
    Parse(ParseArgs),

    /// Convert a document's total into every asset and save it
    Convert(ConvertArgs),

    /// Convert a single amount
    Quote(QuoteArgs),

    /// Convert a document and summarize wallet coverage
    Portfolio(PortfolioArgs),

    /// Show current exchange rates
    Rates(RatesArgs),

    /// List saved conversions
    List(ListArgs),

    /// Send a saved conversion to its wallets
    Send(SendArgs),

    /// Convert a document and send the result
    SendFile(SendFileArgs),

    /// Delete a saved conversion
    Delete(DeleteArgs),
}

/// Arguments for the parse command.
#[derive(Debug, Parser)]
pub struct ParseArgs {
    /// Document to scan (.docx)
    pub file: PathBuf,

    /// List every match with its location and context
    #[arg(short, long)]
    pub detailed: bool,

    /// Also write the full report to this JSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the convert command.
#[derive(Debug, Parser)]
pub struct ConvertArgs {
    /// Document to convert (.docx)
    pub file: PathBuf,

    /// Currency the document balances are in
    #[arg(short, long)]
    pub base: Option<String>,
}

/// Arguments for the quote command.
#[derive(Debug, Parser)]
pub struct QuoteArgs {
    /// Amount to convert
    pub amount: Decimal,

    /// Source currency
    #[arg(long, default_value = "USD")]
    pub from: String,

    /// Target asset (BTC, ETH, USDT, SOL)
    #[arg(long, default_value = "BTC")]
    pub to: String,
}

/// Arguments for the portfolio command.
#[derive(Debug, Parser)]
pub struct PortfolioArgs {
    /// Document to convert (.docx)
    pub file: PathBuf,
}

/// Arguments for the rates command.
#[derive(Debug, Parser)]
pub struct RatesArgs {
    /// Bypass the in-memory cache
    #[arg(short, long)]
    pub refresh: bool,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Only show conversions that have not been sent
    #[arg(short, long)]
    pub pending: bool,
}

/// Arguments for the send command.
#[derive(Debug, Parser)]
pub struct SendArgs {
    /// Conversion ID
    pub id: String,

    /// Send every asset to this address instead of the configured wallets
    #[arg(short, long)]
    pub to: Option<String>,
}

/// Arguments for the send-file command.
#[derive(Debug, Parser)]
pub struct SendFileArgs {
    /// Document to convert (.docx)
    pub file: PathBuf,

    /// Send every asset to this address instead of the configured wallets
    #[arg(short, long)]
    pub to: Option<String>,
}

/// Arguments for the delete command.
#[derive(Debug, Parser)]
pub struct DeleteArgs {
    /// Conversion ID
    pub id: String,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
