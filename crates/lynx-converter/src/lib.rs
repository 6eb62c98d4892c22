//! Lynx Converter
//!
//! Ties document scanning, rate acquisition, wallet lookup, persistence and
//! transfer replay into one pipeline.
//!
//! # Architecture
//!
//! A [`ConverterContext`] holds shared handles to every collaborator and is
//! built once, either from doubles in tests or with
//! [`LiveContext::from_config`] in the binary. [`ConversionPipeline`] runs the
//! operations callers see:
//!
//! - `scan_document`: amounts found in a document
//! - `convert`: total → per-asset amounts → wallets → ledger
//! - `convert_single_amount`: one amount into one asset, not persisted
//! - `portfolio_summary`: `convert` plus wallet coverage counts
//! - `send_conversion`: `convert` then replay
//! - `list_conversions` / `send_saved_conversion`: ledger browsing and replay
//!
//! Every failure surfaces as a [`ConvertError`], which converts into a
//! structured [`ErrorPayload`].
//!
//! # Examples
//!
//! ```no_run
//! use lynx_converter::{ConversionPipeline, LiveContext, ServiceConfig};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), lynx_converter::ConvertError> {
//! let ctx = LiveContext::from_config(&ServiceConfig::default())?;
//! let pipeline = ConversionPipeline::new(ctx);
//!
//! let record = pipeline.convert(Path::new("balances.docx"), None).await?;
//! println!("{} saved", record.id);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod context;
mod error;
mod pipeline;
mod types;

pub use config::{PipelineConfig, ServiceConfig};
pub use context::{ConverterContext, LiveContext, LivePipeline};
pub use error::{ConvertError, ErrorKind, ErrorPayload};
pub use pipeline::ConversionPipeline;
pub use types::{PortfolioSummary, SendReport, SingleConversion, WalletSummary};

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, ConvertError>;
