//! Send and send-file command implementations.

use crate::cli::{SendArgs, SendFileArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lynx_converter::LivePipeline;

/// Execute the send command.
pub async fn execute_send(
    args: SendArgs,
    pipeline: &LivePipeline,
    formatter: &Formatter,
) -> Result<()> {
    let destination = normalize_override(args.to.as_deref())?;
    let report = pipeline.send_saved_conversion(&args.id, destination).await?;

    println!("{}", formatter.format_send(&report)?);

    Ok(())
}

/// Execute the send-file command.
pub async fn execute_send_file(
    args: SendFileArgs,
    pipeline: &LivePipeline,
    formatter: &Formatter,
) -> Result<()> {
    let destination = normalize_override(args.to.as_deref())?;
    let report = pipeline.send_conversion(&args.file, destination).await?;

    println!("{}", formatter.format_send(&report)?);

    Ok(())
}

/// Reject a blank `--to` instead of silently falling back to configured wallets.
fn normalize_override(to: Option<&str>) -> Result<Option<&str>> {
    match to.map(str::trim) {
        Some("") => Err(CliError::InvalidInput("--to must not be blank".to_string())),
        other => Ok(other),
    }
}
