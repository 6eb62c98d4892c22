//! Rates command implementation.

use crate::cli::RatesArgs;
use crate::error::Result;
use crate::output::Formatter;
use lynx_converter::LivePipeline;

/// Execute the rates command.
pub async fn execute_rates(
    args: RatesArgs,
    pipeline: &LivePipeline,
    formatter: &Formatter,
) -> Result<()> {
    let quote = pipeline.rates(args.refresh).await?;

    println!("{}", formatter.format_rates(&quote)?);

    Ok(())
}
