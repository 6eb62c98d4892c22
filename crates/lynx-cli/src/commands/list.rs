//! List command implementation.

use crate::cli::ListArgs;
use crate::error::Result;
use crate::output::Formatter;
use lynx_converter::LivePipeline;

/// Execute the list command.
pub async fn execute_list(
    args: ListArgs,
    pipeline: &LivePipeline,
    formatter: &Formatter,
) -> Result<()> {
    let conversions = pipeline.list_conversions(!args.pending)?;

    println!("{}", formatter.format_conversions(&conversions)?);

    Ok(())
}
