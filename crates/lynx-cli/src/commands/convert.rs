//! Convert command implementation.

use crate::cli::ConvertArgs;
use crate::error::Result;
use crate::output::Formatter;
use lynx_converter::LivePipeline;

/// Execute the convert command.
pub async fn execute_convert(
    args: ConvertArgs,
    pipeline: &LivePipeline,
    formatter: &Formatter,
) -> Result<()> {
    let record = pipeline.convert(&args.file, args.base.as_deref()).await?;

    println!("{}", formatter.format_conversion(&record)?);

    Ok(())
}
