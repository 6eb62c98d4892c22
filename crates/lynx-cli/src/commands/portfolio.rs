//! Portfolio command implementation.

use crate::cli::PortfolioArgs;
use crate::error::Result;
use crate::output::Formatter;
use lynx_converter::LivePipeline;

/// Execute the portfolio command.
pub async fn execute_portfolio(
    args: PortfolioArgs,
    pipeline: &LivePipeline,
    formatter: &Formatter,
) -> Result<()> {
    let portfolio = pipeline.portfolio_summary(&args.file).await?;

    println!("{}", formatter.format_portfolio(&portfolio)?);

    Ok(())
}
