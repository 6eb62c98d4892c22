//! Quote command implementation.

use crate::cli::QuoteArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lynx_converter::LivePipeline;
use rust_decimal::Decimal;

/// Execute the quote command.
pub async fn execute_quote(
    args: QuoteArgs,
    pipeline: &LivePipeline,
    formatter: &Formatter,
) -> Result<()> {
    validate_amount(args.amount)?;

    let quote = pipeline
        .convert_single_amount(args.amount, &args.from, &args.to)
        .await?;

    println!("{}", formatter.format_quote(&quote)?);

    Ok(())
}

fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(CliError::InvalidInput(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    Ok(())
}
