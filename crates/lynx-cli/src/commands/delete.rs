//! Delete command implementation.

use crate::cli::DeleteArgs;
use crate::error::Result;
use crate::output::Formatter;
use lynx_converter::{ConvertError, LivePipeline};
use std::io::{self, BufRead, Write};

/// Execute the delete command.
pub async fn execute_delete(
    args: DeleteArgs,
    pipeline: &LivePipeline,
    formatter: &Formatter,
) -> Result<()> {
    if !args.yes {
        print!("Delete conversion {}? [y/N] ", args.id);
        io::stdout().flush()?;

        if !confirmed(io::stdin().lock())? {
            println!("{}", formatter.info("Operation cancelled"));
            return Ok(());
        }
    }

    if pipeline.delete_conversion(&args.id)? {
        println!("{}", formatter.success(&format!("Deleted conversion {}", args.id)));
        Ok(())
    } else {
        Err(ConvertError::NotFound(format!("conversion {}", args.id)).into())
    }
}

/// Read one line and check for a yes answer.
fn confirmed(mut input: impl BufRead) -> Result<bool> {
    let mut response = String::new();
    input.read_line(&mut response)?;
    Ok(matches!(response.trim().to_lowercase().as_str(), "y" | "yes"))
}
