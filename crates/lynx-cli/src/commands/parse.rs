//! Parse command implementation.

use crate::cli::ParseArgs;
use crate::error::Result;
use crate::output::Formatter;
use lynx_converter::LivePipeline;
use lynx_extractor::ScanReport;
use std::fs;
use std::path::Path;

/// Execute the parse command.
pub async fn execute_parse(
    args: ParseArgs,
    pipeline: &LivePipeline,
    formatter: &Formatter,
) -> Result<()> {
    let report = pipeline.scan_document(&args.file)?;

    println!("{}", formatter.format_scan(&report, args.detailed)?);

    if let Some(output) = &args.output {
        save_report(&report, output)?;
        println!("{}", formatter.success(&format!("Results saved to {}", output.display())));
    }

    Ok(())
}

/// Write the full scan report as pretty JSON.
fn save_report(report: &ScanReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_string_pretty(report)?)?;
    Ok(())
}
