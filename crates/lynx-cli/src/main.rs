//! Lynx CLI - Convert document balances into cryptocurrency amounts.

use clap::Parser;
use lynx_cli::cli::CliFormat;
use lynx_cli::commands;
use lynx_cli::config::OutputFormat;
use lynx_cli::{Cli, Command, Config, Formatter};
use lynx_converter::{ConversionPipeline, LiveContext};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Errors are reported before the config is known, so only the flag counts
    let error_format = match cli.format {
        Some(CliFormat::Json) => OutputFormat::Json,
        _ => OutputFormat::Table,
    };
    let error_formatter = Formatter::new(error_format, !cli.no_color);

    if let Err(e) = run(cli).await {
        match error_format {
            OutputFormat::Json => println!("{}", error_formatter.format_error(&e)),
            _ => eprintln!("{}", error_formatter.format_error(&e)),
        }
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> lynx_cli::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    debug!(path = ?cli.config, "Configuration loaded");

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    let ctx = LiveContext::from_config(&config.service_config())?;
    let pipeline = ConversionPipeline::new(ctx);

    match cli.command {
        Command::Parse(args) => commands::execute_parse(args, &pipeline, &formatter).await?,
        Command::Convert(args) => commands::execute_convert(args, &pipeline, &formatter).await?,
        Command::Quote(args) => commands::execute_quote(args, &pipeline, &formatter).await?,
        Command::Portfolio(args) => {
            commands::execute_portfolio(args, &pipeline, &formatter).await?
        }
        Command::Rates(args) => commands::execute_rates(args, &pipeline, &formatter).await?,
        Command::List(args) => commands::execute_list(args, &pipeline, &formatter).await?,
        Command::Send(args) => commands::execute_send(args, &pipeline, &formatter).await?,
        Command::SendFile(args) => {
            commands::execute_send_file(args, &pipeline, &formatter).await?
        }
        Command::Delete(args) => commands::execute_delete(args, &pipeline, &formatter).await?,
    }

    Ok(())
}
