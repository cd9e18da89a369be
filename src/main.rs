use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use finreport::cli::Cli;
use finreport::dispatcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for tables and JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    dispatcher::run(cli).await
}
