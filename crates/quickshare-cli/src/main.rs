//! QuickShare CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod client;
mod commands;
mod error;
mod format;
mod model;
mod notify;
mod output;
mod progress;
mod session;

use commands::Cli;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.context() {
        Ok(ctx) => cli.execute(&ctx).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}
