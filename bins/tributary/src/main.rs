mod cmd;
mod config;
mod error;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::{Cli, Commands};

/// Logs go to stderr: stdout may carry the converted stream.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let result = match Cli::parse().command {
        Commands::Convert(args) => cmd::convert::run(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "conversion failed");
            ExitCode::FAILURE
        }
    }
}
