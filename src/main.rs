use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use verity::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before clap reads VERITY_* variables
    let _ = dotenvy::dotenv();

    let args = Cli::parse();

    let default_level = if args.verbose { "verity=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli::run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
