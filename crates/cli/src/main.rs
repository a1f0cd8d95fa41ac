//! munki-dispatch entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: command-line arguments and environment
//!    (a local `.env` file is honoured for development).
//! 2. **Wire observability**: `tracing-subscriber` with a JSON (or pretty /
//!    compact) formatter and an optional OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure**: the secret store and generator adapters
//!    selected by the arguments, injected into [`dispatch::Dispatcher`].
//! 4. **Map the outcome to an exit status**: `0` on success, the generator's
//!    own exit code when it fails, `1` for everything else.

mod cli;
mod commands;
mod config;
mod telemetry;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use cli::{Cli, Commands};
use commands::{run_dispatch, run_validate};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let telemetry = match telemetry::init(&cli) {
        Ok(telemetry) => telemetry,
        Err(e) => {
            eprintln!("munki-dispatch: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    info!(version = env!("CARGO_PKG_VERSION"), "munki-dispatch starting");

    let code = match &cli.command {
        Commands::Run(args) => match run_dispatch(args).await {
            Ok(commands::RunOutcome::Completed) => 0,
            Ok(commands::RunOutcome::Failed { error }) => {
                error!(error = %error, "dispatch failed");
                error.exit_code()
            }
            Err(e) => {
                error!(error = ?e, "dispatch could not start");
                1
            }
        },
        Commands::Validate(args) => match run_validate(args) {
            Ok(()) => 0,
            Err(e) => {
                error!(error = ?e, "validation failed");
                1
            }
        },
    };

    telemetry.shutdown();
    exit_code(code)
}

// Exit statuses outside 1..=255 cannot be represented portably.
fn exit_code(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}
