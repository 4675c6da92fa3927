//! Prwatch CLI entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use prwatch::cli::{check, checkout_pr, watch};
use prwatch::telemetry::StderrJsonlTelemetrySink;
use prwatch::{OperationMode, PrwatchConfig, PrwatchError};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), PrwatchError> {
    let config = load_config()?;
    let telemetry = StderrJsonlTelemetrySink;

    match config.operation_mode() {
        OperationMode::Checkout => checkout_pr::run(&config, &telemetry).await,
        OperationMode::Watch => watch::run(&config, &telemetry).await,
        OperationMode::Check => check::run(&config, &telemetry).await,
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`PrwatchError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PrwatchConfig, PrwatchError> {
    PrwatchConfig::load().map_err(|error| PrwatchError::Configuration {
        message: error.to_string(),
    })
}
