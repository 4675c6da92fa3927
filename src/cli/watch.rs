//! Continuous polling loop for watch mode.

use std::io::{self, Write};

use crate::config::PrwatchConfig;
use crate::github::gateway::{OctocrabPullsGateway, PullRequestGateway};
use crate::github::PrwatchError;
use crate::telemetry::TelemetrySink;

use super::check::run_with_gateway;

/// Polls the watched repositories on the configured interval, forever.
///
/// The first pass runs immediately; later passes wake on the interval. A
/// pass that slips past its slot does not burst to catch up.
///
/// # Errors
///
/// Returns the first configuration or I/O error; per-repository polling
/// failures are reported inline and do not end the loop.
pub async fn run(
    config: &PrwatchConfig,
    telemetry: &dyn TelemetrySink,
) -> Result<(), PrwatchError> {
    let token = config.resolve_token()?;
    let gateway = OctocrabPullsGateway::for_token(&token)?;
    let mut stdout = io::stdout().lock();
    run_with_gateway_forever(config, &gateway, telemetry, &mut stdout).await
}

/// The watch loop against a caller-supplied gateway.
///
/// This function is exposed for testing with mock gateways; it only
/// returns on error.
///
/// # Errors
///
/// Propagates the first error from a polling pass.
pub async fn run_with_gateway_forever<W: Write>(
    config: &PrwatchConfig,
    gateway: &dyn PullRequestGateway,
    telemetry: &dyn TelemetrySink,
    writer: &mut W,
) -> Result<(), PrwatchError> {
    let mut interval = tokio::time::interval(config.poll_interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        run_with_gateway(config, gateway, telemetry, writer).await?;
    }
}
