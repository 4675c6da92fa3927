//! Single polling pass over the watched repositories.

use std::io::{self, Write};

use crate::config::PrwatchConfig;
use crate::github::gateway::{OctocrabPullsGateway, PullRequestGateway};
use crate::github::poller::ReviewPoller;
use crate::github::PrwatchError;
use crate::telemetry::{TelemetryEvent, TelemetrySink};

use super::output::{write_poll_listing, write_status_line};

/// Polls every watched repository once and prints the status summary.
///
/// # Errors
///
/// Returns [`PrwatchError::Configuration`] if required configuration is
/// missing and [`PrwatchError::Authentication`] if the token is rejected.
pub async fn run(
    config: &PrwatchConfig,
    telemetry: &dyn TelemetrySink,
) -> Result<(), PrwatchError> {
    let token = config.resolve_token()?;
    let gateway = OctocrabPullsGateway::for_token(&token)?;
    let mut stdout = io::stdout().lock();
    run_with_gateway(config, &gateway, telemetry, &mut stdout).await
}

/// Runs one polling pass against a caller-supplied gateway.
///
/// This function is exposed for testing with mock gateways.
///
/// # Errors
///
/// Returns [`PrwatchError::MissingUsername`] when no username is configured
/// and [`PrwatchError::Io`] when the writer fails.
pub async fn run_with_gateway<W: Write>(
    config: &PrwatchConfig,
    gateway: &dyn PullRequestGateway,
    telemetry: &dyn TelemetrySink,
    writer: &mut W,
) -> Result<(), PrwatchError> {
    let login = config.require_username()?;
    let slugs = config.repositories()?;

    let poller = ReviewPoller::new(gateway);
    let outcome = poller.poll(&slugs).await;

    telemetry.record(TelemetryEvent::PollCompleted {
        repositories: slugs.len(),
        pull_requests: outcome.pull_requests.len(),
        failures: outcome.failures.len(),
    });

    write_status_line(writer, config, &outcome, login)?;
    write_poll_listing(writer, &outcome, login)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::run_with_gateway;
    use crate::config::PrwatchConfig;
    use crate::github::PrwatchError;
    use crate::github::gateway::MockPullRequestGateway;
    use crate::github::models::test_support::{open_pull_request, with_requested_reviewer};
    use crate::telemetry::NoopTelemetrySink;

    fn watch_config() -> PrwatchConfig {
        PrwatchConfig {
            username: Some("octocat".to_owned()),
            repos: vec!["octo/widget".to_owned()],
            ..PrwatchConfig::default()
        }
    }

    #[rstest]
    #[tokio::test]
    async fn reports_review_requests_from_the_gateway() {
        let mut gateway = MockPullRequestGateway::new();
        gateway
            .expect_list_open_pull_requests()
            .times(1)
            .returning(|_| {
                let pull = with_requested_reviewer(&open_pull_request("octo/widget", 7), "octocat");
                Ok(vec![pull])
            });

        let mut buffer = Vec::new();
        run_with_gateway(
            &watch_config(),
            &gateway,
            &NoopTelemetrySink,
            &mut buffer,
        )
        .await
        .expect("check should succeed");

        let output = String::from_utf8(buffer).expect("output should be UTF-8");
        assert!(output.starts_with("✍️ 1 review(s) requested"));
        assert!(output.contains("octo/widget#7"));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_username_is_an_error() {
        let gateway = MockPullRequestGateway::new();
        let config = PrwatchConfig {
            repos: vec!["octo/widget".to_owned()],
            ..PrwatchConfig::default()
        };

        let mut buffer = Vec::new();
        let error = run_with_gateway(&config, &gateway, &NoopTelemetrySink, &mut buffer)
            .await
            .expect_err("missing username should fail");
        assert_eq!(error, PrwatchError::MissingUsername);
    }

    #[rstest]
    #[tokio::test]
    async fn repository_failures_are_reported_not_fatal() {
        let mut gateway = MockPullRequestGateway::new();
        gateway
            .expect_list_open_pull_requests()
            .times(1)
            .returning(|_| {
                Err(PrwatchError::Api {
                    message: "boom".to_owned(),
                })
            });

        let mut buffer = Vec::new();
        run_with_gateway(
            &watch_config(),
            &gateway,
            &NoopTelemetrySink,
            &mut buffer,
        )
        .await
        .expect("a failing repository should not abort the pass");

        let output = String::from_utf8(buffer).expect("output should be UTF-8");
        assert!(output.starts_with("💤"));
        assert!(output.contains("warning: octo/widget"));
    }
}
