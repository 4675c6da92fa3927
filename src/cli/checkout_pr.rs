//! Checks out a single pull request by URL.

use std::io::{self, Write};

use chrono::Utc;

use crate::checkout::{CheckoutWorkspace, plan_checkout};
use crate::config::PrwatchConfig;
use crate::github::gateway::{OctocrabPullsGateway, PullRequestGateway};
use crate::github::locator::PullRequestLocator;
use crate::github::PrwatchError;
use crate::telemetry::{TelemetryEvent, TelemetrySink};

use super::output::write_checkout_progress;

/// Fetches the configured pull request and checks it out locally.
///
/// # Errors
///
/// Returns [`PrwatchError::MissingPullRequestUrl`] without a URL,
/// [`PrwatchError::Checkout`] when a pipeline step fails, and the usual
/// gateway errors when the pull request cannot be fetched.
pub async fn run(
    config: &PrwatchConfig,
    telemetry: &dyn TelemetrySink,
) -> Result<(), PrwatchError> {
    let pr_url = config.require_pr_url()?;
    let token = config.resolve_token()?;
    let locator = PullRequestLocator::parse(pr_url)?;
    let gateway = OctocrabPullsGateway::for_locator(&token, &locator)?;
    let mut stdout = io::stdout().lock();
    run_with_gateway(config, &locator, &gateway, telemetry, &mut stdout).await
}

/// Runs the checkout against a caller-supplied gateway.
///
/// This function is exposed for testing with mock gateways. Progress
/// events stream to `writer` as they arrive; a step failure is reported
/// after the pipeline's own terminal event has been written.
///
/// # Errors
///
/// Returns [`PrwatchError::Checkout`] carrying the composed failure
/// message when a pipeline step fails.
pub async fn run_with_gateway<W: Write>(
    config: &PrwatchConfig,
    locator: &PullRequestLocator,
    gateway: &dyn PullRequestGateway,
    telemetry: &dyn TelemetrySink,
    writer: &mut W,
) -> Result<(), PrwatchError> {
    let checkout_root = config.require_checkout_dir()?;
    let pull = gateway.pull_request(locator).await?;

    let workspace = CheckoutWorkspace::allocate(checkout_root, &pull, Utc::now())?;
    let resolver = config.git_resolver();
    let pipeline = plan_checkout(&pull, &workspace, resolver.as_ref(), config.checkout_options())?;

    let handle = pipeline.start();
    let mut failure = None;
    while let Ok(progress) = handle.recv() {
        write_checkout_progress(writer, &progress)?;
        if progress.is_failure() {
            failure = Some(progress);
        }
    }

    telemetry.record(TelemetryEvent::CheckoutFinished {
        number: pull.number,
        success: failure.is_none(),
        exit_status: failure.as_ref().and_then(|progress| progress.exit_status),
    });

    match failure {
        Some(progress) => Err(PrwatchError::Checkout {
            description: progress.description,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::run_with_gateway;
    use crate::config::PrwatchConfig;
    use crate::github::PrwatchError;
    use crate::github::gateway::MockPullRequestGateway;
    use crate::github::locator::PullRequestLocator;
    use crate::github::models::test_support::open_pull_request;
    use crate::telemetry::NoopTelemetrySink;

    fn utf8_root(temp_dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf())
            .expect("temporary directory path should be valid UTF-8")
    }

    /// Writes an executable fake git that creates the clone directory and
    /// succeeds on every invocation.
    fn create_fake_git(temp_dir: &TempDir, project: &str) -> Utf8PathBuf {
        use cap_std::ambient_authority;
        use cap_std::fs::PermissionsExt;
        use cap_std::fs_utf8::Dir;

        let root = utf8_root(temp_dir);
        let dir = Dir::open_ambient_dir(&root, ambient_authority())
            .expect("temp directory should open");
        let contents = format!(
            "#!/bin/sh\nif [ \"$1\" = \"clone\" ]; then mkdir -p {project}; fi\nexit 0\n"
        );
        dir.write("fake-git", contents).expect("script should write");

        let metadata = dir.metadata("fake-git").expect("script should stat");
        let mut permissions = metadata.permissions();
        permissions.set_mode(0o755);
        dir.set_permissions("fake-git", permissions)
            .expect("script should chmod");

        root.join("fake-git")
    }

    fn pull_gateway() -> MockPullRequestGateway {
        let mut gateway = MockPullRequestGateway::new();
        gateway
            .expect_pull_request()
            .times(1)
            .returning(|_| Ok(open_pull_request("octo/widget", 7)));
        gateway
    }

    fn locator() -> PullRequestLocator {
        PullRequestLocator::parse("https://github.com/octo/widget/pull/7")
            .expect("locator should parse")
    }

    #[rstest]
    #[tokio::test]
    async fn successful_checkout_streams_steps_and_ends_done() {
        let temp_dir = TempDir::new().expect("failed to create temporary directory");
        let git = create_fake_git(&temp_dir, "widget");
        let config = PrwatchConfig {
            checkout_dir: Some(utf8_root(&temp_dir).join("checkouts").into_string()),
            git_program: Some(git.into_string()),
            ..PrwatchConfig::default()
        };

        let mut buffer = Vec::new();
        run_with_gateway(
            &config,
            &locator(),
            &pull_gateway(),
            &NoopTelemetrySink,
            &mut buffer,
        )
        .await
        .expect("checkout should succeed");

        let output = String::from_utf8(buffer).expect("output should be UTF-8");
        assert!(output.contains("Cloning: git clone --recursive"));
        assert!(output.contains("Checking out: git checkout -b pr-7 main"));
        assert!(output.trim_end().ends_with("Done"));
    }

    #[rstest]
    #[tokio::test]
    async fn spawn_failure_surfaces_as_a_checkout_error() {
        let temp_dir = TempDir::new().expect("failed to create temporary directory");
        let config = PrwatchConfig {
            checkout_dir: Some(utf8_root(&temp_dir).join("checkouts").into_string()),
            git_program: Some(utf8_root(&temp_dir).join("no-such-git").into_string()),
            ..PrwatchConfig::default()
        };

        let mut buffer = Vec::new();
        let error = run_with_gateway(
            &config,
            &locator(),
            &pull_gateway(),
            &NoopTelemetrySink,
            &mut buffer,
        )
        .await
        .expect_err("missing git should fail the checkout");

        match error {
            PrwatchError::Checkout { description } => {
                assert!(description.starts_with("Failed to run command"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn missing_checkout_dir_fails_before_fetching() {
        let gateway = MockPullRequestGateway::new();
        let config = PrwatchConfig::default();

        let mut buffer = Vec::new();
        let error = run_with_gateway(
            &config,
            &locator(),
            &gateway,
            &NoopTelemetrySink,
            &mut buffer,
        )
        .await
        .expect_err("missing checkout dir should fail");

        assert!(matches!(error, PrwatchError::Configuration { .. }));
    }
}
