//! Output formatting utilities for CLI operations.

use std::io::Write;

use crate::checkout::CheckoutProgress;
use crate::config::PrwatchConfig;
use crate::github::PrwatchError;
use crate::github::models::PullRequest;
use crate::github::poller::PollOutcome;

fn io_error(error: &std::io::Error) -> PrwatchError {
    PrwatchError::Io {
        message: error.to_string(),
    }
}

/// Picks the status glyph matching the poll outcome for `login`.
///
/// Review requests outrank assignments; with neither pending, the quiet
/// glyph is shown.
#[must_use]
pub fn status_glyph<'a>(
    config: &'a PrwatchConfig,
    outcome: &PollOutcome,
    login: &str,
) -> &'a str {
    if !outcome.review_requested(login).is_empty() {
        &config.review_requested_symbol
    } else if !outcome.assigned(login).is_empty() {
        &config.assigned_symbol
    } else {
        &config.quiet_symbol
    }
}

/// Writes the one-line status summary for a poll.
///
/// # Errors
///
/// Returns [`PrwatchError::Io`] if the writer fails.
pub fn write_status_line<W: Write>(
    writer: &mut W,
    config: &PrwatchConfig,
    outcome: &PollOutcome,
    login: &str,
) -> Result<(), PrwatchError> {
    let glyph = status_glyph(config, outcome, login);
    let reviews = outcome.review_requested(login).len();
    let assigned = outcome.assigned(login).len();
    writeln!(
        writer,
        "{glyph} {reviews} review(s) requested, {assigned} assigned"
    )
    .map_err(|e| io_error(&e))
}

/// Writes one listing line per pull request awaiting `login`, followed by
/// any per-repository polling failures.
///
/// # Errors
///
/// Returns [`PrwatchError::Io`] if the writer fails.
pub fn write_poll_listing<W: Write>(
    writer: &mut W,
    outcome: &PollOutcome,
    login: &str,
) -> Result<(), PrwatchError> {
    for pull in outcome.review_requested(login) {
        write_pull_line(writer, pull, "review requested")?;
    }
    for pull in outcome.assigned(login) {
        if !pull.review_requested_of(login) {
            write_pull_line(writer, pull, "assigned")?;
        }
    }
    for failure in &outcome.failures {
        writeln!(writer, "warning: {}: {}", failure.slug, failure.error)
            .map_err(|e| io_error(&e))?;
    }
    Ok(())
}

fn write_pull_line<W: Write>(
    writer: &mut W,
    pull: &PullRequest,
    reason: &str,
) -> Result<(), PrwatchError> {
    let repo = pull.repo_full_name().unwrap_or_default();
    let title = pull.title.as_deref().unwrap_or("(no title)");
    let link = pull.html_url.as_deref().unwrap_or(pull.url.as_str());
    writeln!(
        writer,
        "  {repo}#{number} [{reason}] {title}\n    {link}",
        number = pull.number
    )
    .map_err(|e| io_error(&e))
}

/// Writes one progress event of a running checkout.
///
/// Started events show the step's label and command; the terminal event
/// shows either "Done" or the composed failure message.
///
/// # Errors
///
/// Returns [`PrwatchError::Io`] if the writer fails.
pub fn write_checkout_progress<W: Write>(
    writer: &mut W,
    progress: &CheckoutProgress,
) -> Result<(), PrwatchError> {
    match &progress.command {
        Some(command) => writeln!(writer, "{}: git {command}", progress.description),
        None => writeln!(writer, "{}", progress.description),
    }
    .map_err(|e| io_error(&e))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{status_glyph, write_poll_listing, write_status_line};
    use crate::config::PrwatchConfig;
    use crate::github::poller::PollOutcome;
    use crate::github::models::test_support::{
        open_pull_request, with_assignee, with_requested_reviewer,
    };

    fn outcome_with(pulls: Vec<crate::github::models::PullRequest>) -> PollOutcome {
        PollOutcome {
            pull_requests: pulls,
            failures: Vec::new(),
        }
    }

    #[rstest]
    fn review_requests_pick_the_writing_glyph() {
        let config = PrwatchConfig::default();
        let base = open_pull_request("octo/widget", 7);
        let outcome = outcome_with(vec![with_requested_reviewer(&base, "octocat")]);

        assert_eq!(status_glyph(&config, &outcome, "octocat"), "✍️");
    }

    #[rstest]
    fn assignments_pick_the_waving_glyph() {
        let config = PrwatchConfig::default();
        let base = open_pull_request("octo/widget", 7);
        let outcome = outcome_with(vec![with_assignee(&base, "octocat")]);

        assert_eq!(status_glyph(&config, &outcome, "octocat"), "👋");
    }

    #[rstest]
    fn quiet_glyph_when_nothing_is_pending() {
        let config = PrwatchConfig::default();
        let outcome = outcome_with(vec![open_pull_request("octo/widget", 7)]);

        assert_eq!(status_glyph(&config, &outcome, "octocat"), "💤");
    }

    #[rstest]
    fn status_line_counts_reviews_and_assignments() {
        let config = PrwatchConfig::default();
        let first = with_requested_reviewer(&open_pull_request("octo/widget", 7), "octocat");
        let second = with_assignee(&open_pull_request("octo/widget", 9), "octocat");
        let outcome = outcome_with(vec![first, second]);

        let mut buffer = Vec::new();
        write_status_line(&mut buffer, &config, &outcome, "octocat")
            .expect("write should succeed");

        assert_eq!(
            String::from_utf8(buffer).expect("output should be UTF-8"),
            "✍️ 1 review(s) requested, 1 assigned\n"
        );
    }

    #[rstest]
    fn listing_does_not_repeat_a_pull_that_is_both() {
        let base = open_pull_request("octo/widget", 7);
        let both = with_assignee(&with_requested_reviewer(&base, "octocat"), "octocat");
        let outcome = outcome_with(vec![both]);

        let mut buffer = Vec::new();
        write_poll_listing(&mut buffer, &outcome, "octocat").expect("write should succeed");

        let output = String::from_utf8(buffer).expect("output should be UTF-8");
        assert_eq!(output.matches("octo/widget#7").count(), 1);
        assert!(output.contains("[review requested]"));
    }
}
