//! Polls watched repositories for open pull requests.
//!
//! One sweep asks the gateway for the open pull requests of every configured
//! repository, deduplicates the results into a URL-keyed set, and records
//! per-repository failures without aborting the sweep. Callers filter the
//! outcome for pull requests awaiting the configured user's review or
//! assignment.

use std::collections::HashSet;

use super::error::PrwatchError;
use super::gateway::PullRequestGateway;
use super::locator::RepositorySlug;
use super::models::PullRequest;

/// A repository that could not be polled during a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryFailure {
    /// The repository that failed.
    pub slug: RepositorySlug,
    /// Why it failed.
    pub error: PrwatchError,
}

/// The result of one polling sweep across all watched repositories.
#[derive(Debug, Clone, Default)]
pub struct PollOutcome {
    /// All open pull requests, deduplicated by API URL and ordered by
    /// repository then number.
    pub pull_requests: Vec<PullRequest>,
    /// Repositories that could not be polled.
    pub failures: Vec<RepositoryFailure>,
}

impl PollOutcome {
    /// Pull requests whose review has been requested from `login`.
    #[must_use]
    pub fn review_requested(&self, login: &str) -> Vec<&PullRequest> {
        self.pull_requests
            .iter()
            .filter(|pull| pull.review_requested_of(login))
            .collect()
    }

    /// Pull requests assigned to `login`.
    #[must_use]
    pub fn assigned(&self, login: &str) -> Vec<&PullRequest> {
        self.pull_requests
            .iter()
            .filter(|pull| pull.assigned_to(login))
            .collect()
    }
}

/// Sweeps the watch list through a gateway.
pub struct ReviewPoller<'a> {
    gateway: &'a dyn PullRequestGateway,
}

impl<'a> ReviewPoller<'a> {
    /// Creates a poller borrowing the given gateway.
    #[must_use]
    pub const fn new(gateway: &'a dyn PullRequestGateway) -> Self {
        Self { gateway }
    }

    /// Polls every repository once and returns the deduplicated outcome.
    ///
    /// A repository that fails to list is recorded in
    /// [`PollOutcome::failures`] and logged; the sweep continues with the
    /// remaining repositories. Closed pull requests are dropped.
    pub async fn poll(&self, slugs: &[RepositorySlug]) -> PollOutcome {
        let mut seen: HashSet<PullRequest> = HashSet::new();
        let mut failures = Vec::new();

        for slug in slugs {
            match self.gateway.list_open_pull_requests(slug).await {
                Ok(pulls) => {
                    seen.extend(pulls.into_iter().filter(PullRequest::is_open));
                }
                Err(error) => {
                    tracing::warn!("failed to poll {slug}: {error}");
                    failures.push(RepositoryFailure {
                        slug: slug.clone(),
                        error,
                    });
                }
            }
        }

        let mut pull_requests: Vec<PullRequest> = seen.into_iter().collect();
        pull_requests.sort_by(|left, right| {
            let left_key = (left.repo_full_name().unwrap_or_default(), left.number);
            let right_key = (right.repo_full_name().unwrap_or_default(), right.number);
            left_key.cmp(&right_key)
        });

        PollOutcome {
            pull_requests,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::ReviewPoller;
    use crate::github::error::PrwatchError;
    use crate::github::gateway::MockPullRequestGateway;
    use crate::github::locator::RepositorySlug;
    use crate::github::models::test_support::{open_pull_request, with_requested_reviewer};

    fn slugs(names: &[&str]) -> Vec<RepositorySlug> {
        names
            .iter()
            .map(|name| RepositorySlug::parse(name).expect("slug should parse"))
            .collect()
    }

    #[rstest]
    #[tokio::test]
    async fn deduplicates_by_api_url_across_repositories() {
        let shared = open_pull_request("octo/shared", 3);
        let first_copy = shared.clone();
        let second_copy = shared;

        let mut gateway = MockPullRequestGateway::new();
        gateway
            .expect_list_open_pull_requests()
            .times(2)
            .returning(move |slug| {
                if slug.repository().as_str() == "one" {
                    Ok(vec![first_copy.clone()])
                } else {
                    Ok(vec![second_copy.clone()])
                }
            });

        let poller = ReviewPoller::new(&gateway);
        let outcome = poller.poll(&slugs(&["octo/one", "octo/two"])).await;

        assert_eq!(outcome.pull_requests.len(), 1, "expected a single PR");
        assert!(outcome.failures.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn a_failing_repository_does_not_abort_the_sweep() {
        let mut gateway = MockPullRequestGateway::new();
        gateway
            .expect_list_open_pull_requests()
            .times(2)
            .returning(|slug| {
                if slug.repository().as_str() == "broken" {
                    Err(PrwatchError::Network {
                        message: "connection reset".to_owned(),
                    })
                } else {
                    Ok(vec![open_pull_request("octo/fine", 1)])
                }
            });

        let poller = ReviewPoller::new(&gateway);
        let outcome = poller.poll(&slugs(&["octo/broken", "octo/fine"])).await;

        assert_eq!(outcome.pull_requests.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        let failure = outcome.failures.first().expect("should record failure");
        assert_eq!(failure.slug.repository().as_str(), "broken");
        assert!(matches!(failure.error, PrwatchError::Network { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn closed_pull_requests_are_dropped() {
        let mut closed = open_pull_request("octo/repo", 5);
        closed.state = Some("closed".to_owned());

        let mut gateway = MockPullRequestGateway::new();
        gateway
            .expect_list_open_pull_requests()
            .times(1)
            .returning(move |_| Ok(vec![closed.clone(), open_pull_request("octo/repo", 6)]));

        let poller = ReviewPoller::new(&gateway);
        let outcome = poller.poll(&slugs(&["octo/repo"])).await;

        assert_eq!(outcome.pull_requests.len(), 1);
        let remaining = outcome.pull_requests.first().expect("one PR should remain");
        assert_eq!(remaining.number, 6);
    }

    #[rstest]
    #[tokio::test]
    async fn review_requested_filters_by_login() {
        let plain = open_pull_request("octo/repo", 1);
        let requested = with_requested_reviewer(&open_pull_request("octo/repo", 2), "alice");

        let mut gateway = MockPullRequestGateway::new();
        gateway
            .expect_list_open_pull_requests()
            .times(1)
            .returning(move |_| Ok(vec![plain.clone(), requested.clone()]));

        let poller = ReviewPoller::new(&gateway);
        let outcome = poller.poll(&slugs(&["octo/repo"])).await;

        let queue = outcome.review_requested("alice");
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.first().map(|pull| pull.number), Some(2));
        assert!(outcome.review_requested("mallory").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn ordering_is_by_repository_then_number() {
        let mut gateway = MockPullRequestGateway::new();
        gateway
            .expect_list_open_pull_requests()
            .times(1)
            .returning(|_| {
                Ok(vec![
                    open_pull_request("octo/zeta", 1),
                    open_pull_request("octo/alpha", 9),
                    open_pull_request("octo/alpha", 2),
                ])
            });

        let poller = ReviewPoller::new(&gateway);
        let outcome = poller.poll(&slugs(&["octo/any"])).await;

        let order: Vec<(Option<String>, u64)> = outcome
            .pull_requests
            .iter()
            .map(|pull| (pull.repo_full_name(), pull.number))
            .collect();
        assert_eq!(
            order,
            vec![
                (Some("octo/alpha".to_owned()), 2),
                (Some("octo/alpha".to_owned()), 9),
                (Some("octo/zeta".to_owned()), 1),
            ]
        );
    }
}
