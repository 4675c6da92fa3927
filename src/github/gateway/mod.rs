//! Gateways for listing pull requests through Octocrab.
//!
//! The trait-based design enables mocking in tests while the Octocrab
//! implementation handles real HTTP requests against the `/repos/*/pulls`
//! endpoints.

mod client;
mod error_mapping;
mod pulls;

pub use pulls::OctocrabPullsGateway;

use async_trait::async_trait;

use crate::github::error::PrwatchError;
use crate::github::locator::{PullRequestLocator, RepositorySlug};
use crate::github::models::PullRequest;

/// Gateway that can load pull request data for watched repositories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestGateway: Send + Sync {
    /// List the open pull requests of one repository.
    async fn list_open_pull_requests(
        &self,
        slug: &RepositorySlug,
    ) -> Result<Vec<PullRequest>, PrwatchError>;

    /// Fetch a single pull request by locator.
    async fn pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequest, PrwatchError>;
}
