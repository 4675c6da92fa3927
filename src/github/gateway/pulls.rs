//! Octocrab implementation of the pull request gateway.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};

use crate::github::error::PrwatchError;
use crate::github::locator::{
    PersonalAccessToken, PullRequestLocator, RepositorySlug, public_api_base,
};
use crate::github::models::{ApiPullRequest, PullRequest};

use super::PullRequestGateway;
use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;

/// Upper bound the listing endpoint accepts per page; the watch list polls
/// one page per repository, matching the original application.
const LIST_PAGE_SIZE: &str = "100";

/// Octocrab-backed gateway.
pub struct OctocrabPullsGateway {
    client: Octocrab,
}

impl OctocrabPullsGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds a gateway against the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`PrwatchError::Api`] when Octocrab fails to construct a
    /// client.
    pub fn for_token(token: &PersonalAccessToken) -> Result<Self, PrwatchError> {
        let api_base = public_api_base()?;
        let octocrab = build_octocrab_client(token, api_base.as_str())?;
        Ok(Self::new(octocrab))
    }

    /// Builds a gateway against the API base derived from a pull request
    /// locator (supports GitHub Enterprise hosts).
    ///
    /// # Errors
    ///
    /// Returns [`PrwatchError::InvalidUrl`] when the base URI cannot be
    /// parsed or [`PrwatchError::Api`] when Octocrab fails to construct a
    /// client.
    pub fn for_locator(
        token: &PersonalAccessToken,
        locator: &PullRequestLocator,
    ) -> Result<Self, PrwatchError> {
        let octocrab = build_octocrab_client(token, locator.api_base().as_str())?;
        Ok(Self::new(octocrab))
    }
}

#[async_trait]
impl PullRequestGateway for OctocrabPullsGateway {
    async fn list_open_pull_requests(
        &self,
        slug: &RepositorySlug,
    ) -> Result<Vec<PullRequest>, PrwatchError> {
        let query_params = [("state", "open"), ("per_page", LIST_PAGE_SIZE)];

        let page: Page<ApiPullRequest> = self
            .client
            .get(slug.pulls_path(), Some(&query_params))
            .await
            .map_err(|error| map_octocrab_error("list pulls", &error))?;

        Ok(page.items.into_iter().map(ApiPullRequest::into).collect())
    }

    async fn pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequest, PrwatchError> {
        self.client
            .get::<ApiPullRequest, _, _>(locator.pull_request_path(), None::<&()>)
            .await
            .map(ApiPullRequest::into)
            .map_err(|error| map_octocrab_error("pull request", &error))
    }
}
