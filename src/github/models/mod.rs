//! Data models representing pull requests surfaced by the poller.
//!
//! Types prefixed with `Api` are internal deserialisation targets that
//! convert into public domain types. A pull request's identity is its API
//! URL: two records with the same URL compare equal and hash identically,
//! which is what lets the poller deduplicate results across repositories.

use std::hash::{Hash, Hasher};

use serde::Deserialize;

#[cfg(feature = "test-support")]
pub mod test_support;

/// A GitHub account referenced by a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    /// Login name.
    pub login: String,
    /// Avatar image URL if present.
    pub avatar_url: Option<String>,
}

/// The repository a branch ref lives in, with its clone URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteRepository {
    /// Short repository name (e.g. `hello-world`).
    pub name: Option<String>,
    /// Full `owner/repo` name.
    pub full_name: Option<String>,
    /// SSH clone URL.
    pub ssh_url: Option<String>,
    /// HTTPS clone URL.
    pub clone_url: Option<String>,
}

impl RemoteRepository {
    /// Returns the preferred clone URL: SSH when present, HTTPS otherwise.
    #[must_use]
    pub fn clone_target(&self) -> Option<&str> {
        self.ssh_url.as_deref().or(self.clone_url.as_deref())
    }
}

/// One side of a pull request (head or base).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchRef {
    /// Label in `owner:branch` form.
    pub label: Option<String>,
    /// Branch ref name.
    pub ref_name: String,
    /// Commit SHA the ref points at.
    pub sha: String,
    /// Repository the ref lives in, when the API includes it.
    pub repo: Option<RemoteRepository>,
}

/// An open pull request returned by the listing endpoint.
#[derive(Debug, Clone, Default, Eq)]
pub struct PullRequest {
    /// Pull request number within its repository.
    pub number: u64,
    /// Canonical API URL; the identity key for deduplication.
    pub url: String,
    /// HTML URL for displaying to a user.
    pub html_url: Option<String>,
    /// Title of the pull request.
    pub title: Option<String>,
    /// State (e.g. open, closed).
    pub state: Option<String>,
    /// Author if present.
    pub author: Option<Account>,
    /// Accounts whose review has been requested.
    pub requested_reviewers: Vec<Account>,
    /// Accounts assigned to the pull request.
    pub assignees: Vec<Account>,
    /// Head (source) side.
    pub head: BranchRef,
    /// Base (target) side.
    pub base: BranchRef,
}

impl PartialEq for PullRequest {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Hash for PullRequest {
    fn hash<H: Hasher>(&self, hasher: &mut H) {
        self.url.hash(hasher);
    }
}

impl PullRequest {
    /// Whether the pull request is still open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.as_deref() != Some("closed")
    }

    /// Whether `login`'s review has been requested.
    #[must_use]
    pub fn review_requested_of(&self, login: &str) -> bool {
        self.requested_reviewers
            .iter()
            .any(|account| account.login == login)
    }

    /// Whether the pull request is assigned to `login`.
    #[must_use]
    pub fn assigned_to(&self, login: &str) -> bool {
        self.assignees.iter().any(|account| account.login == login)
    }

    /// Full `owner/repo` name of the base repository when available,
    /// otherwise derived from the API URL path.
    #[must_use]
    pub fn repo_full_name(&self) -> Option<String> {
        if let Some(repo) = &self.base.repo
            && let Some(full_name) = &repo.full_name
        {
            return Some(full_name.clone());
        }

        // API URLs look like https://api.github.com/repos/<owner>/<repo>/pulls/<n>.
        let parsed = url::Url::parse(&self.url).ok()?;
        let mut segments = parsed.path_segments()?;
        if segments.next() != Some("repos") {
            return None;
        }
        let owner = segments.next()?;
        let repo = segments.next()?;
        Some(format!("{owner}/{repo}"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
    pub(super) avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepository {
    pub(super) name: Option<String>,
    pub(super) full_name: Option<String>,
    pub(super) ssh_url: Option<String>,
    pub(super) clone_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiBranchRef {
    pub(super) label: Option<String>,
    #[serde(rename = "ref")]
    pub(super) ref_name: String,
    pub(super) sha: String,
    pub(super) repo: Option<ApiRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) url: String,
    pub(super) html_url: Option<String>,
    pub(super) title: Option<String>,
    pub(super) state: Option<String>,
    pub(super) user: Option<ApiUser>,
    #[serde(default)]
    pub(super) requested_reviewers: Vec<ApiUser>,
    #[serde(default)]
    pub(super) assignees: Vec<ApiUser>,
    pub(super) head: ApiBranchRef,
    pub(super) base: ApiBranchRef,
}

impl From<ApiUser> for Account {
    fn from(value: ApiUser) -> Self {
        Self {
            login: value.login.unwrap_or_default(),
            avatar_url: value.avatar_url,
        }
    }
}

impl From<ApiRepository> for RemoteRepository {
    fn from(value: ApiRepository) -> Self {
        Self {
            name: value.name,
            full_name: value.full_name,
            ssh_url: value.ssh_url,
            clone_url: value.clone_url,
        }
    }
}

impl From<ApiBranchRef> for BranchRef {
    fn from(value: ApiBranchRef) -> Self {
        Self {
            label: value.label,
            ref_name: value.ref_name,
            sha: value.sha,
            repo: value.repo.map(RemoteRepository::from),
        }
    }
}

impl From<ApiPullRequest> for PullRequest {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            url: value.url,
            html_url: value.html_url,
            title: value.title,
            state: value.state,
            author: value.user.map(Account::from),
            requested_reviewers: value
                .requested_reviewers
                .into_iter()
                .map(Account::from)
                .collect(),
            assignees: value.assignees.into_iter().map(Account::from).collect(),
            head: value.head.into(),
            base: value.base.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Account, PullRequest, RemoteRepository};

    fn pull_request_at(url: &str) -> PullRequest {
        PullRequest {
            number: 7,
            url: url.to_owned(),
            ..Default::default()
        }
    }

    #[rstest]
    fn identity_is_the_api_url() {
        let first = PullRequest {
            title: Some("one".to_owned()),
            ..pull_request_at("https://api.github.com/repos/octo/repo/pulls/7")
        };
        let second = PullRequest {
            title: Some("two".to_owned()),
            ..pull_request_at("https://api.github.com/repos/octo/repo/pulls/7")
        };

        assert_eq!(first, second, "same URL should compare equal");

        let mut set = std::collections::HashSet::new();
        set.insert(first);
        set.insert(second);
        assert_eq!(set.len(), 1, "same URL should deduplicate");
    }

    #[rstest]
    fn repo_full_name_derives_from_api_url() {
        let pull = pull_request_at("https://api.github.com/repos/octo/hello-world/pulls/7");
        assert_eq!(pull.repo_full_name().as_deref(), Some("octo/hello-world"));
    }

    #[rstest]
    fn repo_full_name_prefers_base_repository() {
        let mut pull = pull_request_at("https://api.github.com/repos/fork/hello-world/pulls/7");
        pull.base.repo = Some(RemoteRepository {
            full_name: Some("upstream/hello-world".to_owned()),
            ..Default::default()
        });
        assert_eq!(
            pull.repo_full_name().as_deref(),
            Some("upstream/hello-world")
        );
    }

    #[rstest]
    #[case::requested("alice", true)]
    #[case::not_requested("mallory", false)]
    fn review_requested_matches_login(#[case] login: &str, #[case] expected: bool) {
        let pull = PullRequest {
            requested_reviewers: vec![Account {
                login: "alice".to_owned(),
                avatar_url: None,
            }],
            ..pull_request_at("https://api.github.com/repos/octo/repo/pulls/7")
        };
        assert_eq!(pull.review_requested_of(login), expected);
    }

    #[rstest]
    fn clone_target_prefers_ssh() {
        let repo = RemoteRepository {
            ssh_url: Some("git@github.com:octo/repo.git".to_owned()),
            clone_url: Some("https://github.com/octo/repo.git".to_owned()),
            ..Default::default()
        };
        assert_eq!(repo.clone_target(), Some("git@github.com:octo/repo.git"));
    }
}
