//! Test helpers for constructing [`PullRequest`] fixtures.
//!
//! Builder functions for creating pull request instances in tests, reducing
//! boilerplate and keeping the URL-keyed identity consistent across test
//! modules.
//!
//! # Examples
//!
//! ```
//! use prwatch::github::models::test_support::{open_pull_request, reviewer};
//!
//! let pull = open_pull_request("octo/hello-world", 7);
//! assert_eq!(pull.number, 7);
//! assert!(pull.is_open());
//! ```

use super::{Account, BranchRef, PullRequest, RemoteRepository};

/// Constructs an account with the given login and no avatar.
#[must_use]
pub fn reviewer(login: &str) -> Account {
    Account {
        login: login.to_owned(),
        avatar_url: None,
    }
}

/// Constructs an open pull request for `owner/repo` with head and base refs
/// populated the way the listing endpoint returns them.
///
/// The head ref is `feature-<number>` on a fork; the base ref is `main` on
/// the repository itself, with both SSH and HTTPS clone URLs set.
#[must_use]
pub fn open_pull_request(full_name: &str, number: u64) -> PullRequest {
    let repo_name = full_name
        .rsplit('/')
        .next()
        .unwrap_or(full_name)
        .to_owned();
    let base_repo = RemoteRepository {
        name: Some(repo_name),
        full_name: Some(full_name.to_owned()),
        ssh_url: Some(format!("git@github.com:{full_name}.git")),
        clone_url: Some(format!("https://github.com/{full_name}.git")),
    };
    let head_repo = RemoteRepository {
        full_name: Some(format!("fork/{full_name}")),
        clone_url: Some(format!("https://github.com/fork-of-{full_name}.git")),
        ..Default::default()
    };

    PullRequest {
        number,
        url: format!("https://api.github.com/repos/{full_name}/pulls/{number}"),
        html_url: Some(format!("https://github.com/{full_name}/pull/{number}")),
        title: Some(format!("Pull request {number}")),
        state: Some("open".to_owned()),
        author: Some(reviewer("author")),
        requested_reviewers: Vec::new(),
        assignees: Vec::new(),
        head: BranchRef {
            label: Some(format!("fork:feature-{number}")),
            ref_name: format!("feature-{number}"),
            sha: format!("{number:040x}"),
            repo: Some(head_repo),
        },
        base: BranchRef {
            label: Some("main".to_owned()),
            ref_name: "main".to_owned(),
            sha: "b".repeat(40),
            repo: Some(base_repo),
        },
    }
}

/// Clones a pull request and adds a requested reviewer.
#[must_use]
pub fn with_requested_reviewer(base: &PullRequest, login: &str) -> PullRequest {
    let mut pull = base.clone();
    pull.requested_reviewers.push(reviewer(login));
    pull
}

/// Clones a pull request and adds an assignee.
#[must_use]
pub fn with_assignee(base: &PullRequest, login: &str) -> PullRequest {
    let mut pull = base.clone();
    pull.assignees.push(reviewer(login));
    pull
}
