//! Assembles a checkout pipeline for one pull request.
//!
//! Each checkout gets a fresh directory under the configured checkout root,
//! named after the repository, the pull request number, and a UTC
//! timestamp, so concurrent checkouts never collide. The pipeline clones
//! the base repository, fetches the head ref, branches from the base, and
//! integrates the head by merge or squash pull.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use chrono::{DateTime, Utc};

use crate::github::PrwatchError;
use crate::github::models::PullRequest;

use super::executor::GitResolver;
use super::pipeline::CheckoutPipeline;

/// Caller-supplied choices for how a checkout integrates the head branch.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckoutOptions {
    /// Integrate with `git pull --squash` instead of `git merge`.
    pub squash_integration: bool,
}

/// A freshly allocated directory for one checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutWorkspace {
    checkout_dir: Utf8PathBuf,
    project: String,
}

impl CheckoutWorkspace {
    /// Allocates `<root>/<owner>-<repo>-pr<number>-<timestamp>` for the
    /// pull request, creating the directory (and the root, if needed).
    ///
    /// # Errors
    ///
    /// Returns [`PrwatchError::Configuration`] when the pull request does
    /// not carry enough repository information to name the workspace, and
    /// [`PrwatchError::Io`] when the directories cannot be created.
    pub fn allocate(
        root: &Utf8Path,
        pull: &PullRequest,
        now: DateTime<Utc>,
    ) -> Result<Self, PrwatchError> {
        let full_name = pull
            .repo_full_name()
            .ok_or_else(|| PrwatchError::Configuration {
                message: "pull request does not identify its repository".to_owned(),
            })?;
        let slug_part = full_name.replace('/', "-");
        let timestamp = now.format("%Y%m%dT%H%M%SZ");
        let dir_name = format!("{slug_part}-pr{number}-{timestamp}", number = pull.number);

        Dir::create_ambient_dir_all(root, ambient_authority())
            .map_err(|error| PrwatchError::io(&error))?;
        let root_dir =
            Dir::open_ambient_dir(root, ambient_authority()).map_err(|error| PrwatchError::io(&error))?;
        root_dir
            .create_dir(&dir_name)
            .map_err(|error| PrwatchError::io(&error))?;

        Ok(Self {
            checkout_dir: root.join(dir_name),
            project: project_name(pull)?,
        })
    }

    /// The directory the pipeline runs in.
    #[must_use]
    pub fn checkout_dir(&self) -> &Utf8Path {
        self.checkout_dir.as_path()
    }

    /// The subdirectory name the clone step will create.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }
}

/// Derives the directory name `git clone` will create for the base
/// repository.
fn project_name(pull: &PullRequest) -> Result<String, PrwatchError> {
    let repo = pull
        .base
        .repo
        .as_ref()
        .ok_or_else(missing_clone_source)?;

    if let Some(name) = &repo.name {
        return Ok(name.clone());
    }

    // Fall back to the clone URL's last path segment, as git does.
    let target = repo.clone_target().ok_or_else(missing_clone_source)?;
    let last = target
        .rsplit('/')
        .next()
        .ok_or_else(missing_clone_source)?;
    Ok(last.trim_end_matches(".git").to_owned())
}

fn missing_clone_source() -> PrwatchError {
    PrwatchError::Configuration {
        message: "pull request base repository has no clone URL".to_owned(),
    }
}

/// Builds the pipeline for checking out `pull` into `workspace`.
///
/// Steps: clone the base repository, fetch the head ref from the head
/// repository (which may be a fork), create a `pr-<number>` branch from the
/// base ref, then merge `FETCH_HEAD` — or squash-pull the head branch when
/// [`CheckoutOptions::squash_integration`] is set.
///
/// # Errors
///
/// Returns [`PrwatchError::Configuration`] when the pull request carries no
/// clone URLs.
pub fn plan_checkout(
    pull: &PullRequest,
    workspace: &CheckoutWorkspace,
    resolver: &dyn GitResolver,
    options: CheckoutOptions,
) -> Result<CheckoutPipeline, PrwatchError> {
    let base_url = pull
        .base
        .repo
        .as_ref()
        .and_then(|repo| repo.clone_target())
        .ok_or_else(missing_clone_source)?;
    let head_url = pull
        .head
        .repo
        .as_ref()
        .and_then(|repo| repo.clone_target())
        .unwrap_or(base_url);
    let branch = format!("pr-{}", pull.number);

    let pipeline = CheckoutPipeline::new(
        resolver,
        workspace.checkout_dir().to_path_buf(),
        workspace.project(),
    )
    .clone_repository(base_url)
    .fetch(head_url, &pull.head.ref_name)
    .checkout(&branch, &pull.base.ref_name);

    Ok(if options.squash_integration {
        pipeline.pull(head_url, &pull.head.ref_name, true)
    } else {
        pipeline.merge("FETCH_HEAD")
    })
}
