//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.prwatch.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PRWATCH_*`, plus legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments** – e.g. `--pr-url`/`-u`, `--watch`
//!
//! # Configuration File
//!
//! Place `.prwatch.toml` in the current directory, home directory, or
//! XDG config directory with:
//!
//! ```toml
//! username = "octocat"
//! token = "ghp_example"
//! repos = ["octo/hello-world", "octo/widget"]
//! checkout_dir = "/home/octocat/reviews"
//! poll_minutes = 5
//! ```

use std::env;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::checkout::{
    CheckoutOptions, GitResolver, SystemGitResolver, ToolRootGitResolver,
};
use crate::github::error::PrwatchError;
use crate::github::locator::{PersonalAccessToken, RepositorySlug};

/// Default polling cadence, in minutes.
const DEFAULT_POLL_MINUTES: u64 = 1;

/// Operation mode determined by CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Check out a single PR by URL and exit.
    Checkout,
    /// Poll the watched repositories on an interval.
    Watch,
    /// Poll the watched repositories once and exit.
    Check,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `PRWATCH_USERNAME` or `--username`: GitHub login whose reviews to watch
/// - `PRWATCH_TOKEN`, `GITHUB_TOKEN` (legacy), or `--token`: API token
/// - `PRWATCH_REPOS`: comma-separated `owner/repo` slugs
/// - `PRWATCH_CHECKOUT_DIR` or `--checkout-dir`: checkout root directory
/// - `PRWATCH_PR_URL` or `--pr-url`: pull request URL to check out
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use prwatch::PrwatchConfig;
///
/// let config = PrwatchConfig::load().expect("failed to load configuration");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PRWATCH",
    discovery(
        dotfile_name = ".prwatch.toml",
        config_file_name = "prwatch.toml",
        app_name = "prwatch"
    )
)]
pub struct PrwatchConfig {
    /// GitHub login whose review requests and assignments are watched.
    #[ortho_config(cli_short = 'U')]
    pub username: Option<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Falls back to the legacy `GITHUB_TOKEN` environment variable when
    /// unset.
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Watched repositories as `owner/repo` slugs.
    pub repos: Vec<String>,

    /// Directory under which pull request checkouts are created.
    pub checkout_dir: Option<String>,

    /// Explicit git program to invoke instead of the `PATH` lookup.
    pub git_program: Option<String>,

    /// Tool-installation root containing `bin/git`, for hosts where git
    /// ships inside a larger toolchain bundle.
    pub git_tool_root: Option<String>,

    /// Minutes between polls in watch mode.
    pub poll_minutes: u64,

    /// Integrate the head branch with `git pull --squash` instead of a
    /// plain merge.
    pub squash_integration: bool,

    /// Status glyph shown while reviews are requested of the user.
    pub review_requested_symbol: String,

    /// Status glyph shown while pull requests are assigned to the user.
    pub assigned_symbol: String,

    /// Status glyph shown when nothing needs the user's attention.
    pub quiet_symbol: String,

    /// Pull request URL to check out; selects checkout mode.
    #[ortho_config(cli_short = 'u')]
    pub pr_url: Option<String>,

    /// Keep polling on an interval instead of exiting after one pass.
    pub watch: bool,
}

impl Default for PrwatchConfig {
    fn default() -> Self {
        Self {
            username: None,
            token: None,
            repos: Vec::new(),
            checkout_dir: None,
            git_program: None,
            git_tool_root: None,
            poll_minutes: DEFAULT_POLL_MINUTES,
            squash_integration: false,
            review_requested_symbol: "✍️".to_owned(),
            assigned_symbol: "👋".to_owned(),
            quiet_symbol: "💤".to_owned(),
            pr_url: None,
            watch: false,
        }
    }
}

impl PrwatchConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`PrwatchError::MissingToken`] when no token source provides
    /// a non-blank value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, PrwatchError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(PrwatchError::MissingToken)
            .and_then(PersonalAccessToken::new)
    }

    /// Returns the pull request URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`PrwatchError::MissingPullRequestUrl`] when no URL is
    /// configured.
    pub fn require_pr_url(&self) -> Result<&str, PrwatchError> {
        self.pr_url
            .as_deref()
            .ok_or(PrwatchError::MissingPullRequestUrl)
    }

    /// Returns the configured username or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`PrwatchError::MissingUsername`] when no username is
    /// configured.
    pub fn require_username(&self) -> Result<&str, PrwatchError> {
        self.username
            .as_deref()
            .ok_or(PrwatchError::MissingUsername)
    }

    /// Returns the checkout root directory or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`PrwatchError::Configuration`] when no checkout directory
    /// is configured.
    pub fn require_checkout_dir(&self) -> Result<&Utf8Path, PrwatchError> {
        self.checkout_dir
            .as_deref()
            .map(Utf8Path::new)
            .ok_or_else(|| PrwatchError::Configuration {
                message: "checkout directory is required (set checkout_dir)".to_owned(),
            })
    }

    /// Parses the watched repositories into validated slugs.
    ///
    /// # Errors
    ///
    /// Returns [`PrwatchError::InvalidRepositorySlug`] for any entry that
    /// is not of the form `owner/repo`.
    pub fn repositories(&self) -> Result<Vec<RepositorySlug>, PrwatchError> {
        self.repos.iter().map(|raw| RepositorySlug::parse(raw)).collect()
    }

    /// Determines the operation mode based on provided configuration.
    ///
    /// A pull request URL selects checkout mode; otherwise the watch flag
    /// decides between a polling loop and a single check.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.pr_url.is_some() {
            OperationMode::Checkout
        } else if self.watch {
            OperationMode::Watch
        } else {
            OperationMode::Check
        }
    }

    /// The cadence of watch-mode polls. Never below one minute.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_minutes.max(1) * 60)
    }

    /// Builds the git-location strategy implied by the configuration.
    ///
    /// An explicit program wins over a tool root; with neither set, git is
    /// taken from the `PATH`.
    #[must_use]
    pub fn git_resolver(&self) -> Box<dyn GitResolver> {
        if let Some(program) = &self.git_program {
            Box::new(SystemGitResolver::with_program(Utf8PathBuf::from(program)))
        } else if let Some(tool_root) = &self.git_tool_root {
            Box::new(ToolRootGitResolver::new(Utf8PathBuf::from(tool_root)))
        } else {
            Box::new(SystemGitResolver::new())
        }
    }

    /// Checkout behaviour choices derived from the configuration.
    #[must_use]
    pub const fn checkout_options(&self) -> CheckoutOptions {
        CheckoutOptions {
            squash_integration: self.squash_integration,
        }
    }
}
