//! Identity wrappers and URL parsing for the repositories being watched.
//!
//! Watched repositories are configured as `owner/repo` slugs; checkout mode
//! additionally accepts a full pull request URL. Both forms resolve to the
//! REST paths the gateway calls.

use url::Url;

use super::error::PrwatchError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, PrwatchError> {
        if value.is_empty() {
            return Err(PrwatchError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, PrwatchError> {
        if value.is_empty() {
            return Err(PrwatchError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    pub(crate) const fn new(value: u64) -> Result<Self, PrwatchError> {
        if value == 0 {
            return Err(PrwatchError::InvalidPullRequestNumber);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`PrwatchError::MissingToken`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, PrwatchError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PrwatchError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// A watched repository identified as `owner/repo`.
///
/// This is the form repositories take in the configuration file; it carries
/// no host because the watch list only targets `github.com`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositorySlug {
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositorySlug {
    /// Parses an `owner/repo` identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PrwatchError::InvalidRepositorySlug`] when the input is not
    /// exactly two non-empty segments separated by a slash.
    pub fn parse(input: &str) -> Result<Self, PrwatchError> {
        let invalid = || PrwatchError::InvalidRepositorySlug {
            slug: input.to_owned(),
        };

        let mut segments = input.trim().split('/');
        let owner_segment = segments.next().ok_or_else(invalid)?;
        let repository_segment = segments.next().ok_or_else(invalid)?;
        if segments.next().is_some() {
            return Err(invalid());
        }

        Self::from_owner_repo(owner_segment, repository_segment).map_err(|_| invalid())
    }

    /// Creates a slug from owner and repository name strings.
    ///
    /// # Errors
    ///
    /// Returns [`PrwatchError::MissingPathSegments`] when either part is
    /// empty.
    pub fn from_owner_repo(owner: &str, repo: &str) -> Result<Self, PrwatchError> {
        Ok(Self {
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repo)?,
        })
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Returns the API path for listing pull requests.
    pub(crate) fn pulls_path(&self) -> String {
        format!(
            "/repos/{}/{}/pulls",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }
}

impl std::fmt::Display for RepositorySlug {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}/{}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }
}

/// Derives the GitHub API base URL from a host string.
fn derive_api_base_from_host(
    scheme: &str,
    host: &str,
    port: Option<u16>,
) -> Result<Url, PrwatchError> {
    if host.eq_ignore_ascii_case("github.com") {
        Url::parse("https://api.github.com")
            .map_err(|error| PrwatchError::InvalidUrl(error.to_string()))
    } else {
        let authority = if host.contains(':') {
            format!("[{host}]")
        } else {
            host.to_owned()
        };
        let mut api_url = Url::parse(&format!("{scheme}://{authority}"))
            .map_err(|error| PrwatchError::InvalidUrl(error.to_string()))?;

        api_url
            .set_port(port)
            .map_err(|()| PrwatchError::InvalidUrl("invalid port".to_owned()))?;
        api_url.set_path("api/v3");
        Ok(api_url)
    }
}

/// Derives the GitHub API base URL from a parsed URL.
fn derive_api_base(parsed: &Url) -> Result<Url, PrwatchError> {
    let host = parsed
        .host_str()
        .ok_or_else(|| PrwatchError::InvalidUrl("URL must include a host".to_owned()))?;

    derive_api_base_from_host(parsed.scheme(), host, parsed.port())
}

/// Returns the public GitHub API base URL.
pub(crate) fn public_api_base() -> Result<Url, PrwatchError> {
    Url::parse("https://api.github.com").map_err(|error| PrwatchError::InvalidUrl(error.to_string()))
}

/// Parsed pull request URL and derived API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestLocator {
    api_base: Url,
    slug: RepositorySlug,
    number: PullRequestNumber,
}

impl PullRequestLocator {
    /// Parses a GitHub pull request URL in the form
    /// `https://github.com/<owner>/<repo>/pull/<number>`.
    ///
    /// # Errors
    ///
    /// Returns [`PrwatchError::InvalidUrl`] when parsing fails,
    /// [`PrwatchError::MissingPathSegments`] when the URL path is not
    /// `/owner/repo/pull/<number>`, and
    /// [`PrwatchError::InvalidPullRequestNumber`] when the final segment is
    /// not a positive integer.
    pub fn parse(input: &str) -> Result<Self, PrwatchError> {
        let parsed =
            Url::parse(input).map_err(|error| PrwatchError::InvalidUrl(error.to_string()))?;

        let mut segments = parsed
            .path_segments()
            .ok_or(PrwatchError::MissingPathSegments)?;

        let owner_segment = segments.next().ok_or(PrwatchError::MissingPathSegments)?;
        let repository_segment = segments.next().ok_or(PrwatchError::MissingPathSegments)?;
        let marker = segments.next().ok_or(PrwatchError::MissingPathSegments)?;
        let number_segment = segments.next().ok_or(PrwatchError::MissingPathSegments)?;

        if marker != "pull" || number_segment.is_empty() {
            return Err(PrwatchError::MissingPathSegments);
        }

        let slug = RepositorySlug::from_owner_repo(owner_segment, repository_segment)?;
        let number = number_segment
            .parse::<u64>()
            .map_err(|_| PrwatchError::InvalidPullRequestNumber)
            .and_then(PullRequestNumber::new)?;

        let api_base = derive_api_base(&parsed)?;

        Ok(Self {
            api_base,
            slug,
            number,
        })
    }

    /// API base URL derived from the pull request host.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// The repository the pull request belongs to.
    #[must_use]
    pub const fn slug(&self) -> &RepositorySlug {
        &self.slug
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> PullRequestNumber {
        self.number
    }

    /// Returns the API path for this pull request.
    pub(crate) fn pull_request_path(&self) -> String {
        format!("{}/{}", self.slug.pulls_path(), self.number.get())
    }
}
