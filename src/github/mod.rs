//! GitHub integration: locating, fetching, and polling pull requests.
//!
//! The gateway trait is the seam between the domain and the GitHub API;
//! everything above it works against plain data models and can be tested
//! with mocks. URL parsing and API-base derivation live in [`locator`] so
//! both github.com and GitHub Enterprise hosts are handled in one place.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod poller;

pub use error::PrwatchError;
pub use gateway::{OctocrabPullsGateway, PullRequestGateway};
pub use locator::{PullRequestLocator, RepositorySlug};
pub use poller::{PollOutcome, ReviewPoller};
