//! Prwatch library crate for watching and checking out GitHub pull requests.
//!
//! The library wraps Octocrab to poll repositories for pull requests that
//! await the configured user's review, and drives a sequential git pipeline
//! that checks a pull request out locally while streaming progress events.

pub mod checkout;
pub mod cli;
pub mod config;
pub mod github;
pub mod telemetry;

pub use checkout::{
    CheckoutHandle, CheckoutOptions, CheckoutPipeline, CheckoutProgress, CheckoutWorkspace,
    GitResolver, SystemGitResolver, ToolRootGitResolver, plan_checkout,
};
pub use config::{OperationMode, PrwatchConfig};
pub use github::{
    OctocrabPullsGateway, PrwatchError, PullRequestGateway, PullRequestLocator, ReviewPoller,
};
