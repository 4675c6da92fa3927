//! Local checkout of a pull request via a sequential git pipeline.
//!
//! A checkout is described up front as an ordered queue of git commands,
//! then run one command at a time on a background thread. Progress events
//! stream back over a channel: one per started step, followed by exactly
//! one terminal event. The first failing step aborts the run with the
//! real exit status and the tail of the subprocess's stderr.

mod command;
mod executor;
mod pipeline;
mod plan;
mod progress;
mod stderr;

pub use command::GitCommand;
pub use executor::{GitResolver, SystemGitResolver, ToolRootGitResolver};
pub use pipeline::CheckoutPipeline;
pub use plan::{CheckoutOptions, CheckoutWorkspace, plan_checkout};
pub use progress::{CheckoutHandle, CheckoutProgress};
