//! Builder and sequential runner for a checkout's git commands.
//!
//! The builder accumulates command descriptors without executing anything;
//! `start` moves the drain loop onto a background thread and hands the
//! caller a channel of progress events. Steps run strictly one at a time in
//! declaration order and the run stops at the first non-zero exit status —
//! no retry, no rollback, no cleanup of directories already created.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::mpsc::{self, Sender};

use camino::Utf8PathBuf;

use super::command::GitCommand;
use super::executor::{
    GitResolver, SPAWN_FAILURE_DESCRIPTION, SPAWN_FAILURE_STATUS, StepOutcome, execute,
};
use super::progress::{CheckoutHandle, CheckoutProgress};

/// Placeholder used when a failing step produced no stderr.
const NO_STDERR_PLACEHOLDER: &str = "no error output captured";

/// An ordered, consumable sequence of git operations for one checkout.
///
/// Builder calls append; none of them deduplicate or reorder. The fetch,
/// checkout, merge, and pull steps run inside the project subdirectory and
/// therefore assume a preceding clone — a caller contract the builder does
/// not enforce.
#[derive(Debug)]
pub struct CheckoutPipeline {
    git_program: Utf8PathBuf,
    checkout_dir: Utf8PathBuf,
    project: String,
    queue: VecDeque<GitCommand>,
}

impl CheckoutPipeline {
    /// Creates an empty pipeline rooted at `checkout_dir`, cloning into the
    /// `project` subdirectory, with git located through `resolver`.
    #[must_use]
    pub fn new(
        resolver: &dyn GitResolver,
        checkout_dir: Utf8PathBuf,
        project: impl Into<String>,
    ) -> Self {
        Self {
            git_program: resolver.resolve(),
            checkout_dir,
            project: project.into(),
            queue: VecDeque::new(),
        }
    }

    fn project_dir(&self) -> Utf8PathBuf {
        self.checkout_dir.join(&self.project)
    }

    fn push(mut self, dir: Utf8PathBuf, args: Vec<String>, description: &str) -> Self {
        self.queue.push_back(GitCommand::new(dir, args, description));
        self
    }

    /// Appends `git clone --recursive <url>`, rooted at the checkout
    /// directory.
    #[must_use]
    pub fn clone_repository(self, url: &str) -> Self {
        let dir = self.checkout_dir.clone();
        self.push(
            dir,
            vec!["clone".to_owned(), "--recursive".to_owned(), url.to_owned()],
            "Cloning",
        )
    }

    /// Appends `git fetch <remote> <reference>`, rooted at the project
    /// subdirectory.
    #[must_use]
    pub fn fetch(self, remote: &str, reference: &str) -> Self {
        let dir = self.project_dir();
        self.push(
            dir,
            vec!["fetch".to_owned(), remote.to_owned(), reference.to_owned()],
            "Fetching",
        )
    }

    /// Appends `git checkout -b <branch> <from_ref>`.
    #[must_use]
    pub fn checkout(self, branch: &str, from_ref: &str) -> Self {
        let dir = self.project_dir();
        self.push(
            dir,
            vec![
                "checkout".to_owned(),
                "-b".to_owned(),
                branch.to_owned(),
                from_ref.to_owned(),
            ],
            "Checking out",
        )
    }

    /// Appends `git merge <branch>`.
    #[must_use]
    pub fn merge(self, branch: &str) -> Self {
        let dir = self.project_dir();
        self.push(dir, vec!["merge".to_owned(), branch.to_owned()], "Merging")
    }

    /// Appends `git pull <repo_url> <branch>`, with `--squash` when the
    /// caller opts into squash integration.
    #[must_use]
    pub fn pull(self, repo_url: &str, branch: &str, squash: bool) -> Self {
        let dir = self.project_dir();
        let mut args = vec!["pull".to_owned(), repo_url.to_owned(), branch.to_owned()];
        if squash {
            args.push("--squash".to_owned());
        }
        self.push(dir, args, "Pulling")
    }

    /// The queued steps, in execution order.
    #[must_use]
    pub fn steps(&self) -> impl Iterator<Item = &GitCommand> {
        self.queue.iter()
    }

    /// Number of queued steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no steps are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Consumes the pipeline and runs it on a background thread.
    ///
    /// The returned handle yields one started event per step and exactly
    /// one terminal event (either "Done" or a composed failure); the
    /// channel closes after the terminal event.
    #[must_use]
    pub fn start(self) -> CheckoutHandle {
        let (sender, receiver) = mpsc::channel();

        std::thread::spawn(move || {
            run_pipeline(self, &sender);
        });

        CheckoutHandle::new(receiver)
    }
}

/// Drains the queue head-first, stopping at the first failure.
fn run_pipeline(mut pipeline: CheckoutPipeline, sender: &Sender<CheckoutProgress>) {
    while let Some(command) = pipeline.queue.pop_front() {
        drop(sender.send(CheckoutProgress::started(&command)));

        match execute(&pipeline.git_program, &command) {
            StepOutcome::Exited { status: 0, .. } => {}
            StepOutcome::Exited {
                status,
                stderr_tail,
            } => {
                let description =
                    compose_failure(&command, status, stderr_tail.as_deref());
                drop(sender.send(CheckoutProgress::failed(description, status)));
                return;
            }
            StepOutcome::SpawnFailed => {
                let description = compose_spawn_failure(&command);
                drop(sender.send(CheckoutProgress::failed(
                    description,
                    SPAWN_FAILURE_STATUS,
                )));
                return;
            }
        }
    }

    drop(sender.send(CheckoutProgress::done()));
}

/// Composes the user-facing message for a step that ran and failed.
fn compose_failure(command: &GitCommand, status: i32, stderr_tail: Option<&str>) -> String {
    let mut message = format!(
        "{description} failed with exit status {status}",
        description = command.description()
    );
    let _infallible = write!(
        message,
        "\ncommand: git {line}\nstderr: {tail}",
        line = command.command_line(),
        tail = stderr_tail.unwrap_or(NO_STDERR_PLACEHOLDER)
    );
    message
}

/// Composes the user-facing message for a step whose process never
/// launched.
fn compose_spawn_failure(command: &GitCommand) -> String {
    format!(
        "{SPAWN_FAILURE_DESCRIPTION}\ncommand: git {line}",
        line = command.command_line()
    )
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
