//! Runs exactly one git subprocess per command descriptor.
//!
//! Standard error is drained on a background thread and joined before the
//! outcome is reported; standard output is left alone so git's own output
//! reaches the terminal. Locating the git executable is a pluggable
//! strategy so tests and unusual installations never depend on a hardcoded
//! path suffix.

use std::process::{Command, Stdio};

use camino::{Utf8Path, Utf8PathBuf};

use super::command::GitCommand;
use super::stderr::StderrCapture;

/// Sentinel exit status reported when the subprocess could not be launched.
pub(super) const SPAWN_FAILURE_STATUS: i32 = -1;

/// Fixed description reported for a process that could not be launched.
pub(super) const SPAWN_FAILURE_DESCRIPTION: &str = "Failed to run command";

/// Strategy for locating the git executable.
pub trait GitResolver: Send + Sync {
    /// Returns the path (or bare program name) to invoke.
    fn resolve(&self) -> Utf8PathBuf;
}

/// Resolves git from the `PATH`, or from an explicitly configured program.
#[derive(Debug, Clone)]
pub struct SystemGitResolver {
    program: Utf8PathBuf,
}

impl Default for SystemGitResolver {
    fn default() -> Self {
        Self {
            program: Utf8PathBuf::from("git"),
        }
    }
}

impl SystemGitResolver {
    /// Resolves `git` from the `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an explicit program path instead of the `PATH` lookup.
    #[must_use]
    pub fn with_program(program: impl Into<Utf8PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl GitResolver for SystemGitResolver {
    fn resolve(&self) -> Utf8PathBuf {
        self.program.clone()
    }
}

/// Resolves git relative to a tool-installation root
/// (`<tool_root>/bin/git` by default).
#[derive(Debug, Clone)]
pub struct ToolRootGitResolver {
    tool_root: Utf8PathBuf,
    suffix: Utf8PathBuf,
}

impl ToolRootGitResolver {
    /// Resolves `<tool_root>/bin/git`.
    #[must_use]
    pub fn new(tool_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            tool_root: tool_root.into(),
            suffix: Utf8PathBuf::from("bin/git"),
        }
    }

    /// Overrides the relative suffix joined onto the tool root.
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<Utf8PathBuf>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

impl GitResolver for ToolRootGitResolver {
    fn resolve(&self) -> Utf8PathBuf {
        self.tool_root.join(&self.suffix)
    }
}

/// Outcome of one executed step.
pub(super) enum StepOutcome {
    /// The process ran to termination.
    Exited {
        /// Real exit status (signal termination maps to the spawn sentinel).
        status: i32,
        /// Last non-empty stderr line, if any was captured.
        stderr_tail: Option<String>,
    },
    /// The process could not be launched at all.
    SpawnFailed,
}

/// Launches one git subprocess for `command` and waits for it to exit.
///
/// The stderr reader is fully drained before this returns, so the
/// diagnostic tail is complete.
pub(super) fn execute(git_program: &Utf8Path, command: &GitCommand) -> StepOutcome {
    tracing::debug!(
        "> {git_program} -C {dir} {line}",
        dir = command.working_dir(),
        line = command.command_line()
    );

    let mut child = match Command::new(git_program.as_std_path())
        .args(command.args())
        .current_dir(command.working_dir().as_std_path())
        .stdin(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(error) => {
            tracing::debug!("failed to launch git: {error}");
            return StepOutcome::SpawnFailed;
        }
    };

    let capture = StderrCapture::spawn(child.stderr.take());

    let status = match child.wait() {
        Ok(status) => status.code().unwrap_or(SPAWN_FAILURE_STATUS),
        Err(error) => {
            tracing::debug!("failed waiting for git exit: {error}");
            SPAWN_FAILURE_STATUS
        }
    };

    StepOutcome::Exited {
        status,
        stderr_tail: capture.last_line(),
    }
}
