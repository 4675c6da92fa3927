//! Immutable descriptors for the git invocations a pipeline will run.

use camino::{Utf8Path, Utf8PathBuf};

/// One external git invocation: where to run it, what to run, and a short
/// human-readable label for progress reporting.
///
/// Descriptors are created exactly once per builder call and never mutated;
/// the pipeline queue owns them until the executor consumes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    working_dir: Utf8PathBuf,
    args: Vec<String>,
    description: String,
}

impl GitCommand {
    pub(super) fn new(
        working_dir: Utf8PathBuf,
        args: Vec<String>,
        description: &str,
    ) -> Self {
        Self {
            working_dir,
            args,
            description: description.to_owned(),
        }
    }

    /// Directory the subprocess is launched in.
    #[must_use]
    pub fn working_dir(&self) -> &Utf8Path {
        self.working_dir.as_path()
    }

    /// The git subcommand and its flags/operands.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Human-readable label ("Cloning", "Fetching", ...).
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The space-joined argument vector, as reported in progress events.
    #[must_use]
    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }
}
