//! Progress events streamed out of a running checkout pipeline.

use std::sync::mpsc::{Receiver, RecvError, TryRecvError};

use super::command::GitCommand;

/// A single notification describing the state of a pipeline run.
///
/// A run emits one non-terminal event per started step and then exactly one
/// terminal event: either the "Done" sentinel or a failure whose
/// description embeds the failing command and its stderr tail. Nothing
/// follows a terminal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutProgress {
    /// Space-joined argument vector of the step just started; absent on
    /// terminal events.
    pub command: Option<String>,
    /// Absent while a step is in flight; present (including the `-1`
    /// launch-failure sentinel) when a step failed.
    pub exit_status: Option<i32>,
    /// Human-readable status text; on failure this is the composed error
    /// message, suitable for direct display.
    pub description: String,
    /// True exactly on the terminal event of the run.
    pub finished: bool,
}

impl CheckoutProgress {
    /// Event emitted immediately before a step's process is launched.
    pub(super) fn started(command: &GitCommand) -> Self {
        Self {
            command: Some(command.command_line()),
            exit_status: None,
            description: command.description().to_owned(),
            finished: false,
        }
    }

    /// Terminal event for a run whose every step succeeded.
    pub(super) fn done() -> Self {
        Self {
            command: None,
            exit_status: None,
            description: "Done".to_owned(),
            finished: true,
        }
    }

    /// Terminal event for a failed step.
    pub(super) const fn failed(description: String, exit_status: i32) -> Self {
        Self {
            command: None,
            exit_status: Some(exit_status),
            description,
            finished: true,
        }
    }

    /// Whether this is a terminal event reporting failure.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.finished && self.exit_status.is_some()
    }
}

/// Handle used by callers to consume the event stream of one pipeline run.
pub struct CheckoutHandle {
    receiver: Receiver<CheckoutProgress>,
}

impl std::fmt::Debug for CheckoutHandle {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("CheckoutHandle(..)")
    }
}

impl CheckoutHandle {
    /// Creates a handle from a channel receiver.
    #[must_use]
    pub(super) const fn new(receiver: Receiver<CheckoutProgress>) -> Self {
        Self { receiver }
    }

    /// Blocks until the next event arrives.
    ///
    /// # Errors
    ///
    /// Returns [`RecvError`] when the stream has closed, which only happens
    /// after the terminal event has been delivered.
    pub fn recv(&self) -> Result<CheckoutProgress, RecvError> {
        self.receiver.recv()
    }

    /// Attempts to receive the next event without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`TryRecvError::Empty`] when no event is available yet and
    /// [`TryRecvError::Disconnected`] when the stream has closed.
    pub fn try_recv(&self) -> Result<CheckoutProgress, TryRecvError> {
        self.receiver.try_recv()
    }
}
