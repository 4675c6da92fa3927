//! Application telemetry events and sinks.
//!
//! Prwatch is a local-first tool, but it still benefits from lightweight
//! telemetry to support debugging: how long polls take, how many pull
//! requests they find, and how checkouts end.

use std::io;

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted by Prwatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// Records the result of one polling pass over the watched repositories.
    PollCompleted {
        /// Number of repositories polled.
        repositories: usize,
        /// Open pull requests found across all repositories, deduplicated.
        pull_requests: usize,
        /// Repositories whose listing failed this pass.
        failures: usize,
    },
    /// Records the terminal state of one checkout pipeline run.
    CheckoutFinished {
        /// Pull request number that was checked out.
        number: u64,
        /// Whether every step succeeded.
        success: bool,
        /// Exit status of the failing step, when one failed.
        exit_status: Option<i32>,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
///
/// This is intended for local debugging and is not transmitted anywhere.
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

#[cfg(test)]
mod tests {
    use super::{TelemetryEvent, TelemetrySink};

    #[derive(Debug, Default)]
    struct RecordingSink {
        events: std::sync::Mutex<Vec<TelemetryEvent>>,
    }

    impl RecordingSink {
        fn take(&self) -> Vec<TelemetryEvent> {
            self.events
                .lock()
                .expect("events mutex should be available")
                .drain(..)
                .collect()
        }
    }

    impl TelemetrySink for RecordingSink {
        fn record(&self, event: TelemetryEvent) {
            self.events
                .lock()
                .expect("events mutex should be available")
                .push(event);
        }
    }

    #[test]
    fn recording_sink_captures_events() {
        let sink = RecordingSink::default();
        sink.record(TelemetryEvent::PollCompleted {
            repositories: 2,
            pull_requests: 5,
            failures: 1,
        });

        assert_eq!(
            sink.take(),
            vec![TelemetryEvent::PollCompleted {
                repositories: 2,
                pull_requests: 5,
                failures: 1,
            }]
        );
    }

    #[test]
    fn events_serialise_with_a_type_tag() {
        let event = TelemetryEvent::CheckoutFinished {
            number: 7,
            success: false,
            exit_status: Some(1),
        };
        let json = serde_json::to_string(&event).expect("event should serialise");
        assert!(json.contains(r#""type":"checkout_finished""#));
        assert!(json.contains(r#""exit_status":1"#));
    }
}
