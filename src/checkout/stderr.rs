//! Captured stderr output from a git child process.
//!
//! Spawns a background reader thread that drains the child's stderr stream
//! into a bounded buffer. The capture is joined before the step outcome is
//! reported so the diagnostic tail is never lost.

use std::io::BufRead;
use std::process::ChildStderr;
use std::sync::{Arc, Mutex};

/// Maximum number of bytes to capture from stderr (64 KiB).
const STDERR_LIMIT: usize = 65_536;

/// Captured stderr output from a child process.
///
/// Only the last non-empty line is surfaced in failure messages; git prints
/// its fatal diagnostics there.
pub(super) struct StderrCapture {
    buffer: Arc<Mutex<String>>,
    reader_thread: Option<std::thread::JoinHandle<()>>,
}

impl StderrCapture {
    /// Starts capturing stderr from the child process.
    pub(super) fn spawn(child_stderr: Option<ChildStderr>) -> Self {
        let buffer = Arc::new(Mutex::new(String::new()));
        let reader_thread = child_stderr.map(|readable| {
            let handle = Arc::clone(&buffer);
            std::thread::spawn(move || Self::drain(readable, &handle))
        });
        Self {
            buffer,
            reader_thread,
        }
    }

    /// Reads lines from stderr into the shared buffer up to the size limit.
    fn drain(readable: ChildStderr, buffer: &Mutex<String>) {
        let reader = std::io::BufReader::new(readable);
        for result in reader.lines() {
            let Ok(text) = result else { break };
            let Ok(mut content) = buffer.lock() else {
                break;
            };
            if content.len() + text.len() + 1 > STDERR_LIMIT {
                break;
            }
            content.push_str(&text);
            content.push('\n');
        }
    }

    /// Joins the reader thread and returns the last non-empty captured
    /// line, if any.
    pub(super) fn last_line(mut self) -> Option<String> {
        if let Some(thread) = self.reader_thread.take()
            && thread.join().is_err()
        {
            tracing::trace!("stderr reader thread panicked");
        }

        let content = self.buffer.lock().ok()?;
        content
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_owned)
    }
}
