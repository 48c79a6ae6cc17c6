//! JSON Event Sink
//!
//! Outputs build events as NDJSON for CI/automation consumption.

use crate::domain::ports::{BuildEvent, BuildEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Write a one-off record in the same stream (final summaries, errors)
    pub fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

/// JSON form of an event
pub(crate) fn event_json(event: &BuildEvent) -> serde_json::Value {
    match event {
        BuildEvent::BuildStarted { rebuild } => serde_json::json!({
            "event": "build_start",
            "command": "build",
            "rebuild": rebuild,
        }),

        BuildEvent::BuildCompleted {
            rebuild,
            success,
            errors,
            warnings,
            duration_ms,
        } => {
            let status = if *success { "success" } else { "failed" };
            serde_json::json!({
                "event": "build_complete",
                "command": "build",
                "rebuild": rebuild,
                "status": status,
                "errors": errors,
                "warnings": warnings,
                "duration_ms": duration_ms,
            })
        }

        BuildEvent::WatchStarted { watching } => serde_json::json!({
            "event": "watch_started",
            "command": "build",
            "watching": watching,
        }),

        BuildEvent::ChangesDetected { summary } => serde_json::json!({
            "event": "changes_detected",
            "command": "build",
            // Already JSON; embed it structurally when it parses
            "changes": serde_json::from_str::<serde_json::Value>(summary)
                .unwrap_or_else(|_| serde_json::Value::String(summary.clone())),
        }),

        BuildEvent::WatchPathsUpdated { added, removed } => serde_json::json!({
            "event": "watch_updated",
            "command": "build",
            "added": added,
            "removed": removed,
        }),

        BuildEvent::OutputWritten {
            files,
            assets,
            destination,
        } => serde_json::json!({
            "event": "output_written",
            "command": "build",
            "files": files,
            "assets": assets,
            "destination": destination.display().to_string(),
        }),

        BuildEvent::TeardownFailed { message } => serde_json::json!({
            "event": "teardown_failed",
            "command": "build",
            "message": message,
        }),

        BuildEvent::WatchStopped => serde_json::json!({
            "event": "watch_stopped",
            "command": "build",
        }),
    }
}

impl BuildEventSink for JsonEventSink {
    fn on_event(&self, event: BuildEvent) {
        self.write_event(event_json(&event));
    }
}
