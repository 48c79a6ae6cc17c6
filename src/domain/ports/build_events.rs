//! Build Event Port
//!
//! Observable progress of a build run: build start/finish, watcher activity,
//! writes and teardown problems. Sinks render these for humans (console) or
//! machines (NDJSON).

use std::path::PathBuf;

/// Event emitted during a build run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    /// A build is starting (only reported when progress is enabled)
    BuildStarted { rebuild: bool },

    /// A build finished (only reported when progress is enabled)
    BuildCompleted {
        rebuild: bool,
        success: bool,
        errors: usize,
        warnings: usize,
        duration_ms: u64,
    },

    /// The watcher is armed
    WatchStarted { watching: usize },

    /// A change batch arrived (only reported in verbose mode)
    ChangesDetected { summary: String },

    /// The watch set changed after a rebuild
    WatchPathsUpdated { added: usize, removed: usize },

    /// Files were persisted
    OutputWritten {
        files: usize,
        assets: usize,
        destination: PathBuf,
    },

    /// A teardown step failed while another error was already being reported
    TeardownFailed { message: String },

    /// The watch loop ended
    WatchStopped,
}

/// Trait for receiving build events
///
/// Implementations:
/// - `JsonEventSink`: NDJSON event stream for CI
/// - `NoopEventSink`: Silent operation
pub trait BuildEventSink: Send + Sync {
    /// Handle a build event
    fn on_event(&self, event: BuildEvent);
}

/// No-op event sink for silent operation
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl BuildEventSink for NoopEventSink {
    fn on_event(&self, _event: BuildEvent) {
        // Do nothing
    }
}
