//! Debounce state for raw watcher events

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::domain::value_objects::{ChangeBatch, ChangeKind};

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Collects changes until the filesystem has been quiet for the debounce window
#[derive(Debug)]
pub struct Debounce {
    pending: ChangeBatch,
    last_change: Option<Instant>,
    window: Duration,
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEBOUNCE_MS))
    }
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self {
            pending: ChangeBatch::new(),
            last_change: None,
            window,
        }
    }

    pub fn record(&mut self, path: impl Into<PathBuf>, kind: ChangeKind) {
        self.pending.record(path, kind);
        self.last_change = Some(Instant::now());
    }

    /// A batch is ready once changes are pending and the window has elapsed
    pub fn is_ready(&self) -> bool {
        match self.last_change {
            Some(last) => !self.pending.is_empty() && last.elapsed() >= self.window,
            None => false,
        }
    }

    /// How long to wait for more events before the batch is ready
    pub fn remaining(&self) -> Option<Duration> {
        self.last_change
            .filter(|_| !self.pending.is_empty())
            .map(|last| self.window.saturating_sub(last.elapsed()))
    }

    pub fn take(&mut self) -> ChangeBatch {
        self.last_change = None;
        std::mem::take(&mut self.pending)
    }
}
