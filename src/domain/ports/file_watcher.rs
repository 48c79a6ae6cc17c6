//! FileWatcher port - produces batches of filesystem changes
//!
//! Watchers are shared between the orchestrator (which blocks in
//! [`FileWatcher::next_batch`]) and the cancellation path (which calls
//! [`FileWatcher::close`] from another thread), so every method takes `&self`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::value_objects::ChangeBatch;
use crate::error::KilnResult;

/// Options a watcher is created with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatcherOptions {
    /// Poll the filesystem instead of using OS notifications
    pub polling: bool,
    /// Poll interval, only meaningful when `polling` is set
    pub interval: Option<Duration>,
    /// Paths and globs whose changes never produce a batch
    pub ignored: Vec<String>,
}

/// A running file watcher
pub trait FileWatcher: Send + Sync {
    /// Start watching `paths`. Missing paths are allowed.
    fn add(&self, paths: &[PathBuf]) -> KilnResult<()>;

    /// Stop watching `paths`.
    fn remove(&self, paths: &[PathBuf]) -> KilnResult<()>;

    /// Stop watching everything and end the batch sequence.
    ///
    /// Idempotent, and safe to call while another thread waits in `next_batch`.
    fn close(&self) -> KilnResult<()>;

    /// Block until the next non-empty batch.
    ///
    /// Returns `None` once the watcher is closed.
    fn next_batch(&self) -> Option<KilnResult<ChangeBatch>>;
}

/// Creates watchers for the orchestrator
pub trait WatcherFactory {
    fn create(&self, options: &WatcherOptions) -> KilnResult<Arc<dyn FileWatcher>>;
}

impl<F> WatcherFactory for F
where
    F: Fn(&WatcherOptions) -> KilnResult<Arc<dyn FileWatcher>>,
{
    fn create(&self, options: &WatcherOptions) -> KilnResult<Arc<dyn FileWatcher>> {
        self(options)
    }
}
