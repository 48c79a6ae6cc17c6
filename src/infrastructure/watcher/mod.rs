//! File watcher implementations
//!
//! - `NotifyWatcher`: OS notifications or polling via `notify`
//! - `Debounce`: coalesces raw events into change batches

mod debounce;
mod notify_watcher;

pub use debounce::{Debounce, DEBOUNCE_MS};
pub use notify_watcher::{NotifyWatcher, NotifyWatcherFactory};
