//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Output writer and output directory cleanup
//! - `watcher/` - `notify` file watcher with debouncing
//! - `events/` - Event sinks (NDJSON)
//! - `workers/` - Stylesheet worker pool
//! - `engine/` - Reference copy engine used by the CLI

pub mod engine;
pub mod events;
pub mod fs;
pub mod watcher;
pub mod workers;

// Re-export for convenience
pub use engine::{CopyEngine, SourceCache};
pub use events::JsonEventSink;
pub use fs::{delete_output_dir, FsOutputWriter};
pub use watcher::{NotifyWatcher, NotifyWatcherFactory};
pub use workers::StylesheetWorkerPool;
