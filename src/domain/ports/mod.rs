//! Domain Ports (Interfaces)
//!
//! The orchestrator reaches every collaborator through these traits.
//! Infrastructure provides the default implementations.

pub mod build_engine;
pub mod build_events;
pub mod file_watcher;
pub mod output_writer;
pub mod worker_pool;

pub use build_engine::{from_fn, BuildEngine, FnEngine};
pub use build_events::{BuildEvent, BuildEventSink, NoopEventSink};
pub use file_watcher::{FileWatcher, WatcherFactory, WatcherOptions};
pub use output_writer::OutputWriter;
pub use worker_pool::{NoopWorkerPool, WorkerPool};
