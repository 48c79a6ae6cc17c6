//! Kiln - incremental build orchestrator
//!
//! Kiln drives a build engine through an initial build and, optionally, a
//! watch-and-rebuild loop. Outputs are streamed to the caller one build at a
//! time; the watcher, the engine's incremental state and the worker pool are
//! released exactly once when the stream ends.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{BuildAction, BuildRequest, BuildStream, CancellationToken, WriteFilter};
pub use config::Config;
pub use domain::entities::{
    AssetFile, BuildMessage, BuildOutput, BuildResult, BuildSummary, IncrementalState, OutputFile,
    RebuildState,
};
pub use domain::ports::{
    from_fn, BuildEngine, BuildEvent, BuildEventSink, FileWatcher, FnEngine, OutputWriter,
    WatcherFactory, WatcherOptions, WorkerPool,
};
pub use domain::value_objects::{ChangeBatch, ChangeKind, WatchSet};
pub use error::{KilnError, KilnResult};
