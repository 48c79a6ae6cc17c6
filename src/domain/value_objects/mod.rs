//! Domain Value Objects
//!
//! Immutable (or owner-mutated) value types used by the orchestrator.

mod change_batch;
mod hash;
mod ignored_paths;
mod watch_set;

pub use change_batch::{ChangeBatch, ChangeKind};
pub use hash::ContentHash;
pub use ignored_paths::{IgnoredPaths, DEFAULT_IGNORED_GLOBS};
pub use watch_set::{WatchSet, WatchSetDelta, PACKAGE_WATCH_FILES};
