//! Reference build engine
//!
//! `CopyEngine` copies a project tree into the output directory, minifying
//! stylesheets on the worker pool. It exists to drive the orchestrator from
//! the CLI; real bundlers plug in through the `BuildEngine` port.

mod cache;
mod copy;

pub use cache::{SourceCache, CACHE_MANIFEST};
pub use copy::{BuildStats, CopyEngine, MEDIA_EXTENSIONS};
