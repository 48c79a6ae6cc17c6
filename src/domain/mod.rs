//! Domain Layer
//!
//! The build/watch vocabulary shared by the orchestrator and its collaborators,
//! free of any I/O.
//!
//! ## Structure
//!
//! - `entities/` - Build results and the files they produce
//! - `value_objects/` - Change batches, watch sets, ignore rules, hashes
//! - `ports/` - Interfaces implemented by infrastructure (engine, watcher, writer, workers, events)
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system directly
//! 2. **Ports & Adapters** - Engines, watchers and writers are reached through traits

pub mod entities;
pub mod ports;
pub mod value_objects;
