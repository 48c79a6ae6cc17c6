//! Event Sink Implementations
//!
//! Provides concrete implementations of BuildEventSink:
//! - JsonEventSink: NDJSON output for CI/automation
//! - The console sink lives with the terminal views in `ui`

mod json;

pub use json::JsonEventSink;
