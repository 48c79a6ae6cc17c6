//! Property tests for Kiln.
//!
//! Properties use randomized input generation to explore edge cases and
//! protect invariants like "never panics" and "never prunes on failure".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/watch_set.rs"]
mod watch_set;

#[path = "properties/change_batch.rs"]
mod change_batch;

#[path = "properties/stylesheet.rs"]
mod stylesheet;
