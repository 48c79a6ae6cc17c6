//! Application Layer
//!
//! Use cases that sequence the domain ports into a complete flow.
//!
//! ## Use Cases
//!
//! - `BuildAction` - Initial build, optional watch-and-rebuild loop, streamed outputs

pub mod build_action;

pub use build_action::{
    BuildAction, BuildRequest, BuildStream, CancellationToken, WriteFilter,
};
