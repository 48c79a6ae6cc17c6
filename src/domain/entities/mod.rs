//! Domain Entities
//!
//! - `OutputFile` / `AssetFile` - Files produced by one build
//! - `BuildResult` - Everything one build engine invocation returns
//! - `BuildOutput` - What the orchestrator hands to its caller

mod build_result;
mod output_file;

pub use build_result::{
    BuildMessage, BuildOutput, BuildResult, BuildSummary, IncrementalState, RebuildState,
};
pub use output_file::{AssetFile, OutputFile, OutputKind};
