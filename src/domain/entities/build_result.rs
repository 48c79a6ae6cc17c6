//! BuildResult entity - what one build engine invocation returns
//!
//! A result owns the engine's incremental context until it is either moved into
//! the next build through [`BuildResult::create_rebuild_state`] or released with
//! [`BuildResult::dispose`].

use std::path::PathBuf;

use serde::Serialize;

use crate::domain::value_objects::ChangeBatch;
use crate::error::KilnResult;

use super::output_file::{AssetFile, OutputFile};

/// Engine-defined incremental compilation context.
///
/// The orchestrator never looks inside; it only threads the context from one
/// build to the next and disposes whichever context is current when the run ends.
pub trait IncrementalState: Send {
    /// Release caches, handles or worker resources held by this context.
    fn dispose(self) -> KilnResult<()>;
}

impl IncrementalState for () {
    fn dispose(self) -> KilnResult<()> {
        Ok(())
    }
}

/// State handed to the next build: the previous context plus what changed
#[derive(Debug)]
pub struct RebuildState<C> {
    /// Context from the previous result, if it still had one
    pub context: Option<C>,
    /// Changes that triggered this rebuild
    pub changes: ChangeBatch,
}

/// A diagnostic produced by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildMessage {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl BuildMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            file: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl std::fmt::Display for BuildMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}: {}", file.display(), self.text),
            None => write!(f, "{}", self.text),
        }
    }
}

/// Caller-facing summary of one build
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    pub success: bool,
    pub errors: Vec<BuildMessage>,
    pub warnings: Vec<BuildMessage>,
    pub output_count: usize,
    pub asset_count: usize,
}

/// One item of the build stream.
///
/// Which variant a run produces is fixed by `write_to_file_system`.
#[derive(Debug, Clone)]
pub enum BuildOutput {
    /// Files were persisted to the output path
    Written(BuildSummary),
    /// Files were kept in memory for the caller
    InMemory {
        summary: BuildSummary,
        files: Vec<OutputFile>,
        assets: Vec<AssetFile>,
    },
}

impl BuildOutput {
    pub fn summary(&self) -> &BuildSummary {
        match self {
            BuildOutput::Written(summary) => summary,
            BuildOutput::InMemory { summary, .. } => summary,
        }
    }

    pub fn is_success(&self) -> bool {
        self.summary().success
    }

    /// Output files, only present for in-memory runs
    pub fn files(&self) -> Option<&[OutputFile]> {
        match self {
            BuildOutput::Written(_) => None,
            BuildOutput::InMemory { files, .. } => Some(files),
        }
    }
}

/// Result of a single build engine invocation
#[derive(Debug)]
pub struct BuildResult<C = ()> {
    /// Files produced, in engine order
    pub output_files: Vec<OutputFile>,
    /// Files copied verbatim into the output path
    pub asset_files: Vec<AssetFile>,
    /// Paths this build depends on
    pub watch_files: Vec<PathBuf>,
    pub errors: Vec<BuildMessage>,
    pub warnings: Vec<BuildMessage>,
    context: Option<C>,
}

impl<C> Default for BuildResult<C> {
    fn default() -> Self {
        Self {
            output_files: Vec::new(),
            asset_files: Vec::new(),
            watch_files: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            context: None,
        }
    }
}

impl<C: IncrementalState> BuildResult<C> {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the incremental context to reuse on the next build
    pub fn with_context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_output_files(mut self, files: Vec<OutputFile>) -> Self {
        self.output_files = files;
        self
    }

    pub fn with_asset_files(mut self, assets: Vec<AssetFile>) -> Self {
        self.asset_files = assets;
        self
    }

    pub fn with_watch_files(mut self, paths: Vec<PathBuf>) -> Self {
        self.watch_files = paths;
        self
    }

    pub fn with_errors(mut self, errors: Vec<BuildMessage>) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<BuildMessage>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Check if the build reported no errors
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether the incremental context is still owned by this result
    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    /// Summary used when outputs were written to disk
    pub fn output(&self) -> BuildOutput {
        BuildOutput::Written(self.summary())
    }

    /// Projection used when outputs stay in memory
    pub fn output_with_files(&self) -> BuildOutput {
        BuildOutput::InMemory {
            summary: self.summary(),
            files: self.output_files.clone(),
            assets: self.asset_files.clone(),
        }
    }

    /// Move the incremental context out for the next build.
    ///
    /// After this call the result no longer owns a context, so disposing it is a no-op.
    pub fn create_rebuild_state(&mut self, changes: ChangeBatch) -> RebuildState<C> {
        RebuildState {
            context: self.context.take(),
            changes,
        }
    }

    /// Release the incremental context. Safe to call more than once.
    pub fn dispose(&mut self) -> KilnResult<()> {
        match self.context.take() {
            Some(context) => context.dispose(),
            None => Ok(()),
        }
    }

    fn summary(&self) -> BuildSummary {
        BuildSummary {
            success: self.is_success(),
            errors: self.errors.clone(),
            warnings: self.warnings.clone(),
            output_count: self.output_files.len(),
            asset_count: self.asset_files.len(),
        }
    }
}
