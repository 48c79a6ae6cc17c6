//! Error types for Kiln
//!
//! Uses `thiserror` for library errors; the binary wraps these in `anyhow`.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Kiln operations
pub type KilnResult<T> = Result<T, KilnError>;

/// Main error type for Kiln operations
#[derive(Error, Debug)]
pub enum KilnError {
    /// The output directory could not be emptied before the first build
    #[error("failed to delete output directory {path}: {source}")]
    DeleteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Refusing to empty the workspace itself
    #[error("output path must not be the workspace root directory: {path}")]
    OutputIsWorkspaceRoot { path: PathBuf },

    /// The build engine failed to run (as opposed to reporting build errors)
    #[error("build engine failed: {0}")]
    Engine(String),

    /// File watcher could not be created or failed while running
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// The file watcher was used after it was closed
    #[error("file watcher is closed")]
    WatchClosed,

    /// An ignore glob passed to the watcher did not parse
    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidIgnorePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// An output or asset file could not be persisted
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid `kiln.toml`
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// One or more teardown steps failed after the build loop ended
    #[error("{0}")]
    Teardown(TeardownErrors),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures collected while releasing watcher, incremental state and workers.
#[derive(Debug, Default)]
pub struct TeardownErrors(Vec<KilnError>);

impl TeardownErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: KilnError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KilnError> {
        self.0.iter()
    }

    /// `Ok(())` when nothing failed, otherwise a single `KilnError::Teardown`.
    pub fn into_result(self) -> KilnResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(KilnError::Teardown(self))
        }
    }
}

impl fmt::Display for TeardownErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "teardown failed ({} error", self.0.len())?;
        if self.0.len() != 1 {
            write!(f, "s")?;
        }
        write!(f, ")")?;
        for error in &self.0 {
            write!(f, "; {}", error)?;
        }
        Ok(())
    }
}

impl IntoIterator for TeardownErrors {
    type Item = KilnError;
    type IntoIter = std::vec::IntoIter<KilnError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
