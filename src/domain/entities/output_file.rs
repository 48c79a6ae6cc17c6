//! OutputFile entity - a file produced by one build
//!
//! Output files carry their contents in memory and are written relative to the
//! output directory. Asset files are copied verbatim from a source path.

use crate::domain::value_objects::ContentHash;
use std::path::{Path, PathBuf};

/// Classification of a produced file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Scripts, markup and other text copied or transformed by the engine
    Code,
    /// Compiled stylesheets
    Stylesheet,
    /// Binary media emitted by the engine itself
    Media,
}

/// A built file ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFile {
    /// Path relative to the output directory
    path: PathBuf,
    contents: Vec<u8>,
    kind: OutputKind,
}

impl OutputFile {
    /// Create a new OutputFile
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>, kind: OutputKind) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
            kind,
        }
    }

    /// Convenience constructor for code outputs
    pub fn code(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self::new(path, contents, OutputKind::Code)
    }

    /// Get the output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the raw contents
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Contents as UTF-8, if they are valid
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.contents).ok()
    }

    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    /// SHA-256 of the contents
    pub fn hash(&self) -> ContentHash {
        ContentHash::from_bytes(&self.contents)
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// A file copied from `source` to `destination` (relative to the output directory)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetFile {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl AssetFile {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_file_new_stores_path_contents_kind() {
        let output = OutputFile::new("styles.css", "a{}", OutputKind::Stylesheet);

        assert_eq!(output.path(), Path::new("styles.css"));
        assert_eq!(output.contents(), b"a{}");
        assert_eq!(output.kind(), OutputKind::Stylesheet);
    }

    #[test]
    fn output_file_text_rejects_invalid_utf8() {
        let output = OutputFile::new("logo.bin", vec![0xff, 0xfe], OutputKind::Media);
        assert!(output.text().is_none());
        assert_eq!(output.len(), 2);
    }

    #[test]
    fn output_file_hash_is_sha256() {
        let output = OutputFile::code("main.js", "hello");
        let hash = output.hash();

        assert!(hash.as_str().starts_with("sha256:"));
        assert_eq!(hash.as_str().len(), 7 + 64);
        assert_eq!(hash, OutputFile::code("other.js", "hello").hash());
    }
}
