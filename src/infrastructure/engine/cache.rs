//! Incremental context for the copy engine

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::domain::entities::{BuildMessage, IncrementalState, OutputFile};
use crate::domain::value_objects::ContentHash;
use crate::error::KilnResult;
use crate::infrastructure::fs::atomic_write;

/// File name of the hash manifest written on dispose
pub const CACHE_MANIFEST: &str = "sources.json";

/// What one source compiled to last time
#[derive(Debug, Clone)]
struct Entry {
    hash: ContentHash,
    output: Result<OutputFile, BuildMessage>,
}

/// Compiled outputs keyed by source path and content hash
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: HashMap<PathBuf, Entry>,
    /// Where to record the manifest when the cache is released
    manifest_dir: Option<PathBuf>,
}

impl SourceCache {
    pub fn new(manifest_dir: Option<PathBuf>) -> Self {
        Self {
            entries: HashMap::new(),
            manifest_dir,
        }
    }

    /// Cached output for `path` if its content is unchanged
    pub fn get(&self, path: &Path, hash: &ContentHash) -> Option<&Result<OutputFile, BuildMessage>> {
        self.entries
            .get(path)
            .filter(|entry| entry.hash == *hash)
            .map(|entry| &entry.output)
    }

    pub fn insert(
        &mut self,
        path: PathBuf,
        hash: ContentHash,
        output: Result<OutputFile, BuildMessage>,
    ) {
        self.entries.insert(path, Entry { hash, output });
    }

    /// Forget sources that no longer exist
    pub fn retain_paths(&mut self, keep: impl Fn(&Path) -> bool) {
        self.entries.retain(|path, _| keep(path));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn manifest(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(path, entry)| (path.display().to_string(), entry.hash.to_string()))
            .collect()
    }
}

impl IncrementalState for SourceCache {
    fn dispose(self) -> KilnResult<()> {
        let Some(dir) = &self.manifest_dir else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(&self.manifest())
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        atomic_write(&dir.join(CACHE_MANIFEST), &json)
    }
}
