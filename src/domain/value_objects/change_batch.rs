//! Change batch value object
//!
//! One coalesced notification from the file watcher.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Kind of a single filesystem change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// Paths changed during one watcher notification cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeBatch {
    added: BTreeSet<PathBuf>,
    modified: BTreeSet<PathBuf>,
    removed: BTreeSet<PathBuf>,
}

impl ChangeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one change, folding it into what was already seen for the path.
    ///
    /// A file created and then deleted within the same batch disappears; a file
    /// deleted and then recreated counts as modified.
    pub fn record(&mut self, path: impl Into<PathBuf>, kind: ChangeKind) {
        let path = path.into();
        match kind {
            ChangeKind::Added => {
                if self.removed.remove(&path) {
                    self.modified.insert(path);
                } else if !self.modified.contains(&path) {
                    self.added.insert(path);
                }
            }
            ChangeKind::Modified => {
                // Modified after a removal means the file is back
                self.removed.remove(&path);
                if !self.added.contains(&path) {
                    self.modified.insert(path);
                }
            }
            ChangeKind::Removed => {
                if !self.added.remove(&path) {
                    self.modified.remove(&path);
                    self.removed.insert(path);
                }
            }
        }
    }

    /// Builder-style variant of [`ChangeBatch::record`]
    pub fn with(mut self, path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        self.record(path, kind);
        self
    }

    pub fn added(&self) -> impl Iterator<Item = &Path> {
        self.added.iter().map(PathBuf::as_path)
    }

    pub fn modified(&self) -> impl Iterator<Item = &Path> {
        self.modified.iter().map(PathBuf::as_path)
    }

    pub fn removed(&self) -> impl Iterator<Item = &Path> {
        self.removed.iter().map(PathBuf::as_path)
    }

    /// Every changed path, regardless of kind
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.added().chain(self.modified()).chain(self.removed())
    }

    /// How a path changed in this batch, if at all
    pub fn kind_of(&self, path: &Path) -> Option<ChangeKind> {
        if self.added.contains(path) {
            Some(ChangeKind::Added)
        } else if self.modified.contains(path) {
            Some(ChangeKind::Modified)
        } else if self.removed.contains(path) {
            Some(ChangeKind::Removed)
        } else {
            None
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.kind_of(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.modified.len() + self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human readable dump of the batch, used for verbose reporting
    pub fn to_debug_string(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_each_kind() {
        let batch = ChangeBatch::new()
            .with("a.css", ChangeKind::Added)
            .with("b.css", ChangeKind::Modified)
            .with("c.css", ChangeKind::Removed);

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.kind_of(Path::new("a.css")), Some(ChangeKind::Added));
        assert_eq!(batch.kind_of(Path::new("b.css")), Some(ChangeKind::Modified));
        assert_eq!(batch.kind_of(Path::new("c.css")), Some(ChangeKind::Removed));
        assert!(!batch.contains(Path::new("d.css")));
    }

    #[test]
    fn added_then_modified_stays_added() {
        let batch = ChangeBatch::new()
            .with("a.css", ChangeKind::Added)
            .with("a.css", ChangeKind::Modified);

        assert_eq!(batch.kind_of(Path::new("a.css")), Some(ChangeKind::Added));
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn added_then_removed_cancels_out() {
        let batch = ChangeBatch::new()
            .with("tmp.swp", ChangeKind::Added)
            .with("tmp.swp", ChangeKind::Removed);

        assert!(batch.is_empty());
    }

    #[test]
    fn removed_then_added_is_modified() {
        // Editors that save by delete + rename produce this sequence
        let batch = ChangeBatch::new()
            .with("a.css", ChangeKind::Removed)
            .with("a.css", ChangeKind::Added);

        assert_eq!(batch.kind_of(Path::new("a.css")), Some(ChangeKind::Modified));
    }

    #[test]
    fn debug_string_lists_paths_by_kind() {
        let batch = ChangeBatch::new()
            .with("src/app.css", ChangeKind::Modified)
            .with("src/new.js", ChangeKind::Added);

        let text = batch.to_debug_string();
        assert!(text.contains("\"added\""));
        assert!(text.contains("src/new.js"));
        assert!(text.contains("\"modified\""));
        assert!(text.contains("src/app.css"));
    }
}
