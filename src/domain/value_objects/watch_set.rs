//! Watch set value object
//!
//! Tracks which paths the file watcher should be registered on. The set is
//! split in two:
//!
//! - **pinned** paths are always watched (package manifests, lock files and,
//!   when requested, the project root) and are never pruned;
//! - **tracked** paths are the dependencies reported by builds.
//!
//! [`WatchSet::reconcile`] applies a new build report and returns the delta the
//! watcher must mirror. Stale paths are only pruned after a successful build: a
//! failed build's dependency report may be incomplete, and dropping a watch
//! there could hide the change that fixes the build.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Package manager files watched in every workspace.
///
/// A manifest or lock file change can invalidate module resolution before the
/// engine itself reports depending on it.
pub const PACKAGE_WATCH_FILES: &[&str] = &[
    // manifest can affect module resolution
    "package.json",
    // npm
    "package-lock.json",
    // pnpm
    "pnpm-lock.yaml",
    // yarn, including Plug'n'Play manifests
    "yarn.lock",
    ".pnp.cjs",
    ".pnp.data.json",
];

/// Paths to add to and remove from the watcher after a reconcile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchSetDelta {
    pub added: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

impl WatchSetDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Mutable set of watched paths, owned by the orchestrator
#[derive(Debug, Clone, Default)]
pub struct WatchSet {
    pinned: BTreeSet<PathBuf>,
    tracked: BTreeSet<PathBuf>,
}

impl WatchSet {
    /// Create a set with the given always-watched paths
    pub fn new(pinned: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            pinned: pinned.into_iter().collect(),
            tracked: BTreeSet::new(),
        }
    }

    /// Pinned set for a workspace: package files, plus the project root when requested
    pub fn for_workspace(workspace_root: &Path, project_root: Option<&Path>) -> Self {
        let pinned = project_root
            .map(Path::to_path_buf)
            .into_iter()
            .chain(
                PACKAGE_WATCH_FILES
                    .iter()
                    .map(|file| workspace_root.join(file)),
            );
        Self::new(pinned)
    }

    /// Track the initial build's watch paths.
    ///
    /// Returns every path the watcher must be registered on: pinned first, then tracked.
    pub fn seed<'a>(&mut self, reported: impl IntoIterator<Item = &'a PathBuf>) -> Vec<PathBuf> {
        self.tracked.extend(reported.into_iter().cloned());
        let mut paths: Vec<PathBuf> = self.pinned.iter().cloned().collect();
        paths.extend(
            self.tracked
                .iter()
                .filter(|path| !self.pinned.contains(*path))
                .cloned(),
        );
        paths
    }

    /// Apply a rebuild's watch report.
    ///
    /// Newly reported paths are always added. When `build_succeeded` is false
    /// nothing is pruned, whatever the report contains.
    pub fn reconcile(&mut self, reported: &[PathBuf], build_succeeded: bool) -> WatchSetDelta {
        let mut delta = WatchSetDelta::default();

        for path in reported {
            if self.tracked.insert(path.clone()) && !self.pinned.contains(path) {
                delta.added.push(path.clone());
            }
        }

        if build_succeeded {
            let current: BTreeSet<&PathBuf> = reported.iter().collect();
            let stale: Vec<PathBuf> = self
                .tracked
                .iter()
                .filter(|path| !current.contains(path))
                .cloned()
                .collect();

            for path in stale {
                self.tracked.remove(&path);
                if !self.pinned.contains(&path) {
                    delta.removed.push(path);
                }
            }
        }

        delta
    }

    /// Whether the watcher should currently be registered on `path`
    pub fn is_watched(&self, path: &Path) -> bool {
        self.pinned.contains(path) || self.tracked.contains(path)
    }

    /// Build-reported paths currently tracked
    pub fn tracked(&self) -> impl Iterator<Item = &Path> {
        self.tracked.iter().map(PathBuf::as_path)
    }

    pub fn pinned(&self) -> impl Iterator<Item = &Path> {
        self.pinned.iter().map(PathBuf::as_path)
    }

    /// Number of distinct watched paths
    pub fn len(&self) -> usize {
        self.pinned.len() + self.tracked.difference(&self.pinned).count()
    }

    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty() && self.tracked.is_empty()
    }
}
