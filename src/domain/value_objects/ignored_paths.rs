//! Ignored paths value object
//!
//! Decides which change events the watcher drops before they can trigger a
//! rebuild. Entries are either glob patterns (`**/node_modules/**`) or plain
//! paths; a plain path ignores itself and everything below it.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::{KilnError, KilnResult};

/// Globs ignored by every build watcher: dependency directories and hidden directories.
pub const DEFAULT_IGNORED_GLOBS: &[&str] = &["**/node_modules/**", "**/.*/**"];

/// Compiled ignore rules
#[derive(Debug, Clone)]
pub struct IgnoredPaths {
    globs: GlobSet,
    prefixes: Vec<PathBuf>,
    entry_count: usize,
}

impl Default for IgnoredPaths {
    fn default() -> Self {
        Self::empty()
    }
}

impl IgnoredPaths {
    /// A rule set that ignores nothing
    pub fn empty() -> Self {
        Self {
            globs: GlobSet::empty(),
            prefixes: Vec::new(),
            entry_count: 0,
        }
    }

    /// Compile ignore entries. Entries containing glob metacharacters are
    /// treated as globs, everything else as a path prefix.
    pub fn new<I, S>(entries: I) -> KilnResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut prefixes = Vec::new();
        let mut entry_count = 0;

        for entry in entries {
            let entry = entry.as_ref();
            if entry.is_empty() {
                continue;
            }
            entry_count += 1;

            if is_glob(entry) {
                let glob = GlobBuilder::new(entry)
                    .literal_separator(true)
                    .build()
                    .map_err(|source| KilnError::InvalidIgnorePattern {
                        pattern: entry.to_string(),
                        source,
                    })?;
                builder.add(glob);
            } else {
                prefixes.push(PathBuf::from(entry));
            }
        }

        let globs = builder
            .build()
            .map_err(|source| KilnError::InvalidIgnorePattern {
                pattern: "<set>".to_string(),
                source,
            })?;

        Ok(Self {
            globs,
            prefixes,
            entry_count,
        })
    }

    /// Check if a change to `path` should be dropped
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix)) || self.globs.is_match(path)
    }

    /// Number of entries compiled into this rule set
    pub fn len(&self) -> usize {
        self.entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}

fn is_glob(entry: &str) -> bool {
    entry.contains(['*', '?', '[', '{'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ignores_nothing() {
        let ignored = IgnoredPaths::empty();
        assert!(!ignored.is_ignored(Path::new("/ws/src/main.js")));
        assert!(ignored.is_empty());
    }

    #[test]
    fn default_globs_cover_dependency_and_hidden_dirs() {
        let ignored = IgnoredPaths::new(DEFAULT_IGNORED_GLOBS).unwrap();

        assert!(ignored.is_ignored(Path::new("/ws/node_modules/lib/index.js")));
        assert!(ignored.is_ignored(Path::new("/ws/app/node_modules/x.js")));
        assert!(ignored.is_ignored(Path::new("/ws/.git/HEAD")));
        assert!(ignored.is_ignored(Path::new("/ws/.cache/kiln/entry")));
        assert!(!ignored.is_ignored(Path::new("/ws/src/app.css")));
        assert!(!ignored.is_ignored(Path::new("/ws/src/file.with.dots.css")));
    }

    #[test]
    fn plain_paths_ignore_their_subtree() {
        let ignored = IgnoredPaths::new(["/ws/dist", "/ws/.kiln/cache"]).unwrap();

        assert!(ignored.is_ignored(Path::new("/ws/dist")));
        assert!(ignored.is_ignored(Path::new("/ws/dist/main.js")));
        assert!(!ignored.is_ignored(Path::new("/ws/distribution/main.js")));
        assert_eq!(ignored.len(), 2);
    }

    #[test]
    fn invalid_glob_is_reported() {
        let err = IgnoredPaths::new(["src/[abc"]).unwrap_err();
        assert!(matches!(err, KilnError::InvalidIgnorePattern { .. }));
    }
}
