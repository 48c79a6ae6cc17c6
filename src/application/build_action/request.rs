//! Build request: configuration for one orchestration run

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::entities::OutputFile;

use super::cancel::CancellationToken;

/// Default cache location, relative to the workspace root
pub const DEFAULT_CACHE_PATH: &str = ".kiln/cache";

/// Decides which output files a rebuild persists
#[derive(Clone)]
pub struct WriteFilter(Arc<dyn Fn(&OutputFile) -> bool + Send + Sync>);

impl WriteFilter {
    pub fn new(filter: impl Fn(&OutputFile) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(filter))
    }

    pub fn matches(&self, file: &OutputFile) -> bool {
        (self.0)(file)
    }
}

impl fmt::Debug for WriteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WriteFilter(..)")
    }
}

/// Immutable configuration for one run
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Workspace root; package files are watched here
    pub workspace_root: PathBuf,
    /// Project root; watched as a whole when `watch_root` is set
    pub project_root: PathBuf,
    /// Output directory, relative paths resolve against the workspace root
    pub output_path: PathBuf,
    /// Cache base directory, relative paths resolve against the workspace root
    pub cache_path: PathBuf,
    /// Keep rebuilding on changes
    pub watch: bool,
    /// Persist outputs instead of handing them to the caller in memory
    pub write_to_file_system: bool,
    /// Applied to output files on rebuilds; assets are always written
    pub write_filter: Option<WriteFilter>,
    /// Report change batches
    pub verbose: bool,
    /// Report build start/finish
    pub progress: bool,
    /// Empty the output directory before the first build
    pub delete_output_path: bool,
    /// Poll the filesystem at this interval instead of using OS events
    pub poll: Option<Duration>,
    /// Watch the whole project root in addition to reported dependencies
    pub watch_root: bool,
    pub cancellation: CancellationToken,
}

impl BuildRequest {
    /// Create a request with minimal required fields
    pub fn new(workspace_root: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        let workspace_root = workspace_root.into();
        Self {
            project_root: workspace_root.clone(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            workspace_root,
            output_path: output_path.into(),
            watch: false,
            write_to_file_system: true,
            write_filter: None,
            verbose: false,
            progress: false,
            delete_output_path: false,
            poll: None,
            watch_root: false,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_project_root(mut self, project_root: impl Into<PathBuf>) -> Self {
        self.project_root = project_root.into();
        self
    }

    pub fn with_cache_path(mut self, cache_path: impl Into<PathBuf>) -> Self {
        self.cache_path = cache_path.into();
        self
    }

    pub fn with_watch(mut self, watch: bool) -> Self {
        self.watch = watch;
        self
    }

    pub fn with_write_to_file_system(mut self, write: bool) -> Self {
        self.write_to_file_system = write;
        self
    }

    pub fn with_write_filter(
        mut self,
        filter: impl Fn(&OutputFile) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.write_filter = Some(WriteFilter::new(filter));
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_delete_output_path(mut self, delete: bool) -> Self {
        self.delete_output_path = delete;
        self
    }

    pub fn with_poll(mut self, poll: Option<Duration>) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_watch_root(mut self, watch_root: bool) -> Self {
        self.watch_root = watch_root;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Output directory resolved against the workspace root
    pub fn resolved_output_path(&self) -> PathBuf {
        resolve(&self.workspace_root, &self.output_path)
    }

    /// Cache directory resolved against the workspace root
    pub fn resolved_cache_path(&self) -> PathBuf {
        resolve(&self.workspace_root, &self.cache_path)
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_write_to_disk_without_watching() {
        let request = BuildRequest::new("/ws", "dist");

        assert!(request.write_to_file_system);
        assert!(!request.watch);
        assert!(request.poll.is_none());
        assert_eq!(request.project_root, PathBuf::from("/ws"));
    }

    #[test]
    fn relative_paths_resolve_against_workspace() {
        let request = BuildRequest::new("/ws", "dist").with_cache_path("/tmp/kiln-cache");

        assert_eq!(request.resolved_output_path(), PathBuf::from("/ws/dist"));
        assert_eq!(request.resolved_cache_path(), PathBuf::from("/tmp/kiln-cache"));
    }

    #[test]
    fn write_filter_is_applied_per_file() {
        let request = BuildRequest::new("/ws", "dist")
            .with_write_filter(|file| file.path().extension().is_some_and(|ext| ext == "css"));
        let filter = request.write_filter.unwrap();

        assert!(filter.matches(&OutputFile::code("a.css", "")));
        assert!(!filter.matches(&OutputFile::code("a.js", "")));
    }
}
