//! Copy engine: project tree -> output directory

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::WalkBuilder;

use crate::domain::entities::{
    AssetFile, BuildMessage, BuildResult, OutputFile, OutputKind, RebuildState,
};
use crate::domain::ports::BuildEngine;
use crate::domain::value_objects::{ChangeBatch, ContentHash};
use crate::error::{KilnError, KilnResult};
use crate::infrastructure::workers::StylesheetWorkerPool;

use super::cache::SourceCache;

/// Extensions copied verbatim as assets
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "avif", "ico", "svg", "woff", "woff2", "ttf", "otf",
    "mp4", "webm", "mp3", "wav",
];

/// Counters from the most recent build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Sources compiled or copied this build
    pub compiled: usize,
    /// Sources served from the incremental cache
    pub reused: usize,
}

/// Copies the project tree, minifying stylesheets on the worker pool
pub struct CopyEngine {
    project_root: PathBuf,
    /// Directories never walked (output, cache)
    skip: Vec<PathBuf>,
    cache_dir: Option<PathBuf>,
    styles: Arc<StylesheetWorkerPool>,
    stats: BuildStats,
}

impl CopyEngine {
    pub fn new(project_root: impl Into<PathBuf>, styles: Arc<StylesheetWorkerPool>) -> Self {
        Self {
            project_root: project_root.into(),
            skip: Vec::new(),
            cache_dir: None,
            styles,
            stats: BuildStats::default(),
        }
    }

    /// Never walk into `dir`
    pub fn skip_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.skip.push(dir.into());
        self
    }

    /// Record the source manifest below `dir` when the cache is released
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.skip.push(dir.clone());
        self.cache_dir = Some(dir);
        self
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    fn sources(&self) -> KilnResult<Vec<PathBuf>> {
        let skip = self.skip.clone();
        let walker = WalkBuilder::new(&self.project_root)
            .hidden(true)
            .git_ignore(true)
            .require_git(false)
            .filter_entry(move |entry| !skip.iter().any(|dir| entry.path().starts_with(dir)))
            .build();

        let mut sources = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| KilnError::Engine(e.to_string()))?;
            if entry.file_type().is_some_and(|kind| kind.is_file()) {
                sources.push(entry.into_path());
            }
        }
        sources.sort();
        Ok(sources)
    }

    fn compile(&self, relative: &Path, contents: Vec<u8>) -> Result<OutputFile, BuildMessage> {
        if !has_extension(relative, &["css"]) {
            return Ok(OutputFile::new(relative, contents, OutputKind::Code));
        }

        let source = String::from_utf8(contents).map_err(|_| {
            BuildMessage::new("stylesheet is not valid UTF-8").with_file(relative)
        })?;
        self.styles
            .compile(&source)
            .map(|css| OutputFile::new(relative, css, OutputKind::Stylesheet))
            .map_err(|e| BuildMessage::new(e.to_string()).with_file(relative))
    }
}

impl BuildEngine for CopyEngine {
    type Context = SourceCache;

    fn build(&mut self, prior: Option<RebuildState<SourceCache>>) -> KilnResult<BuildResult<SourceCache>> {
        let (mut cache, changes) = match prior {
            Some(state) => (
                state
                    .context
                    .unwrap_or_else(|| SourceCache::new(self.cache_dir.clone())),
                state.changes,
            ),
            None => (SourceCache::new(self.cache_dir.clone()), ChangeBatch::new()),
        };

        let sources = self.sources()?;
        let mut stats = BuildStats::default();
        let mut outputs = Vec::new();
        let mut assets = Vec::new();
        let mut errors = Vec::new();
        let mut watch_files = vec![self.project_root.clone()];

        for path in &sources {
            let relative = path.strip_prefix(&self.project_root).unwrap_or(path);
            watch_files.push(path.clone());

            if has_extension(relative, MEDIA_EXTENSIONS) {
                assets.push(AssetFile::new(path, relative));
                continue;
            }

            let contents = fs::read(path)?;
            let hash = ContentHash::from_bytes(&contents);
            let cached = if changes.contains(path) {
                None
            } else {
                cache.get(path, &hash).cloned()
            };

            let output = match cached {
                Some(output) => {
                    stats.reused += 1;
                    output
                }
                None => {
                    stats.compiled += 1;
                    let output = self.compile(relative, contents);
                    cache.insert(path.clone(), hash, output.clone());
                    output
                }
            };

            match output {
                Ok(file) => outputs.push(file),
                Err(message) => errors.push(message),
            }
        }

        let present: HashSet<&PathBuf> = sources.iter().collect();
        cache.retain_paths(|path| present.contains(&path.to_path_buf()));
        self.stats = stats;

        Ok(BuildResult::new()
            .with_output_files(outputs)
            .with_asset_files(assets)
            .with_watch_files(watch_files)
            .with_errors(errors)
            .with_context(cache))
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
}
