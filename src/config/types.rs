//! Configuration type definitions

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::KilnResult;

use super::loader::{self, ConfigWarning};

/// `[build]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Project root, relative to the workspace root
    #[serde(default)]
    pub project_root: Option<PathBuf>,

    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Cache base directory, relative to the workspace root
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    #[serde(default)]
    pub delete_output_path: bool,

    /// Persist outputs to disk
    #[serde(default = "default_true")]
    pub write: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            project_root: None,
            output_path: default_output_path(),
            cache_dir: None,
            delete_output_path: false,
            write: true,
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("dist")
}

fn default_true() -> bool {
    true
}

/// `[watch]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Poll interval; OS notifications are used when unset
    #[serde(default)]
    pub poll_ms: Option<u64>,

    /// Watch the whole project root, not just reported dependencies
    #[serde(default)]
    pub watch_root: bool,
}

impl WatchConfig {
    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_ms.map(Duration::from_millis)
    }
}

/// `[output]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report build start/finish
    #[serde(default = "default_true")]
    pub progress: bool,

    #[serde(default)]
    pub color: ColorMode,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            progress: true,
            color: ColorMode::default(),
        }
    }
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> KilnResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> KilnResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Load `kiln.toml` from the workspace (if present) and apply `KILN_*` overrides
    pub fn load_for_workspace(workspace_root: &Path) -> KilnResult<(Self, Vec<ConfigWarning>)> {
        loader::load_for_workspace(workspace_root)
    }

    /// Apply environment variable overrides (KILN_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self, |name| std::env::var(name).ok())
    }

    /// Project root resolved against the workspace root
    pub fn project_root(&self, workspace_root: &Path) -> PathBuf {
        match &self.build.project_root {
            Some(root) => workspace_root.join(root),
            None => workspace_root.to_path_buf(),
        }
    }
}
