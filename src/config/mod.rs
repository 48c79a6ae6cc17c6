//! Configuration module for Kiln
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (KILN_*)
//! 3. Workspace config (kiln.toml)
//! 4. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
mod types;

pub use env_validator::{levenshtein, EnvVarValidator};
pub use loader::{ConfigWarning, CONFIG_FILE_NAME};
pub use types::{BuildConfig, ColorMode, Config, OutputConfig, WatchConfig};
