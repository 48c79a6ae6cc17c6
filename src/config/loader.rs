//! Configuration loading

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{KilnError, KilnResult};

use super::env_validator::{levenshtein, EnvVarValidator};
use super::types::Config;

/// Workspace config file name
pub const CONFIG_FILE_NAME: &str = "kiln.toml";

const BOOL_VALUES: &[&str] = &["true", "false", "1", "0", "yes", "no"];

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> KilnResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| KilnError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load `kiln.toml` from the workspace root, or defaults, then env overrides
pub fn load_for_workspace(workspace_root: &Path) -> KilnResult<(Config, Vec<ConfigWarning>)> {
    let path = workspace_root.join(CONFIG_FILE_NAME);
    let (config, warnings) = if path.exists() {
        load_with_warnings(&path)?
    } else {
        (Config::default(), Vec::new())
    };

    Ok((with_env_overrides(config, |name| std::env::var(name).ok()), warnings))
}

/// Apply environment variable overrides (KILN_* prefix)
pub fn with_env_overrides(config: Config, env: impl Fn(&str) -> Option<String>) -> Config {
    with_env_overrides_to(config, env, &mut std::io::stderr())
}

/// Apply overrides, writing validation warnings to `writer` (for testing)
pub fn with_env_overrides_to<W: Write>(
    mut config: Config,
    env: impl Fn(&str) -> Option<String>,
    writer: &mut W,
) -> Config {
    // KILN_WATCH_ROOT
    if let Some(value) = env("KILN_WATCH_ROOT") {
        let validator = EnvVarValidator::new("KILN_WATCH_ROOT", BOOL_VALUES);
        config.watch.watch_root =
            validator.parse_with_writer(&value, parse_bool, config.watch.watch_root, writer);
    }

    // KILN_POLL (milliseconds)
    if let Some(value) = env("KILN_POLL") {
        let validator = EnvVarValidator::new("KILN_POLL", &["<milliseconds>"]);
        config.watch.poll_ms = validator.parse_with_writer(
            &value,
            |s| s.trim().parse::<u64>().ok().map(Some),
            config.watch.poll_ms,
            writer,
        );
    }

    // KILN_CACHE_DIR
    if let Some(value) = env("KILN_CACHE_DIR") {
        if !value.is_empty() {
            config.build.cache_dir = Some(PathBuf::from(value));
        }
    }

    config
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "build",
        "project_root",
        "output_path",
        "cache_dir",
        "delete_output_path",
        "write",
        "watch",
        "poll_ms",
        "watch_root",
        "output",
        "progress",
        "color",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}
