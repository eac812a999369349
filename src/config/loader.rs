//! Configuration file loading with precedence handling.

use super::TimelineConfig;
use crate::model::DurationMillis;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TIMELINE_ENGINE_CONFIG";
/// Environment variable overriding `stack_items`.
pub const STACK_ITEMS_ENV: &str = "TIMELINE_ENGINE_STACK_ITEMS";
/// Environment variable overriding `drag_snap`.
pub const DRAG_SNAP_ENV: &str = "TIMELINE_ENGINE_DRAG_SNAP";

const APP_DIR: &str = "timeline-engine";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// ```toml
/// log_file_path = "/tmp/timeline.log"
///
/// [timeline]
/// stack_items = true
/// drag_snap = 60000
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Engine options. Omitted keys keep their defaults.
    #[serde(default)]
    pub timeline: Option<TimelineConfig>,
}

/// Resolved configuration after applying precedence rules.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Engine options.
    pub timeline: TimelineConfig,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            timeline: TimelineConfig::default(),
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// `~/.local/state/timeline-engine/timeline-engine.log` on Linux. Falls back
/// to the current directory when no state directory exists.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join(APP_DIR).join("timeline-engine.log"),
        None => PathBuf::from("timeline-engine.log"),
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if the file doesn't exist.
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file");
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path (`~/.config/timeline-engine/config.toml` on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `TIMELINE_ENGINE_CONFIG` environment variable
/// 3. Default path
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `TIMELINE_ENGINE_STACK_ITEMS` and `TIMELINE_ENGINE_DRAG_SNAP`.
/// Unparseable values are logged and ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(STACK_ITEMS_ENV) {
        match parse_bool(&raw) {
            Some(stack) => config.timeline.stack_items = stack,
            None => tracing::warn!(value = %raw, "ignoring invalid {STACK_ITEMS_ENV}"),
        }
    }

    if let Ok(raw) = std::env::var(DRAG_SNAP_ENV) {
        match raw.trim().parse::<DurationMillis>() {
            Ok(snap) if snap >= 0 => config.timeline.drag_snap = snap,
            _ => tracing::warn!(value = %raw, "ignoring invalid {DRAG_SNAP_ENV}"),
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        timeline: config.timeline.unwrap_or(defaults.timeline),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest).
/// Only flags the user actually passed are applied.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    stack_override: Option<bool>,
    drag_snap_override: Option<DurationMillis>,
    log_file_override: Option<PathBuf>,
) -> ResolvedConfig {
    if let Some(stack) = stack_override {
        config.timeline.stack_items = stack;
    }

    if let Some(snap) = drag_snap_override {
        config.timeline.drag_snap = snap;
    }

    if let Some(path) = log_file_override {
        config.log_file_path = path;
    }

    config
}

/// Full resolution: file lookup, merge, env vars, then CLI flags.
///
/// # Errors
///
/// Propagates [`ConfigError`] from [`load_config_with_precedence`].
pub fn resolve(
    config_path: Option<PathBuf>,
    stack_override: Option<bool>,
    drag_snap_override: Option<DurationMillis>,
    log_file_override: Option<PathBuf>,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let config = apply_env_overrides(merge_config(file));
    Ok(apply_cli_overrides(
        config,
        stack_override,
        drag_snap_override,
        log_file_override,
    ))
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

#[cfg(test)]
mod log_path_tests {
    use super::*;

    #[test]
    fn default_log_path_ends_with_app_log() {
        let path = default_log_path();
        assert!(
            path.to_string_lossy().ends_with("timeline-engine.log"),
            "Default log path should end with 'timeline-engine.log', got: {:?}",
            path
        );
    }

    #[test]
    fn config_file_log_path_overrides_default() {
        let custom_path = PathBuf::from("/custom/path/to/app.log");
        let config_file = ConfigFile {
            log_file_path: Some(custom_path.clone()),
            timeline: None,
        };

        let resolved = merge_config(Some(config_file));
        assert_eq!(resolved.log_file_path, custom_path);
    }

    #[test]
    fn missing_config_file_log_path_uses_default() {
        let resolved = merge_config(Some(ConfigFile::default()));
        assert_eq!(resolved.log_file_path, default_log_path());
    }
}
