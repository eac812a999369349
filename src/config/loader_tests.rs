//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

/// Unique scratch file path under the system temp dir.
fn temp_config(name: &str) -> PathBuf {
    env::temp_dir().join(format!("timeline_engine_test_{}_{name}", std::process::id()))
}

#[test]
fn default_config_path_ends_with_config_toml() {
    let path = default_config_path().expect("Should have default path");
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("timeline-engine") && path_str.ends_with("config.toml"),
        "Path should contain 'timeline-engine' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(result, Ok(None));
}

#[test]
fn load_config_file_parses_valid_toml() {
    let config_path = temp_config("valid.toml");
    let toml_content = r#"
log_file_path = "/tmp/timeline.log"

[timeline]
stack_items = true
drag_snap = 60000
line_height = 40.0
can_resize = "both"
"#;
    fs::write(&config_path, toml_content).expect("Failed to write test config");

    let config = load_config_file(&config_path)
        .expect("Should parse valid TOML")
        .expect("Should return Some for existing file");

    assert_eq!(config.log_file_path, Some(PathBuf::from("/tmp/timeline.log")));
    let timeline = config.timeline.expect("timeline table present");
    assert!(timeline.stack_items);
    assert_eq!(timeline.drag_snap, 60_000);
    assert_eq!(timeline.line_height, 40.0);
    assert_eq!(timeline.can_resize, crate::model::ResizeCapability::Both);
    assert_eq!(timeline.click_tolerance, 3.0);

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = temp_config("invalid.toml");
    fs::write(&config_path, "this is not valid TOML ][}{").expect("Failed to write test config");

    match load_config_file(&config_path) {
        Err(ConfigError::ParseError { path, reason: _ }) => assert_eq!(path, config_path),
        other => panic!("Expected ParseError, got {:?}", other),
    }

    fs::remove_file(config_path).ok();
}

#[test]
fn unknown_keys_are_parse_errors() {
    let config_path = temp_config("unknown.toml");
    fs::write(&config_path, "[timeline]\nline_wrap = true\n").expect("Failed to write test config");

    assert!(matches!(
        load_config_file(&config_path),
        Err(ConfigError::ParseError { .. })
    ));

    fs::remove_file(config_path).ok();
}

#[test]
fn directory_path_is_a_read_error() {
    let result = load_config_file(env::temp_dir());
    assert!(matches!(result, Err(ConfigError::ReadError { .. })));
}

#[test]
fn merge_none_yields_defaults() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

// ===== Precedence =====

struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        EnvGuard(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

#[test]
#[serial(timeline_env)]
fn env_overrides_stack_and_snap() {
    let _stack = EnvGuard::new(STACK_ITEMS_ENV);
    let _snap = EnvGuard::new(DRAG_SNAP_ENV);
    env::set_var(STACK_ITEMS_ENV, "true");
    env::set_var(DRAG_SNAP_ENV, "300000");

    let result = apply_env_overrides(ResolvedConfig::default());

    assert!(result.timeline.stack_items);
    assert_eq!(result.timeline.drag_snap, 300_000);
}

#[test]
#[serial(timeline_env)]
fn invalid_env_values_are_ignored() {
    let _stack = EnvGuard::new(STACK_ITEMS_ENV);
    let _snap = EnvGuard::new(DRAG_SNAP_ENV);
    env::set_var(STACK_ITEMS_ENV, "maybe");
    env::set_var(DRAG_SNAP_ENV, "-5");

    let result = apply_env_overrides(ResolvedConfig::default());

    assert_eq!(result, ResolvedConfig::default());
}

#[test]
#[serial(timeline_env)]
fn config_env_var_is_used_without_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let env_path = temp_config("env.toml");
    fs::write(&env_path, "[timeline]\nstack_items = true\n").expect("Failed to write test config");
    env::set_var(CONFIG_ENV, &env_path);

    let config = load_config_with_precedence(None)
        .expect("Should load")
        .expect("Should find env config");
    assert!(config.timeline.is_some_and(|t| t.stack_items));

    fs::remove_file(env_path).ok();
}

#[test]
#[serial(timeline_env)]
fn explicit_path_beats_env_var() {
    let _guard = EnvGuard::new(CONFIG_ENV);
    let env_path = temp_config("env_loser.toml");
    let cli_path = temp_config("cli_winner.toml");
    fs::write(&env_path, "[timeline]\ndrag_snap = 1\n").expect("Failed to write test config");
    fs::write(&cli_path, "[timeline]\ndrag_snap = 2\n").expect("Failed to write test config");
    env::set_var(CONFIG_ENV, &env_path);

    let config = load_config_with_precedence(Some(cli_path.clone()))
        .expect("Should load")
        .expect("Should find cli config");
    assert_eq!(config.timeline.map(|t| t.drag_snap), Some(2));

    fs::remove_file(env_path).ok();
    fs::remove_file(cli_path).ok();
}

#[test]
#[serial(timeline_env)]
fn cli_overrides_win_over_env() {
    let _snap = EnvGuard::new(DRAG_SNAP_ENV);
    let _stack = EnvGuard::new(STACK_ITEMS_ENV);
    let _config = EnvGuard::new(CONFIG_ENV);
    env::set_var(DRAG_SNAP_ENV, "1000");
    env::set_var(CONFIG_ENV, temp_config("absent.toml"));

    let resolved = resolve(None, Some(true), Some(5_000), Some(PathBuf::from("x.log")))
        .expect("missing file is not an error");

    assert!(resolved.timeline.stack_items);
    assert_eq!(resolved.timeline.drag_snap, 5_000);
    assert_eq!(resolved.log_file_path, PathBuf::from("x.log"));
}

#[test]
fn cli_overrides_only_apply_when_set() {
    let base = ResolvedConfig::default();
    assert_eq!(apply_cli_overrides(base.clone(), None, None, None), base);
}
