//! Configuration tests
//!
//! The TOML template is the single source of truth for the file format, so
//! most of these check that it parses back into the same `Config`.

use super::*;
use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );

    let resolved = Config::resolve(parsed.unwrap(), no_env);
    assert_eq!(resolved, config);
}

#[test]
fn test_config_roundtrip_custom_values() {
    let config = Config {
        tick_interval_ms: 33,
        export_dir: PathBuf::from("/tmp/scripts"),
        confirm_reset: false,
        start_fullscreen: true,
        logging: LoggingConfig {
            level: "debug".to_string(),
            file_enabled: true,
            file_dir: PathBuf::from("/var/log/cueline"),
            file_rotation: LogRotation::Hourly,
            file_prefix: "prompter".to_string(),
        },
    };

    let parsed: FileConfig = toml::from_str(&config.to_toml()).unwrap();
    assert_eq!(Config::resolve(parsed, no_env), config);
}

#[test]
fn test_template_mentions_env_overrides() {
    let toml_str = Config::default().to_toml();
    assert!(toml_str.contains("CUELINE_TICK_MS"));
    assert!(toml_str.contains("CUELINE_EXPORT_DIR"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_file_gives_defaults() {
    let parsed: FileConfig = toml::from_str("").unwrap();
    assert_eq!(Config::resolve(parsed, no_env), Config::default());
}

#[test]
fn test_partial_logging_section_keeps_other_defaults() {
    let parsed: FileConfig = toml::from_str("[logging]\nlevel = \"warn\"\n").unwrap();
    let config = Config::resolve(parsed, no_env);

    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.file_prefix, "cueline");
    assert_eq!(config.logging.file_rotation, LogRotation::Daily);
}

#[test]
fn test_env_overrides_file() {
    let parsed: FileConfig =
        toml::from_str("tick_interval_ms = 20\nexport_dir = \"/from/file\"\n").unwrap();
    let env = env_from(&[("CUELINE_TICK_MS", "40"), ("CUELINE_EXPORT_DIR", "/from/env")]);
    let config = Config::resolve(parsed, env);

    assert_eq!(config.tick_interval_ms, 40);
    assert_eq!(config.export_dir, PathBuf::from("/from/env"));
}

#[test]
fn test_unparseable_env_value_falls_back_to_file() {
    let parsed: FileConfig = toml::from_str("tick_interval_ms = 20\n").unwrap();
    let config = Config::resolve(parsed, env_from(&[("CUELINE_TICK_MS", "fast")]));
    assert_eq!(config.tick_interval_ms, 20);
}

#[test]
fn test_tick_interval_is_clamped() {
    let parsed: FileConfig = toml::from_str("tick_interval_ms = 1\n").unwrap();
    assert_eq!(Config::resolve(parsed, no_env).tick_interval_ms, 4);

    let config = Config::resolve(FileConfig::default(), env_from(&[("CUELINE_TICK_MS", "5000")]));
    assert_eq!(config.tick_interval_ms, 100);
    assert_eq!(config.tick_period(), Duration::from_millis(100));
}

#[test]
fn test_log_rotation_names() {
    assert_eq!(LogRotation::from_name("HOURLY"), LogRotation::Hourly);
    assert_eq!(LogRotation::from_name("never"), LogRotation::Never);
    assert_eq!(LogRotation::from_name("weekly"), LogRotation::Daily);
    for rotation in [LogRotation::Hourly, LogRotation::Daily, LogRotation::Never] {
        assert_eq!(LogRotation::from_name(rotation.as_str()), rotation);
    }
}

#[test]
fn test_malformed_file_is_a_parse_error() {
    let parsed: Result<FileConfig, _> = toml::from_str("tick_interval_ms = \"soon\"");
    assert!(parsed.is_err());
}
