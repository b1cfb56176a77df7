//! Application configuration
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/cueline/config.toml)
//! 3. Built-in defaults (lowest priority)
//!
//! This file configures the program itself. Teleprompter settings and the
//! script are never stored here; they only leave a session through export.

use serde::Deserialize;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

mod observability;
mod serialization;

#[cfg(test)]
mod tests;

pub use observability::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scroll tick cadence bounds, milliseconds
pub const TICK_INTERVAL_RANGE: RangeInclusive<u64> = 4..=100;

const DEFAULT_TICK_INTERVAL_MS: u64 = 16;

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Milliseconds between scroll ticks while playing
    pub tick_interval_ms: u64,

    /// Where `teleprompter-config.json` is written and read
    pub export_dir: PathBuf,

    /// Ask before resetting the teleprompter configuration
    pub confirm_reset: bool,

    /// Enter presentation mode as soon as the TUI starts
    pub start_fullscreen: bool,

    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            export_dir: PathBuf::from("."),
            confirm_reset: true,
            start_fullscreen: false,
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub tick_interval_ms: Option<u64>,
    pub export_dir: Option<String>,
    pub confirm_reset: Option<bool>,
    pub start_fullscreen: Option<bool>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/cueline/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("cueline").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A file that exists but can't be parsed ends the process with a clear
    /// message instead of silently falling back to defaults.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  To reset, run `cueline config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Self {
        Self::resolve(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with environment lookups
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        // Tick interval: env > file > default, always inside the bounds
        let tick_interval_ms = env("CUELINE_TICK_MS")
            .and_then(|v| v.trim().parse().ok())
            .or(file.tick_interval_ms)
            .unwrap_or(defaults.tick_interval_ms)
            .clamp(*TICK_INTERVAL_RANGE.start(), *TICK_INTERVAL_RANGE.end());

        // Export directory: env > file > default
        let export_dir = env("CUELINE_EXPORT_DIR")
            .or(file.export_dir)
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        Self {
            tick_interval_ms,
            export_dir,
            confirm_reset: file.confirm_reset.unwrap_or(defaults.confirm_reset),
            start_fullscreen: file.start_fullscreen.unwrap_or(defaults.start_fullscreen),
            logging: LoggingConfig::from_file(file.logging),
        }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
