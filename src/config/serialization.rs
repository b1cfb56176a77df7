//! Config serialization to TOML
//!
//! Single source of truth for the config file format.

use super::{Config, TICK_INTERVAL_RANGE};

/// Render a path for a TOML basic string
fn toml_path(path: &std::path::Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}

impl Config {
    pub fn to_toml(&self) -> String {
        format!(
            r#"# cueline configuration
#
# Teleprompter settings and scripts are not stored here. Use export (e) and
# import (i) in the TUI to carry them between sessions.

# Milliseconds between scroll ticks while playing ({tick_min}-{tick_max})
# Env: CUELINE_TICK_MS
tick_interval_ms = {tick}

# Directory for teleprompter-config.json
# Env: CUELINE_EXPORT_DIR
export_dir = "{export_dir}"

# Ask before Ctrl+R resets the teleprompter configuration
confirm_reset = {confirm_reset}

# Start in presentation mode
start_fullscreen = {start_fullscreen}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (JSON, in addition to the TUI buffer)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            tick_min = TICK_INTERVAL_RANGE.start(),
            tick_max = TICK_INTERVAL_RANGE.end(),
            tick = self.tick_interval_ms,
            export_dir = toml_path(&self.export_dir),
            confirm_reset = self.confirm_reset,
            start_fullscreen = self.start_fullscreen,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = toml_path(&self.logging.file_dir),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
