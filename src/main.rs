// cueline - Terminal Teleprompter
//
// Scrolls a script up the terminal at an adjustable speed so it can be read
// while presenting or recording.
//
// Architecture:
// - Prompter: configuration, content, scroll engine, timer and transfer
//   (no terminal dependency, driven by tokio intervals)
// - TUI (ratatui): draws the teleprompter and routes keys to commands
// - Config: application settings from file and environment
// - Logging: tracing captured into an in-memory buffer while the TUI runs

mod cli;
mod config;
mod logging;
mod prompter;
mod tui;

use anyhow::{Context, Result};
use cli::{Outcome, RunOptions};
use config::{Config, LogRotation};
use logging::{LogBuffer, TuiLogLayer};
use prompter::Session;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Subcommands (config, export) run headless and exit here
    let options = match cli::handle_cli()? {
        Outcome::Done => return Ok(()),
        Outcome::Run(options) => options,
    };

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();
    let config = Config::from_env();

    let log_buffer = LogBuffer::new();

    // While the TUI owns the screen, logs go to the buffer (and optionally
    // to rotating JSON files), never to stdout
    //
    // Precedence: RUST_LOG env var > config file > default "info"
    let default_filter = format!("cueline={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    // The guard must be kept alive for the duration of the program to ensure logs flush
    let file_writer = if config.logging.file_enabled {
        match std::fs::create_dir_all(&config.logging.file_dir) {
            Ok(()) => {
                let file_appender = match config.logging.file_rotation {
                    LogRotation::Hourly => tracing_appender::rolling::hourly(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                    LogRotation::Daily => tracing_appender::rolling::daily(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                    LogRotation::Never => tracing_appender::rolling::never(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                };
                Some(tracing_appender::non_blocking(file_appender))
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    config.logging.file_dir, e
                );
                None
            }
        }
    } else {
        None
    };

    let (file_layer, _file_guard) = match file_writer {
        Some((non_blocking, guard)) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_ansi(false),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(TuiLogLayer::new(log_buffer.clone()))
        .with(file_layer)
        .init();

    let session = prepare_session(&config, &options)?;
    let start_fullscreen = options.fullscreen || config.start_fullscreen;

    tracing::info!(
        version = config::VERSION,
        tick_ms = config.tick_interval_ms,
        "cueline starting"
    );

    tui::run_tui(session, log_buffer, config, start_fullscreen).await
}

/// Build the session from command-line inputs before the terminal is taken
/// over, so a bad path is reported on a normal screen
fn prepare_session(config: &Config, options: &RunOptions) -> Result<Session> {
    let mut session = Session::new(config.tick_period());

    if let Some(path) = &options.import {
        let outcome = session
            .import_from_path(path)
            .with_context(|| format!("Failed to import {}", path.display()))?;
        for rejected in &outcome.report.rejected {
            eprintln!("Warning: {}", rejected);
        }
    }

    // An explicit script wins over content carried by the import
    if let Some(path) = &options.script {
        session.replace_content(cli::read_script(path)?);
    }

    Ok(session)
}
