// CLI module - command-line argument parsing and handlers
//
// With no subcommand cueline starts the TUI. Subcommands run headless:
// - config --show: Display effective configuration
// - config --reset: Regenerate config file with defaults
// - config --edit: Open config file in $EDITOR
// - config --path: Show config file path
// - export: Write a teleprompter payload without starting the TUI

use crate::config::{Config, VERSION};
use crate::prompter::Session;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// cueline - terminal teleprompter
#[derive(Parser, Debug)]
#[command(name = "cueline")]
#[command(version = VERSION)]
#[command(about = "Terminal teleprompter with adjustable scrolling and mirroring", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Text file to load as the script
    pub script: Option<PathBuf>,

    /// Apply an exported teleprompter-config.json at startup
    #[arg(long, value_name = "FILE")]
    pub import: Option<PathBuf>,

    /// Start in presentation mode
    #[arg(long)]
    pub fullscreen: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Write teleprompter-config.json with default settings
    Export {
        /// Text file to use as the exported content
        #[arg(long, value_name = "FILE")]
        script: Option<PathBuf>,

        /// Directory to write into (defaults to the configured export_dir)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
}

/// What main should do after argument handling
pub enum Outcome {
    /// A subcommand ran; exit
    Done,
    /// Start the TUI with these options
    Run(RunOptions),
}

#[derive(Debug, Default)]
pub struct RunOptions {
    pub script: Option<PathBuf>,
    pub import: Option<PathBuf>,
    pub fullscreen: bool,
}

/// Handle CLI commands
pub fn handle_cli() -> Result<Outcome> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config {
            show,
            reset,
            edit,
            path,
        }) => {
            if path {
                handle_config_path();
            } else if show {
                handle_config_show();
            } else if reset {
                handle_config_reset();
            } else if edit {
                handle_config_edit();
            } else {
                println!("Usage: cueline config [--show|--reset|--edit|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --edit    Open config file in $EDITOR");
                println!("  --path    Show config file path");
            }
            Ok(Outcome::Done)
        }
        Some(Commands::Export { script, out }) => {
            let config = Config::from_env();
            crate::logging::init_headless(&config.logging.level);
            let dir = out.unwrap_or(config.export_dir);
            let path = handle_export(script.as_deref(), &dir)?;
            println!("Exported {}", path.display());
            Ok(Outcome::Done)
        }
        None => Ok(Outcome::Run(RunOptions {
            script: cli.script,
            import: cli.import,
            fullscreen: cli.fullscreen,
        })),
    }
}

/// Read a script file, normalising Windows line endings
pub fn read_script(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    Ok(text.replace("\r\n", "\n"))
}

fn handle_export(script: Option<&Path>, dir: &Path) -> Result<PathBuf> {
    let mut session = Session::default();
    if let Some(script) = script {
        session.replace_content(read_script(script)?);
    }
    session
        .export_to_dir(dir)
        .with_context(|| format!("Failed to export into {}", dir.display()))
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    println!("tick_interval_ms = {}", config.tick_interval_ms);
    println!("export_dir = {:?}", config.export_dir.display().to_string());
    println!("confirm_reset = {}", config.confirm_reset);
    println!("start_fullscreen = {}", config.start_fullscreen);
    println!();
    println!("[logging]");
    println!("level = {:?}", config.logging.level);
    println!("file_enabled = {}", config.logging.file_enabled);
    println!(
        "file_dir = {:?}",
        config.logging.file_dir.display().to_string()
    );
    println!("file_rotation = {:?}", config.logging.file_rotation.as_str());
    println!("file_prefix = {:?}", config.logging.file_prefix);

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

fn handle_config_edit() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    match Command::new(&editor).arg(&path).status() {
        Ok(s) if s.success() => {}
        Ok(s) => {
            eprintln!("Editor exited with status: {}", s);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to launch editor '{}': {}", editor, e);
            eprintln!("Set $EDITOR environment variable to your preferred editor");
            std::process::exit(1);
        }
    }
}
