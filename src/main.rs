// ABOUTME: Entry point for the fabdeploy CLI application.
// ABOUTME: Parses arguments, loads configuration, and dispatches to command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use fabdeploy::config::{self, Config, Connection, Settings};
use fabdeploy::error::Result;
use fabdeploy::output::{Output, OutputMode};
use std::env;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("fabdeploy=debug,warn")
    } else if cli.quiet || cli.json {
        EnvFilter::new("warn")
    } else {
        EnvFilter::new("fabdeploy=info,warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .init();

    let mode = OutputMode::from_flags(cli.quiet, cli.json);

    if let Err(e) = run(cli, mode).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let output = Output::new(mode);
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init { force } => {
            config::init_settings(&cwd, force)?;
            output.success(&format!("Created {}", config::SETTINGS_FILENAME));
            Ok(())
        }
        Commands::Deploy {
            target,
            file,
            timeout_minutes,
        } => {
            let mut settings = load_settings(cli.config.as_deref(), &cwd)?;
            if let Some(minutes) = timeout_minutes {
                settings.publish.timeout = Duration::from_secs(minutes.saturating_mul(60));
            }
            let config = Config::from_env(&target.into_inputs(file), settings)?;
            commands::deploy(config, output).await
        }
        Commands::Status { target } => {
            let settings = load_settings(cli.config.as_deref(), &cwd)?;
            let connection = Connection::from_env(&target.into_inputs(None), settings)?;
            commands::status(connection, output).await
        }
    }
}

/// Explicit `--config` file, or whatever is discovered in `cwd`.
fn load_settings(path: Option<&Path>, cwd: &Path) -> Result<Settings> {
    match path {
        Some(path) => Settings::load(path),
        None => Settings::discover(cwd),
    }
}
