mod args;
mod commands;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use thiserror::Error;

use crate::{config::load_config_with_path, logging::init_logging, ports::ClockPort};

use args::{Cli, Commands};

#[derive(Debug, Clone, Copy)]
pub(crate) struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> chrono::DateTime<Utc> {
        Utc::now()
    }
}

/// Returned by `once` when the session ended in an error, so the process
/// exits non-zero after the outcome has been printed.
#[derive(Debug, Error)]
#[error("poll failed")]
pub struct PollFailed;

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, log_file } => {
            if let Some(path) = log_file.as_deref() {
                init_logging(Some(path))?;
            }
            let loaded = load_config_with_path(config.as_deref())?;
            commands::run::run(loaded.config).await
        }
        Commands::Once { config, json } => {
            init_logging(None)?;
            let loaded = load_config_with_path(config.as_deref())?;
            commands::once::run(loaded, json).await
        }
        Commands::Init { path, force } => commands::init::run(path, force),
        Commands::Config { command } => commands::config::run(command),
    }
}
