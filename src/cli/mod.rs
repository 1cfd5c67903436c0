//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install logging and load the config
//! - Delegate to command handlers
//!
//! Handlers log every violation at ERROR. [`run`] returns how many ERROR
//! events were seen so the binary can pick its exit status.

pub mod args;
pub mod commands;

pub use args::{Cli, Command};

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::logging;

/// Execution context shared by command handlers.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub quiet: bool,
}

/// Run the CLI application.
///
/// Returns the number of errors reported. A returned `Err` is fatal: the
/// config or a corpus could not be loaded at all.
pub fn run() -> Result<usize> {
    let cli = Cli::parse_args();
    let counter = logging::init(cli.debug, cli.quiet);

    let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(source) = config.source() {
        tracing::debug!("Using config '{}'", source.display());
    }

    let ctx = Context {
        config,
        quiet: cli.quiet,
    };
    let name = cli.command.name();
    commands::dispatch(cli.command, &ctx)?;

    let errors = counter.count();
    if !ctx.quiet {
        if errors == 0 {
            println!("{}: no problems found", name);
        } else {
            println!("{}: {} errors reported", name, errors);
        }
    }
    Ok(errors)
}
