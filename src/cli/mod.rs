//! cli
//!
//! Command-line interface layer for Relaunch.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers translate configuration into
//! [`crate::launcher`] and [`crate::sync`] calls and turn their results
//! into an exit code.

pub mod args;
pub mod commands;

pub use args::{Cli, Command};

use anyhow::{Context as _, Result};

use crate::core::config::{Config, ConfigSources};
use crate::ui::output::{self, Verbosity};

/// Run the CLI application and return the process exit code.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<i32> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    let loaded = Config::load(&base_dir, &ConfigSources::from_env(cli.config))?;
    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }
    match loaded.config.loaded_from() {
        Some(path) => output::debug(format!("config: {}", path.display()), verbosity),
        None => output::debug("config: built-in defaults", verbosity),
    }

    let ctx = commands::Context {
        config: loaded.config,
        verbosity,
    };

    commands::dispatch(cli.command.unwrap_or(Command::Launch), &ctx)
}
