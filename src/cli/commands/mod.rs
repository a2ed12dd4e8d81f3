//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Selects trees from the loaded configuration
//! 2. Calls into [`crate::sync`] or [`crate::launcher`]
//! 3. Formats output and returns an exit code
//!
//! Per-tree failures are reported and turned into a non-zero exit code;
//! only setup failures (bad arguments, unreadable config) are `Err`.

mod launch;
mod reset;
mod status;
mod sync;

pub use launch::launch;
pub use reset::reset;
pub use status::status;
pub use sync::sync;

use crate::cli::args::Command;
use crate::core::config::Config;
use crate::sync::TrackedTree;
use crate::ui::output::Verbosity;
use anyhow::Result;

/// Execution context shared by every handler.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration
    pub config: Config,
    /// Output verbosity
    pub verbosity: Verbosity,
}

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<i32> {
    match command {
        Command::Launch => launch::launch(ctx),
        Command::Sync { trees } => sync::sync(ctx, &trees),
        Command::Reset { trees } => reset::reset(ctx, &trees),
        Command::Status => status::status(ctx),
    }
}

/// Trees named on the command line, or every configured tree.
fn selected_trees(ctx: &Context, names: &[String]) -> Result<Vec<TrackedTree>> {
    Ok(ctx
        .config
        .select_trees(names)?
        .into_iter()
        .map(TrackedTree::from)
        .collect())
}
