//! launcher
//!
//! Supervised launch of the client program.
//!
//! # Modules
//!
//! - [`process`] - Spawning and waiting on the program
//! - [`supervisor`] - Reset, synchronize, relaunch and rescue policy
//!
//! # Example
//!
//! ```ignore
//! use relaunch::launcher::{LaunchSupervisor, SystemRunner};
//!
//! let mut supervisor = LaunchSupervisor::from_config(&config, SystemRunner, verbosity);
//! let outcome = supervisor.launch();
//! std::process::exit(outcome.exit_code);
//! ```

mod process;
mod supervisor;

pub use process::{LaunchCommand, ProcessRunner, SystemRunner, SPAWN_FAILURE_EXIT_CODE};
pub use supervisor::{LaunchOutcome, LaunchSupervisor, TreeAction, TreeReport};

use std::path::PathBuf;
use thiserror::Error;

/// Errors from starting the supervised program.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The program could not be spawned.
    #[error("failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
