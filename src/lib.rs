//! Relaunch - keep a deployed program's source trees in sync with git
//!
//! Relaunch supervises a client program whose runtime and application code
//! live in git working trees. Before each start it forces every tree back
//! to its tracked reference; when the program exits abnormally it fetches
//! fresh history, resets again, and relaunches once.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to launcher)
//! - [`launcher`] - Supervised launch, repair and rescue policy
//! - [`sync`] - Local reset and fetch-then-reset of working trees
//! - [`git`] - Single interface for all Git operations
//! - [`core`] - Domain types and configuration
//! - [`ui`] - Output and verbosity
//!
//! # Invariants
//!
//! 1. A reset or synchronize never creates a repository where none existed
//! 2. A failed fetch never leads to a reset
//! 3. Untracked files survive every reset

pub mod cli;
pub mod core;
pub mod git;
pub mod launcher;
pub mod sync;
pub mod ui;
