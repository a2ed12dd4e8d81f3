//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--base-dir <path>`: Installation directory holding the trees
//! - `--config <file>`: Use this config file instead of searching
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Errors only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Relaunch - keep a program's git trees in sync and supervise it
#[derive(Parser, Debug)]
#[command(name = "relaunch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Installation directory; relative tree paths resolve against it
    #[arg(long, global = true, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Config file to use instead of the search path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Defaults to `launch`
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reset trees, run the program, repair and relaunch on failure
    #[command(
        long_about = "Reset every tree to its reference, then run the program.\n\n\
            Trees that cannot be reset from local history are fetched first. \
            If the program exits with a non-zero code, every tree is fetched \
            and reset and the program is started once more. If that run also \
            fails, the configured rescue command runs.",
        after_help = "\
EXAMPLES:
    # Start with the default layout in the current directory
    relaunch

    # Start an installation elsewhere
    relaunch --base-dir /opt/client launch"
    )]
    Launch,

    /// Fetch and hard-reset trees
    Sync {
        /// Trees to synchronize (default: all)
        #[arg(value_name = "TREE")]
        trees: Vec<String>,
    },

    /// Hard-reset trees to their reference without fetching
    Reset {
        /// Trees to reset (default: all)
        #[arg(value_name = "TREE")]
        trees: Vec<String>,
    },

    /// Show each tree's checkout state
    Status,
}
