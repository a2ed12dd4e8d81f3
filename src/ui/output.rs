//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! All user-visible logging goes through these helpers so the quiet and
//! debug flags are honoured consistently. Progress and status lines go to
//! stdout; warnings, errors and debug lines go to stderr.

use std::fmt::Display;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Quiet mode - errors only
    Quiet,
    /// Normal mode - standard output
    #[default]
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags. Quiet wins over debug.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }

    /// Whether non-error output should be shown.
    pub fn is_visible(self) -> bool {
        self != Verbosity::Quiet
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity.is_visible() {
        println!("{}", message);
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity.is_visible() {
        eprintln!("warning: {}", message);
    }
}

/// Print an error together with its source chain.
///
/// The chain is only shown in debug mode; normal mode prints the top-level
/// message alone.
pub fn error_chain(err: &(dyn std::error::Error + 'static), verbosity: Verbosity) {
    if verbosity != Verbosity::Debug {
        error(err);
        return;
    }

    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    error(message);
}
