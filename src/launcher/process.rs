//! launcher::process
//!
//! Spawning the supervised program.
//!
//! [`ProcessRunner`] is the seam between the supervisor's policy and the
//! operating system. [`SystemRunner`] spawns real processes; tests supply
//! scripted runners.

use std::fmt;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use super::LaunchError;
use crate::core::config::Config;

/// Exit code reported when the program could not be started at all.
pub const SPAWN_FAILURE_EXIT_CODE: i32 = 127;

/// A program invocation with resolved paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    /// Executable path
    pub program: PathBuf,
    /// Arguments passed verbatim
    pub args: Vec<String>,
    /// Working directory for the child
    pub working_dir: PathBuf,
}

impl LaunchCommand {
    /// The supervised program described by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            program: config.launch_program(),
            args: config.launch_args(),
            working_dir: config.launch_working_dir(),
        }
    }

    /// The rescue command described by `config`, run from the base directory.
    pub fn rescue_from_config(config: &Config) -> Option<Self> {
        config.rescue().map(|rescue| Self {
            program: rescue.program,
            args: rescue.args,
            working_dir: config.base_dir().to_path_buf(),
        })
    }
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs a command to completion and reports its exit code.
///
/// Implementations block until the child exits. One spawn, one wait.
pub trait ProcessRunner {
    /// Run `command` and return its exit code.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::Spawn`] if the process could not be started.
    fn run(&mut self, command: &LaunchCommand) -> Result<i32, LaunchError>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &mut R {
    fn run(&mut self, command: &LaunchCommand) -> Result<i32, LaunchError> {
        (**self).run(command)
    }
}

/// Spawns real processes with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&mut self, command: &LaunchCommand) -> Result<i32, LaunchError> {
        let status = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.working_dir)
            .status()
            .map_err(|source| LaunchError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        Ok(exit_code(status))
    }
}

/// Raw exit code, mapping signal termination to `128 + signal` on Unix.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
