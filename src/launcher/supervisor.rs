//! launcher::supervisor
//!
//! Decide when to reset, synchronize, bootstrap, relaunch and rescue.
//!
//! # Policy
//!
//! 1. Startup: every tree gets a local reset. A tree that cannot be reset
//!    (missing checkout, reference never fetched) gets a full synchronize,
//!    preceded by a clone when the checkout is missing and a bootstrap URL
//!    is configured.
//! 2. Launch: spawn the program and wait.
//! 3. Repair: a non-zero exit triggers a full synchronize of every tree
//!    followed by exactly one relaunch.
//! 4. Rescue: if the relaunch still fails, the rescue command runs.
//!
//! Tree failures are reported and never stop the launch.

use std::fs;
use std::path::Path;

use super::process::{LaunchCommand, ProcessRunner, SPAWN_FAILURE_EXIT_CODE};
use crate::core::config::Config;
use crate::core::types::Oid;
use crate::git::{Git, TransferProgress};
use crate::sync::{RepositoryResetter, RepositorySynchronizer, SyncError, TrackedTree};
use crate::ui::output::{self, Verbosity};

/// How a tree reached its final state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeAction {
    /// Reset to locally known history
    Reset,
    /// Fetched and reset
    Synchronized,
    /// Cloned, then fetched and reset
    Bootstrapped,
}

/// Result of bringing one tree up to date.
#[derive(Debug)]
pub struct TreeReport {
    /// Tree name
    pub name: String,
    /// Revision and action on success; the last failure otherwise
    pub result: Result<(TreeAction, Oid), SyncError>,
}

impl TreeReport {
    /// Whether the tree ended up synchronized.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// What happened during a supervised launch.
#[derive(Debug)]
pub struct LaunchOutcome {
    /// Exit code of the last program run; the launcher's own exit code
    pub exit_code: i32,
    /// Startup tree reports
    pub prepared: Vec<TreeReport>,
    /// Repair tree reports, present when the first run failed
    pub repaired: Option<Vec<TreeReport>>,
    /// Whether the rescue command ran
    pub rescued: bool,
}

impl LaunchOutcome {
    /// Whether the program was relaunched after a repair.
    pub fn retried(&self) -> bool {
        self.repaired.is_some()
    }
}

/// Orchestrates tree synchronization around a supervised program.
#[derive(Debug)]
pub struct LaunchSupervisor<R: ProcessRunner> {
    trees: Vec<TrackedTree>,
    command: LaunchCommand,
    rescue: Option<LaunchCommand>,
    runner: R,
    resetter: RepositoryResetter,
    synchronizer: RepositorySynchronizer,
    verbosity: Verbosity,
}

impl<R: ProcessRunner> LaunchSupervisor<R> {
    /// Create a supervisor for `trees` around `command`.
    pub fn new(trees: Vec<TrackedTree>, command: LaunchCommand, runner: R) -> Self {
        Self {
            trees,
            command,
            rescue: None,
            runner,
            resetter: RepositoryResetter::new(),
            synchronizer: RepositorySynchronizer::default(),
            verbosity: Verbosity::Normal,
        }
    }

    /// Create a supervisor from loaded configuration.
    pub fn from_config(config: &Config, runner: R, verbosity: Verbosity) -> Self {
        let trees = config.trees().into_iter().map(TrackedTree::from).collect();
        Self::new(trees, LaunchCommand::from_config(config), runner)
            .with_rescue(LaunchCommand::rescue_from_config(config))
            .with_synchronizer(RepositorySynchronizer::new(config.progress_interval()))
            .with_verbosity(verbosity)
    }

    /// Set the command run when the repaired relaunch fails.
    pub fn with_rescue(mut self, rescue: Option<LaunchCommand>) -> Self {
        self.rescue = rescue;
        self
    }

    /// Replace the synchronizer (and its progress throttle).
    pub fn with_synchronizer(mut self, synchronizer: RepositorySynchronizer) -> Self {
        self.synchronizer = synchronizer;
        self
    }

    /// Set output verbosity.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// The process runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Bring every tree to its reference, preferring local history.
    pub fn prepare(&mut self) -> Vec<TreeReport> {
        let trees = self.trees.clone();
        trees.iter().map(|tree| self.prepare_tree(tree)).collect()
    }

    /// Fetch and reset every tree.
    pub fn repair(&mut self) -> Vec<TreeReport> {
        let trees = self.trees.clone();
        trees
            .iter()
            .map(|tree| {
                let result = self
                    .synchronize(tree)
                    .map(|oid| (TreeAction::Synchronized, oid));
                self.report(tree, result)
            })
            .collect()
    }

    /// Prepare, run, and repair-then-retry once on failure.
    pub fn launch(&mut self) -> LaunchOutcome {
        let prepared = self.prepare();

        let exit_code = self.run_program();
        if exit_code == 0 {
            return LaunchOutcome {
                exit_code,
                prepared,
                repaired: None,
                rescued: false,
            };
        }

        output::warn(
            format!("{} exited with code {exit_code}; repairing", self.command),
            self.verbosity,
        );
        let repaired = self.repair();

        let exit_code = self.run_program();
        let rescued = exit_code != 0 && self.run_rescue();

        LaunchOutcome {
            exit_code,
            prepared,
            repaired: Some(repaired),
            rescued,
        }
    }

    fn prepare_tree(&mut self, tree: &TrackedTree) -> TreeReport {
        let result = match self.resetter.try_reset(&tree.path, &tree.reference) {
            Ok(oid) => Ok((TreeAction::Reset, oid)),
            Err(err) => {
                if err.is_not_a_repository() {
                    output::debug(
                        format!("{}: no checkout at {}", tree.name, tree.path.display()),
                        self.verbosity,
                    );
                } else {
                    output::debug(format!("{}: local reset failed: {err}", tree.name), self.verbosity);
                }
                self.initialize(tree, &err)
            }
        };

        self.report(tree, result)
    }

    /// Full synchronize, cloning first when the checkout is missing.
    fn initialize(
        &mut self,
        tree: &TrackedTree,
        reset_error: &SyncError,
    ) -> Result<(TreeAction, Oid), SyncError> {
        let url = match &tree.bootstrap_url {
            Some(url) if reset_error.is_not_a_repository() && is_vacant(&tree.path) => url,
            _ => {
                return self
                    .synchronize(tree)
                    .map(|oid| (TreeAction::Synchronized, oid))
            }
        };

        output::print(
            format!("{}: cloning {} into {}", tree.name, url, tree.path.display()),
            self.verbosity,
        );
        let verbosity = self.verbosity;
        let throttle = self.synchronizer.throttle_mut();
        Git::clone_into(url, &tree.path, tree.remote.as_str(), &mut |p| {
            throttle.observe(&p, &mut |p: &TransferProgress| output::print(p, verbosity))
        })?;

        self.synchronize(tree)
            .map(|oid| (TreeAction::Bootstrapped, oid))
    }

    fn synchronize(&mut self, tree: &TrackedTree) -> Result<Oid, SyncError> {
        output::print(
            format!("{}: updating from {} ({})", tree.name, tree.remote, tree.reference),
            self.verbosity,
        );
        let verbosity = self.verbosity;
        self.synchronizer
            .synchronize_tree(tree, &mut |p| output::print(p, verbosity))
    }

    fn report(&self, tree: &TrackedTree, result: Result<(TreeAction, Oid), SyncError>) -> TreeReport {
        match &result {
            Ok((action, oid)) => output::debug(
                format!("{}: {:?} at {}", tree.name, action, oid.short(7)),
                self.verbosity,
            ),
            Err(err) => output::warn(
                format!("{}: not synchronized: {err}", tree.name),
                self.verbosity,
            ),
        }

        TreeReport {
            name: tree.name.clone(),
            result,
        }
    }

    fn run_program(&mut self) -> i32 {
        output::debug(format!("launching {}", self.command), self.verbosity);
        match self.runner.run(&self.command) {
            Ok(code) => code,
            Err(err) => {
                output::warn(err, self.verbosity);
                SPAWN_FAILURE_EXIT_CODE
            }
        }
    }

    /// Run the rescue command, if any. Returns whether it ran.
    fn run_rescue(&mut self) -> bool {
        let Some(rescue) = self.rescue.clone() else {
            return false;
        };

        output::warn(
            format!("relaunch failed; running rescue: {rescue}"),
            self.verbosity,
        );
        match self.runner.run(&rescue) {
            Ok(0) => {}
            Ok(code) => output::warn(format!("rescue exited with code {code}"), self.verbosity),
            Err(err) => output::warn(err, self.verbosity),
        }
        true
    }
}

/// True when `path` is absent or an empty directory.
fn is_vacant(path: &Path) -> bool {
    match fs::read_dir(path) {
        Ok(mut entries) => entries.next().is_none(),
        Err(_) => !path.exists(),
    }
}
