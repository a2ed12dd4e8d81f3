//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. All repository reads and
//! writes flow through this interface. No other module should import `git2`.
//! We use the `git2` crate exclusively (no shelling out to the git CLI), so
//! the launcher works on machines without a git installation.
//!
//! # Responsibilities
//!
//! - Opening a checkout at an exact path
//! - Remote connect / fetch / disconnect with transfer progress
//! - Reference resolution to a concrete revision
//! - Hard reset of index and working tree
//! - Clone for first-run bootstrap
//! - Working tree status for diagnostics
//!
//! # Example
//!
//! ```ignore
//! use relaunch::git::{Git, ProgressThrottle};
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("src"))?;
//! let mut throttle = ProgressThrottle::default();
//! git.fetch("origin", &mut |p| throttle.observe(&p, &mut |p| println!("{p}")))?;
//! git.hard_reset(&git.resolve_reference("origin/production")?)?;
//! ```

mod interface;
mod progress;

pub use interface::{Git, GitError, RepoInfo, WorktreeStatus};
pub use progress::{ProgressThrottle, TransferProgress};
