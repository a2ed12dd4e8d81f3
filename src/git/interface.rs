//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to all Git operations in
//! relaunch. All repository access flows through [`Git`], which normalizes
//! libgit2 failures into typed [`GitError`] categories.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Path is not itself a checkout
//! - [`GitError::RemoteNotFound`]: Remote missing from local configuration
//! - [`GitError::ConnectFailed`]: Remote could not be reached
//! - [`GitError::FetchFailed`]: Transfer aborted after connecting
//! - [`GitError::RefNotFound`]: Reference does not resolve to a commit
//! - [`GitError::ResetFailed`]: Working tree could not be written
//!
//! # Example
//!
//! ```ignore
//! use relaunch::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("runtime"))?;
//! git.fetch("origin", &mut |p| println!("{p}"))?;
//! let oid = git.resolve_reference("origin/master")?;
//! git.hard_reset(&oid)?;
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::progress::TransferProgress;
use crate::core::types::{Oid, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Path does not contain a repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was checked
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Reference does not resolve to a commit.
    #[error("reference not found: {refname}")]
    RefNotFound {
        /// The reference that was not found
        refname: String,
    },

    /// Remote is not configured in the repository.
    #[error("remote not configured: {name}")]
    RemoteNotFound {
        /// The remote name
        name: String,
    },

    /// Connecting to the remote failed.
    #[error("cannot connect to remote '{remote}': {message}")]
    ConnectFailed {
        /// The remote name
        remote: String,
        /// libgit2 diagnostic
        message: String,
    },

    /// Object transfer failed after connecting.
    #[error("fetch from '{remote}' failed: {message}")]
    FetchFailed {
        /// The remote name
        remote: String,
        /// libgit2 diagnostic
        message: String,
    },

    /// Writing the index or working tree failed.
    #[error("hard reset to {target} failed: {message}")]
    ResetFailed {
        /// The revision being checked out
        target: String,
        /// libgit2 diagnostic
        message: String,
    },

    /// Cloning a new checkout failed.
    #[error("clone of '{url}' failed: {message}")]
    CloneFailed {
        /// The source URL
        url: String,
        /// libgit2 diagnostic
        message: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Permission or lock error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound
            | git2::ErrorCode::InvalidSpec
            | git2::ErrorCode::Ambiguous => GitError::RefNotFound {
                refname: context.to_string(),
            },
            git2::ErrorCode::Locked => GitError::AccessError {
                message: format!("repository is locked: {}", err.message()),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            other => GitError::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// Information about a Git repository.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// Path to .git directory
    pub git_dir: PathBuf,
    /// Path to working directory
    pub work_dir: PathBuf,
}

/// Summary of working tree status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeStatus {
    /// Number of staged changes
    pub staged: usize,
    /// Number of unstaged changes to tracked files
    pub unstaged: usize,
    /// Number of untracked files (if requested)
    pub untracked: usize,
    /// Whether there are unresolved conflicts
    pub has_conflicts: bool,
}

impl WorktreeStatus {
    /// Check if tracked content matches HEAD (untracked files are ignored).
    pub fn is_clean(&self) -> bool {
        self.staged == 0 && self.unstaged == 0 && !self.has_conflicts
    }
}

/// The Git interface.
///
/// An exclusively-owned handle to one local checkout. The underlying
/// libgit2 repository is released when the value is dropped; callers must
/// not open two handles on the same path concurrently for mutation.
pub struct Git {
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open the repository rooted exactly at `path`.
    ///
    /// Parent directories are not searched: a tree nested inside another
    /// checkout must be a checkout itself. Probing a missing path creates
    /// nothing on disk.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if `path` is not a repository
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::open(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    /// Clone `url` into `dest`, reporting transfer progress.
    ///
    /// The remote is created under `remote_name` so later fetches by that
    /// name work. Used only for first-run bootstrap; `dest` must be absent
    /// or empty.
    pub fn clone_into(
        url: &str,
        dest: &Path,
        remote_name: &str,
        on_progress: &mut dyn FnMut(TransferProgress),
    ) -> Result<Self, GitError> {
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.transfer_progress(|stats| {
            on_progress(TransferProgress::from(stats));
            true
        });

        let mut fo = git2::FetchOptions::new();
        fo.remote_callbacks(callbacks);
        fo.download_tags(git2::AutotagOption::Unspecified);
        fo.update_fetchhead(true);

        let mut builder = git2::build::RepoBuilder::new();
        builder.fetch_options(fo);
        builder.remote_create(|repo, _name, url| repo.remote(remote_name, url));

        let repo = builder
            .clone(url, dest)
            .map_err(|e| GitError::CloneFailed {
                url: url.to_string(),
                message: e.message().to_string(),
            })?;

        Ok(Self { repo })
    }

    /// Get repository information (git_dir and work_dir paths).
    pub fn info(&self) -> Result<RepoInfo, GitError> {
        let git_dir = self.repo.path().to_path_buf();
        let work_dir = self.repo.workdir().ok_or(GitError::BareRepo)?.to_path_buf();

        Ok(RepoInfo { git_dir, work_dir })
    }

    // =========================================================================
    // Revision Resolution
    // =========================================================================

    /// Resolve a reference to the commit it currently points at.
    ///
    /// Accepts anything rev-parse understands that peels to a commit:
    /// `origin/master`, `refs/remotes/origin/master`, `master`, or a
    /// revision id. The result is a point-in-time snapshot.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if the reference is absent or does not
    ///   name a commit
    pub fn resolve_reference(&self, refname: &str) -> Result<Oid, GitError> {
        let object = self
            .repo
            .revparse_single(refname)
            .map_err(|e| GitError::from_git2(e, refname))?;

        let commit = object.peel_to_commit().map_err(|_| GitError::RefNotFound {
            refname: refname.to_string(),
        })?;

        Ok(Oid::new(commit.id().to_string())?)
    }

    /// Resolve a reference, returning None if it doesn't exist.
    pub fn try_resolve_reference(&self, refname: &str) -> Result<Option<Oid>, GitError> {
        match self.resolve_reference(refname) {
            Ok(oid) => Ok(Some(oid)),
            Err(GitError::RefNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Get HEAD commit OID.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if HEAD is unborn (new repository)
    pub fn head_oid(&self) -> Result<Oid, GitError> {
        let head = self
            .repo
            .head()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        let oid = head
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?
            .id();

        Ok(Oid::new(oid.to_string())?)
    }

    // =========================================================================
    // Hard Reset
    // =========================================================================

    /// Force the index and working tree to match `target` exactly.
    ///
    /// Moves the current branch (or detached HEAD) to `target`. Tracked
    /// modifications and staged changes are discarded; untracked files are
    /// left in place.
    ///
    /// # Errors
    ///
    /// - [`GitError::ResetFailed`] if the commit is missing or the working
    ///   tree cannot be written. The tree may be partially updated.
    pub fn hard_reset(&self, target: &Oid) -> Result<(), GitError> {
        let reset_failed = |e: git2::Error| GitError::ResetFailed {
            target: target.to_string(),
            message: e.message().to_string(),
        };

        let oid = git2::Oid::from_str(target.as_str()).map_err(reset_failed)?;
        let commit = self.repo.find_commit(oid).map_err(reset_failed)?;

        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.force();

        self.repo
            .reset(commit.as_object(), git2::ResetType::Hard, Some(&mut checkout))
            .map_err(reset_failed)
    }

    // =========================================================================
    // Working Tree Status
    // =========================================================================

    /// Get working tree status summary.
    ///
    /// If `include_untracked` is false, untracked files are not counted.
    pub fn worktree_status(&self, include_untracked: bool) -> Result<WorktreeStatus, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(include_untracked)
            .include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })?;

        let mut result = WorktreeStatus::default();

        for entry in statuses.iter() {
            let status = entry.status();

            if status.is_conflicted() {
                result.has_conflicts = true;
            }

            if status.is_index_new()
                || status.is_index_modified()
                || status.is_index_deleted()
                || status.is_index_renamed()
                || status.is_index_typechange()
            {
                result.staged += 1;
            }

            if status.is_wt_modified()
                || status.is_wt_deleted()
                || status.is_wt_renamed()
                || status.is_wt_typechange()
            {
                result.unstaged += 1;
            }

            if status.is_wt_new() {
                result.untracked += 1;
            }
        }

        Ok(result)
    }

    // =========================================================================
    // Remote Operations
    // =========================================================================

    /// Get the URL for a remote.
    ///
    /// Returns `None` if the remote doesn't exist.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>, GitError> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::Internal {
                message: e.message().to_string(),
            }),
        }
    }

    /// Fetch everything the remote's configured refspecs advertise.
    ///
    /// Runs the full remote lifecycle on the calling thread: load the
    /// remote from local configuration, connect in fetch direction,
    /// download missing objects while sampling progress, update the
    /// remote-tracking refs, and disconnect. `on_progress` observes every
    /// libgit2 progress event and cannot abort the transfer.
    ///
    /// # Errors
    ///
    /// - [`GitError::RemoteNotFound`] if the remote is not configured
    /// - [`GitError::ConnectFailed`] if the remote cannot be reached
    /// - [`GitError::FetchFailed`] if the transfer fails after connecting
    pub fn fetch(
        &self,
        remote_name: &str,
        on_progress: &mut dyn FnMut(TransferProgress),
    ) -> Result<(), GitError> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound || e.class() == git2::ErrorClass::Config {
                GitError::RemoteNotFound {
                    name: remote_name.to_string(),
                }
            } else {
                GitError::Internal {
                    message: e.message().to_string(),
                }
            }
        })?;

        remote
            .connect(git2::Direction::Fetch)
            .map_err(|e| GitError::ConnectFailed {
                remote: remote_name.to_string(),
                message: e.message().to_string(),
            })?;

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.transfer_progress(|stats| {
            on_progress(TransferProgress::from(stats));
            true
        });

        let mut fo = git2::FetchOptions::new();
        fo.remote_callbacks(callbacks);
        fo.download_tags(git2::AutotagOption::Unspecified);
        fo.update_fetchhead(true);

        let fetched = remote.fetch(&[] as &[&str], Some(&mut fo), None);

        // Disconnect on both paths; the fetch result decides the outcome.
        let disconnected = remote.disconnect();

        fetched.map_err(|e| GitError::FetchFailed {
            remote: remote_name.to_string(),
            message: e.message().to_string(),
        })?;
        disconnected.map_err(|e| GitError::Internal {
            message: format!("disconnect from '{}': {}", remote_name, e.message()),
        })
    }
}
