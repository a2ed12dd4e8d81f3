//! sync
//!
//! Keep a local checkout pinned to a remote reference.
//!
//! # Components
//!
//! - [`RepositoryResetter`] - resolve a reference from local history and
//!   hard-reset the tree to it; never touches the network
//! - [`RepositorySynchronizer`] - fetch from a named remote first, then
//!   reset exactly like the resetter
//!
//! # Outcome Model
//!
//! Every step is fallible and the first failure ends the operation. The
//! `try_*` methods report which step failed through [`SyncError`]; the
//! boolean `reset` / `synchronize` forms collapse that to a single success
//! flag for callers whose only policy is "the tree is not synchronized".
//!
//! Resources are scoped: the remote is disconnected before resolution,
//! the resolved commit is released before the repository handle, and all
//! of them are released on every exit path.
//!
//! # Concurrency
//!
//! Blocking and single-threaded. Synchronizing the same path from two
//! threads or processes at once is unsupported.

mod resetter;
mod synchronizer;

pub use resetter::RepositoryResetter;
pub use synchronizer::RepositorySynchronizer;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::config::TreeSection;
use crate::core::types::{Oid, ReferenceName, RemoteName};
use crate::git::{Git, GitError};

/// Why a reset or synchronize operation failed.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The path has no valid checkout. Expected on first run.
    #[error("no repository at {path}")]
    NotARepository {
        /// The checked path
        path: PathBuf,
    },

    /// The remote is missing from the repository's configuration.
    #[error("remote '{remote}' is not configured")]
    RemoteNotConfigured {
        /// The remote name
        remote: String,
    },

    /// The remote could not be reached.
    #[error("remote '{remote}' is unreachable")]
    RemoteUnreachable {
        /// The remote name
        remote: String,
        /// Backend diagnostic
        #[source]
        source: GitError,
    },

    /// The transfer failed after connecting.
    #[error("transfer from '{remote}' failed")]
    TransferFailed {
        /// The remote name
        remote: String,
        /// Backend diagnostic
        #[source]
        source: GitError,
    },

    /// The reference does not exist in local history.
    #[error("reference '{reference}' cannot be resolved")]
    UnresolvableReference {
        /// The reference name
        reference: String,
    },

    /// Writing the working tree failed; it may be partially modified.
    #[error("reset to '{reference}' failed")]
    ResetFailed {
        /// The reference being reset to
        reference: String,
        /// Backend diagnostic
        #[source]
        source: GitError,
    },

    /// The reference or remote name given by the caller is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Any other backend failure.
    #[error(transparent)]
    Backend(#[from] GitError),
}

impl SyncError {
    /// True when the tree has never been initialized at this path.
    pub fn is_not_a_repository(&self) -> bool {
        matches!(self, SyncError::NotARepository { .. })
    }
}

/// A local working tree bound to the remote reference it tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedTree {
    /// Display name (e.g. "runtime", "app")
    pub name: String,
    /// Root of the checkout
    pub path: PathBuf,
    /// Remote to fetch from
    pub remote: RemoteName,
    /// Reference the tree is reset to
    pub reference: ReferenceName,
    /// Clone source used only when the checkout is missing
    pub bootstrap_url: Option<String>,
}

impl From<TreeSection> for TrackedTree {
    fn from(section: TreeSection) -> Self {
        Self {
            name: section.name,
            path: section.path,
            remote: section.remote.unwrap_or_else(RemoteName::origin),
            reference: section.reference,
            bootstrap_url: section.url,
        }
    }
}

/// Open the checkout rooted at `path`.
pub(crate) fn open_checkout(path: &Path) -> Result<Git, SyncError> {
    Git::open(path).map_err(|e| match e {
        GitError::NotARepo { path } => SyncError::NotARepository { path },
        GitError::BareRepo => SyncError::NotARepository {
            path: path.to_path_buf(),
        },
        other => SyncError::Backend(other),
    })
}

/// Resolve `reference` and hard-reset the checkout to it.
///
/// The reset only starts after resolution succeeded, so an unresolvable
/// reference leaves the working tree untouched.
pub(crate) fn reset_checkout(
    git: &Git,
    reference: &ReferenceName,
) -> Result<Oid, SyncError> {
    let target = git
        .resolve_reference(reference.as_str())
        .map_err(|e| match e {
            GitError::RefNotFound { .. } => SyncError::UnresolvableReference {
                reference: reference.to_string(),
            },
            other => SyncError::Backend(other),
        })?;

    git.hard_reset(&target)
        .map_err(|source| SyncError::ResetFailed {
            reference: reference.to_string(),
            source,
        })?;

    Ok(target)
}
