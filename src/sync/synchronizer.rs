//! sync::synchronizer
//!
//! Fetch from a remote, then hard-reset to a reference.

use std::path::Path;
use std::time::Duration;

use super::{open_checkout, reset_checkout, SyncError, TrackedTree};
use crate::core::types::{Oid, ReferenceName, RemoteName};
use crate::git::{GitError, ProgressThrottle, TransferProgress};

/// Fetches a tree's remote and forcibly resets the tree to a reference.
///
/// The synchronizer owns the progress throttle, so consecutive calls on
/// the same value share one rate limit while separate synchronizers stay
/// independent.
///
/// No retry happens here. A failed fetch aborts the whole operation; the
/// tree is never reset to a reference that may be stale because the
/// transfer failed.
#[derive(Debug, Clone, Default)]
pub struct RepositorySynchronizer {
    throttle: ProgressThrottle,
}

impl RepositorySynchronizer {
    /// Create a synchronizer emitting progress at most once per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            throttle: ProgressThrottle::new(interval),
        }
    }

    /// The throttle shared by every fetch made through this synchronizer.
    pub fn throttle(&self) -> &ProgressThrottle {
        &self.throttle
    }

    /// Mutable access to the throttle, for transfers made outside
    /// [`try_synchronize`](Self::try_synchronize) (such as a bootstrap clone)
    /// that must share its rate limit.
    pub fn throttle_mut(&mut self) -> &mut ProgressThrottle {
        &mut self.throttle
    }

    /// Fetch `remote` into the checkout at `path`, then hard-reset it to
    /// `reference`.
    ///
    /// `on_progress` receives throttled transfer samples; it runs on the
    /// calling thread and cannot cancel the fetch.
    ///
    /// # Errors
    ///
    /// - [`SyncError::NotARepository`] if `path` has no checkout; none is
    ///   created
    /// - [`SyncError::RemoteNotConfigured`] if `remote` is unknown locally
    /// - [`SyncError::RemoteUnreachable`] if connecting fails
    /// - [`SyncError::TransferFailed`] if the fetch fails after connecting
    /// - [`SyncError::UnresolvableReference`] if the reference is absent
    ///   even after the fetch
    /// - [`SyncError::ResetFailed`] if the working tree cannot be written
    pub fn try_synchronize(
        &mut self,
        path: &Path,
        remote: &RemoteName,
        reference: &ReferenceName,
        on_progress: &mut dyn FnMut(&TransferProgress),
    ) -> Result<Oid, SyncError> {
        let git = open_checkout(path)?;

        let throttle = &mut self.throttle;
        git.fetch(remote.as_str(), &mut |progress| {
            throttle.observe(&progress, &mut *on_progress)
        })
        .map_err(|e| match e {
            GitError::RemoteNotFound { name } => SyncError::RemoteNotConfigured { remote: name },
            e @ GitError::ConnectFailed { .. } => SyncError::RemoteUnreachable {
                remote: remote.to_string(),
                source: e,
            },
            e => SyncError::TransferFailed {
                remote: remote.to_string(),
                source: e,
            },
        })?;

        reset_checkout(&git, reference)
    }

    /// Synchronize a configured tree.
    pub fn synchronize_tree(
        &mut self,
        tree: &TrackedTree,
        on_progress: &mut dyn FnMut(&TransferProgress),
    ) -> Result<Oid, SyncError> {
        self.try_synchronize(&tree.path, &tree.remote, &tree.reference, on_progress)
    }

    /// Boolean form of [`try_synchronize`](Self::try_synchronize).
    ///
    /// Progress lines go to standard output.
    pub fn synchronize(&mut self, path: &Path, remote: &str, reference: &str) -> bool {
        let remote = match RemoteName::new(remote) {
            Ok(r) => r,
            Err(_) => return false,
        };
        let reference = match ReferenceName::new(reference) {
            Ok(r) => r,
            Err(_) => return false,
        };

        self.try_synchronize(path, &remote, &reference, &mut |p| println!("{p}"))
            .is_ok()
    }
}
