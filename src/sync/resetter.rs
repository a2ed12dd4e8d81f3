//! sync::resetter
//!
//! Re-track a known reference using only local history.

use std::path::Path;

use super::{open_checkout, reset_checkout, SyncError};
use crate::core::types::{Oid, ReferenceName};

/// Hard-resets a checkout to a reference that is already present locally.
///
/// Never contacts a remote, so it is safe to run on every startup
/// regardless of network availability.
///
/// # Example
///
/// ```ignore
/// use relaunch::sync::RepositoryResetter;
///
/// if !RepositoryResetter::new().reset(Path::new("src"), "origin/production") {
///     // tree missing or reference never fetched: run a full synchronize
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RepositoryResetter;

impl RepositoryResetter {
    /// Create a resetter.
    pub fn new() -> Self {
        Self
    }

    /// Resolve `reference` locally and hard-reset the checkout at `path`.
    ///
    /// Returns the revision the tree now matches.
    ///
    /// # Errors
    ///
    /// - [`SyncError::NotARepository`] if `path` has no checkout
    /// - [`SyncError::UnresolvableReference`] if the reference is absent
    /// - [`SyncError::ResetFailed`] if the working tree cannot be written
    pub fn try_reset(&self, path: &Path, reference: &ReferenceName) -> Result<Oid, SyncError> {
        let git = open_checkout(path)?;
        reset_checkout(&git, reference)
    }

    /// Boolean form of [`try_reset`](Self::try_reset).
    ///
    /// A malformed reference name is a failure like any other.
    pub fn reset(&self, path: &Path, reference: &str) -> bool {
        ReferenceName::new(reference)
            .map_err(|e| SyncError::InvalidArgument(e.to_string()))
            .and_then(|reference| self.try_reset(path, &reference))
            .is_ok()
    }
}
