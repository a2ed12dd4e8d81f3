//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Oid`] - Git object identifier (SHA) of a resolved revision
//! - [`ReferenceName`] - Symbolic reference a tree tracks (e.g. `origin/master`)
//! - [`RemoteName`] - Name of a configured remote (e.g. `origin`)
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, so a tree configuration with a malformed
//! reference is rejected when the config is loaded rather than when the
//! first fetch runs.
//!
//! # Examples
//!
//! ```
//! use relaunch::core::types::{Oid, ReferenceName, RemoteName};
//!
//! let reference = ReferenceName::new("origin/production").unwrap();
//! let remote = RemoteName::new("origin").unwrap();
//! let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
//!
//! assert!(ReferenceName::new("origin/../master").is_err());
//! assert!(RemoteName::new("has/slash").is_err());
//! assert!(Oid::new("not-a-sha").is_err());
//! # let _ = (reference, remote, oid);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid reference name: {0}")]
    InvalidReferenceName(String),

    #[error("invalid remote name: {0}")]
    InvalidRemoteName(String),
}

/// A Git object identifier.
///
/// Stored as a lowercase hex string. Both SHA-1 (40 chars) and SHA-256
/// (64 chars) object formats are accepted.
///
/// # Example
///
/// ```
/// use relaunch::core::types::Oid;
///
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
/// assert_eq!(oid.short(7), "abc123d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id.
    ///
    /// The OID is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a valid hex OID.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        Self::validate(&oid)?;
        Ok(Self(oid))
    }

    /// Get an abbreviated form of the OID.
    ///
    /// Returns the first `len` characters. If `len` exceeds the OID length,
    /// returns the full OID.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    fn validate(oid: &str) -> Result<(), TypeError> {
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A symbolic reference that a tracked tree is reset to.
///
/// Accepts the forms Git's rev-parse understands for refs: short
/// remote-tracking names (`origin/master`), full names
/// (`refs/remotes/origin/master`) and local branch names. The name must
/// satisfy Git's refname rules (see `git check-ref-format`).
///
/// # Example
///
/// ```
/// use relaunch::core::types::ReferenceName;
///
/// let name = ReferenceName::new("origin/master").unwrap();
/// assert_eq!(name.as_str(), "origin/master");
///
/// assert!(ReferenceName::new("").is_err());
/// assert!(ReferenceName::new("origin/master.lock").is_err());
/// assert!(ReferenceName::new("has space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferenceName(String);

impl ReferenceName {
    /// Create a new validated reference name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidReferenceName` if the name violates Git's
    /// refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        let invalid = |msg: &str| Err(TypeError::InvalidReferenceName(msg.to_string()));

        if name.is_empty() {
            return invalid("reference name cannot be empty");
        }
        if name == "@" {
            return invalid("reference name cannot be '@'");
        }
        if name.starts_with('/') || name.ends_with('/') {
            return invalid("reference name cannot start or end with '/'");
        }
        if name.ends_with('.') || name.ends_with(".lock") {
            return invalid("reference name cannot end with '.' or '.lock'");
        }
        if name.contains("..") {
            return invalid("reference name cannot contain '..'");
        }
        if name.contains("@{") {
            return invalid("reference name cannot contain '@{'");
        }
        if name.contains("//") {
            return invalid("reference name cannot contain '//'");
        }

        const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(TypeError::InvalidReferenceName(format!(
                "reference name cannot contain '{c}'"
            )));
        }
        if name.chars().any(|c| c.is_ascii_control()) {
            return invalid("reference name cannot contain control characters");
        }

        for component in name.split('/') {
            if component.starts_with('.') {
                return invalid("path component cannot start with '.'");
            }
            if component.ends_with(".lock") {
                return invalid("path component cannot end with '.lock'");
            }
        }

        Ok(())
    }

    /// Get the reference name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ReferenceName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ReferenceName> for String {
    fn from(name: ReferenceName) -> Self {
        name.0
    }
}

impl AsRef<str> for ReferenceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReferenceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name of a remote in a repository's local configuration.
///
/// A single refname component: no slashes, no whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteName(String);

impl RemoteName {
    /// Create a new validated remote name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidRemoteName` for empty names, names with
    /// `/`, whitespace or control characters, and names starting with `.`
    /// or `-`.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::InvalidRemoteName(
                "remote name cannot be empty".into(),
            ));
        }
        if name.starts_with('.') || name.starts_with('-') {
            return Err(TypeError::InvalidRemoteName(format!(
                "remote name cannot start with '{}'",
                &name[..1]
            )));
        }
        if name
            .chars()
            .any(|c| c == '/' || c.is_whitespace() || c.is_ascii_control())
        {
            return Err(TypeError::InvalidRemoteName(format!(
                "'{name}' must be a single name without '/' or whitespace"
            )));
        }
        Ok(Self(name))
    }

    /// The conventional default remote.
    pub fn origin() -> Self {
        Self("origin".to_string())
    }

    /// Get the remote name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RemoteName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RemoteName> for String {
    fn from(name: RemoteName) -> Self {
        name.0
    }
}

impl AsRef<str> for RemoteName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RemoteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod oid {
        use super::*;

        #[test]
        fn normalizes_to_lowercase() {
            let oid = Oid::new("ABCDEF0123456789ABCDEF0123456789ABCDEF01").unwrap();
            assert_eq!(oid.as_str(), "abcdef0123456789abcdef0123456789abcdef01");
        }

        #[test]
        fn accepts_sha256() {
            assert!(Oid::new("a".repeat(64)).is_ok());
        }

        #[test]
        fn rejects_wrong_length() {
            assert!(matches!(Oid::new("abc123"), Err(TypeError::InvalidOid(_))));
        }

        #[test]
        fn rejects_non_hex() {
            assert!(Oid::new("g".repeat(40)).is_err());
        }

        #[test]
        fn short_clamps_to_length() {
            let oid = Oid::new("a".repeat(40)).unwrap();
            assert_eq!(oid.short(7), "aaaaaaa");
            assert_eq!(oid.short(100).len(), 40);
        }

        #[test]
        fn serde_rejects_invalid() {
            let result = toml::from_str::<Wrapper<Oid>>("v = \"nope\"");
            assert!(result.is_err());
        }
    }

    mod reference_name {
        use super::*;

        #[test]
        fn accepts_common_forms() {
            for name in [
                "origin/master",
                "origin/production",
                "refs/remotes/origin/master",
                "master",
                "release/v1.2",
            ] {
                assert!(ReferenceName::new(name).is_ok(), "{name} should be valid");
            }
        }

        #[test]
        fn rejects_invalid_forms() {
            for name in [
                "",
                "@",
                "/origin",
                "origin/",
                "origin/master.",
                "origin/master.lock",
                "origin/../master",
                "origin//master",
                "master@{1}",
                "has space",
                "a~1",
                "a^",
                "a:b",
                "a*",
                "origin/.hidden",
            ] {
                assert!(
                    ReferenceName::new(name).is_err(),
                    "{name:?} should be rejected"
                );
            }
        }

        #[test]
        fn display_matches_input() {
            let name = ReferenceName::new("origin/production").unwrap();
            assert_eq!(name.to_string(), "origin/production");
        }
    }

    mod remote_name {
        use super::*;

        #[test]
        fn origin_is_valid() {
            assert_eq!(RemoteName::origin(), RemoteName::new("origin").unwrap());
        }

        #[test]
        fn rejects_slashes_and_whitespace() {
            assert!(RemoteName::new("a/b").is_err());
            assert!(RemoteName::new("a b").is_err());
            assert!(RemoteName::new("").is_err());
            assert!(RemoteName::new("-x").is_err());
            assert!(RemoteName::new(".x").is_err());
        }
    }

    #[derive(Debug, Deserialize)]
    struct Wrapper<T> {
        #[allow(dead_code)]
        v: T,
    }
}
