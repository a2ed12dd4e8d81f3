//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! progress_interval_ms = 500
//!
//! [launch]
//! program = "runtime/bin/python"
//! args = ["src/start_client.py"]
//!
//! [rescue]
//! program = "rescue.sh"
//!
//! [[tree]]
//! name = "runtime"
//! path = "runtime"
//! reference = "origin/master"
//! url = "https://example.com/runtime.git"
//!
//! [[tree]]
//! name = "app"
//! path = "src"
//! remote = "origin"
//! reference = "origin/production"
//! ```
//!
//! # Validation
//!
//! Remote and reference names are validated while parsing (see
//! [`crate::core::types`]). Cross-field rules run in [`LauncherConfig::validate`].

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::{ReferenceName, RemoteName};

/// Top-level launcher configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LauncherConfig {
    /// Minimum spacing between progress lines, in milliseconds
    pub progress_interval_ms: Option<u64>,

    /// Program to supervise
    pub launch: Option<LaunchSection>,

    /// Command run when the repaired relaunch still fails
    pub rescue: Option<RescueSection>,

    /// Tracked trees; replaces the built-in pair when present
    #[serde(rename = "tree")]
    pub trees: Option<Vec<TreeSection>>,
}

/// The `[launch]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LaunchSection {
    /// Executable, relative to the base directory unless absolute
    pub program: Option<PathBuf>,
    /// Arguments passed verbatim
    pub args: Option<Vec<String>>,
    /// Working directory for the child (defaults to the base directory)
    pub working_dir: Option<PathBuf>,
}

/// The `[rescue]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RescueSection {
    /// Executable, relative to the base directory unless absolute
    pub program: PathBuf,
    /// Arguments passed verbatim
    #[serde(default)]
    pub args: Vec<String>,
}

/// One `[[tree]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TreeSection {
    /// Display name, unique across trees
    pub name: String,
    /// Checkout root, relative to the base directory unless absolute
    pub path: PathBuf,
    /// Remote to fetch from (default "origin")
    pub remote: Option<RemoteName>,
    /// Reference the tree tracks
    pub reference: ReferenceName,
    /// Clone source for first-run bootstrap
    pub url: Option<String>,
}

impl LauncherConfig {
    /// Validate cross-field rules.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.progress_interval_ms == Some(0) {
            return Err(ConfigError::InvalidValue(
                "progress_interval_ms must be greater than zero".into(),
            ));
        }

        if let Some(program) = self.launch.as_ref().and_then(|l| l.program.as_ref()) {
            if program.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "launch.program cannot be empty".into(),
                ));
            }
        }

        if let Some(rescue) = &self.rescue {
            if rescue.program.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "rescue.program cannot be empty".into(),
                ));
            }
        }

        if let Some(trees) = &self.trees {
            if trees.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "at least one [[tree]] is required when the key is present".into(),
                ));
            }

            let mut seen = HashSet::new();
            for tree in trees {
                if tree.name.trim().is_empty() {
                    return Err(ConfigError::InvalidValue("tree name cannot be empty".into()));
                }
                if !seen.insert(tree.name.as_str()) {
                    return Err(ConfigError::InvalidValue(format!(
                        "duplicate tree name '{}'",
                        tree.name
                    )));
                }
                if tree.path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidValue(format!(
                        "tree '{}' has an empty path",
                        tree.name
                    )));
                }
                if matches!(&tree.url, Some(url) if url.trim().is_empty()) {
                    return Err(ConfigError::InvalidValue(format!(
                        "tree '{}' has an empty url",
                        tree.name
                    )));
                }
            }
        }

        Ok(())
    }
}
