//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! Searched in order; the first file found wins:
//! 1. `--config <path>` (must exist)
//! 2. `$RELAUNCH_CONFIG` if set
//! 3. `<base-dir>/relaunch.toml`
//! 4. `$XDG_CONFIG_HOME/relaunch/config.toml`
//! 5. `~/.relaunch/config.toml`
//!
//! With no file, built-in defaults describe the standard layout: a
//! `runtime` tree tracking `origin/master` and an `app` tree at `src`
//! tracking `origin/production`.
//!
//! # Paths
//!
//! Relative tree paths, program paths and working directories resolve
//! against the base directory (the launcher's install root), never the
//! process's current directory. A bare program name such as `sh` is left
//! alone and found on `PATH` at spawn time.
//!
//! # Example
//!
//! ```no_run
//! use relaunch::core::config::{Config, ConfigSources};
//! use std::path::Path;
//!
//! let base = Path::new("/opt/game");
//! let result = Config::load(base, &ConfigSources::from_env(None)).unwrap();
//! for tree in result.config.trees() {
//!     println!("{} -> {}", tree.name, tree.reference);
//! }
//! ```

pub mod schema;

pub use schema::{LaunchSection, LauncherConfig, RescueSection, TreeSection};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::core::types::{ReferenceName, RemoteName};

/// Default minimum spacing between progress lines.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// File name looked up in the base directory.
pub const BASE_DIR_CONFIG_NAME: &str = "relaunch.toml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config file '{path}': {message}")]
    InvalidFile { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Candidate config locations, resolved from flags and the environment.
///
/// Kept separate from loading so tests can describe an environment
/// without mutating process-wide variables.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Path given with `--config`
    pub explicit: Option<PathBuf>,
    /// Value of `$RELAUNCH_CONFIG`
    pub env_path: Option<PathBuf>,
    /// Value of `$XDG_CONFIG_HOME`
    pub xdg_config_home: Option<PathBuf>,
    /// The user's home directory
    pub home: Option<PathBuf>,
}

impl ConfigSources {
    /// Resolve sources from the process environment.
    pub fn from_env(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            env_path: std::env::var_os("RELAUNCH_CONFIG").map(PathBuf::from),
            xdg_config_home: std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            home: dirs::home_dir(),
        }
    }
}

/// Loaded configuration bound to a base directory.
///
/// Accessor methods apply defaults and resolve relative paths.
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed file contents (default when no file was found)
    pub file: LauncherConfig,
    base_dir: PathBuf,
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load configuration for the launcher installed at `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit config is missing, or if the
    /// selected file cannot be read, parsed, or validated. Missing optional
    /// files are not an error (defaults are used).
    pub fn load(base_dir: &Path, sources: &ConfigSources) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let found = Self::locate(base_dir, sources, &mut warnings)?;
        let file = match &found {
            Some(path) => Self::read_config(path)?,
            None => LauncherConfig::default(),
        };
        file.validate().map_err(|err| match (&found, err) {
            (Some(path), ConfigError::InvalidValue(message)) => ConfigError::InvalidFile {
                path: path.clone(),
                message,
            },
            (_, err) => err,
        })?;

        Ok(ConfigLoadResult {
            config: Config {
                file,
                base_dir: base_dir.to_path_buf(),
                loaded_from: found,
            },
            warnings,
        })
    }

    /// Build a config from an in-memory file (no search).
    pub fn from_file(base_dir: &Path, file: LauncherConfig) -> Result<Self, ConfigError> {
        file.validate()?;
        Ok(Self {
            file,
            base_dir: base_dir.to_path_buf(),
            loaded_from: None,
        })
    }

    fn locate(
        base_dir: &Path,
        sources: &ConfigSources,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<Option<PathBuf>, ConfigError> {
        // 1. --config must exist
        if let Some(path) = &sources.explicit {
            if !path.is_file() {
                return Err(ConfigError::ReadError {
                    path: path.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "config file not found",
                    ),
                });
            }
            return Ok(Some(path.clone()));
        }

        // 2. $RELAUNCH_CONFIG
        if let Some(path) = &sources.env_path {
            if path.is_file() {
                return Ok(Some(path.clone()));
            }
            warnings.push(ConfigWarning {
                message: "RELAUNCH_CONFIG points to a missing file; ignoring it".into(),
                path: path.clone(),
            });
        }

        // 3. <base-dir>/relaunch.toml
        let beside = base_dir.join(BASE_DIR_CONFIG_NAME);
        if beside.is_file() {
            return Ok(Some(beside));
        }

        // 4. $XDG_CONFIG_HOME/relaunch/config.toml
        if let Some(xdg) = &sources.xdg_config_home {
            let path = xdg.join("relaunch/config.toml");
            if path.is_file() {
                return Ok(Some(path));
            }
        }

        // 5. ~/.relaunch/config.toml
        if let Some(home) = &sources.home {
            let path = home.join(".relaunch/config.toml");
            if path.is_file() {
                return Ok(Some(path));
            }
        }

        Ok(None)
    }

    fn read_config(path: &Path) -> Result<LauncherConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn resolve_program(&self, program: &Path) -> PathBuf {
        if program.parent() == Some(Path::new("")) {
            program.to_path_buf()
        } else {
            self.resolve(program)
        }
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// The launcher's install root.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The file the configuration was read from, if any.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }

    /// Minimum spacing between progress lines.
    ///
    /// Defaults to 500 ms.
    pub fn progress_interval(&self) -> Duration {
        self.file
            .progress_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_PROGRESS_INTERVAL)
    }

    /// Tree entries with defaults applied and paths resolved against the
    /// base directory. The remote is always present.
    pub fn trees(&self) -> Vec<TreeSection> {
        match &self.file.trees {
            Some(trees) => trees
                .iter()
                .map(|t| TreeSection {
                    name: t.name.clone(),
                    path: self.resolve(&t.path),
                    remote: Some(t.remote.clone().unwrap_or_else(RemoteName::origin)),
                    reference: t.reference.clone(),
                    url: t.url.clone(),
                })
                .collect(),
            None => self.default_trees(),
        }
    }

    fn default_trees(&self) -> Vec<TreeSection> {
        [
            ("runtime", "runtime", "origin/master"),
            ("app", "src", "origin/production"),
        ]
        .into_iter()
        .filter_map(|(name, path, reference)| {
            Some(TreeSection {
                name: name.to_string(),
                path: self.base_dir.join(path),
                remote: Some(RemoteName::origin()),
                reference: ReferenceName::new(reference).ok()?,
                url: None,
            })
        })
        .collect()
    }

    /// The supervised program, resolved.
    ///
    /// Defaults to `runtime/bin/python`.
    pub fn launch_program(&self) -> PathBuf {
        let program = self
            .file
            .launch
            .as_ref()
            .and_then(|l| l.program.clone())
            .unwrap_or_else(|| PathBuf::from("runtime/bin/python"));
        self.resolve_program(&program)
    }

    /// Arguments for the supervised program.
    ///
    /// Defaults to `["src/start_client.py"]`.
    pub fn launch_args(&self) -> Vec<String> {
        self.file
            .launch
            .as_ref()
            .and_then(|l| l.args.clone())
            .unwrap_or_else(|| vec!["src/start_client.py".to_string()])
    }

    /// Working directory for the supervised program (default: base directory).
    pub fn launch_working_dir(&self) -> PathBuf {
        self.file
            .launch
            .as_ref()
            .and_then(|l| l.working_dir.as_ref())
            .map(|d| self.resolve(d))
            .unwrap_or_else(|| self.base_dir.clone())
    }

    /// The rescue section with its program resolved, if configured.
    pub fn rescue(&self) -> Option<RescueSection> {
        self.file.rescue.as_ref().map(|r| RescueSection {
            program: self.resolve_program(&r.program),
            args: r.args.clone(),
        })
    }

    /// Select trees by name; an empty filter selects all.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first unknown tree.
    pub fn select_trees(&self, names: &[String]) -> Result<Vec<TreeSection>, ConfigError> {
        let trees = self.trees();
        if names.is_empty() {
            return Ok(trees);
        }

        names
            .iter()
            .map(|name| {
                trees
                    .iter()
                    .find(|t| &t.name == name)
                    .cloned()
                    .ok_or_else(|| {
                        ConfigError::InvalidValue(format!(
                            "unknown tree '{}' (known: {})",
                            name,
                            trees
                                .iter()
                                .map(|t| t.name.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        ))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_sources() -> ConfigSources {
        ConfigSources::default()
    }

    #[test]
    fn load_empty_defaults() {
        let base = TempDir::new().unwrap();

        let result = Config::load(base.path(), &no_sources()).unwrap();
        let config = result.config;

        assert!(config.loaded_from().is_none());
        assert_eq!(config.progress_interval(), Duration::from_millis(500));

        let trees = config.trees();
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].name, "runtime");
        assert_eq!(trees[0].path, base.path().join("runtime"));
        assert_eq!(trees[0].reference.as_str(), "origin/master");
        assert_eq!(trees[1].name, "app");
        assert_eq!(trees[1].path, base.path().join("src"));
        assert_eq!(trees[1].reference.as_str(), "origin/production");
        assert!(trees
            .iter()
            .all(|t| t.remote.as_ref().map(|r| r.as_str()) == Some("origin")));

        assert_eq!(config.launch_program(), base.path().join("runtime/bin/python"));
        assert_eq!(config.launch_args(), vec!["src/start_client.py".to_string()]);
        assert_eq!(config.launch_working_dir(), base.path());
        assert!(config.rescue().is_none());
    }

    #[test]
    fn base_dir_file_is_used() {
        let base = TempDir::new().unwrap();
        fs::write(
            base.path().join(BASE_DIR_CONFIG_NAME),
            r#"
            progress_interval_ms = 100

            [launch]
            program = "/usr/bin/env"
            args = ["true"]
            "#,
        )
        .unwrap();

        let result = Config::load(base.path(), &no_sources()).unwrap();
        let config = result.config;

        assert_eq!(
            config.loaded_from(),
            Some(base.path().join(BASE_DIR_CONFIG_NAME).as_path())
        );
        assert_eq!(config.progress_interval(), Duration::from_millis(100));
        assert_eq!(config.launch_program(), PathBuf::from("/usr/bin/env"));
        assert_eq!(config.launch_args(), vec!["true".to_string()]);
    }

    #[test]
    fn explicit_overrides_everything() {
        let base = TempDir::new().unwrap();
        fs::write(base.path().join(BASE_DIR_CONFIG_NAME), "progress_interval_ms = 1").unwrap();
        let explicit = base.path().join("custom.toml");
        fs::write(&explicit, "progress_interval_ms = 2").unwrap();

        let sources = ConfigSources {
            explicit: Some(explicit),
            ..Default::default()
        };
        let config = Config::load(base.path(), &sources).unwrap().config;

        assert_eq!(config.progress_interval(), Duration::from_millis(2));
    }

    #[test]
    fn missing_explicit_is_an_error() {
        let base = TempDir::new().unwrap();
        let sources = ConfigSources {
            explicit: Some(base.path().join("nope.toml")),
            ..Default::default()
        };

        assert!(matches!(
            Config::load(base.path(), &sources),
            Err(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn missing_env_path_warns_and_falls_through() {
        let base = TempDir::new().unwrap();
        let sources = ConfigSources {
            env_path: Some(base.path().join("gone.toml")),
            ..Default::default()
        };

        let result = Config::load(base.path(), &sources).unwrap();

        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("RELAUNCH_CONFIG"));
        assert!(result.config.loaded_from().is_none());
    }

    #[test]
    fn env_path_beats_base_dir() {
        let base = TempDir::new().unwrap();
        fs::write(base.path().join(BASE_DIR_CONFIG_NAME), "progress_interval_ms = 1").unwrap();
        let env_file = base.path().join("env.toml");
        fs::write(&env_file, "progress_interval_ms = 7").unwrap();

        let sources = ConfigSources {
            env_path: Some(env_file),
            ..Default::default()
        };
        let config = Config::load(base.path(), &sources).unwrap().config;

        assert_eq!(config.progress_interval(), Duration::from_millis(7));
    }

    #[test]
    fn xdg_then_home() {
        let base = TempDir::new().unwrap();
        let xdg = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::create_dir_all(home.path().join(".relaunch")).unwrap();
        fs::write(
            home.path().join(".relaunch/config.toml"),
            "progress_interval_ms = 9",
        )
        .unwrap();

        let sources = ConfigSources {
            xdg_config_home: Some(xdg.path().to_path_buf()),
            home: Some(home.path().to_path_buf()),
            ..Default::default()
        };
        let config = Config::load(base.path(), &sources).unwrap().config;
        assert_eq!(config.progress_interval(), Duration::from_millis(9));

        fs::create_dir_all(xdg.path().join("relaunch")).unwrap();
        fs::write(
            xdg.path().join("relaunch/config.toml"),
            "progress_interval_ms = 3",
        )
        .unwrap();
        let config = Config::load(base.path(), &sources).unwrap().config;
        assert_eq!(config.progress_interval(), Duration::from_millis(3));
    }

    #[test]
    fn parse_error_names_the_file() {
        let base = TempDir::new().unwrap();
        fs::write(base.path().join(BASE_DIR_CONFIG_NAME), "this is not toml").unwrap();

        let err = Config::load(base.path(), &no_sources()).unwrap_err();

        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains(BASE_DIR_CONFIG_NAME));
    }

    #[test]
    fn validation_error_names_the_file() {
        let base = TempDir::new().unwrap();
        fs::write(
            base.path().join(BASE_DIR_CONFIG_NAME),
            "progress_interval_ms = 0",
        )
        .unwrap();

        let err = Config::load(base.path(), &no_sources()).unwrap_err();

        assert!(matches!(
            &err,
            ConfigError::InvalidFile { path, .. } if path == &base.path().join(BASE_DIR_CONFIG_NAME)
        ));
        assert!(err.to_string().contains(BASE_DIR_CONFIG_NAME));
        assert!(err.to_string().contains("progress_interval_ms"));
    }

    #[test]
    fn working_dir_resolves_against_base() {
        let base = TempDir::new().unwrap();
        let file = LauncherConfig {
            launch: Some(LaunchSection {
                working_dir: Some(PathBuf::from("src")),
                ..Default::default()
            }),
            ..Default::default()
        };
        let config = Config::from_file(base.path(), file).unwrap();

        assert_eq!(config.launch_working_dir(), base.path().join("src"));
        assert_eq!(config.launch_program(), base.path().join("runtime/bin/python"));
    }

    #[test]
    fn configured_trees_resolve_paths() {
        let base = TempDir::new().unwrap();
        fs::write(
            base.path().join(BASE_DIR_CONFIG_NAME),
            r#"
            [[tree]]
            name = "assets"
            path = "data/assets"
            remote = "mirror"
            reference = "mirror/stable"
            url = "https://example.com/assets.git"

            [[tree]]
            name = "abs"
            path = "/srv/abs"
            reference = "origin/master"
            "#,
        )
        .unwrap();

        let trees = Config::load(base.path(), &no_sources())
            .unwrap()
            .config
            .trees();

        assert_eq!(trees[0].path, base.path().join("data/assets"));
        assert_eq!(trees[0].remote.as_ref().unwrap().as_str(), "mirror");
        assert_eq!(
            trees[0].url.as_deref(),
            Some("https://example.com/assets.git")
        );
        assert_eq!(trees[1].path, PathBuf::from("/srv/abs"));
        assert_eq!(trees[1].remote, Some(RemoteName::origin()));
    }

    #[test]
    fn select_trees_by_name() {
        let base = TempDir::new().unwrap();
        let config = Config::from_file(base.path(), LauncherConfig::default()).unwrap();

        assert_eq!(config.select_trees(&[]).unwrap().len(), 2);

        let app = config.select_trees(&["app".to_string()]).unwrap();
        assert_eq!(app.len(), 1);
        assert_eq!(app[0].name, "app");

        let err = config.select_trees(&["nope".to_string()]).unwrap_err();
        assert!(err.to_string().contains("unknown tree 'nope'"));
    }

    #[test]
    fn rescue_resolves_against_base() {
        let base = TempDir::new().unwrap();
        let file = LauncherConfig {
            rescue: Some(RescueSection {
                program: PathBuf::from("tools/rescue.sh"),
                args: vec!["--full".into()],
            }),
            ..Default::default()
        };
        let config = Config::from_file(base.path(), file).unwrap();

        let rescue = config.rescue().unwrap();
        assert_eq!(rescue.program, base.path().join("tools/rescue.sh"));
        assert_eq!(rescue.args, vec!["--full".to_string()]);
    }

    #[test]
    fn bare_program_name_is_left_for_path_lookup() {
        let base = TempDir::new().unwrap();
        let file = LauncherConfig {
            launch: Some(LaunchSection {
                program: Some(PathBuf::from("sh")),
                args: Some(vec!["-c".into(), "exit 0".into()]),
                working_dir: None,
            }),
            ..Default::default()
        };
        let config = Config::from_file(base.path(), file).unwrap();

        assert_eq!(config.launch_program(), PathBuf::from("sh"));
    }
}
