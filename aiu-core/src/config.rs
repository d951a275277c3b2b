//! Environment configuration.
//!
//! # File layout
//!
//! ```text
//! ~/.aspace-instance-update/
//!   config.yaml     (map of environment name → connection settings)
//! ```
//!
//! ```yaml
//! dev:
//!   url: http://localhost:8089
//!   username: admin
//!   password: admin
//! prod:
//!   url: https://aspace.example.edu/api
//!   username: batch
//!   password: secret
//!   timeout_secs: 60
//!   missing_target: fail
//! ```
//!
//! # API pattern
//!
//! - `load_at(path)` — explicit path; used in tests with `TempDir`
//! - `load()` — derives the path from `dirs::home_dir()`, delegates to `load_at`

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::MissingTargetPolicy;

/// Request timeout used when an environment does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Connection settings for one ArchivesSpace instance.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Base URL of the backend API (no trailing slash required).
    pub url: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Per-environment default for unindexed target barcodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_target: Option<MissingTargetPolicy>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .field("missing_target", &self.missing_target)
            .finish()
    }
}

/// The whole config file: environment name → settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Config {
    pub environments: BTreeMap<String, Environment>,
    #[serde(skip)]
    source: PathBuf,
}

impl Config {
    /// Look up an environment by name.
    pub fn environment(&self, name: &str) -> Result<&Environment, ConfigError> {
        self.environments
            .get(name)
            .ok_or_else(|| ConfigError::UnknownEnvironment {
                name: name.to_owned(),
                path: self.source.clone(),
                available: self
                    .environments
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Path the config was loaded from (empty for configs built in memory).
    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// `<home>/.aspace-instance-update/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".aspace-instance-update").join("config.yaml")
}

/// Load the config file at `path`.
///
/// Returns `ConfigError::NotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    let mut config: Config = serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    config.source = path.to_path_buf();
    Ok(config)
}

/// `load_at` convenience wrapper using the default location.
pub fn load() -> Result<Config, ConfigError> {
    load_at(&config_path_at(&home()?))
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
