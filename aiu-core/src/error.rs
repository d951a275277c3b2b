//! Error types for aiu-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None` — cannot locate the default config.
    #[error("cannot determine home directory; set $HOME or pass --config")]
    HomeNotFound,

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// The requested environment is not defined in the config file.
    #[error("environment '{name}' is not defined in {path} (available: {available})")]
    UnknownEnvironment {
        name: String,
        path: PathBuf,
        available: String,
    },
}
