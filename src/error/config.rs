//! Configuration loading errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating, reading or validating the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for the expected layout
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A field holds an unusable value
    #[error("invalid config: {0}")]
    Invalid(String),

    /// No config file was found in any of the searched locations
    #[error("no config file found (searched: {})", format_paths(.0))]
    NotFound(Vec<PathBuf>),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
