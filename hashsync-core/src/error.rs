//! Error types for hashsync-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ListenerId;

/// Failures reported by a [`GlobalResource`](crate::resource::GlobalResource).
///
/// None of these are recoverable locally; callers propagate them.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The host does not expose the resource at all (no `window`, no `location`).
    #[error("global resource unavailable: {0}")]
    Unavailable(String),

    /// The host rejected a listener registration or removal.
    #[error("change listener rejected: {0}")]
    Listener(String),

    /// Removal of a listener the resource never handed out, or already removed.
    #[error("unknown change listener {0}")]
    UnknownListener(ListenerId),
}

/// All errors that can arise while loading a [`HostConfig`](crate::config::HostConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load, with file path and line context from serde_yaml.
    #[error("failed to parse host config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// YAML error for configs that did not come from a file.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
