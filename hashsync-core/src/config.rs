//! Host environment configuration.
//!
//! Describes how an in-process hash resource behaves: the value it starts
//! with, when it delivers change notifications, and whether it mimics the
//! normalisation `window.location.hash` applies.
//!
//! ```yaml
//! initial_hash: "#start"
//! dispatch: deferred
//! notify_on_unchanged: true
//! browser_semantics: false
//! ```
//!
//! Every key is optional; unknown keys are rejected.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::HashValue;

/// When a resource delivers change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Inside the `set` call, before it returns.
    #[default]
    Immediate,
    /// Queued until the host's next turn.
    Deferred,
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchMode::Immediate => write!(f, "immediate"),
            DispatchMode::Deferred => write!(f, "deferred"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct HostConfig {
    /// Value the resource holds before anything sets it.
    pub initial_hash: HashValue,
    /// When change notifications reach listeners.
    pub dispatch: DispatchMode,
    /// Raise a notification even when `set` leaves the value unchanged.
    pub notify_on_unchanged: bool,
    /// Normalise stored values the way browsers do (see
    /// [`HashValue::browser_normalized`]).
    pub browser_semantics: bool,
}

/// Parse a host config from YAML text.
pub fn from_yaml_str(yaml: &str) -> Result<HostConfig, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Load a host config from a YAML file.
///
/// Returns `ConfigError::Io` if the file cannot be read,
/// `ConfigError::Parse` (with path + line context) if malformed.
pub fn load_at(path: &Path) -> Result<HostConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = from_yaml_str("{}").unwrap();
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.dispatch, DispatchMode::Immediate);
        assert!(config.initial_hash.is_empty());
    }

    #[test]
    fn dispatch_mode_parses_lowercase() {
        let config = from_yaml_str("dispatch: deferred\n").unwrap();
        assert_eq!(config.dispatch, DispatchMode::Deferred);
        assert_eq!(config.dispatch.to_string(), "deferred");
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = from_yaml_str("dispatch: immediate\nroutes: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)), "got: {err}");
    }
}
