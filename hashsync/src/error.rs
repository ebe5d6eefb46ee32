//! Error types for hashsync.

use thiserror::Error;

use hashsync_core::{ConfigError, ResourceError};

use crate::hash_sync::Phase;
use crate::lifecycle::MountState;

/// All errors that can arise from hash sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The underlying resource failed; never handled locally.
    #[error("resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Host config could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// An operation was invoked out of sequence.
    #[error("cannot {op} a hash sync that is {phase}")]
    Lifecycle { op: &'static str, phase: Phase },

    /// A lifecycle host was driven out of sequence.
    #[error("cannot {op} a lifecycle host that is {state}")]
    HostState {
        op: &'static str,
        state: MountState,
    },
}
