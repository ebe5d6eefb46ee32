//! hashsync core library: value types, the resource contract, errors and host config.
//!
//! Public API surface:
//! - [`types`]: [`HashValue`] and [`ListenerId`]
//! - [`resource`]: the [`GlobalResource`] trait every hash backend implements
//! - [`error`]: [`ResourceError`] and [`ConfigError`]
//! - [`config`]: [`HostConfig`] load / parse

pub mod config;
pub mod error;
pub mod resource;
pub mod types;

pub use config::{DispatchMode, HostConfig};
pub use error::{ConfigError, ResourceError};
pub use resource::{ChangeListener, GlobalResource, HASH_CHANGE_EVENT};
pub use types::{HashValue, ListenerId};
