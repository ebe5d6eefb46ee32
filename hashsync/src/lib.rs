//! # hashsync
//!
//! Keeps a local copy of the location hash consistent with the global
//! resource in both directions.
//!
//! Build a [`HashSync`] over any [`GlobalResource`], or let [`use_hash`] wire
//! one to a [`LifecycleHost`] so activation and deactivation follow the
//! host's mount cycle. [`MemoryLocation`] is the in-process resource.
//!
//! [`GlobalResource`]: hashsync_core::GlobalResource

pub mod error;
pub mod hash_sync;
pub mod lifecycle;
pub mod memory;

pub use error::SyncError;
pub use hash_sync::{HashSetter, HashSync, Phase, WriteOutcome};
pub use lifecycle::{use_hash, LifecycleHook, LifecycleHost, Mount, MountState};
pub use memory::MemoryLocation;
