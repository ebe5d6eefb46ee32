//! Lifecycle hosts: who decides when a hash sync is live.
//!
//! A [`LifecycleHost`] receives an activation and a deactivation hook per
//! consumer and runs each at most once. [`Mount`] is the plain in-process
//! host: hooks run on [`Mount::mount`] / [`Mount::unmount`] (or drop).

use std::fmt;

use hashsync_core::GlobalResource;

use crate::error::SyncError;
use crate::hash_sync::HashSync;

/// Callback run by a host at a lifecycle edge.
pub type LifecycleHook = Box<dyn FnOnce() -> Result<(), SyncError>>;

pub trait LifecycleHost {
    /// Register a consumer's hooks. `on_activate` runs when the consumer
    /// becomes live, `on_deactivate` when it stops.
    fn register(
        &mut self,
        on_activate: LifecycleHook,
        on_deactivate: LifecycleHook,
    ) -> Result<(), SyncError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountState {
    #[default]
    Pending,
    Mounted,
    Unmounted,
}

impl fmt::Display for MountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountState::Pending => write!(f, "pending"),
            MountState::Mounted => write!(f, "mounted"),
            MountState::Unmounted => write!(f, "unmounted"),
        }
    }
}

/// Single mount/unmount cycle.
///
/// - hooks registered while pending run on [`mount`](Mount::mount), in order
/// - hooks registered while mounted activate immediately
/// - deactivation runs in reverse registration order
/// - a mount dropped while mounted unmounts itself
#[derive(Default)]
pub struct Mount {
    state: MountState,
    pending: Vec<(LifecycleHook, LifecycleHook)>,
    live: Vec<LifecycleHook>,
}

impl Mount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MountState {
        self.state
    }

    /// Run every pending activation hook, in registration order. All hooks
    /// run even if one fails; the first failure is returned. Only consumers
    /// that activated are deactivated by `unmount`.
    pub fn mount(&mut self) -> Result<(), SyncError> {
        if self.state != MountState::Pending {
            return Err(SyncError::HostState {
                op: "mount",
                state: self.state,
            });
        }
        self.state = MountState::Mounted;
        let mut first_err = None;
        for (on_activate, on_deactivate) in std::mem::take(&mut self.pending) {
            match on_activate() {
                Ok(()) => self.live.push(on_deactivate),
                Err(err) => {
                    first_err.get_or_insert(err);
                }
            }
        }
        tracing::debug!("mounted {} consumer(s)", self.live.len());
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Run every deactivation hook, newest first. All hooks run even if one
    /// fails; the first failure is returned.
    pub fn unmount(&mut self) -> Result<(), SyncError> {
        if self.state != MountState::Mounted {
            return Err(SyncError::HostState {
                op: "unmount",
                state: self.state,
            });
        }
        self.state = MountState::Unmounted;
        let mut first_err = None;
        while let Some(on_deactivate) = self.live.pop() {
            if let Err(err) = on_deactivate() {
                first_err.get_or_insert(err);
            }
        }
        tracing::debug!("unmounted");
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl LifecycleHost for Mount {
    fn register(
        &mut self,
        on_activate: LifecycleHook,
        on_deactivate: LifecycleHook,
    ) -> Result<(), SyncError> {
        match self.state {
            MountState::Pending => {
                self.pending.push((on_activate, on_deactivate));
                Ok(())
            }
            MountState::Mounted => {
                on_activate()?;
                self.live.push(on_deactivate);
                Ok(())
            }
            MountState::Unmounted => Err(SyncError::HostState {
                op: "register",
                state: self.state,
            }),
        }
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        if self.state == MountState::Mounted {
            if let Err(err) = self.unmount() {
                tracing::warn!("unmount on drop failed: {err}");
            }
        }
    }
}

/// Create a [`HashSync`] over `resource` whose activation and deactivation
/// are driven by `host`.
pub fn use_hash<R, H>(host: &mut H, resource: R) -> Result<HashSync<R>, SyncError>
where
    R: GlobalResource + 'static,
    H: LifecycleHost + ?Sized,
{
    let sync = HashSync::new(resource);
    let on_activate: LifecycleHook = {
        let sync = sync.clone();
        Box::new(move || sync.activate())
    };
    let on_deactivate: LifecycleHook = {
        let sync = sync.clone();
        Box::new(move || sync.deactivate())
    };
    host.register(on_activate, on_deactivate)?;
    Ok(sync)
}
