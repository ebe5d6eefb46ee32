//! Two-way synchronisation between a local hash cell and a [`GlobalResource`].
//!
//! ## Value transitions
//!
//! There is exactly one code path that mutates the local value after
//! activation: the change listener. [`HashSync::write`] only mutates the
//! resource and relies on the resulting notification, so internally and
//! externally triggered changes are observed identically.
//!
//! ## Idempotence
//!
//! A write whose value already equals the resource's current value is
//! skipped entirely. Many hosts raise a notification on every assignment,
//! changed or not; skipping keeps downstream observers quiet.
//!
//! ## Phases
//!
//! `Inactive -> Active -> Deactivated`, one way. Operations invoked in the
//! wrong phase fail with [`SyncError::Lifecycle`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use hashsync_core::{ChangeListener, GlobalResource, HashValue, ListenerId};

use crate::error::SyncError;

// ---------------------------------------------------------------------------
// Phase / outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Inactive,
    Active,
    Deactivated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Inactive => write!(f, "inactive"),
            Phase::Active => write!(f, "active"),
            Phase::Deactivated => write!(f, "deactivated"),
        }
    }
}

/// Outcome of a [`HashSync::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The resource was updated; the listener picks the value up on delivery.
    Written { value: HashValue },
    /// The resource already held this value; nothing was touched.
    Unchanged { value: HashValue },
}

// ---------------------------------------------------------------------------
// Shared instance state
// ---------------------------------------------------------------------------

struct Shared<R: GlobalResource> {
    resource: R,
    value: RefCell<HashValue>,
    phase: Cell<Phase>,
    listener: Cell<Option<ListenerId>>,
}

impl<R: GlobalResource> Shared<R> {
    fn expect_phase(&self, op: &'static str, expected: Phase) -> Result<(), SyncError> {
        let phase = self.phase.get();
        if phase == expected {
            Ok(())
        } else {
            Err(SyncError::Lifecycle { op, phase })
        }
    }

    /// Change listener body: copy the resource's value into the local cell.
    fn observe(&self) {
        if self.phase.get() != Phase::Active {
            return;
        }
        match self.resource.get() {
            Ok(value) => {
                tracing::trace!("observed hash {value:?}");
                *self.value.borrow_mut() = value;
            }
            Err(err) => tracing::error!("failed to read hash after change: {err}"),
        }
    }

    fn write(&self, value: HashValue) -> Result<WriteOutcome, SyncError> {
        self.expect_phase("write", Phase::Active)?;
        if self.resource.get()? == value {
            tracing::debug!("unchanged: {value:?}");
            return Ok(WriteOutcome::Unchanged { value });
        }
        self.resource.set(&value)?;
        tracing::debug!("wrote: {value:?}");
        Ok(WriteOutcome::Written { value })
    }
}

impl<R: GlobalResource> Drop for Shared<R> {
    fn drop(&mut self) {
        // Dropped while still active: don't leave the resource holding a dead listener.
        if let Some(id) = self.listener.take() {
            if let Err(err) = self.resource.remove_change_listener(id) {
                tracing::warn!("failed to remove {id} on drop: {err}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// HashSync
// ---------------------------------------------------------------------------

/// Local view of the hash, kept equal to the resource's value.
///
/// Clones are handles to the same instance, not independent copies.
pub struct HashSync<R: GlobalResource> {
    shared: Rc<Shared<R>>,
}

impl<R: GlobalResource + 'static> HashSync<R> {
    pub fn new(resource: R) -> Self {
        Self {
            shared: Rc::new(Shared {
                resource,
                value: RefCell::new(HashValue::default()),
                phase: Cell::new(Phase::Inactive),
                listener: Cell::new(None),
            }),
        }
    }

    /// Read the initial value and subscribe to changes.
    ///
    /// On error the instance stays `Inactive` and holds no subscription.
    pub fn activate(&self) -> Result<(), SyncError> {
        self.shared.expect_phase("activate", Phase::Inactive)?;

        let initial = self.shared.resource.get()?;
        *self.shared.value.borrow_mut() = initial;

        let weak = Rc::downgrade(&self.shared);
        let listener: ChangeListener = Rc::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.observe();
            }
        });
        let id = self.shared.resource.add_change_listener(listener)?;
        self.shared.listener.set(Some(id));
        self.shared.phase.set(Phase::Active);

        tracing::debug!(
            "activated at {:?} with {id}",
            self.shared.value.borrow().as_str()
        );
        Ok(())
    }

    /// The most recently observed value.
    pub fn read(&self) -> Result<HashValue, SyncError> {
        self.shared.expect_phase("read", Phase::Active)?;
        Ok(self.shared.value.borrow().clone())
    }

    /// Set the resource to `value`, unless it already holds it.
    ///
    /// The local value is not assigned here. With synchronous delivery it is
    /// current by the time this returns; with deferred delivery it catches
    /// up when the host delivers the notification.
    pub fn write(&self, value: impl Into<HashValue>) -> Result<WriteOutcome, SyncError> {
        self.shared.write(value.into())
    }

    /// Unsubscribe. Valid once, from `Active`.
    pub fn deactivate(&self) -> Result<(), SyncError> {
        self.shared.expect_phase("deactivate", Phase::Active)?;
        if let Some(id) = self.shared.listener.take() {
            if let Err(err) = self.shared.resource.remove_change_listener(id) {
                self.shared.listener.set(Some(id));
                return Err(err.into());
            }
            tracing::debug!("deactivated, removed {id}");
        }
        self.shared.phase.set(Phase::Deactivated);
        Ok(())
    }

    /// The consumer-facing `(current_value, set_value)` pair.
    pub fn pair(&self) -> Result<(HashValue, HashSetter<R>), SyncError> {
        let value = self.read()?;
        Ok((
            value,
            HashSetter {
                shared: self.shared.clone(),
            },
        ))
    }

    pub fn phase(&self) -> Phase {
        self.shared.phase.get()
    }

    pub fn resource(&self) -> &R {
        &self.shared.resource
    }
}

impl<R: GlobalResource> Clone for HashSync<R> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<R: GlobalResource> fmt::Debug for HashSync<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashSync")
            .field("phase", &self.shared.phase.get())
            .field("value", &*self.shared.value.borrow())
            .field("listener", &self.shared.listener.get())
            .finish()
    }
}

/// Setter half of [`HashSync::pair`].
pub struct HashSetter<R: GlobalResource> {
    shared: Rc<Shared<R>>,
}

impl<R: GlobalResource> HashSetter<R> {
    pub fn set(&self, value: impl Into<HashValue>) -> Result<WriteOutcome, SyncError> {
        self.shared.write(value.into())
    }
}

impl<R: GlobalResource> Clone for HashSetter<R> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}
