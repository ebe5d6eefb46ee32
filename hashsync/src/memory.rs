//! In-process hash resource.
//!
//! [`MemoryLocation`] stands in for `window.location` wherever there is no
//! browser: native hosts, tests, server-side rendering. It honours the
//! [`HostConfig`] knobs so both delivery models of a real host can be
//! exercised:
//!
//! - `Immediate`: listeners run inside [`GlobalResource::set`].
//! - `Deferred`: notifications queue until [`MemoryLocation::flush`], the
//!   equivalent of the browser getting to its next event-loop turn.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::Path;

use hashsync_core::{
    config, ChangeListener, DispatchMode, GlobalResource, HashValue, HostConfig, ListenerId,
    ResourceError,
};

use crate::error::SyncError;

pub struct MemoryLocation {
    value: RefCell<HashValue>,
    listeners: RefCell<BTreeMap<ListenerId, ChangeListener>>,
    next_id: Cell<u64>,
    dispatch: DispatchMode,
    notify_on_unchanged: bool,
    browser_semantics: bool,
    /// Notifications raised but not yet delivered (deferred mode only).
    pending: Cell<usize>,
    /// Notifications delivered so far, listeners or not.
    delivered: Cell<u64>,
}

impl MemoryLocation {
    /// Empty hash, immediate delivery.
    pub fn new() -> Self {
        Self::from_config(&HostConfig::default())
    }

    /// Immediate delivery, starting at `hash`.
    pub fn with_hash(hash: impl Into<HashValue>) -> Self {
        Self::from_config(&HostConfig {
            initial_hash: hash.into(),
            ..HostConfig::default()
        })
    }

    pub fn from_config(config: &HostConfig) -> Self {
        let initial = if config.browser_semantics {
            config.initial_hash.browser_normalized()
        } else {
            config.initial_hash.clone()
        };
        Self {
            value: RefCell::new(initial),
            listeners: RefCell::new(BTreeMap::new()),
            next_id: Cell::new(1),
            dispatch: config.dispatch,
            notify_on_unchanged: config.notify_on_unchanged,
            browser_semantics: config.browser_semantics,
            pending: Cell::new(0),
            delivered: Cell::new(0),
        }
    }

    /// Build from a YAML host config file.
    pub fn load_at(path: &Path) -> Result<Self, SyncError> {
        let config = config::load_at(path)?;
        Ok(Self::from_config(&config))
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        self.dispatch
    }

    /// Current value, without going through the fallible trait method.
    pub fn value(&self) -> HashValue {
        self.value.borrow().clone()
    }

    /// Change the value without raising a notification, the way
    /// `history.replaceState` does in a browser.
    pub fn replace(&self, value: impl Into<HashValue>) {
        let value = self.normalize(value.into());
        *self.value.borrow_mut() = value;
    }

    /// Raise a change notification by hand, like dispatching a synthetic
    /// `hashchange` event.
    pub fn dispatch_change(&self) {
        self.raise();
    }

    /// Deliver every queued notification, including ones raised by listeners
    /// during this flush. Returns the number delivered.
    pub fn flush(&self) -> usize {
        let mut delivered = 0;
        while self.pending.get() > 0 {
            self.pending.set(self.pending.get() - 1);
            self.deliver();
            delivered += 1;
        }
        delivered
    }

    pub fn pending(&self) -> usize {
        self.pending.get()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn notifications(&self) -> u64 {
        self.delivered.get()
    }

    fn normalize(&self, value: HashValue) -> HashValue {
        if self.browser_semantics {
            value.browser_normalized()
        } else {
            value
        }
    }

    fn raise(&self) {
        match self.dispatch {
            DispatchMode::Immediate => self.deliver(),
            DispatchMode::Deferred => self.pending.set(self.pending.get() + 1),
        }
    }

    fn deliver(&self) {
        // Snapshot: listeners may add, remove or set while being called.
        let listeners: Vec<(ListenerId, ChangeListener)> = self
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, listener.clone()))
            .collect();
        self.delivered.set(self.delivered.get() + 1);
        tracing::trace!("dispatching change to {} listener(s)", listeners.len());
        for (id, listener) in listeners {
            // Removed by an earlier listener in this dispatch.
            if !self.listeners.borrow().contains_key(&id) {
                continue;
            }
            listener();
        }
    }
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalResource for MemoryLocation {
    fn get(&self) -> Result<HashValue, ResourceError> {
        Ok(self.value())
    }

    fn set(&self, value: &HashValue) -> Result<(), ResourceError> {
        let next = self.normalize(value.clone());
        let changed = {
            let mut current = self.value.borrow_mut();
            let changed = *current != next;
            *current = next;
            changed
        };
        if changed || self.notify_on_unchanged {
            self.raise();
        }
        Ok(())
    }

    fn add_change_listener(&self, listener: ChangeListener) -> Result<ListenerId, ResourceError> {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().insert(id, listener);
        Ok(id)
    }

    fn remove_change_listener(&self, id: ListenerId) -> Result<(), ResourceError> {
        match self.listeners.borrow_mut().remove(&id) {
            Some(_) => Ok(()),
            None => Err(ResourceError::UnknownListener(id)),
        }
    }
}
