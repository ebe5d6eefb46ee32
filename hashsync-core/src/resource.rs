//! The external, process-wide resource a hash sync observes.
//!
//! # Contract
//!
//! - One string value, read with [`GlobalResource::get`], written with
//!   [`GlobalResource::set`].
//! - One event kind: "the value changed". Listeners receive no payload and
//!   must call `get` to learn the new value.
//! - Delivery may be synchronous (inside `set`) or deferred to a later turn
//!   of the host's event loop. Implementations document which.
//! - Implementations must not hold interior borrows while invoking listeners;
//!   a listener is allowed to call back into the resource.

use std::rc::Rc;

use crate::error::ResourceError;
use crate::types::{HashValue, ListenerId};

/// DOM event name raised by browsers when `location.hash` changes.
pub const HASH_CHANGE_EVENT: &str = "hashchange";

/// Payloadless change callback.
pub type ChangeListener = Rc<dyn Fn()>;

/// Get/set access to a single global hash value plus change notifications.
///
/// Methods take `&self`: a resource is shared (`Rc`) by every observer in the
/// same execution context and mutates through interior mutability.
pub trait GlobalResource {
    /// Current value of the resource.
    fn get(&self) -> Result<HashValue, ResourceError>;

    /// Replace the value. May raise a change notification.
    fn set(&self, value: &HashValue) -> Result<(), ResourceError>;

    /// Register `listener` for change notifications.
    fn add_change_listener(&self, listener: ChangeListener) -> Result<ListenerId, ResourceError>;

    /// Unregister a listener previously returned by `add_change_listener`.
    fn remove_change_listener(&self, id: ListenerId) -> Result<(), ResourceError>;
}

impl<R: GlobalResource + ?Sized> GlobalResource for Rc<R> {
    fn get(&self) -> Result<HashValue, ResourceError> {
        (**self).get()
    }

    fn set(&self, value: &HashValue) -> Result<(), ResourceError> {
        (**self).set(value)
    }

    fn add_change_listener(&self, listener: ChangeListener) -> Result<ListenerId, ResourceError> {
        (**self).add_change_listener(listener)
    }

    fn remove_change_listener(&self, id: ListenerId) -> Result<(), ResourceError> {
        (**self).remove_change_listener(id)
    }
}
