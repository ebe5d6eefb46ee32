use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use hashsync_core::{
    ChangeListener, GlobalResource, HashValue, ListenerId, ResourceError, HASH_CHANGE_EVENT,
};

/// `window.location.hash` plus `hashchange` subscriptions.
///
/// Registered closures are owned here until removed; dropping a
/// `WindowLocation` detaches every listener it still holds.
pub struct WindowLocation {
    window: web_sys::Window,
    listeners: RefCell<HashMap<ListenerId, Closure<dyn Fn()>>>,
    next_id: Cell<u64>,
}

impl WindowLocation {
    /// Bind to the global `window`.
    pub fn new() -> Result<Self, ResourceError> {
        let window = web_sys::window()
            .ok_or_else(|| ResourceError::Unavailable("no global `window`".to_string()))?;
        Ok(Self {
            window,
            listeners: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        })
    }
}

fn js_err(context: &str, err: JsValue) -> String {
    format!("{context}: {err:?}")
}

impl GlobalResource for WindowLocation {
    fn get(&self) -> Result<HashValue, ResourceError> {
        self.window
            .location()
            .hash()
            .map(HashValue::from)
            .map_err(|e| ResourceError::Unavailable(js_err("location.hash", e)))
    }

    fn set(&self, value: &HashValue) -> Result<(), ResourceError> {
        self.window
            .location()
            .set_hash(value.as_str())
            .map_err(|e| ResourceError::Unavailable(js_err("location.hash =", e)))
    }

    fn add_change_listener(&self, listener: ChangeListener) -> Result<ListenerId, ResourceError> {
        let closure = Closure::<dyn Fn()>::new(move || listener());
        self.window
            .add_event_listener_with_callback(HASH_CHANGE_EVENT, closure.as_ref().unchecked_ref())
            .map_err(|e| ResourceError::Listener(js_err("addEventListener", e)))?;

        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().insert(id, closure);
        tracing::debug!("attached {HASH_CHANGE_EVENT} {id}");
        Ok(id)
    }

    fn remove_change_listener(&self, id: ListenerId) -> Result<(), ResourceError> {
        let closure = self
            .listeners
            .borrow_mut()
            .remove(&id)
            .ok_or(ResourceError::UnknownListener(id))?;
        self.window
            .remove_event_listener_with_callback(
                HASH_CHANGE_EVENT,
                closure.as_ref().unchecked_ref(),
            )
            .map_err(|e| ResourceError::Listener(js_err("removeEventListener", e)))?;
        tracing::debug!("detached {HASH_CHANGE_EVENT} {id}");
        Ok(())
    }
}

impl Drop for WindowLocation {
    fn drop(&mut self) {
        for (id, closure) in self.listeners.get_mut().drain() {
            if let Err(err) = self.window.remove_event_listener_with_callback(
                HASH_CHANGE_EVENT,
                closure.as_ref().unchecked_ref(),
            ) {
                tracing::warn!("failed to detach {id}: {err:?}");
            }
        }
    }
}
