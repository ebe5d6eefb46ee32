//! # hashsync-web
//!
//! [`WindowLocation`]: the browser's `window.location.hash` as a
//! [`GlobalResource`](hashsync_core::GlobalResource).
//!
//! Browsers deliver `hashchange` on a later task, so a read right after a
//! write observes the previous value until the event runs.
//!
//! Only compiled for `target_family = "wasm"`; on other targets this crate is
//! empty.

#[cfg(target_family = "wasm")]
mod window;

#[cfg(target_family = "wasm")]
pub use window::WindowLocation;
