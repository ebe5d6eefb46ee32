//! Value types shared by every hashsync crate.
//!
//! A [`HashValue`] is opaque: it is compared and stored, never decomposed.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// The whole fragment portion of a location, leading `#` included when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashValue(pub String);

impl HashValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Normalise the way `window.location.hash` reads back an assignment:
    /// non-empty values gain a leading `#`, and a bare `#` reads as empty.
    pub fn browser_normalized(&self) -> HashValue {
        match self.0.as_str() {
            "" | "#" => HashValue::default(),
            s if s.starts_with('#') => self.clone(),
            s => HashValue(format!("#{s}")),
        }
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for HashValue {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for HashValue {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for HashValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for HashValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for HashValue {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Handle returned by [`GlobalResource::add_change_listener`], used to remove
/// the listener again.
///
/// [`GlobalResource::add_change_listener`]: crate::resource::GlobalResource::add_change_listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}
