//! Position and identity types shared by every layer.
//!
//! A [`Position`] is a transient index into the current view of the bound
//! collection. An [`Identity`] is the stable opaque key the collection hands out
//! for the item at a position; it survives moves and unrelated inserts/removals
//! while the position does not.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-based index into the bound collection's current view.
///
/// Invalidated by every mutation; the engine remaps the positions it holds and
/// callers must not keep their own across one.
pub type Position = usize;

/// Stable opaque 64-bit key for a collection item.
///
/// Supplied by the bound collection at activation time. The engine stores and
/// reports it but never derives one itself.
///
/// # Examples
///
/// ```
/// use rowselect::Identity;
///
/// let id = Identity::new(42);
/// assert_eq!(id.get(), 42);
/// assert_eq!(id.to_string(), "#42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(u64);

impl Identity {
    /// Wraps a raw identity value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identity value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Identity {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
