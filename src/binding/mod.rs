//! Collaborator contracts between the engine, the bound collection and the host.
//!
//! The engine never owns the data it tracks and never draws anything. It reads
//! length and identities through [`BoundCollection`], reports redraw hints
//! through [`Host`], and drives the modal overlay through the optional
//! [`OverlayHost`] capability.
//!
//! ```text
//!   BoundCollection ── len / identity_at / Mutation ──▶ SelectionEngine
//!                                                          │
//!               Host ◀── on_position_changed ──────────────┤
//!        OverlayHost ◀── enter / delta / exit ─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`list`]: `Vec`-backed collection that reports its own mutations
//! - [`cursor`]: paged collection over a [`RowSource`] that resets on requery
//! - [`recorder`]: host implementations that log every callback

pub mod cursor;
pub mod list;
pub mod recorder;

pub use cursor::{CursorCollection, RowSource};
pub use list::ListCollection;
pub use recorder::{CallbackLog, HostCallback, RecordingHost, RecordingOverlay};

use crate::domain::{Identity, Position};
use serde::{Deserialize, Serialize};

/// Read access the engine needs to the externally-owned collection.
pub trait BoundCollection {
    /// Number of items in the current view.
    fn len(&self) -> usize;

    /// Stable identity of the item at `position`.
    ///
    /// Only called with `position < self.len()`, right before the position is
    /// activated.
    fn identity_at(&self, position: Position) -> Identity;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: BoundCollection + ?Sized> BoundCollection for &C {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn identity_at(&self, position: Position) -> Identity {
        (**self).identity_at(position)
    }
}

/// Redraw hints for the presentation surface.
pub trait Host {
    /// The visual state (activated or clickable) of `position` changed.
    fn on_position_changed(&mut self, position: Position);
}

/// Opaque token identifying a live overlay.
///
/// Created by the host in [`OverlayHost::request_enter_overlay`]; the engine only
/// stores it and hands it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayHandle(u64);

impl OverlayHandle {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Capability to open, update and close the modal multi-select overlay.
///
/// Registered on the engine with
/// [`SelectionEngine::set_overlay_host`](crate::engine::SelectionEngine::set_overlay_host).
/// Without one, long-presses are not handled and a restored active overlay
/// falls back to inactive.
pub trait OverlayHost {
    /// Opens the overlay. `None` means the host declined.
    fn request_enter_overlay(&mut self) -> Option<OverlayHandle>;

    /// A position was activated or deactivated while the overlay is open.
    fn on_activation_delta(&mut self, handle: OverlayHandle, position: Position, activated: bool);

    /// Asks the host to close the overlay identified by `handle`.
    fn request_exit_overlay(&mut self, handle: OverlayHandle);
}
