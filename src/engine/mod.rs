//! Selection engine: choice-mode state machine and action-mode controller.
//!
//! This module sits between the host adapters
//! ([`ListCollection`](crate::binding::ListCollection),
//! [`CursorCollection`](crate::binding::CursorCollection), or the scenario
//! runner) and the [`selection`](crate::selection) store. Every
//! public operation runs to completion synchronously; the host observes only
//! the final state plus the callbacks emitted on the way.
//!
//! ```text
//! Tap / LongPress / Mutation ─▶ SelectionEngine ─▶ SelectionStore
//!                                      │
//!                 Host / OverlayHost ◀─┘  (redraw hints, overlay deltas)
//! ```
//!
//! # Modules
//!
//! - [`modes`]: `ChoiceMode` and `ActionModeState`
//! - [`state`]: `SelectionEngine` and tap policy
//! - `action_mode`: overlay lifecycle, save/restore (impl block on `SelectionEngine`)
//! - [`snapshot`]: serializable `SavedState`
//! - [`handler`]: `Event` dispatch for single-queue hosts

mod action_mode;
pub mod handler;
pub mod modes;
pub mod snapshot;
pub mod state;

pub use handler::{handle_event, Event, Outcome};
pub use modes::{ActionModeState, ChoiceMode};
pub use snapshot::{SavedState, SNAPSHOT_VERSION};
pub use state::{SelectionEngine, TapOutcome};
