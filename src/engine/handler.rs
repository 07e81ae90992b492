//! Single-entry event dispatch.
//!
//! Hosts that funnel input and collection notifications through one queue can
//! wrap each item in an [`Event`] and hand it to [`handle_event`], which calls
//! the matching [`SelectionEngine`] operation and returns an [`Outcome`]. Events
//! must be delivered in the order they happened relative to the collection.
//!
//! # Example
//!
//! ```rust
//! use rowselect::binding::{ListCollection, RecordingHost};
//! use rowselect::engine::{handle_event, ChoiceMode, Event, Outcome, SelectionEngine};
//! use rowselect::Mutation;
//!
//! let mut list = ListCollection::with_len(4);
//! let mut engine = SelectionEngine::with_choice_mode(RecordingHost::default(), ChoiceMode::Multiple);
//!
//! handle_event(&mut engine, &list, &Event::Tap { position: 3 })?;
//! let mutation: Mutation = list.insert(0, 1)?;
//! let outcome = handle_event(&mut engine, &list, &Event::Mutation(mutation))?;
//!
//! assert!(matches!(outcome, Outcome::Remapped(_)));
//! assert_eq!(engine.activated_positions(), vec![4]);
//! # Ok::<(), rowselect::RowSelectError>(())
//! ```

use crate::binding::{BoundCollection, Host};
use crate::domain::{Mutation, Position, Result};
use crate::selection::RemapReport;
use serde::{Deserialize, Serialize};

use super::modes::ChoiceMode;
use super::state::{SelectionEngine, TapOutcome};

/// Input to the engine.
///
/// For `Mutation` events, the collection passed alongside must already reflect
/// the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// User tapped a row.
    Tap { position: Position },
    /// User long-pressed a row.
    LongPress { position: Position },
    /// The bound collection changed.
    Mutation(Mutation),
    /// Host changed the configured choice mode.
    SetChoiceMode { mode: ChoiceMode },
    /// Host changed whether a row reacts to input.
    SetClickable { position: Position, clickable: bool },
    /// Host set a row's activated state programmatically.
    SetActivated { position: Position, activated: bool },
    /// Host cleared every activation.
    ClearActivations,
    /// User dismissed the overlay chrome.
    OverlayDismissed,
}

/// Result of handling one [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Tap(TapOutcome),
    /// `true` if the long-press was consumed by entering action mode.
    LongPress { handled: bool },
    Remapped(RemapReport),
    /// `true` if the event changed engine state.
    Changed(bool),
}

/// Applies `event` to `engine`.
///
/// # Errors
///
/// `OutOfRange` for position-carrying events outside the collection. The
/// engine state is unchanged on error.
pub fn handle_event<H, C>(
    engine: &mut SelectionEngine<H>,
    collection: &C,
    event: &Event,
) -> Result<Outcome>
where
    H: Host,
    C: BoundCollection + ?Sized,
{
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match *event {
        Event::Tap { position } => engine.tap(collection, position).map(Outcome::Tap),
        Event::LongPress { position } => engine
            .long_press(collection, position)
            .map(|handled| Outcome::LongPress { handled }),
        Event::Mutation(mutation) => {
            Ok(Outcome::Remapped(engine.on_mutation(collection, mutation)))
        }
        Event::SetChoiceMode { mode } => {
            let before = (engine.choice_mode(), engine.pending_choice_mode());
            engine.set_choice_mode(mode);
            Ok(Outcome::Changed(
                before != (engine.choice_mode(), engine.pending_choice_mode()),
            ))
        }
        Event::SetClickable {
            position,
            clickable,
        } => engine
            .set_clickable(collection, position, clickable)
            .map(Outcome::Changed),
        Event::SetActivated {
            position,
            activated,
        } => engine
            .set_activated(collection, position, activated)
            .map(Outcome::Changed),
        Event::ClearActivations => {
            let had_any = engine.activated_count() > 0;
            engine.clear_activations();
            Ok(Outcome::Changed(had_any))
        }
        Event::OverlayDismissed => Ok(Outcome::Changed(engine.overlay_dismissed())),
    }
}
