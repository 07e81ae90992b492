//! Selection engine state and the choice-mode state machine.
//!
//! [`SelectionEngine`] owns the [`SelectionStore`], the configured
//! [`ChoiceMode`], the action-mode state and the optional overlay capability.
//! This file holds the store-facing operations and tap policy; overlay
//! lifecycle and save/restore live in `action_mode.rs`.
//!
//! # Tap policy
//!
//! | effective mode | tap at `p`                                               |
//! |----------------|----------------------------------------------------------|
//! | `None`         | no change, reported as a plain click                     |
//! | `Single`       | activation moves to `p` (no-op if `p` is the only one)   |
//! | `Multiple`     | `p` toggles; forwarded to the overlay while it is open   |
//!
//! Every position whose activated state flips is reported through
//! [`Host::on_position_changed`] before the call returns.

use crate::binding::{BoundCollection, Host, OverlayHost};
use crate::domain::{Identity, Mutation, Position, Result, RowSelectError};
use crate::selection::{RemapReport, SelectionStore};
use std::fmt;

use super::modes::{ActionModeState, ChoiceMode};

/// What a tap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// The position is non-clickable; nothing happened.
    Ignored,

    /// Effective mode is `None`; the host should treat the tap as a plain click.
    Click,

    /// The tap went through choice policy.
    Choice {
        /// Whether the tapped position is activated after the tap.
        activated: bool,
        /// Whether any activation changed.
        changed: bool,
    },
}

/// Selection, interactivity and action-mode state for one bound view.
///
/// Generic over the [`Host`] receiving redraw hints. The bound collection is
/// passed into each call that needs its length or identities, since the
/// collection is owned elsewhere and changes between calls.
///
/// # Example
///
/// ```rust
/// use rowselect::binding::{CallbackLog, ListCollection, RecordingHost};
/// use rowselect::engine::{ChoiceMode, SelectionEngine, TapOutcome};
///
/// let list = ListCollection::with_len(10);
/// let mut engine = SelectionEngine::new(RecordingHost::new(CallbackLog::new()));
/// engine.set_choice_mode(ChoiceMode::Single);
///
/// engine.tap(&list, 2)?;
/// let outcome = engine.tap(&list, 7)?;
///
/// assert_eq!(outcome, TapOutcome::Choice { activated: true, changed: true });
/// assert_eq!(engine.activated_positions(), vec![7]);
/// assert_eq!(engine.host().log().changed_positions(), vec![2, 2, 7]);
/// # Ok::<(), rowselect::RowSelectError>(())
/// ```
pub struct SelectionEngine<H: Host> {
    pub(super) host: H,
    pub(super) store: SelectionStore,
    pub(super) choice_mode: ChoiceMode,
    pub(super) pending_choice_mode: Option<ChoiceMode>,
    pub(super) action_mode: ActionModeState,
    pub(super) overlay: Option<Box<dyn OverlayHost>>,
}

impl<H: Host> SelectionEngine<H> {
    /// Creates an engine with empty state and `ChoiceMode::None`.
    #[must_use]
    pub fn new(host: H) -> Self {
        Self::with_choice_mode(host, ChoiceMode::default())
    }

    #[must_use]
    pub fn with_choice_mode(host: H, choice_mode: ChoiceMode) -> Self {
        Self {
            host,
            store: SelectionStore::new(),
            choice_mode,
            pending_choice_mode: None,
            action_mode: ActionModeState::Inactive,
            overlay: None,
        }
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Read-only view of the underlying store.
    #[must_use]
    pub const fn store(&self) -> &SelectionStore {
        &self.store
    }

    /// Host-configured choice mode.
    #[must_use]
    pub const fn choice_mode(&self) -> ChoiceMode {
        self.choice_mode
    }

    /// Mode requested while the overlay was open, applied once it closes.
    #[must_use]
    pub const fn pending_choice_mode(&self) -> Option<ChoiceMode> {
        self.pending_choice_mode
    }

    /// Mode actually applied to taps: `Multiple` while action mode is active.
    #[must_use]
    pub const fn effective_choice_mode(&self) -> ChoiceMode {
        if self.action_mode.is_active() {
            ChoiceMode::Multiple
        } else {
            self.choice_mode
        }
    }

    #[must_use]
    pub const fn action_mode(&self) -> ActionModeState {
        self.action_mode
    }

    #[must_use]
    pub const fn is_action_mode_active(&self) -> bool {
        self.action_mode.is_active()
    }

    /// # Errors
    ///
    /// `OutOfRange` if `position` is not in `[0, collection.len())`.
    pub fn is_activated<C: BoundCollection + ?Sized>(
        &self,
        collection: &C,
        position: Position,
    ) -> Result<bool> {
        check_position(collection, position)?;
        Ok(self.store.is_activated(position))
    }

    /// Identity recorded when `position` was activated, `None` if it is not.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `position` is not in `[0, collection.len())`.
    pub fn activated_identity<C: BoundCollection + ?Sized>(
        &self,
        collection: &C,
        position: Position,
    ) -> Result<Option<Identity>> {
        check_position(collection, position)?;
        Ok(self.store.identity(position))
    }

    #[must_use]
    pub fn activated_positions(&self) -> Vec<Position> {
        self.store.activated_positions()
    }

    #[must_use]
    pub fn activated_identities(&self) -> Vec<Identity> {
        self.store.activated_identities()
    }

    #[must_use]
    pub fn activated_count(&self) -> usize {
        self.store.activated_count()
    }

    /// # Errors
    ///
    /// `OutOfRange` if `position` is not in `[0, collection.len())`.
    pub fn is_clickable<C: BoundCollection + ?Sized>(
        &self,
        collection: &C,
        position: Position,
    ) -> Result<bool> {
        check_position(collection, position)?;
        Ok(self.store.is_clickable(position))
    }

    #[must_use]
    pub fn non_clickable_positions(&self) -> Vec<Position> {
        self.store.non_clickable_positions()
    }

    /// Marks `position` clickable or not. Returns `true` if the state flipped.
    ///
    /// A redraw hint is emitted only on a flip, so repeating a call is silent.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `position` is not in `[0, collection.len())`.
    pub fn set_clickable<C: BoundCollection + ?Sized>(
        &mut self,
        collection: &C,
        position: Position,
        clickable: bool,
    ) -> Result<bool> {
        check_position(collection, position)?;
        let flipped = self.store.set_clickable(position, clickable);
        if flipped {
            tracing::debug!(position, clickable, "clickability changed");
            self.host.on_position_changed(position);
        }
        Ok(flipped)
    }

    /// Sets the activated state of `position` under the effective choice mode.
    ///
    /// - `None`: ignored.
    /// - `Single`: activating clears any other activation first.
    /// - `Multiple`: only `position` changes.
    ///
    /// Returns `true` if any activation changed.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `position` is not in `[0, collection.len())`.
    pub fn set_activated<C: BoundCollection + ?Sized>(
        &mut self,
        collection: &C,
        position: Position,
        activated: bool,
    ) -> Result<bool> {
        check_position(collection, position)?;
        let _span = tracing::debug_span!("set_activated",
            position,
            activated,
            mode = %self.effective_choice_mode()
        )
        .entered();

        let changed = match self.effective_choice_mode() {
            ChoiceMode::None => {
                tracing::debug!("choice mode is none, ignoring");
                false
            }
            ChoiceMode::Single if activated => {
                let others: Vec<_> = self
                    .store
                    .activated_positions()
                    .into_iter()
                    .filter(|&p| p != position)
                    .collect();
                let mut changed = false;
                for other in others {
                    changed |= self.deactivate(other);
                }
                changed | self.activate(collection, position)
            }
            ChoiceMode::Single | ChoiceMode::Multiple => {
                if activated {
                    self.activate(collection, position)
                } else {
                    self.deactivate(position)
                }
            }
        };

        self.finish_if_empty();
        Ok(changed)
    }

    /// Flips the activated state of `position`. Returns the new state.
    ///
    /// In `None` mode nothing changes and the current state (always `false`
    /// outside restored snapshots) is returned.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `position` is not in `[0, collection.len())`.
    pub fn toggle_activated<C: BoundCollection + ?Sized>(
        &mut self,
        collection: &C,
        position: Position,
    ) -> Result<bool> {
        let current = self.is_activated(collection, position)?;
        self.set_activated(collection, position, !current)?;
        Ok(self.store.is_activated(position))
    }

    /// Applies a tap at `position`.
    ///
    /// Non-clickable positions are ignored. Otherwise the tap follows the
    /// effective choice mode: `None` reports a plain click, `Single` moves the
    /// activation to `position` (never deactivating it), `Multiple` toggles.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `position` is not in `[0, collection.len())`.
    pub fn tap<C: BoundCollection + ?Sized>(
        &mut self,
        collection: &C,
        position: Position,
    ) -> Result<TapOutcome> {
        check_position(collection, position)?;
        if !self.store.is_clickable(position) {
            tracing::debug!(position, "tap on non-clickable position ignored");
            return Ok(TapOutcome::Ignored);
        }

        let changed = match self.effective_choice_mode() {
            ChoiceMode::None => return Ok(TapOutcome::Click),
            ChoiceMode::Single => self.set_activated(collection, position, true)?,
            ChoiceMode::Multiple => {
                let activated = !self.store.is_activated(position);
                self.set_activated(collection, position, activated)?
            }
        };

        Ok(TapOutcome::Choice {
            activated: self.store.is_activated(position),
            changed,
        })
    }

    /// Changes the configured choice mode.
    ///
    /// While action mode is inactive this clears every activation. While it is
    /// active the change is recorded and applied when the overlay closes.
    pub fn set_choice_mode(&mut self, mode: ChoiceMode) {
        if self.action_mode.is_active() {
            tracing::debug!(requested = %mode, "action mode active, deferring choice mode change");
            self.pending_choice_mode = Some(mode);
            return;
        }

        tracing::debug!(from = %self.choice_mode, to = %mode, "choice mode changed");
        self.clear_and_notify();
        self.choice_mode = mode;
        self.pending_choice_mode = None;
    }

    /// Clears every activation, reporting each cleared position.
    ///
    /// While action mode is active this also ends the overlay, since the
    /// selection is now empty.
    pub fn clear_activations(&mut self) {
        if self.action_mode.is_active() {
            let positions = self.store.activated_positions();
            for position in positions {
                self.deactivate(position);
            }
            self.finish_if_empty();
        } else {
            self.clear_and_notify();
        }
    }

    /// Remaps held positions after the bound collection changed.
    ///
    /// `collection` must already reflect the mutation. Positions that would land
    /// at or beyond its length are dropped, so a mutation that does not match
    /// the collection never leaves stale positions behind.
    ///
    /// No redraw hints are emitted; the host redraws mutated ranges itself. If
    /// the mutation leaves action mode with nothing activated, the overlay is
    /// closed.
    pub fn on_mutation<C: BoundCollection + ?Sized>(
        &mut self,
        collection: &C,
        mutation: Mutation,
    ) -> RemapReport {
        let _span = tracing::debug_span!("on_mutation", mutation = ?mutation, len = collection.len())
            .entered();
        let report = self.store.apply_mutation(mutation, collection.len());
        if report.dropped_activations > 0 {
            tracing::debug!(
                dropped = report.dropped_activations,
                remaining = self.store.activated_count(),
                "activations dropped by mutation"
            );
        }
        self.finish_if_empty();
        report
    }

    /// Activates `position` if it is not already. Emits redraw and overlay delta.
    pub(super) fn activate<C: BoundCollection + ?Sized>(
        &mut self,
        collection: &C,
        position: Position,
    ) -> bool {
        if self.store.is_activated(position) {
            return false;
        }
        let identity = collection.identity_at(position);
        self.store.activate(position, identity);
        tracing::debug!(position, %identity, "activated");
        self.host.on_position_changed(position);
        self.forward_delta(position, true);
        true
    }

    /// Deactivates `position` if it is activated. Emits redraw and overlay delta.
    pub(super) fn deactivate(&mut self, position: Position) -> bool {
        if self.store.deactivate(position).is_none() {
            return false;
        }
        tracing::debug!(position, "deactivated");
        self.host.on_position_changed(position);
        self.forward_delta(position, false);
        true
    }

    /// Clears the store without overlay deltas, reporting each cleared position.
    pub(super) fn clear_and_notify(&mut self) -> usize {
        let cleared = self.store.clear_activated();
        for &position in &cleared {
            self.host.on_position_changed(position);
        }
        cleared.len()
    }

    fn forward_delta(&mut self, position: Position, activated: bool) {
        if let (ActionModeState::Active(handle), Some(overlay)) =
            (self.action_mode, self.overlay.as_mut())
        {
            overlay.on_activation_delta(handle, position, activated);
        }
    }
}

impl<H: Host + fmt::Debug> fmt::Debug for SelectionEngine<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionEngine")
            .field("host", &self.host)
            .field("store", &self.store)
            .field("choice_mode", &self.choice_mode)
            .field("pending_choice_mode", &self.pending_choice_mode)
            .field("action_mode", &self.action_mode)
            .field("has_overlay_host", &self.overlay.is_some())
            .finish()
    }
}

/// Rejects positions outside the collection's current bounds.
pub(super) fn check_position<C: BoundCollection + ?Sized>(
    collection: &C,
    position: Position,
) -> Result<()> {
    let len = collection.len();
    if position < len {
        Ok(())
    } else {
        Err(RowSelectError::OutOfRange { position, len })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{CallbackLog, ListCollection, RecordingHost};

    fn engine(mode: ChoiceMode) -> SelectionEngine<RecordingHost> {
        SelectionEngine::with_choice_mode(RecordingHost::new(CallbackLog::new()), mode)
    }

    #[test]
    fn none_mode_reports_plain_click() {
        let list = ListCollection::with_len(3);
        let mut engine = engine(ChoiceMode::None);

        assert_eq!(engine.tap(&list, 1).unwrap(), TapOutcome::Click);
        assert_eq!(engine.activated_count(), 0);
        assert!(engine.host().log().is_empty());
    }

    #[test]
    fn single_mode_retap_is_noop() {
        let list = ListCollection::with_len(3);
        let mut engine = engine(ChoiceMode::Single);
        engine.tap(&list, 1).unwrap();
        engine.host().log().take();

        let outcome = engine.tap(&list, 1).unwrap();

        assert_eq!(
            outcome,
            TapOutcome::Choice {
                activated: true,
                changed: false
            }
        );
        assert!(engine.host().log().is_empty());
    }

    #[test]
    fn single_mode_stays_exclusive() {
        let list = ListCollection::with_len(6);
        let mut engine = engine(ChoiceMode::Single);
        for position in [3, 0, 5, 5, 2, 4, 0] {
            engine.tap(&list, position).unwrap();
            assert!(engine.activated_count() <= 1);
            assert_eq!(engine.activated_positions(), vec![position]);
        }
    }

    #[test]
    fn multiple_mode_toggles() {
        let list = ListCollection::with_len(4);
        let mut engine = engine(ChoiceMode::Multiple);

        engine.tap(&list, 1).unwrap();
        engine.tap(&list, 3).unwrap();
        let outcome = engine.tap(&list, 1).unwrap();

        assert_eq!(
            outcome,
            TapOutcome::Choice {
                activated: false,
                changed: true
            }
        );
        assert_eq!(engine.activated_positions(), vec![3]);
        assert_eq!(engine.host().log().changed_positions(), vec![1, 3, 1]);
    }

    #[test]
    fn out_of_range_leaves_state_untouched() {
        let list = ListCollection::with_len(2);
        let mut engine = engine(ChoiceMode::Multiple);

        let err = engine.tap(&list, 2).unwrap_err();

        assert!(matches!(
            err,
            RowSelectError::OutOfRange {
                position: 2,
                len: 2
            }
        ));
        assert!(engine.is_activated(&list, 5).is_err());
        assert!(engine.set_clickable(&list, 9, false).is_err());
        assert!(engine.host().log().is_empty());
    }

    #[test]
    fn set_clickable_twice_emits_once() {
        let list = ListCollection::with_len(4);
        let mut engine = engine(ChoiceMode::None);

        assert!(engine.set_clickable(&list, 2, false).unwrap());
        assert!(!engine.set_clickable(&list, 2, false).unwrap());

        assert_eq!(engine.host().log().changed_positions(), vec![2]);
        assert!(!engine.is_clickable(&list, 2).unwrap());
    }

    #[test]
    fn non_clickable_tap_is_ignored() {
        let list = ListCollection::with_len(4);
        let mut engine = engine(ChoiceMode::Multiple);
        engine.set_clickable(&list, 1, false).unwrap();

        assert_eq!(engine.tap(&list, 1).unwrap(), TapOutcome::Ignored);
        assert_eq!(engine.activated_count(), 0);
    }

    #[test]
    fn changing_mode_clears_and_reports() {
        let list = ListCollection::with_len(5);
        let mut engine = engine(ChoiceMode::Multiple);
        engine.tap(&list, 4).unwrap();
        engine.tap(&list, 0).unwrap();
        engine.host().log().take();

        engine.set_choice_mode(ChoiceMode::Single);

        assert_eq!(engine.choice_mode(), ChoiceMode::Single);
        assert_eq!(engine.activated_count(), 0);
        assert_eq!(engine.host().log().changed_positions(), vec![0, 4]);
    }

    #[test]
    fn toggle_in_single_mode_can_deactivate() {
        let list = ListCollection::with_len(3);
        let mut engine = engine(ChoiceMode::Single);

        assert!(engine.toggle_activated(&list, 2).unwrap());
        assert!(!engine.toggle_activated(&list, 2).unwrap());
        assert_eq!(engine.activated_count(), 0);
    }

    #[test]
    fn activation_records_collection_identity() {
        let list = ListCollection::from_identities(vec![
            Identity::new(100),
            Identity::new(200),
            Identity::new(300),
        ]);
        let mut engine = engine(ChoiceMode::Multiple);
        engine.tap(&list, 2).unwrap();

        assert_eq!(
            engine.activated_identity(&list, 2).unwrap(),
            Some(Identity::new(300))
        );
        assert_eq!(engine.activated_identities(), vec![Identity::new(300)]);
    }

    #[test]
    fn mutation_remaps_activated_positions() {
        let mut list = ListCollection::with_len(10);
        let mut engine = engine(ChoiceMode::Multiple);
        for position in [1, 4, 7] {
            engine.tap(&list, position).unwrap();
        }
        let a = list.identity_at(1);
        let c = list.identity_at(7);

        let mutation = list.remove(3, 2).unwrap();
        engine.on_mutation(&list, mutation);

        assert_eq!(engine.store().activated_entries(), vec![(1, a), (5, c)]);
        assert_eq!(list.identity_at(5), c);
    }

    #[test]
    fn mismatched_mutation_never_exposes_positions_past_the_end() {
        let list = ListCollection::with_len(5);
        let mut engine = engine(ChoiceMode::Multiple);
        for position in [0, 3, 4] {
            engine.tap(&list, position).unwrap();
        }
        engine.set_clickable(&list, 2, false).unwrap();

        for mutation in [
            Mutation::Moved { from: 0, to: 8, count: 1 },
            Mutation::Inserted { start: 1, count: usize::MAX },
            Mutation::Inserted { start: 0, count: 3 },
        ] {
            engine.on_mutation(&list, mutation);
            assert!(engine.activated_positions().iter().all(|&p| p < list.len()));
            assert!(engine.non_clickable_positions().iter().all(|&p| p < list.len()));
        }
        assert!(engine.is_activated(&list, 2).is_ok());
    }
}
