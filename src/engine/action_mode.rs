//! Action-mode controller: overlay lifecycle and state persistence.
//!
//! ```text
//!            long-press (capability registered, host accepts)
//!  Inactive ─────────────────────────────────────────────────▶ Active(handle)
//!     ▲                                                            │
//!     └──────── host dismissal  OR  nothing left activated ───────┘
//! ```
//!
//! Entering clears any prior selection and activates the long-pressed
//! position. Leaving applies any choice-mode change deferred while the overlay
//! was open.

use crate::binding::{BoundCollection, Host, OverlayHost};
use crate::domain::{Position, Result, RowSelectError};
use crate::selection::SelectionStore;

use super::modes::ActionModeState;
use super::snapshot::{SavedState, SNAPSHOT_VERSION};
use super::state::{check_position, SelectionEngine};

impl<H: Host> SelectionEngine<H> {
    /// Registers (or removes, with `None`) the overlay capability.
    ///
    /// # Errors
    ///
    /// `InvalidStateTransition` while action mode is active; the current
    /// capability stays registered.
    pub fn set_overlay_host(&mut self, overlay: Option<Box<dyn OverlayHost>>) -> Result<()> {
        if self.action_mode.is_active() {
            return Err(RowSelectError::InvalidStateTransition(
                "cannot replace the overlay host while action mode is active".to_string(),
            ));
        }
        tracing::debug!(registered = overlay.is_some(), "overlay host updated");
        self.overlay = overlay;
        Ok(())
    }

    #[must_use]
    pub fn has_overlay_host(&self) -> bool {
        self.overlay.is_some()
    }

    /// Handles a long-press at `position`. Returns `true` if it was consumed.
    ///
    /// Consumed only when action mode is inactive, the position is clickable, an
    /// overlay capability is registered and the host agrees to open the
    /// overlay. In that case every prior activation is cleared and `position`
    /// becomes the first activation of the overlay. Otherwise nothing changes
    /// and the host should run its default long-press behavior.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `position` is not in `[0, collection.len())`.
    pub fn long_press<C: BoundCollection + ?Sized>(
        &mut self,
        collection: &C,
        position: Position,
    ) -> Result<bool> {
        check_position(collection, position)?;
        let _span = tracing::debug_span!("long_press", position).entered();

        if self.action_mode.is_active() {
            tracing::debug!("action mode already active");
            return Ok(false);
        }
        if !self.store.is_clickable(position) {
            tracing::debug!("position not clickable");
            return Ok(false);
        }
        let Some(overlay) = self.overlay.as_mut() else {
            tracing::debug!("no overlay host registered");
            return Ok(false);
        };
        let Some(handle) = overlay.request_enter_overlay() else {
            tracing::debug!("overlay host declined");
            return Ok(false);
        };

        let cleared = self.clear_and_notify();
        self.action_mode = ActionModeState::Active(handle);
        tracing::debug!(handle = handle.get(), cleared, "action mode entered");
        self.activate(collection, position);
        Ok(true)
    }

    /// The host closed the overlay (for example the user dismissed it).
    ///
    /// Clears every activation and reports each cleared position. Returns
    /// `false` if action mode was not active. The host is not asked to exit
    /// again.
    pub fn overlay_dismissed(&mut self) -> bool {
        let ActionModeState::Active(handle) = self.action_mode else {
            return false;
        };
        self.action_mode = ActionModeState::Inactive;
        let cleared = self.clear_and_notify();
        tracing::debug!(handle = handle.get(), cleared, "action mode dismissed by host");
        self.apply_pending_choice_mode();
        true
    }

    /// Captures the state needed to rebuild this engine after host recreation.
    #[must_use]
    pub fn save_state(&self) -> SavedState {
        let (activated_positions, activated_identities) =
            self.store.activated_entries().into_iter().unzip();
        SavedState {
            version: SNAPSHOT_VERSION,
            choice_mode: self.choice_mode,
            pending_choice_mode: self.pending_choice_mode,
            activated_positions,
            activated_identities,
            non_clickable_positions: self.store.non_clickable_positions(),
            action_mode_active: self.action_mode.is_active(),
        }
    }

    /// Replaces the engine state with `state`.
    ///
    /// Positions, identities and choice modes are taken verbatim. If the
    /// snapshot was saved with action mode active (and with something
    /// activated), the overlay is re-entered through the currently registered
    /// capability; without one, or if the host declines, the engine stays
    /// inactive and keeps any deferred choice mode pending. No redraw hints are
    /// emitted: the host redraws after restore.
    ///
    /// # Errors
    ///
    /// `InvalidSnapshot` if `state` fails [`SavedState::validate`]. The engine is
    /// untouched in that case.
    pub fn restore_state(&mut self, state: &SavedState) -> Result<()> {
        state.validate()?;
        let _span = tracing::debug_span!("restore_state",
            activated = state.activated_positions.len(),
            non_clickable = state.non_clickable_positions.len(),
            action_mode_active = state.action_mode_active
        )
        .entered();

        if let ActionModeState::Active(handle) = self.action_mode {
            tracing::debug!(handle = handle.get(), "closing current overlay before restore");
            self.action_mode = ActionModeState::Inactive;
            if let Some(overlay) = self.overlay.as_mut() {
                overlay.request_exit_overlay(handle);
            }
        }

        self.store = SelectionStore::from_parts(
            state.activated_entries(),
            state.non_clickable_positions.iter().copied(),
        );
        self.choice_mode = state.choice_mode;
        self.pending_choice_mode = state.pending_choice_mode;

        if !state.action_mode_active {
            return Ok(());
        }

        if !self.store.has_activations() {
            tracing::debug!("snapshot active with empty selection, staying inactive");
        } else if let Some(overlay) = self.overlay.as_mut() {
            if let Some(handle) = overlay.request_enter_overlay() {
                self.action_mode = ActionModeState::Active(handle);
                tracing::debug!(handle = handle.get(), "action mode restored");
                return Ok(());
            }
            tracing::warn!("overlay host declined to restore action mode");
        } else {
            tracing::warn!("no overlay host registered, action mode not restored");
        }

        // selection and modes stay verbatim; a pending mode waits for the next
        // overlay close or explicit mode change
        Ok(())
    }

    /// Ends action mode from the engine side once nothing is activated.
    pub(super) fn finish_if_empty(&mut self) {
        let ActionModeState::Active(handle) = self.action_mode else {
            return;
        };
        if self.store.has_activations() {
            return;
        }

        self.action_mode = ActionModeState::Inactive;
        tracing::debug!(handle = handle.get(), "selection empty, leaving action mode");
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.request_exit_overlay(handle);
        }
        self.apply_pending_choice_mode();
    }

    fn apply_pending_choice_mode(&mut self) {
        if let Some(mode) = self.pending_choice_mode.take() {
            self.set_choice_mode(mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::binding::{
        CallbackLog, HostCallback, ListCollection, OverlayHandle, RecordingHost, RecordingOverlay,
    };
    use crate::engine::{ChoiceMode, SelectionEngine, TapOutcome};
    use crate::RowSelectError;

    fn setup(mode: ChoiceMode) -> (SelectionEngine<RecordingHost>, CallbackLog) {
        let log = CallbackLog::new();
        let mut engine = SelectionEngine::with_choice_mode(RecordingHost::new(log.clone()), mode);
        engine
            .set_overlay_host(Some(Box::new(RecordingOverlay::new(log.clone()))))
            .unwrap();
        (engine, log)
    }

    #[test]
    fn long_press_without_capability_is_not_handled() {
        let list = ListCollection::with_len(5);
        let mut engine =
            SelectionEngine::with_choice_mode(RecordingHost::default(), ChoiceMode::Single);

        assert!(!engine.long_press(&list, 1).unwrap());
        assert!(!engine.is_action_mode_active());
    }

    #[test]
    fn long_press_enters_and_discards_prior_selection() {
        let list = ListCollection::with_len(5);
        let (mut engine, log) = setup(ChoiceMode::Single);
        engine.tap(&list, 3).unwrap();
        log.take();

        assert!(engine.long_press(&list, 1).unwrap());

        let handle = OverlayHandle::new(1);
        assert_eq!(
            log.take(),
            vec![
                HostCallback::EnterOverlay {
                    handle: Some(handle)
                },
                HostCallback::PositionChanged { position: 3 },
                HostCallback::PositionChanged { position: 1 },
                HostCallback::ActivationDelta {
                    handle,
                    position: 1,
                    activated: true
                },
            ]
        );
        assert_eq!(engine.activated_positions(), vec![1]);
        assert_eq!(engine.effective_choice_mode(), ChoiceMode::Multiple);
        assert_eq!(engine.choice_mode(), ChoiceMode::Single);
    }

    #[test]
    fn second_long_press_is_not_handled() {
        let list = ListCollection::with_len(5);
        let (mut engine, _log) = setup(ChoiceMode::None);
        assert!(engine.long_press(&list, 0).unwrap());
        assert!(!engine.long_press(&list, 2).unwrap());
        assert_eq!(engine.activated_positions(), vec![0]);
    }

    #[test]
    fn declined_overlay_leaves_state_alone() {
        let list = ListCollection::with_len(5);
        let log = CallbackLog::new();
        let mut engine =
            SelectionEngine::with_choice_mode(RecordingHost::new(log.clone()), ChoiceMode::Single);
        engine
            .set_overlay_host(Some(Box::new(RecordingOverlay::declining(log.clone()))))
            .unwrap();
        engine.tap(&list, 2).unwrap();

        assert!(!engine.long_press(&list, 4).unwrap());
        assert_eq!(engine.activated_positions(), vec![2]);
        assert!(!engine.is_action_mode_active());
    }

    #[test]
    fn deactivating_last_position_closes_overlay() {
        let list = ListCollection::with_len(5);
        let (mut engine, log) = setup(ChoiceMode::None);
        engine.long_press(&list, 2).unwrap();
        log.take();

        let outcome = engine.tap(&list, 2).unwrap();

        assert_eq!(
            outcome,
            TapOutcome::Choice {
                activated: false,
                changed: true
            }
        );
        assert!(!engine.is_action_mode_active());
        assert_eq!(engine.activated_count(), 0);
        let handle = OverlayHandle::new(1);
        assert_eq!(
            log.take(),
            vec![
                HostCallback::PositionChanged { position: 2 },
                HostCallback::ActivationDelta {
                    handle,
                    position: 2,
                    activated: false
                },
                HostCallback::ExitOverlay { handle },
            ]
        );
    }

    #[test]
    fn taps_while_active_are_forwarded() {
        let list = ListCollection::with_len(6);
        let (mut engine, log) = setup(ChoiceMode::Single);
        engine.long_press(&list, 0).unwrap();
        log.take();

        engine.tap(&list, 4).unwrap();
        engine.tap(&list, 5).unwrap();

        assert_eq!(engine.activated_positions(), vec![0, 4, 5]);
        let deltas = log
            .take()
            .into_iter()
            .filter(|cb| matches!(cb, HostCallback::ActivationDelta { .. }))
            .count();
        assert_eq!(deltas, 2);
    }

    #[test]
    fn host_dismissal_clears_and_reports() {
        let list = ListCollection::with_len(6);
        let (mut engine, log) = setup(ChoiceMode::None);
        engine.long_press(&list, 1).unwrap();
        engine.tap(&list, 3).unwrap();
        log.take();

        assert!(engine.overlay_dismissed());

        assert!(!engine.is_action_mode_active());
        assert_eq!(engine.activated_count(), 0);
        assert_eq!(log.changed_positions(), vec![1, 3]);
        assert!(!log
            .snapshot()
            .iter()
            .any(|cb| matches!(cb, HostCallback::ExitOverlay { .. })));
        assert!(!engine.overlay_dismissed());
    }

    #[test]
    fn mode_change_is_deferred_until_overlay_closes() {
        let list = ListCollection::with_len(6);
        let (mut engine, _log) = setup(ChoiceMode::None);
        engine.long_press(&list, 1).unwrap();

        engine.set_choice_mode(ChoiceMode::Single);
        assert_eq!(engine.choice_mode(), ChoiceMode::None);
        assert_eq!(engine.pending_choice_mode(), Some(ChoiceMode::Single));
        assert_eq!(engine.activated_positions(), vec![1]);

        engine.tap(&list, 1).unwrap();

        assert_eq!(engine.choice_mode(), ChoiceMode::Single);
        assert_eq!(engine.pending_choice_mode(), None);
    }

    #[test]
    fn replacing_overlay_host_while_active_fails() {
        let list = ListCollection::with_len(3);
        let (mut engine, _log) = setup(ChoiceMode::None);
        engine.long_press(&list, 0).unwrap();

        let err = engine.set_overlay_host(None).unwrap_err();

        assert!(matches!(err, RowSelectError::InvalidStateTransition(_)));
        assert!(engine.has_overlay_host());
        assert!(engine.is_action_mode_active());
    }

    #[test]
    fn mutation_removing_every_activation_closes_overlay() {
        let mut list = ListCollection::with_len(6);
        let (mut engine, log) = setup(ChoiceMode::None);
        engine.long_press(&list, 2).unwrap();
        engine.tap(&list, 3).unwrap();
        log.take();

        let mutation = list.remove(1, 4).unwrap();
        engine.on_mutation(&list, mutation);

        assert!(!engine.is_action_mode_active());
        assert_eq!(
            log.take(),
            vec![HostCallback::ExitOverlay {
                handle: OverlayHandle::new(1)
            }]
        );
    }

    #[test]
    fn clear_activations_while_active_closes_overlay() {
        let list = ListCollection::with_len(4);
        let (mut engine, _log) = setup(ChoiceMode::None);
        engine.long_press(&list, 2).unwrap();
        engine.tap(&list, 0).unwrap();

        engine.clear_activations();

        assert!(!engine.is_action_mode_active());
        assert_eq!(engine.activated_count(), 0);
    }

    #[test]
    fn restore_round_trips_with_capability() {
        let list = ListCollection::with_len(8);
        let (mut engine, _log) = setup(ChoiceMode::Multiple);
        engine.set_clickable(&list, 6, false).unwrap();
        engine.long_press(&list, 2).unwrap();
        engine.tap(&list, 5).unwrap();
        let saved = engine.save_state();

        let (mut recreated, log) = setup(ChoiceMode::None);
        recreated.restore_state(&saved).unwrap();

        assert_eq!(recreated.store(), engine.store());
        assert_eq!(recreated.choice_mode(), ChoiceMode::Multiple);
        assert!(recreated.is_action_mode_active());
        assert_eq!(recreated.save_state(), saved);
        assert_eq!(
            log.take(),
            vec![HostCallback::EnterOverlay {
                handle: Some(OverlayHandle::new(1))
            }]
        );
    }

    #[test]
    fn restore_without_capability_reverts_to_inactive() {
        let list = ListCollection::with_len(8);
        let (mut engine, _log) = setup(ChoiceMode::None);
        engine.long_press(&list, 3).unwrap();
        let saved = engine.save_state();

        let mut recreated = SelectionEngine::new(RecordingHost::default());
        recreated.restore_state(&saved).unwrap();

        assert!(!recreated.is_action_mode_active());
        assert_eq!(recreated.activated_positions(), vec![3]);
    }

    #[test]
    fn restore_without_capability_keeps_pending_mode_and_selection() {
        let list = ListCollection::with_len(6);
        let (mut engine, _log) = setup(ChoiceMode::Multiple);
        engine.long_press(&list, 1).unwrap();
        engine.tap(&list, 4).unwrap();
        engine.set_choice_mode(ChoiceMode::Single);
        let saved = engine.save_state();

        let log = CallbackLog::new();
        let mut recreated = SelectionEngine::new(RecordingHost::new(log.clone()));
        recreated.restore_state(&saved).unwrap();

        assert!(!recreated.is_action_mode_active());
        assert_eq!(recreated.activated_positions(), vec![1, 4]);
        assert_eq!(recreated.choice_mode(), ChoiceMode::Multiple);
        assert_eq!(recreated.pending_choice_mode(), Some(ChoiceMode::Single));
        assert!(log.is_empty());

        recreated.set_choice_mode(ChoiceMode::None);
        assert_eq!(recreated.pending_choice_mode(), None);
        assert_eq!(recreated.activated_count(), 0);
    }

    #[test]
    fn declined_restore_applies_pending_mode_at_next_close() {
        let list = ListCollection::with_len(6);
        let (mut engine, _log) = setup(ChoiceMode::None);
        engine.long_press(&list, 2).unwrap();
        engine.set_choice_mode(ChoiceMode::Single);
        let saved = engine.save_state();

        let log = CallbackLog::new();
        let mut recreated = SelectionEngine::new(RecordingHost::new(log.clone()));
        recreated
            .set_overlay_host(Some(Box::new(RecordingOverlay::declining(log.clone()))))
            .unwrap();
        recreated.restore_state(&saved).unwrap();
        assert_eq!(recreated.activated_positions(), vec![2]);
        assert_eq!(recreated.choice_mode(), ChoiceMode::None);

        recreated
            .set_overlay_host(Some(Box::new(RecordingOverlay::new(log.clone()))))
            .unwrap();
        assert!(recreated.long_press(&list, 5).unwrap());
        assert!(recreated.overlay_dismissed());

        assert_eq!(recreated.choice_mode(), ChoiceMode::Single);
        assert_eq!(recreated.pending_choice_mode(), None);
    }

    #[test]
    fn invalid_snapshot_leaves_engine_untouched() {
        let list = ListCollection::with_len(4);
        let (mut engine, _log) = setup(ChoiceMode::Multiple);
        engine.tap(&list, 1).unwrap();
        let mut bad = engine.save_state();
        bad.activated_identities.clear();

        assert!(engine.restore_state(&bad).is_err());
        assert_eq!(engine.activated_positions(), vec![1]);
    }
}
