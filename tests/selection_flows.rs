use rowselect::binding::{
    CallbackLog, HostCallback, ListCollection, RecordingHost, RecordingOverlay,
};
use rowselect::engine::TapOutcome;
use rowselect::{ChoiceMode, Identity, Mutation, OverlayHandle, RowSelectError, SelectionEngine};

fn engine(mode: ChoiceMode, log: &CallbackLog) -> SelectionEngine<RecordingHost> {
    SelectionEngine::with_choice_mode(RecordingHost::new(log.clone()), mode)
}

fn with_overlay(mode: ChoiceMode, log: &CallbackLog) -> SelectionEngine<RecordingHost> {
    let mut engine = engine(mode, log);
    engine
        .set_overlay_host(Some(Box::new(RecordingOverlay::new(log.clone()))))
        .unwrap();
    engine
}

#[test]
fn removal_in_front_shifts_survivors_with_their_identities() {
    let log = CallbackLog::new();
    let mut list = ListCollection::with_len(10);
    let mut engine = engine(ChoiceMode::Multiple, &log);
    for position in [1, 4, 7] {
        engine.tap(&list, position).unwrap();
    }

    let mutation = list.remove(3, 2).unwrap();
    engine.on_mutation(&list, mutation);

    assert_eq!(engine.activated_positions(), vec![1, 5]);
    assert_eq!(
        engine.activated_identity(&list, 1).unwrap(),
        Some(Identity::new(1))
    );
    assert_eq!(
        engine.activated_identity(&list, 5).unwrap(),
        Some(Identity::new(7))
    );
    assert_eq!(list.identities()[5], Identity::new(7));
}

#[test]
fn removal_drops_positions_inside_the_range() {
    let log = CallbackLog::new();
    let mut list = ListCollection::with_len(10);
    let mut engine = engine(ChoiceMode::Multiple, &log);
    for position in [2, 5, 8] {
        engine.tap(&list, position).unwrap();
    }

    let mutation = list.remove(4, 3).unwrap();
    let report = engine.on_mutation(&list, mutation);

    assert_eq!(report.dropped_activations, 1);
    assert_eq!(engine.activated_positions(), vec![2, 5]);
    assert_eq!(
        engine.activated_identity(&list, 5).unwrap(),
        Some(Identity::new(8))
    );
}

#[test]
fn insertion_shifts_positions_at_or_after_start() {
    let log = CallbackLog::new();
    let mut list = ListCollection::with_len(6);
    let mut engine = engine(ChoiceMode::Multiple, &log);
    engine.tap(&list, 1).unwrap();
    engine.tap(&list, 3).unwrap();
    engine.set_clickable(&list, 4, false).unwrap();

    let mutation = list.insert(3, 2).unwrap();
    engine.on_mutation(&list, mutation);

    assert_eq!(engine.activated_positions(), vec![1, 5]);
    assert_eq!(engine.non_clickable_positions(), vec![6]);
}

#[test]
fn moves_follow_the_list() {
    let cases: [(Vec<usize>, (usize, usize, usize), Vec<usize>); 3] = [
        (vec![0], (0, 3, 1), vec![3]),
        (vec![1, 2], (0, 3, 1), vec![0, 1]),
        (vec![1, 2], (3, 0, 1), vec![2, 3]),
    ];

    for (before, (from, to, count), after) in cases {
        let log = CallbackLog::new();
        let mut list = ListCollection::with_len(5);
        let mut engine = engine(ChoiceMode::Multiple, &log);
        for &position in &before {
            engine.tap(&list, position).unwrap();
        }

        let mutation = list.move_range(from, to, count).unwrap();
        engine.on_mutation(&list, mutation);

        assert_eq!(engine.activated_positions(), after, "move {from}->{to}");
        for position in after {
            assert_eq!(
                engine.activated_identity(&list, position).unwrap(),
                Some(list.identities()[position]),
                "identity travels with the item at {position}"
            );
        }
    }
}

#[test]
fn reset_clears_everything() {
    let log = CallbackLog::new();
    let mut list = ListCollection::with_len(4);
    let mut engine = engine(ChoiceMode::Multiple, &log);
    engine.tap(&list, 0).unwrap();
    engine.set_clickable(&list, 2, false).unwrap();

    let mutation = list.reset(8);
    engine.on_mutation(&list, mutation);

    assert_eq!(engine.activated_count(), 0);
    assert!(engine.non_clickable_positions().is_empty());
}

#[test]
fn single_mode_keeps_at_most_one_activation() {
    let log = CallbackLog::new();
    let list = ListCollection::with_len(5);
    let mut engine = engine(ChoiceMode::Single, &log);

    for position in [0, 3, 3, 1, 4] {
        engine.tap(&list, position).unwrap();
        assert_eq!(engine.activated_positions(), vec![position]);
    }
}

#[test]
fn none_mode_reports_clicks() {
    let log = CallbackLog::new();
    let list = ListCollection::with_len(2);
    let mut engine = engine(ChoiceMode::None, &log);

    assert_eq!(engine.tap(&list, 1).unwrap(), TapOutcome::Click);
    assert!(log.is_empty());
}

#[test]
fn out_of_range_is_rejected_without_clamping() {
    let log = CallbackLog::new();
    let list = ListCollection::with_len(3);
    let mut engine = engine(ChoiceMode::Multiple, &log);

    for result in [
        engine.tap(&list, 3).map(|_| ()),
        engine.set_clickable(&list, 3, false).map(|_| ()),
        engine.is_activated(&list, 7).map(|_| ()),
    ] {
        assert!(matches!(
            result,
            Err(RowSelectError::OutOfRange { len: 3, .. })
        ));
    }
    assert_eq!(engine.activated_count(), 0);
}

#[test]
fn action_mode_closes_when_last_item_is_deselected() {
    let log = CallbackLog::new();
    let list = ListCollection::with_len(6);
    let mut engine = with_overlay(ChoiceMode::None, &log);

    assert!(engine.long_press(&list, 2).unwrap());
    engine.tap(&list, 4).unwrap();
    engine.tap(&list, 2).unwrap();
    assert!(engine.is_action_mode_active());
    engine.tap(&list, 4).unwrap();

    assert!(!engine.is_action_mode_active());
    let handle = OverlayHandle::new(1);
    assert_eq!(
        log.take(),
        vec![
            HostCallback::EnterOverlay {
                handle: Some(handle)
            },
            HostCallback::PositionChanged { position: 2 },
            HostCallback::ActivationDelta {
                handle,
                position: 2,
                activated: true
            },
            HostCallback::PositionChanged { position: 4 },
            HostCallback::ActivationDelta {
                handle,
                position: 4,
                activated: true
            },
            HostCallback::PositionChanged { position: 2 },
            HostCallback::ActivationDelta {
                handle,
                position: 2,
                activated: false
            },
            HostCallback::PositionChanged { position: 4 },
            HostCallback::ActivationDelta {
                handle,
                position: 4,
                activated: false
            },
            HostCallback::ExitOverlay { handle },
        ]
    );
}

#[test]
fn removing_the_whole_selection_closes_action_mode() {
    let log = CallbackLog::new();
    let mut list = ListCollection::with_len(6);
    let mut engine = with_overlay(ChoiceMode::Multiple, &log);
    engine.long_press(&list, 3).unwrap();
    log.take();

    let mutation = list.remove(2, 3).unwrap();
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
fn long_press_without_overlay_is_not_handled() {
    let log = CallbackLog::new();
    let list = ListCollection::with_len(3);
    let mut engine = engine(ChoiceMode::Multiple, &log);
    engine.tap(&list, 0).unwrap();

    assert!(!engine.long_press(&list, 1).unwrap());
    assert_eq!(engine.activated_positions(), vec![0]);
}

#[test]
fn mode_change_during_action_mode_waits_for_dismissal() {
    let log = CallbackLog::new();
    let list = ListCollection::with_len(4);
    let mut engine = with_overlay(ChoiceMode::Multiple, &log);
    engine.long_press(&list, 0).unwrap();

    engine.set_choice_mode(ChoiceMode::Single);
    assert_eq!(engine.choice_mode(), ChoiceMode::Multiple);
    assert_eq!(engine.pending_choice_mode(), Some(ChoiceMode::Single));

    assert!(engine.overlay_dismissed());
    assert_eq!(engine.choice_mode(), ChoiceMode::Single);
    assert_eq!(engine.activated_count(), 0);
}

#[test]
fn set_clickable_is_idempotent() {
    let log = CallbackLog::new();
    let list = ListCollection::with_len(3);
    let mut engine = engine(ChoiceMode::None, &log);

    assert!(engine.set_clickable(&list, 1, false).unwrap());
    assert!(!engine.set_clickable(&list, 1, false).unwrap());
    assert_eq!(log.changed_positions(), vec![1]);
}

#[test]
fn noop_mutations_change_nothing() {
    let log = CallbackLog::new();
    let list = ListCollection::with_len(5);
    let mut engine = engine(ChoiceMode::Multiple, &log);
    engine.tap(&list, 2).unwrap();

    for mutation in [
        Mutation::Inserted { start: 0, count: 0 },
        Mutation::Removed { start: 1, count: 0 },
        Mutation::Moved {
            from: 2,
            to: 2,
            count: 1,
        },
    ] {
        engine.on_mutation(&list, mutation);
    }

    assert_eq!(engine.activated_positions(), vec![2]);
}
