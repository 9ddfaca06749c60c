//! Property-based tests for the activity stack.
//!
//! Random launches, finishes and completions are thrown at a manager whose
//! activities defer their teardown or finish themselves mid-lifecycle. The
//! standard invariants must hold after every operation.

use std::collections::HashSet;

use actstack_core::{ActivityManager, LaunchMode, LifecycleError, LifecycleState};
use actstack_harness::{
    Behavior, InvariantRegistry, Journal, RecordingFactory, StackSnapshot, init_tracing,
};
use proptest::prelude::*;

/// Plain activity.
const PLAIN: u8 = 0;
/// Defers its teardown until its parked token is returned.
const DEFERRED: u8 = 1;
/// Finishes itself from `on_create`.
const TRANSIENT: u8 = 2;
/// Finishes itself whenever it is paused.
const FRAGILE: u8 = 3;

#[derive(Debug, Clone)]
enum Op {
    Start { kind: u8, mode: Option<LaunchMode> },
    Finish { slot: usize },
    Complete { slot: usize },
}

fn mode_strategy() -> impl Strategy<Value = Option<LaunchMode>> {
    prop_oneof![
        Just(None),
        Just(Some(LaunchMode::STANDARD)),
        Just(Some(LaunchMode::SINGLE_TOP)),
        Just(Some(LaunchMode::SINGLE_INSTANCE)),
        Just(Some(LaunchMode::SINGLE_INSTANCE | LaunchMode::CLEAR_TOP)),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..4u8, mode_strategy()).prop_map(|(kind, mode)| Op::Start { kind, mode }),
        3 => any::<usize>().prop_map(|slot| Op::Finish { slot }),
        1 => any::<usize>().prop_map(|slot| Op::Complete { slot }),
    ]
}

fn manager() -> (ActivityManager<u8, ()>, Journal<u8>) {
    init_tracing();
    let journal = Journal::new();
    let factory = RecordingFactory::new(journal.clone())
        .with_behavior(PLAIN, Behavior::plain())
        .with_behavior(DEFERRED, Behavior::deferred())
        .with_behavior(TRANSIENT, Behavior::finish_self_on(LifecycleState::Create))
        .with_behavior(FRAGILE, Behavior::finish_self_on(LifecycleState::Pause));
    (ActivityManager::new(factory), journal)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: every operation leaves the stack in a consistent shape, and
    /// the only error ever raised is finishing a frame already in DESTROY.
    #[test]
    fn prop_invariants_hold_after_every_operation(
        ops in prop::collection::vec(op_strategy(), 0..60)
    ) {
        let (mut manager, journal) = manager();
        let registry = InvariantRegistry::standard();

        for (i, op) in ops.iter().enumerate() {
            let result = match op {
                Op::Start { kind, mode } => manager.start(*kind, *mode, None).map(|_| ()),
                Op::Finish { slot } => {
                    let frames = manager.frames();
                    if frames.is_empty() {
                        Ok(())
                    } else {
                        manager.finish(frames[slot % frames.len()].id)
                    }
                },
                Op::Complete { slot } => {
                    let parked = journal.parked();
                    if !parked.is_empty() {
                        if let Some(done) = journal.take_completion(parked[slot % parked.len()]) {
                            manager.complete_destroy(done);
                        }
                    }
                    Ok(())
                },
            };

            if let Err(err) = &result {
                let pending = matches!(
                    err,
                    LifecycleError::InvalidTransition { from: LifecycleState::Destroy, .. }
                );
                prop_assert!(pending, "Unexpected error at operation {}: {:?} -> {}", i, op, err);
            }

            let checked = registry.check_all(&StackSnapshot::capture(&manager));
            prop_assert!(
                checked.is_ok(),
                "Invariant violation at operation {}: {:?}\n{:?}\nStack: {:?}",
                i, op, checked, manager
            );
        }
    }

    /// Property: transient activities never stay on the stack.
    #[test]
    fn prop_transient_never_remains(
        modes in prop::collection::vec(mode_strategy(), 1..20)
    ) {
        let (mut manager, _journal) = manager();
        manager.start(PLAIN, None, None)?;

        for mode in modes {
            let id = manager.start(TRANSIENT, mode, None)?;
            prop_assert!(!manager.contains(id));
        }

        prop_assert_eq!(manager.count(), 1);
        prop_assert_eq!(manager.frames()[0].state, LifecycleState::Resume);
    }

    /// Property: single-instance launches never duplicate a live kind.
    #[test]
    fn prop_single_instance_is_unique(
        kinds in prop::collection::vec(prop_oneof![Just(PLAIN), Just(DEFERRED)], 1..30)
    ) {
        let (mut manager, _journal) = manager();

        for kind in kinds {
            manager.start(kind, Some(LaunchMode::SINGLE_INSTANCE), None)?;
        }

        let live: Vec<u8> = manager
            .frames()
            .into_iter()
            .filter(|f| f.state != LifecycleState::Destroy)
            .map(|f| f.kind)
            .collect();
        let unique: HashSet<u8> = live.iter().copied().collect();
        prop_assert_eq!(live.len(), unique.len());
    }

    /// Property: ids handed out by `start` strictly increase for new frames.
    #[test]
    fn prop_new_ids_increase(count in 1..30usize) {
        let (mut manager, _journal) = manager();
        let mut last = None;

        for _ in 0..count {
            let id = manager.start(PLAIN, None, None)?;
            prop_assert!(last.is_none_or(|prev| id > prev));
            last = Some(id);
        }
    }
}
