//! Lifecycle ordering tests.
//!
//! Callback order for launches and finishes, payload delivery and the states
//! reported to callbacks through their context.

use std::{cell::RefCell, rc::Rc};

use actstack_core::{
    Activity, ActivityId, ActivityManager, Context, DEFAULT_LAUNCH_MODE, LifecycleError,
    LifecycleState,
};
use actstack_harness::{Callback, Journal, RecordingFactory};

type Manager = ActivityManager<&'static str, &'static str>;

fn manager() -> (Manager, Journal<&'static str>) {
    let journal = Journal::new();
    let manager = ActivityManager::new(RecordingFactory::new(journal.clone()));
    (manager, journal)
}

#[test]
fn start_runs_create_start_resume_once() -> Result<(), LifecycleError> {
    let (mut manager, journal) = manager();

    let a = manager.start("a", None, None)?;

    assert_eq!(journal.callbacks(a), vec![Callback::Create, Callback::Start, Callback::Resume]);
    assert_eq!(manager.state(a), Some(LifecycleState::Resume));
    assert_eq!(manager.count(), 1);
    Ok(())
}

#[test]
fn second_start_pauses_first() -> Result<(), LifecycleError> {
    let (mut manager, journal) = manager();

    manager.start("a", None, None)?;
    manager.start("a", None, None)?;

    insta::assert_snapshot!(journal.trace(), @"1:create 1:start 1:resume 1:pause 2:create 2:start 2:resume");
    Ok(())
}

#[test]
fn payload_reaches_on_create_only() -> Result<(), LifecycleError> {
    let (mut manager, journal) = manager();

    manager.start("a", None, Some("bundle"))?;

    let entries = journal.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].callback, Callback::Create);
    assert_eq!(entries[0].payload.as_deref(), Some("\"bundle\""));
    assert!(entries[1..].iter().all(|entry| entry.payload.is_none()));
    Ok(())
}

#[test]
fn finish_runs_pause_stop_destroy() -> Result<(), LifecycleError> {
    let (mut manager, journal) = manager();
    let a = manager.start("a", None, None)?;
    journal.clear();

    manager.finish(a)?;

    assert_eq!(journal.callbacks(a), vec![Callback::Pause, Callback::Stop, Callback::Destroy]);
    assert_eq!(manager.count(), 0);
    assert_eq!(manager.state(a), None);
    Ok(())
}

#[test]
fn finish_resumes_previous_activity() -> Result<(), LifecycleError> {
    let (mut manager, journal) = manager();
    let a = manager.start("a", None, None)?;
    let b = manager.start("b", None, None)?;

    manager.finish(b)?;

    assert_eq!(manager.top(), Some(a));
    assert_eq!(manager.state(a), Some(LifecycleState::Resume));
    assert_eq!(journal.count(a, Callback::Resume), 2);
    Ok(())
}

#[test]
fn finishing_paused_activity_keeps_top() -> Result<(), LifecycleError> {
    let (mut manager, journal) = manager();
    let a = manager.start("a", None, None)?;
    let b = manager.start("b", None, None)?;
    journal.clear();

    manager.finish(a)?;

    assert_eq!(journal.callbacks(a), vec![Callback::Stop, Callback::Destroy]);
    assert!(journal.callbacks(b).is_empty());
    assert_eq!(manager.top(), Some(b));
    Ok(())
}

#[test]
fn context_reports_state_being_entered() -> Result<(), LifecycleError> {
    let (mut manager, journal) = manager();
    let a = manager.start("a", None, None)?;
    manager.finish(a)?;

    let entries = journal.entries();
    assert_eq!(entries.len(), 6);
    for entry in entries {
        assert_eq!(entry.observed, entry.callback.state(), "{:?}", entry.callback);
    }
    Ok(())
}

#[test]
fn navigator_mirrors_manager() -> Result<(), LifecycleError> {
    let (mut manager, _journal) = manager();

    let mut nav = manager.navigator();
    let a = nav.start("a", None)?;
    assert_eq!(nav.last_state(a), Some(LifecycleState::Resume));

    let b = nav.start_with("b", None, "bundle")?;
    assert_eq!(nav.last_state(a), Some(LifecycleState::Pause));

    nav.finish(b)?;
    nav.finish(a)?;
    assert_eq!(nav.last_state(a), None);
    assert_eq!(nav.finish(a), Err(LifecycleError::NotInStack(a)));

    assert!(manager.is_empty());
    Ok(())
}

#[test]
fn frames_snapshot_is_bottom_to_top() -> Result<(), LifecycleError> {
    let (mut manager, _journal) = manager();
    let a = manager.start("a", None, None)?;
    let b = manager.start("b", None, None)?;

    let frames = manager.frames();
    assert_eq!(frames.iter().map(|f| f.id).collect::<Vec<_>>(), vec![a, b]);
    assert_eq!(frames[0].kind, "a");
    assert_eq!(frames[0].state, LifecycleState::Pause);
    assert_eq!(frames[1].state, LifecycleState::Resume);
    Ok(())
}

/// What a callback saw of the stack: `(callback id, state, count, top)`.
type Sightings = Rc<RefCell<Vec<(ActivityId, LifecycleState, usize, Option<ActivityId>)>>>;

/// Notes the stack size and top from `on_create` and `on_resume`.
struct Watcher {
    seen: Sightings,
}

impl Watcher {
    fn note(&self, ctx: &Context<'_, &'static str, &'static str>) {
        self.seen.borrow_mut().push((ctx.id(), ctx.state(), ctx.count(), ctx.top()));
    }
}

impl Activity<&'static str, &'static str> for Watcher {
    fn on_create(
        &mut self,
        ctx: &mut Context<'_, &'static str, &'static str>,
        _payload: Option<&'static str>,
    ) {
        self.note(ctx);
    }

    fn on_resume(&mut self, ctx: &mut Context<'_, &'static str, &'static str>) {
        self.note(ctx);
    }
}

#[test]
fn context_sees_stack_while_callback_runs() -> Result<(), LifecycleError> {
    let seen = Sightings::default();
    let factory_seen = Rc::clone(&seen);
    let mut manager: Manager = ActivityManager::new(
        move |_kind: &&'static str| -> Box<dyn Activity<&'static str, &'static str>> {
            Box::new(Watcher { seen: Rc::clone(&factory_seen) })
        },
    );
    assert_eq!(manager.config().default_mode, DEFAULT_LAUNCH_MODE);

    let a = manager.start("a", None, None)?;
    let b = manager.start("b", None, None)?;
    manager.finish(b)?;

    assert_eq!(*seen.borrow(), vec![
        (a, LifecycleState::Create, 1, Some(a)),
        (a, LifecycleState::Resume, 1, Some(a)),
        (b, LifecycleState::Create, 2, Some(b)),
        (b, LifecycleState::Resume, 2, Some(b)),
        (a, LifecycleState::Resume, 1, Some(a)),
    ]);
    assert_eq!(manager.kind(a), Some(&"a"));
    assert_eq!(manager.kind(b), None);
    Ok(())
}
