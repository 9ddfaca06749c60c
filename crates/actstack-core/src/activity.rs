//! Lifecycle callback contract.
//!
//! Activities implement [`Activity`] and override only the callbacks they care
//! about; every callback defaults to a no-op. The manager constructs
//! activities through an [`ActivityFactory`] keyed by the launch kind.

use crate::{ActivityId, Context};

/// How an activity tears down once it reaches DESTROY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Teardown {
    /// Teardown finished inside `on_destroy`. The frame leaves the stack as
    /// soon as the callback returns.
    #[default]
    Complete,
    /// Teardown continues after `on_destroy` returns. The frame stays on the
    /// stack in DESTROY until its [`Completion`] is handed back to the
    /// manager.
    Deferred,
}

/// Completion token for a deferred destroy.
///
/// Minted by the manager for each DESTROY transition. Pass it to
/// [`ActivityManager::complete_destroy`](crate::ActivityManager::complete_destroy)
/// or [`Context::complete_destroy`] once teardown is done. A token that is
/// never returned keeps its frame on the stack forever.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a deferred destroy only completes when its token is returned"]
pub struct Completion {
    id: ActivityId,
}

impl Completion {
    pub(crate) fn new(id: ActivityId) -> Self {
        Self { id }
    }

    /// Activity this token completes.
    pub fn id(&self) -> ActivityId {
        self.id
    }
}

/// Optional lifecycle callbacks.
///
/// `K` is the launch kind, `P` the launch payload. Each callback receives a
/// [`Context`] through which it can observe the stack and queue requests
/// (start, finish, completion) that the manager runs as soon as the callback
/// returns.
pub trait Activity<K, P> {
    /// Entered CREATE. `payload` is the launch payload, if any.
    fn on_create(&mut self, _ctx: &mut Context<'_, K, P>, _payload: Option<P>) {}

    /// Entered START.
    fn on_start(&mut self, _ctx: &mut Context<'_, K, P>) {}

    /// Entered RESUME, now in the foreground.
    fn on_resume(&mut self, _ctx: &mut Context<'_, K, P>) {}

    /// Entered BLUR.
    fn on_blur(&mut self, _ctx: &mut Context<'_, K, P>) {}

    /// Entered FOCUS.
    fn on_focus(&mut self, _ctx: &mut Context<'_, K, P>) {}

    /// A reused frame received a new launch payload. Runs before the frame is
    /// resumed.
    fn on_new_intent(&mut self, _ctx: &mut Context<'_, K, P>, _payload: P) {}

    /// Entered PAUSE.
    fn on_pause(&mut self, _ctx: &mut Context<'_, K, P>) {}

    /// Entered STOP.
    fn on_stop(&mut self, _ctx: &mut Context<'_, K, P>) {}

    /// Entered DESTROY.
    ///
    /// Return [`Teardown::Complete`] for a synchronous destroy; `done` can be
    /// dropped. Return [`Teardown::Deferred`] to keep the frame until `done`
    /// is handed back.
    fn on_destroy(&mut self, _ctx: &mut Context<'_, K, P>, _done: Completion) -> Teardown {
        Teardown::Complete
    }
}

/// Builds activity instances for a launch kind.
pub trait ActivityFactory<K, P> {
    /// Create a fresh activity for `kind`.
    fn create(&mut self, kind: &K) -> Box<dyn Activity<K, P>>;
}

impl<K, P, F> ActivityFactory<K, P> for F
where
    F: FnMut(&K) -> Box<dyn Activity<K, P>>,
{
    fn create(&mut self, kind: &K) -> Box<dyn Activity<K, P>> {
        self(kind)
    }
}
