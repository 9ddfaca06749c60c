//! Callback context.
//!
//! Callbacks cannot borrow the manager while it is driving them, so requests
//! made from inside a callback are queued on the [`Context`] and executed by
//! the manager, in order, as soon as the callback returns. The transition
//! engine then re-reads the frame's state before taking its next step, which
//! is what lets an activity finish itself from `on_create` or `on_resume`
//! without being forced back into the foreground.

use crate::{
    ActivityId, Completion, LaunchMode, LifecycleState,
    frame::{Frame, top_of},
};

/// Request queued by a callback.
pub(crate) enum Request<K, P> {
    Start { kind: K, mode: Option<LaunchMode>, payload: Option<P> },
    Finish(ActivityId),
    CompleteDestroy(Completion),
}

/// Handle given to every lifecycle callback.
///
/// Reads reflect the stack as it is while the callback runs. Writes are
/// deferred until the callback returns; any error they raise is returned
/// from the manager operation that triggered the callback.
pub struct Context<'a, K, P> {
    id: ActivityId,
    state: LifecycleState,
    frames: &'a [Frame<K, P>],
    requests: &'a mut Vec<Request<K, P>>,
}

impl<'a, K, P> Context<'a, K, P> {
    pub(crate) fn new(
        id: ActivityId,
        state: LifecycleState,
        frames: &'a [Frame<K, P>],
        requests: &'a mut Vec<Request<K, P>>,
    ) -> Self {
        Self { id, state, frames, requests }
    }

    /// Activity whose callback is running.
    pub fn id(&self) -> ActivityId {
        self.id
    }

    /// State being entered by this callback.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Current state of any tracked activity. `None` if not on the stack.
    pub fn last_state(&self, id: ActivityId) -> Option<LifecycleState> {
        self.frames.iter().find(|frame| frame.id == id).map(|frame| frame.state)
    }

    /// Number of frames, pending destroys included.
    pub fn count(&self) -> usize {
        self.frames.len()
    }

    /// Current top frame.
    pub fn top(&self) -> Option<ActivityId> {
        top_of(self.frames)
    }

    /// Queue a launch of `kind`.
    pub fn start(&mut self, kind: K, mode: Option<LaunchMode>, payload: Option<P>) {
        self.requests.push(Request::Start { kind, mode, payload });
    }

    /// Queue a finish of `id`.
    pub fn finish(&mut self, id: ActivityId) {
        self.requests.push(Request::Finish(id));
    }

    /// Queue a finish of the activity whose callback is running.
    pub fn finish_self(&mut self) {
        self.finish(self.id);
    }

    /// Queue completion of a deferred destroy.
    pub fn complete_destroy(&mut self, done: Completion) {
        self.requests.push(Request::CompleteDestroy(done));
    }
}
