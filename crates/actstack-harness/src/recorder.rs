//! Recording activities.
//!
//! [`Recorder`] logs every callback it receives into a shared [`Journal`] and
//! can be scripted through a [`Behavior`] to finish itself from a given
//! callback or to defer its teardown. Deferred completion tokens are parked in
//! the journal so tests can hand them back whenever they like.

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use actstack_core::{
    Activity, ActivityFactory, ActivityId, Completion, Context, LifecycleState, Teardown,
};
use tracing::debug;

/// Callback observed by a [`Recorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Callback {
    /// `on_create`.
    Create,
    /// `on_start`.
    Start,
    /// `on_resume`.
    Resume,
    /// `on_blur`.
    Blur,
    /// `on_focus`.
    Focus,
    /// `on_new_intent`.
    NewIntent,
    /// `on_pause`.
    Pause,
    /// `on_stop`.
    Stop,
    /// `on_destroy`.
    Destroy,
}

impl Callback {
    /// Short lowercase name, used in traces.
    pub fn name(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Start => "start",
            Self::Resume => "resume",
            Self::Blur => "blur",
            Self::Focus => "focus",
            Self::NewIntent => "intent",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Destroy => "destroy",
        }
    }

    /// Lifecycle state whose entry fires this callback. `None` for
    /// [`Self::NewIntent`], which is not a state change.
    pub fn state(self) -> Option<LifecycleState> {
        match self {
            Self::Create => Some(LifecycleState::Create),
            Self::Start => Some(LifecycleState::Start),
            Self::Resume => Some(LifecycleState::Resume),
            Self::Blur => Some(LifecycleState::Blur),
            Self::Focus => Some(LifecycleState::Focus),
            Self::NewIntent => None,
            Self::Pause => Some(LifecycleState::Pause),
            Self::Stop => Some(LifecycleState::Stop),
            Self::Destroy => Some(LifecycleState::Destroy),
        }
    }
}

/// One recorded callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K> {
    /// Activity that received the callback.
    pub id: ActivityId,
    /// Its launch kind.
    pub kind: K,
    /// Callback received.
    pub callback: Callback,
    /// State reported by the context while the callback ran.
    pub observed: Option<LifecycleState>,
    /// Payload, `Debug`-formatted, for `on_create` and `on_new_intent`.
    pub payload: Option<String>,
}

struct JournalInner<K> {
    entries: Vec<Entry<K>>,
    completions: HashMap<ActivityId, Completion>,
}

/// Shared log of callbacks, cloned into every recorder.
pub struct Journal<K> {
    inner: Rc<RefCell<JournalInner<K>>>,
}

impl<K> Clone for Journal<K> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<K> Default for Journal<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Journal<K> {
    /// Empty journal.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(JournalInner {
                entries: Vec::new(),
                completions: HashMap::new(),
            })),
        }
    }

    fn push(&self, entry: Entry<K>) {
        self.inner.borrow_mut().entries.push(entry);
    }

    fn park(&self, done: Completion) {
        self.inner.borrow_mut().completions.insert(done.id(), done);
    }

    /// Take the parked completion token of a deferred destroy.
    pub fn take_completion(&self, id: ActivityId) -> Option<Completion> {
        self.inner.borrow_mut().completions.remove(&id)
    }

    /// Activities with a parked completion token.
    pub fn parked(&self) -> Vec<ActivityId> {
        let mut ids: Vec<_> = self.inner.borrow().completions.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Callbacks received by `id`, in order.
    pub fn callbacks(&self, id: ActivityId) -> Vec<Callback> {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.id == id)
            .map(|entry| entry.callback)
            .collect()
    }

    /// Number of times `id` received `callback`.
    pub fn count(&self, id: ActivityId, callback: Callback) -> usize {
        self.callbacks(id).into_iter().filter(|c| *c == callback).count()
    }

    /// Whole log as `"<id>:<callback>"` words, e.g. `"1:create 1:start"`.
    pub fn trace(&self) -> String {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|entry| format!("{}:{}", entry.id.get(), entry.callback.name()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Number of recorded callbacks.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Forget recorded callbacks. Parked completions are kept.
    pub fn clear(&self) {
        self.inner.borrow_mut().entries.clear();
    }
}

impl<K: Clone> Journal<K> {
    /// Snapshot of every entry.
    pub fn entries(&self) -> Vec<Entry<K>> {
        self.inner.borrow().entries.clone()
    }
}

/// Scripted reactions of a [`Recorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Behavior {
    /// Finish itself from the callback entering this state.
    pub finish_self_on: Option<LifecycleState>,
    /// Teardown reported from `on_destroy`. Deferred tokens are parked in the
    /// journal.
    pub teardown: Teardown,
}

impl Behavior {
    /// Synchronous teardown, no self-finish.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Finish itself when entering `state`.
    pub fn finish_self_on(state: LifecycleState) -> Self {
        Self { finish_self_on: Some(state), ..Self::default() }
    }

    /// Defer teardown until the parked token is returned.
    pub fn deferred() -> Self {
        Self { teardown: Teardown::Deferred, ..Self::default() }
    }
}

/// Activity that records its callbacks.
pub struct Recorder<K> {
    kind: K,
    behavior: Behavior,
    journal: Journal<K>,
}

impl<K: Clone> Recorder<K> {
    /// Recorder for `kind` writing into `journal`.
    pub fn new(kind: K, behavior: Behavior, journal: Journal<K>) -> Self {
        Self { kind, behavior, journal }
    }

    fn record<P>(&self, ctx: &mut Context<'_, K, P>, callback: Callback, payload: Option<String>) {
        self.journal.push(Entry {
            id: ctx.id(),
            kind: self.kind.clone(),
            callback,
            observed: ctx.last_state(ctx.id()),
            payload,
        });

        if callback.state().is_some() && callback.state() == self.behavior.finish_self_on {
            ctx.finish_self();
        }
    }
}

impl<K: Clone, P: fmt::Debug> Activity<K, P> for Recorder<K> {
    fn on_create(&mut self, ctx: &mut Context<'_, K, P>, payload: Option<P>) {
        let payload = payload.map(|p| format!("{p:?}"));
        self.record(ctx, Callback::Create, payload);
    }

    fn on_start(&mut self, ctx: &mut Context<'_, K, P>) {
        self.record(ctx, Callback::Start, None);
    }

    fn on_resume(&mut self, ctx: &mut Context<'_, K, P>) {
        self.record(ctx, Callback::Resume, None);
    }

    fn on_blur(&mut self, ctx: &mut Context<'_, K, P>) {
        self.record(ctx, Callback::Blur, None);
    }

    fn on_focus(&mut self, ctx: &mut Context<'_, K, P>) {
        self.record(ctx, Callback::Focus, None);
    }

    fn on_new_intent(&mut self, ctx: &mut Context<'_, K, P>, payload: P) {
        self.record(ctx, Callback::NewIntent, Some(format!("{payload:?}")));
    }

    fn on_pause(&mut self, ctx: &mut Context<'_, K, P>) {
        self.record(ctx, Callback::Pause, None);
    }

    fn on_stop(&mut self, ctx: &mut Context<'_, K, P>) {
        self.record(ctx, Callback::Stop, None);
    }

    fn on_destroy(&mut self, ctx: &mut Context<'_, K, P>, done: Completion) -> Teardown {
        self.record(ctx, Callback::Destroy, None);
        if self.behavior.teardown == Teardown::Deferred {
            debug!(id = %done.id(), "parking deferred completion");
            self.journal.park(done);
        }
        self.behavior.teardown
    }
}

/// Factory producing [`Recorder`]s, with per-kind behaviors.
pub struct RecordingFactory<K> {
    journal: Journal<K>,
    behaviors: Vec<(K, Behavior)>,
}

impl<K: Clone + PartialEq> RecordingFactory<K> {
    /// Factory writing into `journal`; every kind behaves plainly.
    pub fn new(journal: Journal<K>) -> Self {
        Self { journal, behaviors: Vec::new() }
    }

    /// Script the behavior of every activity of `kind`.
    #[must_use]
    pub fn with_behavior(mut self, kind: K, behavior: Behavior) -> Self {
        self.behaviors.retain(|(k, _)| *k != kind);
        self.behaviors.push((kind, behavior));
        self
    }

    fn behavior(&self, kind: &K) -> Behavior {
        self.behaviors.iter().find(|(k, _)| k == kind).map(|(_, b)| *b).unwrap_or_default()
    }
}

impl<K, P> ActivityFactory<K, P> for RecordingFactory<K>
where
    K: Clone + PartialEq + 'static,
    P: fmt::Debug,
{
    fn create(&mut self, kind: &K) -> Box<dyn Activity<K, P>> {
        Box::new(Recorder::new(kind.clone(), self.behavior(kind), self.journal.clone()))
    }
}
