//! Activity manager.
//!
//! Owns the stack of frames and is the only thing that mutates it. Launch
//! requests are resolved against the stack according to their
//! [`LaunchMode`], and every lifecycle move goes through a single transition
//! engine that walks the state machine one edge at a time.
//!
//! # Launch resolution
//!
//! ```text
//!  start(kind, mode?, payload?)
//!        │
//!        ├─ mode: explicit ─> mode of a frame of `kind` ─> config default
//!        │
//!        ├─ SingleInstance + live frame of `kind`
//!        │     ├─ ClearTop: finish every live frame above it
//!        │     └─ otherwise: detach it so it can be re-pushed
//!        │
//!        ├─ anything else: create a new frame via the factory
//!        │
//!        ├─ pause the old top, push the frame
//!        │
//!        └─ new: CREATE(payload) -> RESUME   reused: on_new_intent(payload) -> RESUME
//! ```
//!
//! # Reentrancy
//!
//! Callbacks queue requests on their [`Context`]; the engine runs them right
//! after the callback returns and then re-reads the frame's state by id. A
//! frame that finished itself mid-walk is never pushed back towards RESUME.

use std::fmt;

use tracing::{debug, trace, warn};

use crate::{
    Activity, ActivityFactory, ActivityId, Completion, Context, CoreMode, LaunchMode,
    LifecycleError, LifecycleState, Navigator, Teardown,
    context::Request,
    frame::{Frame, FrameInfo, top_of},
};

/// Launch mode used when neither the caller nor an existing frame picks one.
pub const DEFAULT_LAUNCH_MODE: LaunchMode = LaunchMode::STANDARD;

/// Manager configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Mode for launches without an explicit or inherited mode.
    pub default_mode: LaunchMode,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self { default_mode: DEFAULT_LAUNCH_MODE }
    }
}

/// Stack of activities and the lifecycle engine driving them.
///
/// Single-threaded: every operation runs to completion, including any
/// callbacks and the requests they queue, before it returns.
pub struct ActivityManager<K, P> {
    /// Bottom to top.
    stack: Vec<Frame<K, P>>,
    factory: Box<dyn ActivityFactory<K, P>>,
    config: ManagerConfig,
    next_id: u64,
}

impl<K, P> ActivityManager<K, P>
where
    K: Clone + PartialEq + fmt::Debug,
{
    /// Create an empty manager building activities with `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: ActivityFactory<K, P> + 'static,
    {
        Self::with_config(factory, ManagerConfig::default())
    }

    /// Create an empty manager with explicit configuration.
    pub fn with_config<F>(factory: F, config: ManagerConfig) -> Self
    where
        F: ActivityFactory<K, P> + 'static,
    {
        Self { stack: Vec::new(), factory: Box::new(factory), config, next_id: 1 }
    }

    /// Active configuration.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Restricted facade for client code.
    pub fn navigator(&mut self) -> Navigator<'_, K, P> {
        Navigator::new(self)
    }

    /// Launch (or bring forward) an activity of `kind`.
    ///
    /// Returns the handle of the new or reused activity. If the activity
    /// finished itself during its launch callbacks the handle is already
    /// stale when returned.
    ///
    /// # Errors
    ///
    /// Only errors raised by requests queued from callbacks, see
    /// [`Self::finish`].
    pub fn start(
        &mut self,
        kind: K,
        mode: Option<LaunchMode>,
        payload: Option<P>,
    ) -> Result<ActivityId, LifecycleError> {
        let mode = mode.or_else(|| self.existing_mode(&kind)).unwrap_or(self.config.default_mode);

        let existing = match mode.core() {
            CoreMode::SingleInstance => self.find_live(&kind),
            // No dedicated top check: single-top creates like standard.
            CoreMode::SingleTop | CoreMode::Standard => None,
        };

        let (id, detached, created) = match existing {
            Some(id) => {
                debug!(%id, ?kind, ?mode, "reusing existing frame");
                if mode.clear_top() {
                    self.finish_all_above(id)?;
                }
                let frame = if self.top() == Some(id) { None } else { self.detach(id) };
                (id, frame, false)
            },
            None => {
                let id = self.allocate_id();
                let activity = self.factory.create(&kind);
                debug!(%id, ?kind, ?mode, "launching new frame");
                (id, Some(Frame::new(id, kind, activity, mode)), true)
            },
        };

        if let Some(frame) = detached {
            if let Some(top) = self.top() {
                self.pause(top)?;
            }
            // A pause callback that finished its own frame resumed the one below.
            while let Some(top) = self.resumed_top() {
                self.pause(top)?;
            }
            self.stack.push(frame);
        }

        if created {
            self.change_state(id, LifecycleState::Create, payload)?;
        } else if let Some(payload) = payload {
            self.deliver_new_intent(id, payload)?;
        }

        // Skipped when the frame finished itself, or when a callback launched
        // another activity on top of it.
        if self.top() == Some(id) {
            self.change_state(id, LifecycleState::Resume, None)?;
        }

        Ok(id)
    }

    /// Finish an activity and bring the next one forward.
    ///
    /// Drives the frame through STOP and DESTROY. The frame leaves the stack
    /// once its teardown completes, which may be after this returns. The new
    /// top is resumed either way.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::NotInStack`] if `id` is not tracked
    /// - [`LifecycleError::InvalidTransition`] if the frame is already in
    ///   DESTROY (for example when finishing itself from `on_destroy`)
    pub fn finish(&mut self, id: ActivityId) -> Result<(), LifecycleError> {
        if !self.contains(id) {
            return Err(LifecycleError::NotInStack(id));
        }

        debug!(%id, "finishing");
        self.change_state(id, LifecycleState::Stop, None)?;
        self.change_state(id, LifecycleState::Destroy, None)?;

        if let Some(top) = self.top() {
            self.resume(top)?;
        }

        Ok(())
    }

    /// Complete a deferred destroy, removing its frame.
    ///
    /// Tokens for frames that are already gone are ignored.
    pub fn complete_destroy(&mut self, done: Completion) {
        let id = done.id();
        match self.state(id) {
            Some(LifecycleState::Destroy) => {
                debug!(%id, "deferred destroy completed");
                self.remove(id);
            },
            Some(state) => warn!(%id, %state, "completion for frame not in DESTROY"),
            None => trace!(%id, "completion for frame already removed"),
        }
    }

    /// Number of frames, pending destroys included.
    pub fn count(&self) -> usize {
        self.stack.len()
    }

    /// Whether the stack has no frames at all.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Current state of `id`. `None` if it is not on the stack.
    pub fn state(&self, id: ActivityId) -> Option<LifecycleState> {
        self.frame(id).map(|frame| frame.state)
    }

    /// Whether `id` is on the stack, pending destroy included.
    pub fn contains(&self, id: ActivityId) -> bool {
        self.frame(id).is_some()
    }

    /// Kind `id` was launched with.
    pub fn kind(&self, id: ActivityId) -> Option<&K> {
        self.frame(id).map(|frame| &frame.kind)
    }

    /// Resolved launch mode of `id`.
    pub fn mode(&self, id: ActivityId) -> Option<LaunchMode> {
        self.frame(id).map(|frame| frame.mode)
    }

    /// Top frame: the newest one not pending destroy.
    pub fn top(&self) -> Option<ActivityId> {
        top_of(&self.stack)
    }

    /// Frames in DESTROY awaiting their completion, bottom to top.
    pub fn pending_destroys(&self) -> Vec<ActivityId> {
        self.stack.iter().filter(|frame| !frame.is_live()).map(|frame| frame.id).collect()
    }

    /// Snapshot of the stack, bottom to top.
    pub fn frames(&self) -> Vec<FrameInfo<K>> {
        self.stack.iter().map(FrameInfo::from).collect()
    }

    fn allocate_id(&mut self) -> ActivityId {
        let id = ActivityId::from(self.next_id);
        self.next_id += 1;
        id
    }

    fn frame(&self, id: ActivityId) -> Option<&Frame<K, P>> {
        self.stack.iter().find(|frame| frame.id == id)
    }

    fn position(&self, id: ActivityId) -> Option<usize> {
        self.stack.iter().position(|frame| frame.id == id)
    }

    fn resumed_top(&self) -> Option<ActivityId> {
        self.top().filter(|top| self.state(*top) == Some(LifecycleState::Resume))
    }

    /// Mode of the newest frame of `kind`, pending destroys included.
    fn existing_mode(&self, kind: &K) -> Option<LaunchMode> {
        self.stack.iter().rev().find(|frame| frame.kind == *kind).map(|frame| frame.mode)
    }

    /// Oldest live frame of `kind`.
    fn find_live(&self, kind: &K) -> Option<ActivityId> {
        self.stack.iter().find(|frame| frame.is_live() && frame.kind == *kind).map(|frame| frame.id)
    }

    fn detach(&mut self, id: ActivityId) -> Option<Frame<K, P>> {
        self.position(id).map(|index| self.stack.remove(index))
    }

    fn remove(&mut self, id: ActivityId) {
        if let Some(index) = self.position(id) {
            self.stack.remove(index);
        }
    }

    /// Finish every live frame above `id`, top-down.
    fn finish_all_above(&mut self, id: ActivityId) -> Result<(), LifecycleError> {
        loop {
            let Some(index) = self.position(id) else { return Ok(()) };
            let above =
                self.stack[index + 1..].iter().rev().find(|frame| frame.is_live()).map(|f| f.id);

            match above {
                Some(above) => self.finish(above)?,
                None => return Ok(()),
            }
        }
    }

    /// Pause `id` unless it is already on its way out.
    fn pause(&mut self, id: ActivityId) -> Result<(), LifecycleError> {
        if self.state(id) == Some(LifecycleState::Stop) {
            return Ok(());
        }
        self.change_state(id, LifecycleState::Pause, None)
    }

    /// Resume `id` unless it is already on its way out.
    fn resume(&mut self, id: ActivityId) -> Result<(), LifecycleError> {
        if self.state(id) == Some(LifecycleState::Stop) {
            return Ok(());
        }
        self.change_state(id, LifecycleState::Resume, None)
    }

    /// Move `id` towards `target`, one edge at a time.
    ///
    /// Direct edges get `payload`; intermediate steps run their callbacks
    /// without it. The walk stops early if a callback moved the frame off the
    /// planned path (it finished itself). A frame that is no longer on the
    /// stack counts as DESTROY.
    fn change_state(
        &mut self,
        id: ActivityId,
        target: LifecycleState,
        mut payload: Option<P>,
    ) -> Result<(), LifecycleError> {
        loop {
            let from = self.state(id).unwrap_or(LifecycleState::Destroy);
            if from == target {
                return Ok(());
            }

            if from.can_transition_to(target) {
                return self.transition(id, target, payload.take());
            }

            let Some(next) = from.advancement() else {
                return Err(LifecycleError::InvalidTransition { id, from, to: target });
            };

            self.transition(id, next, None)?;
            if self.state(id) != Some(next) {
                return Ok(());
            }
        }
    }

    /// Enter `to` and run its callback, then the requests it queued.
    fn transition(
        &mut self,
        id: ActivityId,
        to: LifecycleState,
        payload: Option<P>,
    ) -> Result<(), LifecycleError> {
        let Some(index) = self.position(id) else { return Ok(()) };

        let frame = &mut self.stack[index];
        let from = frame.state;
        frame.state = to;
        let activity = frame.activity.take();
        trace!(%id, %from, %to, callback = to.callback_name(), "transition");

        let mut requests = Vec::new();
        let teardown = match activity {
            Some(mut activity) => {
                let mut ctx = Context::new(id, to, &self.stack, &mut requests);
                let teardown = dispatch(activity.as_mut(), &mut ctx, to, payload);
                self.restore(id, activity);
                teardown
            },
            None => Teardown::Complete,
        };

        let result = self.run_requests(requests);

        // Removed even when a queued request failed.
        if to == LifecycleState::Destroy && teardown == Teardown::Complete {
            trace!(%id, "destroy completed synchronously");
            self.remove(id);
        }

        result
    }

    fn deliver_new_intent(&mut self, id: ActivityId, payload: P) -> Result<(), LifecycleError> {
        let Some(index) = self.position(id) else { return Ok(()) };
        let frame = &mut self.stack[index];
        let state = frame.state;
        let Some(mut activity) = frame.activity.take() else { return Ok(()) };

        trace!(%id, %state, "new intent");
        let mut requests = Vec::new();
        let mut ctx = Context::new(id, state, &self.stack, &mut requests);
        activity.on_new_intent(&mut ctx, payload);
        self.restore(id, activity);

        self.run_requests(requests)
    }

    fn restore(&mut self, id: ActivityId, activity: Box<dyn Activity<K, P>>) {
        if let Some(index) = self.position(id) {
            self.stack[index].activity = Some(activity);
        }
    }

    fn run_requests(&mut self, requests: Vec<Request<K, P>>) -> Result<(), LifecycleError> {
        for request in requests {
            match request {
                Request::Start { kind, mode, payload } => {
                    self.start(kind, mode, payload)?;
                },
                Request::Finish(id) => self.finish(id)?,
                Request::CompleteDestroy(done) => self.complete_destroy(done),
            }
        }
        Ok(())
    }
}

/// Invoke the callback for entering `to`. Every state except DESTROY tears
/// down as [`Teardown::Complete`].
fn dispatch<K, P>(
    activity: &mut dyn Activity<K, P>,
    ctx: &mut Context<'_, K, P>,
    to: LifecycleState,
    payload: Option<P>,
) -> Teardown {
    match to {
        LifecycleState::New => {},
        LifecycleState::Create => activity.on_create(ctx, payload),
        LifecycleState::Start => activity.on_start(ctx),
        LifecycleState::Resume => activity.on_resume(ctx),
        LifecycleState::Blur => activity.on_blur(ctx),
        LifecycleState::Focus => activity.on_focus(ctx),
        LifecycleState::Pause => activity.on_pause(ctx),
        LifecycleState::Stop => activity.on_stop(ctx),
        LifecycleState::Destroy => {
            let done = Completion::new(ctx.id());
            return activity.on_destroy(ctx, done);
        },
    }
    Teardown::Complete
}

impl<K: fmt::Debug + Clone, P> fmt::Debug for ActivityManager<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frames: Vec<FrameInfo<K>> = self.stack.iter().map(FrameInfo::from).collect();
        f.debug_struct("ActivityManager")
            .field("frames", &frames)
            .field("config", &self.config)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}
