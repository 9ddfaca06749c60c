//! Stack frames and activity handles.

use std::fmt;

use crate::{Activity, LaunchMode, LifecycleState};

/// Handle to an activity on the stack.
///
/// Equal to the id of the frame created for it. Ids increase monotonically
/// and are never reused within one manager, so a stale handle can never
/// address a newer activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActivityId(u64);

impl ActivityId {
    /// Raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ActivityId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One entry on the stack.
pub(crate) struct Frame<K, P> {
    pub(crate) id: ActivityId,
    pub(crate) kind: K,
    /// `None` only while one of its callbacks is running.
    pub(crate) activity: Option<Box<dyn Activity<K, P>>>,
    pub(crate) state: LifecycleState,
    pub(crate) mode: LaunchMode,
}

impl<K, P> Frame<K, P> {
    pub(crate) fn new(
        id: ActivityId,
        kind: K,
        activity: Box<dyn Activity<K, P>>,
        mode: LaunchMode,
    ) -> Self {
        Self { id, kind, activity: Some(activity), state: LifecycleState::New, mode }
    }

    /// Not pending destroy.
    pub(crate) fn is_live(&self) -> bool {
        self.state != LifecycleState::Destroy
    }
}

/// Top of `frames`: the newest frame not in DESTROY.
pub(crate) fn top_of<K, P>(frames: &[Frame<K, P>]) -> Option<ActivityId> {
    frames.iter().rev().find(|frame| frame.is_live()).map(|frame| frame.id)
}

/// Observable view of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo<K> {
    /// Frame id.
    pub id: ActivityId,
    /// Kind the frame was launched with.
    pub kind: K,
    /// Current lifecycle state.
    pub state: LifecycleState,
    /// Resolved launch mode.
    pub mode: LaunchMode,
}

impl<K: Clone, P> From<&Frame<K, P>> for FrameInfo<K> {
    fn from(frame: &Frame<K, P>) -> Self {
        Self { id: frame.id, kind: frame.kind.clone(), state: frame.state, mode: frame.mode }
    }
}
