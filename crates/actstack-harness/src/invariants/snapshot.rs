//! Observable stack snapshots for invariant checking.
//!
//! Invariants operate on snapshots rather than on a live manager so that a
//! check always sees one consistent stack.

use std::fmt;

use actstack_core::{ActivityId, ActivityManager, LifecycleState};

/// Snapshot of a whole stack, bottom to top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackSnapshot {
    /// Frames, bottom to top.
    pub frames: Vec<FrameSnapshot>,
    /// Top frame as reported by the manager.
    pub top: Option<ActivityId>,
}

impl StackSnapshot {
    /// Snapshot with no frames.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture the current stack of `manager`.
    pub fn capture<K, P>(manager: &ActivityManager<K, P>) -> Self
    where
        K: Clone + PartialEq + fmt::Debug,
    {
        let frames = manager
            .frames()
            .into_iter()
            .map(|frame| FrameSnapshot { id: frame.id, state: frame.state })
            .collect();

        Self { frames, top: manager.top() }
    }

    /// Build from `(id, state)` pairs, deriving the top.
    pub fn from_states(states: &[(u64, LifecycleState)]) -> Self {
        let frames: Vec<_> = states
            .iter()
            .map(|(id, state)| FrameSnapshot { id: ActivityId::from(*id), state: *state })
            .collect();
        let top = frames.iter().rev().find(|f| f.state != LifecycleState::Destroy).map(|f| f.id);

        Self { frames, top }
    }

    /// Frames currently in `state`.
    pub fn in_state(&self, state: LifecycleState) -> impl Iterator<Item = &FrameSnapshot> {
        self.frames.iter().filter(move |frame| frame.state == state)
    }

    /// State of the frame `id`.
    pub fn state_of(&self, id: ActivityId) -> Option<LifecycleState> {
        self.frames.iter().find(|frame| frame.id == id).map(|frame| frame.state)
    }
}

/// Snapshot of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSnapshot {
    /// Frame id.
    pub id: ActivityId,
    /// Lifecycle state.
    pub state: LifecycleState,
}
