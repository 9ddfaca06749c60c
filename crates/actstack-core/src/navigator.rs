//! Restricted facade over the manager.
//!
//! Client code that should launch and finish activities without seeing the
//! stack gets a [`Navigator`] instead of the [`ActivityManager`] itself.

use std::fmt;

use crate::{ActivityId, ActivityManager, LaunchMode, LifecycleError, LifecycleState};

/// Start, finish and state lookup, nothing else.
pub struct Navigator<'a, K, P> {
    manager: &'a mut ActivityManager<K, P>,
}

impl<'a, K, P> Navigator<'a, K, P>
where
    K: Clone + PartialEq + fmt::Debug,
{
    pub(crate) fn new(manager: &'a mut ActivityManager<K, P>) -> Self {
        Self { manager }
    }

    /// See [`ActivityManager::start`].
    pub fn start(
        &mut self,
        kind: K,
        mode: Option<LaunchMode>,
    ) -> Result<ActivityId, LifecycleError> {
        self.manager.start(kind, mode, None)
    }

    /// [`Self::start`] with a launch payload.
    pub fn start_with(
        &mut self,
        kind: K,
        mode: Option<LaunchMode>,
        payload: P,
    ) -> Result<ActivityId, LifecycleError> {
        self.manager.start(kind, mode, Some(payload))
    }

    /// See [`ActivityManager::finish`].
    pub fn finish(&mut self, id: ActivityId) -> Result<(), LifecycleError> {
        self.manager.finish(id)
    }

    /// Last known state of `id`. `None` once it has left the stack.
    pub fn last_state(&self, id: ActivityId) -> Option<LifecycleState> {
        self.manager.state(id)
    }
}
