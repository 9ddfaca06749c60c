//! Error types for the activity manager.
//!
//! Both variants are programming errors: the caller addressed an activity
//! that is gone, or asked for a lifecycle move the state machine does not
//! allow. Nothing here is transient, so there is no retry policy.

use thiserror::Error;

use crate::{ActivityId, LifecycleState};

/// Errors raised by [`ActivityManager`](crate::ActivityManager) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// The activity is not tracked by the manager.
    #[error("attempted to finish activity {0} which is not in the stack")]
    NotInStack(ActivityId),

    /// No path exists from the current state to the requested one.
    #[error("invalid state change for activity {id}: no path from {from} to {to}")]
    InvalidTransition {
        /// Activity whose state was being changed
        id: ActivityId,
        /// State the frame was in
        from: LifecycleState,
        /// State that was requested
        to: LifecycleState,
    },
}

impl LifecycleError {
    /// Activity the error refers to.
    pub fn activity(&self) -> ActivityId {
        match self {
            Self::NotInStack(id) | Self::InvalidTransition { id, .. } => *id,
        }
    }
}
