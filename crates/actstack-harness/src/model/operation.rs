//! Operations for model-based testing.
//!
//! Operations are generated randomly (by proptest or a fuzzer) and applied to
//! both the [`ModelStack`](super::ModelStack) and a real manager.

use actstack_core::LaunchMode;
use arbitrary::Arbitrary;

/// Launch kind used by the model (kept small so kinds collide often).
pub type ModelKind = u8;

/// Number of distinct kinds operations are folded into.
pub const KIND_COUNT: ModelKind = 4;

/// Kind whose activities defer their teardown.
pub const DEFERRED_KIND: ModelKind = 3;

/// Operations that can be applied to a stack.
#[derive(Debug, Clone, Arbitrary)]
pub enum Operation {
    /// Launch an activity.
    Start {
        /// Kind to launch (folded into `0..KIND_COUNT`).
        kind: ModelKind,
        /// Launch mode.
        mode: ModeChoice,
    },

    /// Finish the frame at `slot` (modulo the stack size), pending destroys
    /// included.
    Finish {
        /// Stack position, bottom first.
        slot: u8,
    },

    /// Finish the current top frame.
    FinishTop,

    /// Complete the pending destroy at `slot` (modulo the number pending).
    CompleteDestroy {
        /// Position among pending destroys, bottom first.
        slot: u8,
    },
}

/// Launch mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
pub enum ModeChoice {
    /// No explicit mode.
    Inherit,
    /// [`LaunchMode::STANDARD`].
    Standard,
    /// [`LaunchMode::SINGLE_TOP`].
    SingleTop,
    /// [`LaunchMode::SINGLE_INSTANCE`].
    SingleInstance,
    /// [`LaunchMode::SINGLE_INSTANCE`] with [`LaunchMode::CLEAR_TOP`].
    SingleInstanceClearTop,
}

impl ModeChoice {
    /// Mode passed to `start`.
    pub fn to_mode(self) -> Option<LaunchMode> {
        match self {
            Self::Inherit => None,
            Self::Standard => Some(LaunchMode::STANDARD),
            Self::SingleTop => Some(LaunchMode::SINGLE_TOP),
            Self::SingleInstance => Some(LaunchMode::SINGLE_INSTANCE),
            Self::SingleInstanceClearTop => {
                Some(LaunchMode::SINGLE_INSTANCE | LaunchMode::CLEAR_TOP)
            },
        }
    }
}

/// Errors an operation can produce, compared by kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationError {
    /// Target not on the stack.
    NotInStack,
    /// Target already pending destroy.
    InvalidTransition,
}

impl From<&actstack_core::LifecycleError> for OperationError {
    fn from(err: &actstack_core::LifecycleError) -> Self {
        match err {
            actstack_core::LifecycleError::NotInStack(_) => Self::NotInStack,
            actstack_core::LifecycleError::InvalidTransition { .. } => Self::InvalidTransition,
        }
    }
}

/// Result of applying an operation.
pub type OperationResult = Result<(), OperationError>;
