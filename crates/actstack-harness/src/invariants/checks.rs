//! Standard invariant checks.
//!
//! These hold between manager operations, whatever sequence of starts,
//! finishes and completions led there.

use std::collections::HashSet;

use actstack_core::LifecycleState;

use super::{Invariant, InvariantResult, StackSnapshot, Violation};

/// At most one frame is in RESUME.
pub struct SingleResumed;

impl Invariant for SingleResumed {
    fn name(&self) -> &'static str {
        "single_resumed"
    }

    fn check(&self, state: &StackSnapshot) -> InvariantResult {
        let resumed: Vec<_> = state.in_state(LifecycleState::Resume).map(|f| f.id).collect();
        if resumed.len() > 1 {
            return Err(Violation {
                invariant: self.name(),
                message: format!("{} frames resumed: {resumed:?}", resumed.len()),
            });
        }
        Ok(())
    }
}

/// The top frame, if any, is the one in RESUME.
///
/// Frames pending destroy are not eligible for top, so a stack holding only
/// pending destroys has nothing resumed.
pub struct TopIsResumed;

impl Invariant for TopIsResumed {
    fn name(&self) -> &'static str {
        "top_is_resumed"
    }

    fn check(&self, state: &StackSnapshot) -> InvariantResult {
        let Some(top) = state.top else {
            return match state.in_state(LifecycleState::Resume).next() {
                Some(frame) => Err(Violation {
                    invariant: self.name(),
                    message: format!("no top frame but {} is resumed", frame.id),
                }),
                None => Ok(()),
            };
        };

        match state.state_of(top) {
            Some(LifecycleState::Resume) => Ok(()),
            other => Err(Violation {
                invariant: self.name(),
                message: format!("top frame {top} is in {other:?}, expected RESUME"),
            }),
        }
    }
}

/// Frame ids are unique within the stack.
pub struct UniqueIds;

impl Invariant for UniqueIds {
    fn name(&self) -> &'static str {
        "unique_ids"
    }

    fn check(&self, state: &StackSnapshot) -> InvariantResult {
        let mut seen = HashSet::new();
        for frame in &state.frames {
            if !seen.insert(frame.id) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("frame {} appears twice", frame.id),
                });
            }
        }
        Ok(())
    }
}

/// Between operations every frame is resumed, paused or pending destroy.
///
/// Anything else means a walk was abandoned halfway.
pub struct SettledStates;

impl Invariant for SettledStates {
    fn name(&self) -> &'static str {
        "settled_states"
    }

    fn check(&self, state: &StackSnapshot) -> InvariantResult {
        for frame in &state.frames {
            if !matches!(
                frame.state,
                LifecycleState::Resume | LifecycleState::Pause | LifecycleState::Destroy
            ) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("frame {} left in {}", frame.id, frame.state),
                });
            }
        }
        Ok(())
    }
}
