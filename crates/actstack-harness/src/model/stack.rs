//! Reference stack.
//!
//! A deliberately simple re-statement of the launch and finish rules with no
//! callbacks: every frame is resumed, paused or pending destroy, and kind
//! [`DEFERRED_KIND`] keeps its frames until their destroy is completed. It is
//! the oracle the real manager is compared against.

use actstack_core::{ActivityId, CoreMode, LaunchMode, LifecycleState};

use super::operation::{
    DEFERRED_KIND, KIND_COUNT, ModelKind, Operation, OperationError, OperationResult,
};

/// Frame in the reference stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFrame {
    /// Frame id, allocated like the real manager does.
    pub id: ActivityId,
    /// Launch kind.
    pub kind: ModelKind,
    /// Resolved launch mode.
    pub mode: LaunchMode,
    /// Resume, Pause or Destroy.
    pub state: LifecycleState,
}

/// Operation with its slots resolved to concrete frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Launch `kind`.
    Start {
        /// Folded kind.
        kind: ModelKind,
        /// Mode passed to `start`.
        mode: Option<LaunchMode>,
    },
    /// Finish `id`.
    Finish(ActivityId),
    /// Complete the pending destroy of `id`.
    CompleteDestroy(ActivityId),
    /// Nothing to target.
    Noop,
}

/// Reference implementation of the stack.
#[derive(Debug, Clone)]
pub struct ModelStack {
    frames: Vec<ModelFrame>,
    next_id: u64,
}

impl Default for ModelStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelStack {
    /// Empty stack.
    pub fn new() -> Self {
        Self { frames: Vec::new(), next_id: 1 }
    }

    /// Frames, bottom to top.
    pub fn frames(&self) -> &[ModelFrame] {
        &self.frames
    }

    /// `(id, kind, state)` per frame, bottom to top.
    pub fn observable(&self) -> Vec<(ActivityId, ModelKind, LifecycleState)> {
        self.frames.iter().map(|f| (f.id, f.kind, f.state)).collect()
    }

    /// Whether `kind` defers its teardown.
    pub fn defers(kind: ModelKind) -> bool {
        kind == DEFERRED_KIND
    }

    /// Resolve the slots of `op` against the current stack.
    pub fn resolve(&self, op: &Operation) -> Step {
        match op {
            Operation::Start { kind, mode } => {
                Step::Start { kind: kind % KIND_COUNT, mode: mode.to_mode() }
            },
            Operation::Finish { slot } => {
                if self.frames.is_empty() {
                    return Step::Noop;
                }
                let index = *slot as usize % self.frames.len();
                Step::Finish(self.frames[index].id)
            },
            Operation::FinishTop => self.top().map_or(Step::Noop, Step::Finish),
            Operation::CompleteDestroy { slot } => {
                let pending: Vec<_> = self
                    .frames
                    .iter()
                    .filter(|f| f.state == LifecycleState::Destroy)
                    .map(|f| f.id)
                    .collect();
                if pending.is_empty() {
                    return Step::Noop;
                }
                Step::CompleteDestroy(pending[*slot as usize % pending.len()])
            },
        }
    }

    /// Apply a resolved step.
    pub fn apply(&mut self, step: Step) -> OperationResult {
        match step {
            Step::Start { kind, mode } => {
                self.start(kind, mode);
                Ok(())
            },
            Step::Finish(id) => self.finish(id),
            Step::CompleteDestroy(id) => {
                self.complete(id);
                Ok(())
            },
            Step::Noop => Ok(()),
        }
    }

    /// Top frame id.
    pub fn top(&self) -> Option<ActivityId> {
        self.frames.iter().rev().find(|f| f.state != LifecycleState::Destroy).map(|f| f.id)
    }

    fn index(&self, id: ActivityId) -> Option<usize> {
        self.frames.iter().position(|f| f.id == id)
    }

    fn set_state(&mut self, id: ActivityId, state: LifecycleState) {
        if let Some(index) = self.index(id) {
            self.frames[index].state = state;
        }
    }

    /// Launch `kind`, returning the id of the launched frame.
    pub fn start(&mut self, kind: ModelKind, mode: Option<LaunchMode>) -> ActivityId {
        let live = |f: &&ModelFrame| f.state != LifecycleState::Destroy && f.kind == kind;
        let mode = mode
            .or_else(|| self.frames.iter().rev().find(|f| f.kind == kind).map(|f| f.mode))
            .unwrap_or(LaunchMode::STANDARD);

        let existing = match mode.core() {
            CoreMode::SingleInstance => self.frames.iter().find(live).map(|f| f.id),
            CoreMode::SingleTop | CoreMode::Standard => None,
        };

        let (id, pushed) = match existing {
            Some(id) => {
                if mode.clear_top() {
                    self.finish_all_above(id);
                }
                if self.top() == Some(id) {
                    (id, None)
                } else {
                    let index = self.index(id).unwrap_or_default();
                    (id, Some(self.frames.remove(index)))
                }
            },
            None => {
                let id = ActivityId::from(self.next_id);
                self.next_id += 1;
                (id, Some(ModelFrame { id, kind, mode, state: LifecycleState::Create }))
            },
        };

        if let Some(frame) = pushed {
            if let Some(top) = self.top() {
                self.set_state(top, LifecycleState::Pause);
            }
            self.frames.push(frame);
        }

        self.set_state(id, LifecycleState::Resume);
        id
    }

    /// Finish `id`.
    pub fn finish(&mut self, id: ActivityId) -> OperationResult {
        let index = self.index(id).ok_or(OperationError::NotInStack)?;
        if self.frames[index].state == LifecycleState::Destroy {
            return Err(OperationError::InvalidTransition);
        }

        if Self::defers(self.frames[index].kind) {
            self.frames[index].state = LifecycleState::Destroy;
        } else {
            self.frames.remove(index);
        }

        if let Some(top) = self.top() {
            self.set_state(top, LifecycleState::Resume);
        }
        Ok(())
    }

    /// Complete the pending destroy of `id`.
    pub fn complete(&mut self, id: ActivityId) {
        if let Some(index) = self.index(id) {
            if self.frames[index].state == LifecycleState::Destroy {
                self.frames.remove(index);
            }
        }
    }

    fn finish_all_above(&mut self, id: ActivityId) {
        while let Some(index) = self.index(id) {
            let above = self.frames[index + 1..]
                .iter()
                .rev()
                .find(|f| f.state != LifecycleState::Destroy)
                .map(|f| f.id);
            match above {
                Some(above) => {
                    if self.finish(above).is_err() {
                        return;
                    }
                },
                None => return,
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::ModeChoice;

    #[test]
    fn single_instance_scenario() {
        let mut model = ModelStack::new();
        let a = model.start(0, None);
        let b = model.start(1, None);
        let c = model.start(2, None);
        let again = model.start(1, Some(LaunchMode::SINGLE_INSTANCE));

        assert_eq!(again, b);
        assert_eq!(model.observable(), vec![
            (a, 0, LifecycleState::Pause),
            (c, 2, LifecycleState::Pause),
            (b, 1, LifecycleState::Resume),
        ]);
    }

    #[test]
    fn deferred_kind_stays_until_completed() {
        let mut model = ModelStack::new();
        let a = model.start(0, None);
        let d = model.start(DEFERRED_KIND, None);

        model.finish(d).unwrap();
        assert_eq!(model.top(), Some(a));
        assert_eq!(model.frames().len(), 2);
        assert_eq!(model.finish(d), Err(OperationError::InvalidTransition));

        model.complete(d);
        assert_eq!(model.frames().len(), 1);
    }

    #[test]
    fn clear_top_skips_pending_destroys() {
        let mut model = ModelStack::new();
        let a = model.start(0, Some(LaunchMode::SINGLE_INSTANCE | LaunchMode::CLEAR_TOP));
        let d = model.start(DEFERRED_KIND, None);
        model.start(1, None);
        model.finish(d).unwrap();

        let again = model.start(0, None);

        assert_eq!(again, a);
        assert_eq!(model.observable(), vec![
            (a, 0, LifecycleState::Resume),
            (d, DEFERRED_KIND, LifecycleState::Destroy),
        ]);
    }

    #[test]
    fn pending_destroy_still_lends_its_mode() {
        let mut model = ModelStack::new();
        model.start(0, None);
        let d1 = model.start(DEFERRED_KIND, Some(LaunchMode::SINGLE_INSTANCE));
        model.finish(d1).unwrap();

        let d2 = model.start(DEFERRED_KIND, None);

        assert_ne!(d1, d2);
        assert_eq!(model.frames().last().map(|f| f.mode), Some(LaunchMode::SINGLE_INSTANCE));
    }

    #[test]
    fn resolve_folds_kinds_and_slots() {
        let mut model = ModelStack::new();
        let a = model.start(0, None);

        let step = model.resolve(&Operation::Start { kind: 9, mode: ModeChoice::Inherit });
        assert_eq!(step, Step::Start { kind: 1, mode: None });
        assert_eq!(model.resolve(&Operation::Finish { slot: 200 }), Step::Finish(a));
        assert_eq!(model.resolve(&Operation::CompleteDestroy { slot: 0 }), Step::Noop);
    }
}
