//! Model-based testing support.
//!
//! [`Operation`]s are resolved against the [`ModelStack`] into [`Step`]s,
//! then applied to both the model and a real manager through
//! [`apply_step`]; their observable stacks must stay identical.

mod operation;
mod stack;

use std::fmt;

use actstack_core::{ActivityManager, LifecycleState};
pub use operation::{
    DEFERRED_KIND, KIND_COUNT, ModeChoice, ModelKind, Operation, OperationError, OperationResult,
};
pub use stack::{ModelFrame, ModelStack, Step};

use tracing::trace;

use crate::{Behavior, Journal, RecordingFactory};

/// Manager wired to the same behaviors as the model: [`DEFERRED_KIND`]
/// defers its teardown, every other kind is plain.
pub fn model_manager<P: fmt::Debug>(
    journal: &Journal<ModelKind>,
) -> ActivityManager<ModelKind, P> {
    let factory = RecordingFactory::new(journal.clone())
        .with_behavior(DEFERRED_KIND, Behavior::deferred());
    ActivityManager::new(factory)
}

/// Apply a resolved step to a real manager.
///
/// Deferred completions are taken from `journal`, where recorders park them.
pub fn apply_step<P>(
    manager: &mut ActivityManager<ModelKind, P>,
    journal: &Journal<ModelKind>,
    step: Step,
) -> OperationResult {
    trace!(?step, "applying step");
    match step {
        Step::Start { kind, mode } => {
            manager.start(kind, mode, None).map(|_| ()).map_err(|e| OperationError::from(&e))
        },
        Step::Finish(id) => manager.finish(id).map_err(|e| OperationError::from(&e)),
        Step::CompleteDestroy(id) => {
            match journal.take_completion(id) {
                Some(done) => manager.complete_destroy(done),
                None => trace!(%id, "no parked completion"),
            }
            Ok(())
        },
        Step::Noop => Ok(()),
    }
}

/// Observable stack of a real manager, comparable with
/// [`ModelStack::observable`].
pub fn observable<P>(
    manager: &ActivityManager<ModelKind, P>,
) -> Vec<(actstack_core::ActivityId, ModelKind, LifecycleState)> {
    manager.frames().into_iter().map(|f| (f.id, f.kind, f.state)).collect()
}
