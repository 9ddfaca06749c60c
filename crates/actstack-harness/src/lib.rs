//! Test harness for the activity stack.
//!
//! # Recording
//!
//! [`Recorder`] activities log every callback into a shared [`Journal`] and
//! can be scripted with a [`Behavior`] (finish themselves from a callback,
//! defer their teardown).
//!
//! # Invariant Testing
//!
//! The `invariants` module checks properties that must hold between any two
//! manager operations. Use [`InvariantRegistry::standard()`] for the stack
//! invariants.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference stack. Random [`Operation`]s are
//! applied to both the model and a real manager and their observable stacks
//! are compared.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod model;
pub mod recorder;

pub use invariants::{
    FrameSnapshot, Invariant, InvariantRegistry, InvariantResult, SettledStates, SingleResumed,
    StackSnapshot, TopIsResumed, UniqueIds, Violation,
};
pub use model::{
    DEFERRED_KIND, KIND_COUNT, ModeChoice, ModelFrame, ModelKind, ModelStack, Operation,
    OperationError, OperationResult, Step, apply_step, model_manager, observable,
};
pub use recorder::{Behavior, Callback, Entry, Journal, Recorder, RecordingFactory};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a `RUST_LOG`-driven subscriber writing through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(filter)
        .try_init();
}
