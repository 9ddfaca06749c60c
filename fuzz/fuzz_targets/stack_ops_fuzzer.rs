//! Fuzz target for the activity manager
//!
//! Drive the real manager and the reference stack with the same operation
//! sequence and require them to agree.
//!
//! # Strategy
//!
//! - Launches of a handful of colliding kinds in every launch mode
//! - Finishes of arbitrary frames, pending destroys included
//! - Completion of deferred destroys in arbitrary order
//!
//! # Invariants
//!
//! - Operation results match the model exactly
//! - Observable stacks match the model after every operation
//! - At most one frame resumed, and it is the top
//! - No frame left between settled states

#![no_main]

use actstack_harness::{
    InvariantRegistry, Journal, ModelStack, Operation, StackSnapshot, apply_step, model_manager,
    observable,
};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Scenario {
    ops: Vec<Operation>,
}

fuzz_target!(|scenario: Scenario| {
    let journal = Journal::new();
    let mut real = model_manager::<u16>(&journal);
    let mut model = ModelStack::new();
    let registry = InvariantRegistry::standard();

    for (i, op) in scenario.ops.iter().take(256).enumerate() {
        let step = model.resolve(op);

        let model_result = model.apply(step);
        let real_result = apply_step(&mut real, &journal, step);
        assert_eq!(model_result, real_result, "result divergence at {i}: {op:?}");

        assert_eq!(model.observable(), observable(&real), "stack divergence at {i}: {op:?}");

        registry.assert_all(&StackSnapshot::capture(&real), &format!("after {i}: {op:?}"));
    }
});
