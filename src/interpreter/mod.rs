//! Big-step execution of statecharts.
//!
//! Each big step runs three stages over the current configuration:
//!
//! 1. [`select`] picks the transitions that may fire and consumes at most
//!    one event, following the [`EventPriority`].
//! 2. [`resolve`] drops conflicting transitions between ancestor and
//!    descendant states, following the [`RegionPriority`].
//! 3. [`step`] executes the survivors in declaration order, one
//!    [`MicroStep`] each.
//!
//! [`Interpreter`] owns the runtime state and drives these stages.

mod error;
mod executor;
mod machine;
mod policy;
mod resolver;
mod selector;
mod step;
mod trace;

pub use error::{ExecutionError, HookPhase};
pub use executor::{conclude, initialize, step};
pub use machine::Interpreter;
pub use policy::{
    EventPriority, InterpreterConfig, Policy, RegionPriority, DEFAULT_TRACE_LIMIT,
};
pub use resolver::resolve;
pub use selector::{select, Candidate, Selection};
pub use step::{MacroStep, MicroStep};
pub use trace::{ExecutionTrace, TraceEntry};
