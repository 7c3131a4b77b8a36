//! Statecraft: an interpreter for hierarchical, concurrent statecharts
//!
//! A statechart is an immutable model of nested states (compound states
//! with one active child, orthogonal states whose regions run in parallel,
//! final states and history pseudo-states) connected by transitions that
//! carry an optional event, guard and action. Guards and actions are
//! opaque code strings: the crate never interprets them, it hands them to
//! a host-provided [`Evaluator`](evaluator::Evaluator).
//!
//! # Core Concepts
//!
//! - **Model**: [`Statechart`], [`State`], [`Transition`], built and
//!   validated with the [`builder`] module
//! - **Configuration**: the set of active states and its invariants
//! - **Policies**: [`RegionPriority`] decides between transitions of
//!   nested states, [`EventPriority`] between a pending event and eventless
//!   transitions
//! - **Interpreter**: runs big steps and records a bounded, timestamped trace
//!
//! # Example
//!
//! ```rust
//! use statecraft::builder::{StateBuilder, StatechartBuilder, TransitionBuilder};
//! use statecraft::evaluator::PermissiveEvaluator;
//! use statecraft::{Interpreter, InterpreterConfig, Policy};
//!
//! let chart = StatechartBuilder::new("traffic light")
//!     .state(StateBuilder::compound("root").initial("red"))
//!     .state(StateBuilder::basic("red").parent("root"))
//!     .state(StateBuilder::basic("green").parent("root"))
//!     .state(StateBuilder::basic("yellow").parent("root"))
//!     .transition(TransitionBuilder::new().from("red").to("green").on("tick"))?
//!     .transition(TransitionBuilder::new().from("green").to("yellow").on("tick"))?
//!     .transition(TransitionBuilder::new().from("yellow").to("red").on("tick"))?
//!     .build()?;
//!
//! let config = InterpreterConfig::new(Policy::event_first());
//! let mut interpreter = Interpreter::with_config(chart, PermissiveEvaluator, config);
//!
//! interpreter.queue("tick").queue("tick").execute().unwrap();
//! assert_eq!(interpreter.configuration(), vec!["root", "yellow"]);
//! # Ok::<(), statecraft::builder::BuildError>(())
//! ```

pub mod builder;
pub mod core;
pub mod evaluator;
pub mod interpreter;

// Re-export commonly used types
pub use crate::core::{Configuration, Event, State, StateKind, Statechart, Transition};
pub use builder::{BuildError, StateBuilder, StatechartBuilder, TransitionBuilder};
pub use evaluator::{Evaluator, HookRegistry, PermissiveEvaluator};
pub use interpreter::{
    EventPriority, ExecutionError, Interpreter, InterpreterConfig, MacroStep, Policy,
    RegionPriority,
};
