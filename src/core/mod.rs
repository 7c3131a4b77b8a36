//! Core statechart types.
//!
//! This module contains the static model and the runtime bookkeeping the
//! interpreter works on:
//! - States, transitions and the immutable [`Statechart`] with its
//!   hierarchy queries
//! - Events and the [`EventQueue`] abstraction
//! - The active [`Configuration`] and its invariants
//! - [`HistoryMemory`], the runtime memory of history states
//!
//! Nothing in this module evaluates guards or runs actions.

mod configuration;
mod event;
mod history;
mod state;
mod statechart;
mod transition;

pub use configuration::{Configuration, ConfigurationViolation};
pub use event::{Event, EventQueue};
pub use history::HistoryMemory;
pub use state::{Contracts, State, StateKind};
pub use statechart::Statechart;
pub use transition::Transition;
