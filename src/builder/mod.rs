//! Builder API for statechart construction.
//!
//! This module provides fluent builders for states, transitions and
//! statecharts, plus the validation pass every statechart goes through
//! before an interpreter can run it.

pub mod error;
pub mod state;
pub mod statechart;
pub mod transition;
pub mod validation;

pub use error::{BuildError, ModelError};
pub use state::StateBuilder;
pub use statechart::StatechartBuilder;
pub use transition::TransitionBuilder;

use crate::core::Transition;

/// Create an eventless, unguarded transition.
///
/// # Example
///
/// ```
/// use statecraft::builder::automatic_transition;
///
/// let transition = automatic_transition("D1", "G1");
/// assert!(transition.is_eventless());
/// ```
pub fn automatic_transition(from: impl Into<String>, to: impl Into<String>) -> Transition {
    TransitionBuilder::new()
        .from(from)
        .to(to)
        .build()
        .expect("Transition with a source should always build")
}

/// Create an unguarded transition triggered by `event`.
///
/// # Example
///
/// ```
/// use statecraft::builder::event_transition;
///
/// let transition = event_transition("B1", "C1", "e");
/// assert_eq!(transition.event.as_deref(), Some("e"));
/// ```
pub fn event_transition(
    from: impl Into<String>,
    to: impl Into<String>,
    event: impl Into<String>,
) -> Transition {
    TransitionBuilder::new()
        .from(from)
        .to(to)
        .on(event)
        .build()
        .expect("Transition with a source should always build")
}
