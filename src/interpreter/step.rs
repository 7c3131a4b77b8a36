//! Records of what a step did.

use crate::core::{Event, Transition};
use serde::{Deserialize, Serialize};

/// The effect of one transition, or of the initial entry into the root.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MicroStep {
    /// `None` for the initialization step.
    pub transition: Option<Transition>,
    /// Exited states, innermost first.
    pub exited: Vec<String>,
    /// Entered states, outermost first.
    pub entered: Vec<String>,
}

impl MicroStep {
    pub(crate) fn new(transition: Option<Transition>) -> Self {
        Self {
            transition,
            exited: Vec::new(),
            entered: Vec::new(),
        }
    }
}

/// One big step: the event it consumed, the transitions it fired and the
/// status reported after it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MacroStep {
    /// Consumed event. A step with an event and no micro steps means the
    /// event expired without effect.
    pub event: Option<Event>,
    pub steps: Vec<MicroStep>,
    /// Active states after the step, in document order.
    pub configuration: Vec<String>,
    /// Final states without outgoing transitions entered by this step.
    pub finished: Vec<String>,
    /// Compound and orthogonal states that completed during this step.
    pub completed: Vec<String>,
}

impl MacroStep {
    /// Fired transitions, in execution order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.steps.iter().filter_map(|s| s.transition.as_ref())
    }

    pub fn entered_states(&self) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .flat_map(|s| s.entered.iter().map(String::as_str))
    }

    pub fn exited_states(&self) -> impl Iterator<Item = &str> {
        self.steps
            .iter()
            .flat_map(|s| s.exited.iter().map(String::as_str))
    }

    /// Whether the step changed nothing (an expired event).
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
