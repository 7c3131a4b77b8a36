//! Builder for constructing states.

use crate::core::{State, StateKind};

/// Builder for a single state.
///
/// Children are never declared here: a state joins its parent through
/// `.parent(name)`, and the statechart builder derives the children lists.
#[derive(Clone, Debug)]
pub struct StateBuilder {
    state: State,
}

impl StateBuilder {
    pub fn new(name: impl Into<String>, kind: StateKind) -> Self {
        Self {
            state: State::new(name, kind),
        }
    }

    pub fn basic(name: impl Into<String>) -> Self {
        Self::new(name, StateKind::Basic)
    }

    pub fn compound(name: impl Into<String>) -> Self {
        Self::new(name, StateKind::Compound)
    }

    pub fn orthogonal(name: impl Into<String>) -> Self {
        Self::new(name, StateKind::Orthogonal)
    }

    pub fn final_state(name: impl Into<String>) -> Self {
        Self::new(name, StateKind::Final)
    }

    pub fn shallow_history(name: impl Into<String>) -> Self {
        Self::new(name, StateKind::ShallowHistory)
    }

    pub fn deep_history(name: impl Into<String>) -> Self {
        Self::new(name, StateKind::DeepHistory)
    }

    /// Set the parent state. The state without parent is the root.
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.state.parent = Some(parent.into());
        self
    }

    /// Set the initial child (compound states only).
    pub fn initial(mut self, child: impl Into<String>) -> Self {
        self.state.initial = Some(child.into());
        self
    }

    /// Set the default memory (history states only).
    pub fn memory(mut self, sibling: impl Into<String>) -> Self {
        self.state.memory = Some(sibling.into());
        self
    }

    pub fn on_entry(mut self, code: impl Into<String>) -> Self {
        self.state.on_entry = Some(code.into());
        self
    }

    pub fn on_exit(mut self, code: impl Into<String>) -> Self {
        self.state.on_exit = Some(code.into());
        self
    }

    pub fn precondition(mut self, condition: impl Into<String>) -> Self {
        self.state.contracts.preconditions.push(condition.into());
        self
    }

    pub fn postcondition(mut self, condition: impl Into<String>) -> Self {
        self.state.contracts.postconditions.push(condition.into());
        self
    }

    pub fn invariant(mut self, condition: impl Into<String>) -> Self {
        self.state.contracts.invariants.push(condition.into());
        self
    }

    pub fn build(self) -> State {
        self.state
    }
}

impl From<StateBuilder> for State {
    fn from(builder: StateBuilder) -> Self {
        builder.build()
    }
}
