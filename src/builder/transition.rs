//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Contracts, Transition};

/// Builder for constructing transitions with a fluent API.
///
/// Only the source is required. Leaving out `.to()` makes the transition
/// internal, leaving out `.on()` makes it eventless.
#[derive(Clone, Debug, Default)]
pub struct TransitionBuilder {
    source: Option<String>,
    target: Option<String>,
    event: Option<String>,
    guard: Option<String>,
    action: Option<String>,
    contracts: Contracts,
}

impl TransitionBuilder {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source state (required).
    pub fn from(mut self, state: impl Into<String>) -> Self {
        self.source = Some(state.into());
        self
    }

    /// Set the target state.
    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.target = Some(state.into());
        self
    }

    /// Set the triggering event.
    pub fn on(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Set the guard code.
    pub fn when(mut self, guard: impl Into<String>) -> Self {
        self.guard = Some(guard.into());
        self
    }

    /// Set the action code.
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn precondition(mut self, condition: impl Into<String>) -> Self {
        self.contracts.preconditions.push(condition.into());
        self
    }

    pub fn postcondition(mut self, condition: impl Into<String>) -> Self {
        self.contracts.postconditions.push(condition.into());
        self
    }

    pub fn invariant(mut self, condition: impl Into<String>) -> Self {
        self.contracts.invariants.push(condition.into());
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition, BuildError> {
        let source = self.source.ok_or(BuildError::MissingSource)?;

        Ok(Transition {
            source,
            target: self.target,
            event: self.event,
            guard: self.guard,
            action: self.action,
            contracts: self.contracts,
        })
    }
}
