//! Builder for constructing statecharts.

use crate::builder::error::{BuildError, ModelError};
use crate::builder::state::StateBuilder;
use crate::builder::transition::TransitionBuilder;
use crate::builder::validation;
use crate::core::{State, Statechart, Transition};

/// Builder for constructing statecharts with a fluent API.
///
/// States may be declared in any order; children lists follow the order in
/// which children were declared. [`build`](Self::build) runs the validation
/// pass and reports every finding at once.
#[derive(Clone, Debug)]
pub struct StatechartBuilder {
    name: String,
    description: Option<String>,
    preamble: Option<String>,
    states: Vec<State>,
    duplicates: Vec<String>,
    transitions: Vec<Transition>,
}

impl StatechartBuilder {
    /// Create a new builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            preamble: None,
            states: Vec::new(),
            duplicates: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach opaque host code to the model, kept as metadata only.
    pub fn preamble(mut self, code: impl Into<String>) -> Self {
        self.preamble = Some(code.into());
        self
    }

    /// Add a state using a builder.
    pub fn state(self, builder: StateBuilder) -> Self {
        self.add_state(builder.build())
    }

    /// Add a pre-built state.
    ///
    /// Its `children` are ignored; they are derived from `parent` links.
    pub fn add_state(mut self, mut state: State) -> Self {
        if self.states.iter().any(|s| s.name == state.name) {
            self.duplicates.push(state.name);
            return self;
        }
        state.children.clear();
        self.states.push(state);
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Validate and build the statechart.
    pub fn build(self) -> Result<Statechart, BuildError> {
        validation::validate(&self.states, &self.duplicates, &self.transitions)
            .map_err(BuildError::Invalid)?;

        let mut states = self.states;
        let links: Vec<(usize, String)> = states
            .iter()
            .filter_map(|s| {
                let parent = s.parent.as_deref()?;
                let index = states.iter().position(|p| p.name == parent)?;
                Some((index, s.name.clone()))
            })
            .collect();
        for (index, child) in links {
            states[index].children.push(child);
        }

        let root = states
            .iter()
            .find(|s| s.parent.is_none())
            .map(|s| s.name.clone())
            .ok_or(BuildError::Invalid(vec![ModelError::MissingRoot]))?;

        tracing::debug!(
            statechart = %self.name,
            states = states.len(),
            transitions = self.transitions.len(),
            "statechart built"
        );

        Ok(Statechart::from_parts(
            self.name,
            self.description,
            self.preamble,
            root,
            states,
            self.transitions,
        ))
    }
}
