//! Build errors for statechart, state and transition builders.

use thiserror::Error;

/// One finding of the model validation pass.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("State '{0}' is declared more than once")]
    DuplicateState(String),

    #[error("No root state. Exactly one state must have no parent")]
    MissingRoot,

    #[error("Several root states: {}", .0.join(", "))]
    MultipleRoots(Vec<String>),

    #[error("State '{state}' has unknown parent '{parent}'")]
    UnknownParent { state: String, parent: String },

    #[error("State '{state}' cannot be a child of '{parent}', which is not compound or orthogonal")]
    InvalidParent { state: String, parent: String },

    #[error("State '{0}' is part of a parent cycle")]
    Cycle(String),

    #[error("Compound state '{0}' has no initial state. Call .initial(child)")]
    MissingInitial(String),

    #[error("Initial state '{initial}' of '{state}' is not one of its children")]
    UnresolvedInitial { state: String, initial: String },

    #[error("Initial state '{initial}' of '{state}' is a history state")]
    HistoryAsInitial { state: String, initial: String },

    #[error("State '{0}' declares an initial state but is not compound")]
    UnexpectedInitial(String),

    #[error("Memory '{memory}' of history state '{state}' is not a sibling state")]
    UnresolvedMemory { state: String, memory: String },

    #[error("State '{0}' declares a memory but is not a history state")]
    UnexpectedMemory(String),

    #[error("Region '{region}' of orthogonal state '{state}' must be compound or orthogonal")]
    InvalidRegion { state: String, region: String },

    #[error("Orthogonal state '{0}' has no regions")]
    EmptyOrthogonal(String),

    #[error("History state '{0}' must be the child of a compound state")]
    HistoryOutsideCompound(String),

    #[error("Transition source '{0}' is not a state")]
    UnknownSource(String),

    #[error("Transition target '{0}' is not a state")]
    UnknownTarget(String),

    #[error("History state '{0}' cannot be the source of a transition")]
    TransitionFromHistory(String),
}

/// Errors that can occur when building statecharts and transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Transition source state not specified. Call .from(state)")]
    MissingSource,

    #[error("Statechart is malformed: {}", describe(.0))]
    Invalid(Vec<ModelError>),
}

impl BuildError {
    /// Validation findings carried by this error, if any.
    pub fn findings(&self) -> &[ModelError] {
        match self {
            Self::Invalid(errors) => errors,
            Self::MissingSource => &[],
        }
    }
}

fn describe(errors: &[ModelError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
