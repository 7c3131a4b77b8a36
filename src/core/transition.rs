//! Transitions between states.

use super::state::Contracts;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A transition of the statechart.
///
/// A transition without `target` is internal: firing it only runs its
/// action. A transition without `event` is eventless and is considered on
/// every step its source is active.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub source: String,
    pub target: Option<String>,
    pub event: Option<String>,
    /// Guard code handed to the evaluator.
    pub guard: Option<String>,
    /// Action code handed to the evaluator.
    pub action: Option<String>,
    #[serde(default)]
    pub contracts: Contracts,
}

impl Transition {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: None,
            event: None,
            guard: None,
            action: None,
            contracts: Contracts::default(),
        }
    }

    pub fn is_internal(&self) -> bool {
        self.target.is_none()
    }

    pub fn is_eventless(&self) -> bool {
        self.event.is_none()
    }

    /// Whether this transition is triggered by `event`; `None` asks for
    /// eventless transitions.
    pub fn is_triggered_by(&self, event: Option<&str>) -> bool {
        self.event.as_deref() == event
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> ", self.source)?;
        match &self.target {
            Some(target) => write!(f, "{}", target)?,
            None => f.write_str("(internal)")?,
        }
        if let Some(event) = &self.event {
            write!(f, " on {}", event)?;
        }
        if let Some(guard) = &self.guard {
            write!(f, " [{}]", guard)?;
        }
        Ok(())
    }
}
