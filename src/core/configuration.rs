//! The set of active states and its hierarchy invariants.

use super::state::StateKind;
use super::statechart::Statechart;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// A broken configuration invariant.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigurationViolation {
    #[error("active state '{0}' is not part of the statechart")]
    UnknownState(String),

    #[error("history state '{0}' is active")]
    ActiveHistory(String),

    #[error("state '{state}' is active but its parent '{parent}' is not")]
    InactiveParent { state: String, parent: String },

    #[error("compound state '{state}' has {active} active children, expected exactly one")]
    CompoundChildren { state: String, active: usize },

    #[error("region '{region}' of orthogonal state '{state}' is not active")]
    InactiveRegion { state: String, region: String },

    #[error("configuration is not empty but the root '{0}' is inactive")]
    InactiveRoot(String),
}

/// The currently active states.
///
/// Only the step executor mutates a configuration; everything else reads
/// it. [`Configuration::ordered`] renders it root-to-leaf per branch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    active: BTreeSet<String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.active.contains(name)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(String::as_str)
    }

    pub(crate) fn insert(&mut self, name: &str) -> bool {
        self.active.insert(name.to_string())
    }

    pub(crate) fn remove(&mut self, name: &str) -> bool {
        self.active.remove(name)
    }

    /// Active states in document order.
    pub fn ordered(&self, statechart: &Statechart) -> Vec<String> {
        statechart
            .states()
            .iter()
            .filter(|s| self.contains(&s.name))
            .map(|s| s.name.clone())
            .collect()
    }

    /// Active children of `name`, in declaration order.
    pub fn active_children<'a>(&self, statechart: &'a Statechart, name: &str) -> Vec<&'a str> {
        statechart
            .children_for(name)
            .iter()
            .map(String::as_str)
            .filter(|c| self.contains(c))
            .collect()
    }

    /// Active states with no active child, in document order.
    pub fn leaves<'a>(&self, statechart: &'a Statechart) -> Vec<&'a str> {
        statechart
            .states()
            .iter()
            .map(|s| s.name.as_str())
            .filter(|s| self.contains(s) && self.active_children(statechart, s).is_empty())
            .collect()
    }

    /// Check the hierarchy invariants, reporting the first violation.
    ///
    /// An empty configuration (before start) is consistent.
    pub fn check(&self, statechart: &Statechart) -> Result<(), ConfigurationViolation> {
        if self.is_empty() {
            return Ok(());
        }
        if !self.contains(statechart.root()) {
            return Err(ConfigurationViolation::InactiveRoot(
                statechart.root().to_string(),
            ));
        }

        for name in self.iter() {
            let state = statechart
                .state(name)
                .ok_or_else(|| ConfigurationViolation::UnknownState(name.to_string()))?;

            if state.is_history() {
                return Err(ConfigurationViolation::ActiveHistory(name.to_string()));
            }
            if let Some(parent) = &state.parent {
                if !self.contains(parent) {
                    return Err(ConfigurationViolation::InactiveParent {
                        state: name.to_string(),
                        parent: parent.clone(),
                    });
                }
            }

            match state.kind {
                StateKind::Compound => {
                    let active = self.active_children(statechart, name).len();
                    if active != 1 {
                        return Err(ConfigurationViolation::CompoundChildren {
                            state: name.to_string(),
                            active,
                        });
                    }
                }
                StateKind::Orthogonal => {
                    if let Some(region) = state.children.iter().find(|c| !self.contains(c)) {
                        return Err(ConfigurationViolation::InactiveRegion {
                            state: name.to_string(),
                            region: region.clone(),
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Whether `name` is active and has completed.
    ///
    /// A terminal final state is complete; a compound state is complete
    /// when its active child is a terminal final state; an orthogonal state
    /// is complete when all its regions are.
    pub fn is_complete(&self, statechart: &Statechart, name: &str) -> bool {
        if !self.contains(name) {
            return false;
        }
        match statechart.kind_of(name) {
            Some(StateKind::Final) => statechart.is_terminal(name),
            Some(StateKind::Compound) => self
                .active_children(statechart, name)
                .first()
                .is_some_and(|child| statechart.is_terminal(child)),
            Some(StateKind::Orthogonal) => statechart
                .children_for(name)
                .iter()
                .all(|region| self.is_complete(statechart, region)),
            _ => false,
        }
    }

    /// Complete composite states, in document order.
    pub fn completed(&self, statechart: &Statechart) -> Vec<String> {
        statechart
            .states()
            .iter()
            .filter(|s| s.kind.is_composite() && self.is_complete(statechart, &s.name))
            .map(|s| s.name.clone())
            .collect()
    }
}
