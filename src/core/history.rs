//! Runtime memory of history states.
//!
//! The statechart itself is immutable; what a history state remembers is
//! runtime state owned by a single interpreter and lives here, keyed by the
//! history state's name.

use super::configuration::Configuration;
use super::state::StateKind;
use super::statechart::Statechart;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What each history state of a statechart currently remembers.
///
/// Memory survives any number of exits and re-entries and is only
/// discarded together with the interpreter that owns it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMemory {
    remembered: HashMap<String, Vec<String>>,
}

impl HistoryMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// States remembered by `history`, if it remembers anything yet.
    pub fn recall(&self, history: &str) -> Option<&[String]> {
        self.remembered.get(history).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.remembered.is_empty()
    }

    /// Record the memory of every history child of `parent`, as seen in
    /// `configuration`.
    ///
    /// Shallow history remembers the active child of `parent`; deep history
    /// remembers its active leaf descendants. Nothing is recorded when
    /// `parent` has no active child.
    pub fn snapshot(
        &mut self,
        statechart: &Statechart,
        configuration: &Configuration,
        parent: &str,
    ) {
        for child in statechart.children_for(parent) {
            let remembered: Vec<String> = match statechart.kind_of(child) {
                Some(StateKind::ShallowHistory) => configuration
                    .active_children(statechart, parent)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                Some(StateKind::DeepHistory) => configuration
                    .leaves(statechart)
                    .into_iter()
                    .filter(|leaf| statechart.is_ancestor(parent, leaf))
                    .map(str::to_string)
                    .collect(),
                _ => continue,
            };
            if !remembered.is_empty() {
                tracing::trace!(history = %child, ?remembered, "history memory recorded");
                self.remembered.insert(child.clone(), remembered);
            }
        }
    }

    /// States to enter in place of `history`.
    ///
    /// Falls back to the history state's declared default memory, then to
    /// the initial state of its parent.
    pub fn resolve(&self, statechart: &Statechart, history: &str) -> Vec<String> {
        if let Some(remembered) = self.recall(history) {
            return remembered.to_vec();
        }
        let state = statechart.state(history);
        let fallback = state.and_then(|s| s.memory.clone()).or_else(|| {
            state
                .and_then(|s| s.parent.as_deref())
                .and_then(|p| statechart.state(p))
                .and_then(|p| p.initial.clone())
        });
        fallback.into_iter().collect()
    }
}
