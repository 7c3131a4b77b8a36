//! States of a statechart.
//!
//! A state is a node of the hierarchy tree. Its [`StateKind`] decides how
//! entering it propagates to its children and whether it can ever be part
//! of a configuration (history states never are).

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a state, deciding how it behaves on entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// A leaf state.
    Basic,
    /// A state with children, exactly one of which is active.
    Compound,
    /// A state whose children are parallel regions, all active together.
    Orthogonal,
    /// A leaf marking the completion of its region.
    Final,
    /// Pseudo-state restoring the last active child of its parent.
    ShallowHistory,
    /// Pseudo-state restoring the last active leaves below its parent.
    DeepHistory,
}

impl StateKind {
    /// Whether states of this kind may own children.
    pub fn is_composite(self) -> bool {
        matches!(self, Self::Compound | Self::Orthogonal)
    }

    /// Whether this kind is one of the history pseudo-states.
    pub fn is_history(self) -> bool {
        matches!(self, Self::ShallowHistory | Self::DeepHistory)
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Basic => "basic",
            Self::Compound => "compound",
            Self::Orthogonal => "orthogonal",
            Self::Final => "final",
            Self::ShallowHistory => "shallow history",
            Self::DeepHistory => "deep history",
        };
        f.write_str(label)
    }
}

/// Opaque contract annotations attached to states and transitions.
///
/// The interpreter never reads these; they are carried verbatim for the
/// tooling that owns them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contracts {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preconditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub postconditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invariants: Vec<String>,
}

impl Contracts {
    pub fn is_empty(&self) -> bool {
        self.preconditions.is_empty()
            && self.postconditions.is_empty()
            && self.invariants.is_empty()
    }
}

/// A state of the statechart.
///
/// States are plain data. Hierarchy consistency (`children` mirroring the
/// `parent` links, `initial` naming a child) is established by
/// [`StatechartBuilder`](crate::builder::StatechartBuilder), which is the
/// only way to assemble a [`Statechart`](crate::core::Statechart).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Identifier, unique within the statechart.
    pub name: String,
    pub kind: StateKind,
    /// `None` only for the root.
    pub parent: Option<String>,
    /// Children in declaration order.
    pub children: Vec<String>,
    /// Default child, for compound states.
    pub initial: Option<String>,
    /// Default memory of a history state, used until it remembers something.
    pub memory: Option<String>,
    /// Code handed to the evaluator when the state is entered.
    pub on_entry: Option<String>,
    /// Code handed to the evaluator when the state is exited.
    pub on_exit: Option<String>,
    #[serde(default)]
    pub contracts: Contracts,
}

impl State {
    pub fn new(name: impl Into<String>, kind: StateKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            children: Vec::new(),
            initial: None,
            memory: None,
            on_entry: None,
            on_exit: None,
            contracts: Contracts::default(),
        }
    }

    pub fn is_final(&self) -> bool {
        self.kind == StateKind::Final
    }

    pub fn is_history(&self) -> bool {
        self.kind.is_history()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_kinds_own_children() {
        assert!(StateKind::Compound.is_composite());
        assert!(StateKind::Orthogonal.is_composite());
        assert!(!StateKind::Basic.is_composite());
        assert!(!StateKind::Final.is_composite());
        assert!(!StateKind::DeepHistory.is_composite());
    }

    #[test]
    fn history_kinds_are_recognised() {
        assert!(StateKind::ShallowHistory.is_history());
        assert!(StateKind::DeepHistory.is_history());
        assert!(!StateKind::Compound.is_history());
    }

    #[test]
    fn new_state_has_no_hierarchy() {
        let state = State::new("idle", StateKind::Basic);

        assert_eq!(state.name, "idle");
        assert!(state.parent.is_none());
        assert!(state.children.is_empty());
        assert!(state.contracts.is_empty());
        assert!(!state.is_final());
    }

    #[test]
    fn empty_contracts_are_not_serialized() {
        let state = State::new("done", StateKind::Final);
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["contracts"], serde_json::json!({}));
        assert_eq!(json["kind"], "Final");
    }

    #[test]
    fn contracts_round_trip_verbatim() {
        let contracts = Contracts {
            preconditions: vec!["x > 0".to_string()],
            postconditions: vec![],
            invariants: vec!["y < 10".to_string(), "z".to_string()],
        };
        let json = serde_json::to_string(&contracts).unwrap();
        let back: Contracts = serde_json::from_str(&json).unwrap();

        assert_eq!(back, contracts);
    }
}
