//! The immutable statechart model and its hierarchy queries.

use super::state::{State, StateKind};
use super::transition::Transition;
use serde::Serialize;
use std::collections::HashMap;

/// An immutable, validated statechart.
///
/// States are stored in document order: a pre-order traversal of the
/// hierarchy tree with children in declaration order. Transitions keep
/// their declaration order, which the interpreter uses as its tie-break.
///
/// Statecharts are assembled with
/// [`StatechartBuilder`](crate::builder::StatechartBuilder).
#[derive(Clone, Debug, Serialize)]
pub struct Statechart {
    name: String,
    description: Option<String>,
    preamble: Option<String>,
    root: String,
    states: Vec<State>,
    transitions: Vec<Transition>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    #[serde(skip)]
    depths: Vec<usize>,
}

impl Statechart {
    /// Assemble a statechart from validated parts.
    ///
    /// `states` must form a tree rooted at `root` with `children` filled
    /// in; the builder's validation pass guarantees it.
    pub(crate) fn from_parts(
        name: String,
        description: Option<String>,
        preamble: Option<String>,
        root: String,
        states: Vec<State>,
        transitions: Vec<Transition>,
    ) -> Self {
        let mut by_name: HashMap<String, State> =
            states.into_iter().map(|s| (s.name.clone(), s)).collect();

        let mut ordered = Vec::with_capacity(by_name.len());
        let mut depths = Vec::with_capacity(by_name.len());
        let mut stack = vec![(root.clone(), 0usize)];
        while let Some((name, depth)) = stack.pop() {
            if let Some(state) = by_name.remove(&name) {
                for child in state.children.iter().rev() {
                    stack.push((child.clone(), depth + 1));
                }
                ordered.push(state);
                depths.push(depth);
            }
        }

        let index = ordered
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();

        Self {
            name,
            description,
            preamble,
            root,
            states: ordered,
            transitions,
            index,
            depths,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Opaque host code carried along with the model. The interpreter never
    /// runs it; hosts read it back and decide what to do with it.
    pub fn preamble(&self) -> Option<&str> {
        self.preamble.as_deref()
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn state(&self, name: &str) -> Option<&State> {
        self.index.get(name).map(|&i| &self.states[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All states, in document order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// All transitions, in declaration order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn kind_of(&self, name: &str) -> Option<StateKind> {
        self.state(name).map(|s| s.kind)
    }

    pub fn parent_for(&self, name: &str) -> Option<&str> {
        self.state(name).and_then(|s| s.parent.as_deref())
    }

    pub fn children_for(&self, name: &str) -> &[String] {
        self.state(name).map(|s| s.children.as_slice()).unwrap_or(&[])
    }

    /// Proper ancestors of `name`, nearest first, ending with the root.
    pub fn ancestors_for(&self, name: &str) -> Vec<&str> {
        let mut ancestors = Vec::new();
        let mut current = self.parent_for(name);
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.parent_for(parent);
        }
        ancestors
    }

    /// Proper descendants of `name`, in document order.
    pub fn descendants_for(&self, name: &str) -> Vec<&str> {
        let Some(&start) = self.index.get(name) else {
            return Vec::new();
        };
        let depth = self.depths[start];
        self.states[start + 1..]
            .iter()
            .zip(&self.depths[start + 1..])
            .take_while(|(_, d)| **d > depth)
            .map(|(s, _)| s.name.as_str())
            .collect()
    }

    /// Depth of `name` in the hierarchy; the root has depth 0.
    pub fn depth_for(&self, name: &str) -> Option<usize> {
        self.index.get(name).map(|&i| self.depths[i])
    }

    /// Document-order position of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Whether `ancestor` is a proper ancestor of `state`.
    pub fn is_ancestor(&self, ancestor: &str, state: &str) -> bool {
        let mut current = self.parent_for(state);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent_for(parent);
        }
        false
    }

    /// Whether `state` is `other` or one of its descendants.
    pub fn is_within(&self, state: &str, other: &str) -> bool {
        state == other || self.is_ancestor(other, state)
    }

    /// Deepest compound state that is a proper ancestor of both `a` and `b`.
    ///
    /// This is the scope of an external transition from `a` to `b`: it is
    /// never `a` or `b` themselves, so a self-transition exits and re-enters
    /// its source.
    pub fn least_common_compound_ancestor(&self, a: &str, b: &str) -> Option<&str> {
        let of_b = self.ancestors_for(b);
        self.ancestors_for(a)
            .into_iter()
            .filter(|s| self.kind_of(s) == Some(StateKind::Compound))
            .find(|s| of_b.contains(s))
    }

    pub fn transitions_from<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Transition> {
        self.transitions.iter().filter(move |t| t.source == name)
    }

    pub fn transitions_to<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Transition> {
        self.transitions
            .iter()
            .filter(move |t| t.target.as_deref() == Some(name))
    }

    pub fn transitions_with<'a>(&'a self, event: &'a str) -> impl Iterator<Item = &'a Transition> {
        self.transitions
            .iter()
            .filter(move |t| t.event.as_deref() == Some(event))
    }

    /// Distinct event names used by transitions, in declaration order.
    pub fn events(&self) -> Vec<&str> {
        let mut events: Vec<&str> = Vec::new();
        for event in self.transitions.iter().filter_map(|t| t.event.as_deref()) {
            if !events.contains(&event) {
                events.push(event);
            }
        }
        events
    }

    /// Distinct event names accepted by transitions leaving `states`.
    pub fn events_for<'a, I>(&'a self, states: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let sources: Vec<&str> = states.into_iter().collect();
        let mut events: Vec<&str> = Vec::new();
        for transition in &self.transitions {
            if let Some(event) = transition.event.as_deref() {
                if sources.contains(&transition.source.as_str()) && !events.contains(&event) {
                    events.push(event);
                }
            }
        }
        events
    }

    /// A final state with no way out: entering it completes its region.
    pub fn is_terminal(&self, name: &str) -> bool {
        self.kind_of(name) == Some(StateKind::Final) && self.transitions_from(name).next().is_none()
    }
}
