//! Well-formedness checks run before a statechart is handed out.
//!
//! Checks are expressed as Stillwater `Validation`s so that a malformed
//! model reports every finding at once instead of the first one.

use crate::builder::error::ModelError;
use crate::core::{State, StateKind, Transition};
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of a single check.
pub type ModelCheck = Validation<(), NonEmptyVec<ModelError>>;

fn ok() -> ModelCheck {
    Validation::success(())
}

fn fail(error: ModelError) -> ModelCheck {
    Validation::fail(error)
}

/// Validate the parts of a statechart, accumulating ALL findings.
///
/// `duplicates` lists names that were declared more than once; only their
/// first declaration is part of `states`.
pub fn validate(
    states: &[State],
    duplicates: &[String],
    transitions: &[Transition],
) -> Result<(), Vec<ModelError>> {
    let by_name: HashMap<&str, &State> = states.iter().map(|s| (s.name.as_str(), s)).collect();
    let mut checks: Vec<ModelCheck> = Vec::new();

    for name in duplicates {
        checks.push(fail(ModelError::DuplicateState(name.clone())));
    }
    checks.push(check_root(states));

    for state in states {
        checks.push(check_parent(state, &by_name));
        checks.push(check_cycle(state, &by_name));
        checks.push(check_initial(state, &by_name));
        checks.push(check_history(state, &by_name));
        if state.kind == StateKind::Orthogonal {
            checks.extend(check_regions(state, states));
        }
    }

    for transition in transitions {
        checks.push(check_transition(transition, &by_name));
    }

    match Validation::all_vec(checks) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
    }
}

fn check_root(states: &[State]) -> ModelCheck {
    let roots: Vec<String> = states
        .iter()
        .filter(|s| s.parent.is_none())
        .map(|s| s.name.clone())
        .collect();
    match roots.len() {
        0 => fail(ModelError::MissingRoot),
        1 => ok(),
        _ => fail(ModelError::MultipleRoots(roots)),
    }
}

fn check_parent(state: &State, by_name: &HashMap<&str, &State>) -> ModelCheck {
    let Some(parent) = state.parent.as_deref() else {
        return ok();
    };
    match by_name.get(parent) {
        None => fail(ModelError::UnknownParent {
            state: state.name.clone(),
            parent: parent.to_string(),
        }),
        Some(p) if !p.kind.is_composite() => fail(ModelError::InvalidParent {
            state: state.name.clone(),
            parent: parent.to_string(),
        }),
        Some(_) => ok(),
    }
}

fn check_cycle(state: &State, by_name: &HashMap<&str, &State>) -> ModelCheck {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut current = state.parent.as_deref();
    while let Some(name) = current {
        if name == state.name {
            return fail(ModelError::Cycle(state.name.clone()));
        }
        if !seen.insert(name) {
            // A cycle further up; the states on it report it.
            return ok();
        }
        current = by_name.get(name).and_then(|s| s.parent.as_deref());
    }
    ok()
}

fn check_initial(state: &State, by_name: &HashMap<&str, &State>) -> ModelCheck {
    match (state.kind, state.initial.as_deref()) {
        (StateKind::Compound, None) => fail(ModelError::MissingInitial(state.name.clone())),
        (StateKind::Compound, Some(initial)) => match by_name.get(initial) {
            Some(child) if child.parent.as_deref() == Some(state.name.as_str()) => {
                if child.is_history() {
                    fail(ModelError::HistoryAsInitial {
                        state: state.name.clone(),
                        initial: initial.to_string(),
                    })
                } else {
                    ok()
                }
            }
            _ => fail(ModelError::UnresolvedInitial {
                state: state.name.clone(),
                initial: initial.to_string(),
            }),
        },
        (_, Some(_)) => fail(ModelError::UnexpectedInitial(state.name.clone())),
        (_, None) => ok(),
    }
}

fn check_history(state: &State, by_name: &HashMap<&str, &State>) -> ModelCheck {
    if !state.is_history() {
        return match state.memory {
            Some(_) => fail(ModelError::UnexpectedMemory(state.name.clone())),
            None => ok(),
        };
    }

    let parent = state.parent.as_deref().and_then(|p| by_name.get(p));
    match parent {
        // An unknown parent is reported by the parent check.
        None if state.parent.is_some() => return ok(),
        Some(p) if p.kind == StateKind::Compound => {}
        _ => return fail(ModelError::HistoryOutsideCompound(state.name.clone())),
    }

    match state.memory.as_deref() {
        None => ok(),
        Some(memory) => {
            let resolved = by_name
                .get(memory)
                .is_some_and(|m| m.parent == state.parent && !m.is_history());
            if resolved {
                ok()
            } else {
                fail(ModelError::UnresolvedMemory {
                    state: state.name.clone(),
                    memory: memory.to_string(),
                })
            }
        }
    }
}

fn check_regions(state: &State, states: &[State]) -> Vec<ModelCheck> {
    let regions: Vec<&State> = states
        .iter()
        .filter(|s| s.parent.as_deref() == Some(state.name.as_str()))
        .collect();
    if regions.is_empty() {
        return vec![fail(ModelError::EmptyOrthogonal(state.name.clone()))];
    }
    regions
        .into_iter()
        .map(|region| {
            if region.kind.is_composite() {
                ok()
            } else {
                fail(ModelError::InvalidRegion {
                    state: state.name.clone(),
                    region: region.name.clone(),
                })
            }
        })
        .collect()
}

fn check_transition(transition: &Transition, by_name: &HashMap<&str, &State>) -> ModelCheck {
    let source = match by_name.get(transition.source.as_str()) {
        None => return fail(ModelError::UnknownSource(transition.source.clone())),
        Some(s) => s,
    };
    if source.is_history() {
        return fail(ModelError::TransitionFromHistory(source.name.clone()));
    }
    match transition.target.as_deref() {
        Some(target) if !by_name.contains_key(target) => {
            fail(ModelError::UnknownTarget(target.to_string()))
        }
        _ => ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{StateBuilder, TransitionBuilder};

    fn states(builders: Vec<StateBuilder>) -> Vec<State> {
        builders.into_iter().map(StateBuilder::build).collect()
    }

    #[test]
    fn well_formed_model_passes() {
        let states = states(vec![
            StateBuilder::compound("root").initial("a"),
            StateBuilder::basic("a").parent("root"),
            StateBuilder::shallow_history("h").parent("root").memory("a"),
        ]);
        let transitions = vec![TransitionBuilder::new().from("a").to("h").build().unwrap()];

        assert_eq!(validate(&states, &[], &transitions), Ok(()));
    }

    #[test]
    fn validation_accumulates_all_findings() {
        let states = states(vec![
            StateBuilder::compound("root"),
            StateBuilder::basic("a").parent("ghost"),
            StateBuilder::basic("b").parent("a"),
            StateBuilder::orthogonal("p").parent("root"),
        ]);
        let transitions = vec![TransitionBuilder::new().from("nowhere").build().unwrap()];

        let errors = validate(&states, &["a".to_string()], &transitions).unwrap_err();

        assert!(errors.contains(&ModelError::DuplicateState("a".to_string())));
        assert!(errors.contains(&ModelError::MissingInitial("root".to_string())));
        assert!(errors.contains(&ModelError::UnknownParent {
            state: "a".to_string(),
            parent: "ghost".to_string(),
        }));
        assert!(errors.contains(&ModelError::InvalidParent {
            state: "b".to_string(),
            parent: "a".to_string(),
        }));
        assert!(errors.contains(&ModelError::EmptyOrthogonal("p".to_string())));
        assert!(errors.contains(&ModelError::UnknownSource("nowhere".to_string())));
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn root_must_be_unique() {
        let missing = states(vec![
            StateBuilder::basic("a").parent("b"),
            StateBuilder::compound("b").parent("a").initial("a"),
        ]);
        let errors = validate(&missing, &[], &[]).unwrap_err();
        assert!(errors.contains(&ModelError::MissingRoot));
        assert!(errors.contains(&ModelError::Cycle("a".to_string())));
        assert!(errors.contains(&ModelError::Cycle("b".to_string())));

        let several = states(vec![StateBuilder::basic("a"), StateBuilder::basic("b")]);
        assert_eq!(
            validate(&several, &[], &[]),
            Err(vec![ModelError::MultipleRoots(vec![
                "a".to_string(),
                "b".to_string()
            ])])
        );
    }

    #[test]
    fn initial_must_name_a_non_history_child() {
        let states = states(vec![
            StateBuilder::compound("root").initial("inner"),
            StateBuilder::compound("inner").parent("root").initial("h"),
            StateBuilder::shallow_history("h").parent("inner"),
            StateBuilder::basic("leaf").parent("root").initial("x"),
        ]);

        let errors = validate(&states, &[], &[]).unwrap_err();

        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ModelError::HistoryAsInitial {
            state: "inner".to_string(),
            initial: "h".to_string(),
        }));
        assert!(errors.contains(&ModelError::UnexpectedInitial("leaf".to_string())));
    }

    #[test]
    fn unresolved_initial_is_reported() {
        let states = states(vec![
            StateBuilder::compound("root").initial("elsewhere"),
            StateBuilder::basic("a").parent("root"),
        ]);

        assert_eq!(
            validate(&states, &[], &[]),
            Err(vec![ModelError::UnresolvedInitial {
                state: "root".to_string(),
                initial: "elsewhere".to_string(),
            }])
        );
    }

    #[test]
    fn history_rules() {
        let states = states(vec![
            StateBuilder::orthogonal("root"),
            StateBuilder::compound("r").parent("root").initial("a"),
            StateBuilder::basic("a").parent("r").memory("x"),
            StateBuilder::deep_history("h").parent("r").memory("root"),
            StateBuilder::shallow_history("bad").parent("root"),
        ]);
        let transitions = vec![TransitionBuilder::new().from("h").to("a").build().unwrap()];

        let errors = validate(&states, &[], &transitions).unwrap_err();

        assert!(errors.contains(&ModelError::UnexpectedMemory("a".to_string())));
        assert!(errors.contains(&ModelError::UnresolvedMemory {
            state: "h".to_string(),
            memory: "root".to_string(),
        }));
        assert!(errors.contains(&ModelError::HistoryOutsideCompound("bad".to_string())));
        assert!(errors.contains(&ModelError::InvalidRegion {
            state: "root".to_string(),
            region: "bad".to_string(),
        }));
        assert!(errors.contains(&ModelError::TransitionFromHistory("h".to_string())));
    }

    #[test]
    fn unknown_target_is_reported() {
        let states = states(vec![
            StateBuilder::compound("root").initial("a"),
            StateBuilder::basic("a").parent("root"),
        ]);
        let transitions = vec![TransitionBuilder::new()
            .from("a")
            .to("z")
            .on("go")
            .build()
            .unwrap()];

        assert_eq!(
            validate(&states, &[], &transitions),
            Err(vec![ModelError::UnknownTarget("z".to_string())])
        );
    }
}
