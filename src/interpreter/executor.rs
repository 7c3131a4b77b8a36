//! Execution of resolved transitions: exit, action, entry.

use super::error::{ExecutionError, HookPhase};
use super::step::{MacroStep, MicroStep};
use crate::core::{Configuration, Event, HistoryMemory, StateKind, Statechart, Transition};
use crate::evaluator::Evaluator;
use std::cmp::Reverse;
use std::collections::HashSet;

/// Enter the root and its default descendants.
///
/// `configuration` is expected to be empty.
pub fn initialize<E>(
    statechart: &Statechart,
    configuration: &mut Configuration,
    memory: &HistoryMemory,
    evaluator: &mut E,
) -> Result<MicroStep, ExecutionError>
where
    E: Evaluator + ?Sized,
{
    let mut micro = MicroStep::new(None);
    let root = statechart.root().to_string();
    enter(
        statechart,
        configuration,
        memory,
        evaluator,
        None,
        &[root],
        &mut micro,
    )?;
    Ok(micro)
}

/// Execute `transitions` in order, one micro step each.
///
/// A transition whose source was exited by an earlier transition of the
/// same step is skipped. The first evaluator error aborts the step; states
/// already exited or entered stay that way.
pub fn step<E>(
    statechart: &Statechart,
    configuration: &mut Configuration,
    memory: &mut HistoryMemory,
    evaluator: &mut E,
    transitions: &[&Transition],
    event: Option<&Event>,
) -> Result<Vec<MicroStep>, ExecutionError>
where
    E: Evaluator + ?Sized,
{
    let mut steps = Vec::with_capacity(transitions.len());

    for &transition in transitions {
        if !configuration.contains(&transition.source) {
            tracing::debug!(%transition, "source no longer active, transition skipped");
            continue;
        }
        let mut micro = MicroStep::new(Some(transition.clone()));

        match transition.target.as_deref() {
            None => run_action(evaluator, transition, event)?,
            Some(target) => {
                let domain = statechart
                    .least_common_compound_ancestor(&transition.source, target)
                    .unwrap_or_else(|| statechart.root());

                exit(statechart, configuration, memory, evaluator, domain, &mut micro)?;
                run_action(evaluator, transition, event)?;

                enter(
                    statechart,
                    configuration,
                    memory,
                    evaluator,
                    Some(domain),
                    &[target.to_string()],
                    &mut micro,
                )?;
            }
        }

        tracing::trace!(
            %transition,
            exited = ?micro.exited,
            entered = ?micro.entered,
            "micro step"
        );
        steps.push(micro);
    }
    Ok(steps)
}

/// Assemble the status of a finished step.
///
/// `finished` lists the terminal final states entered by `steps` that are
/// still active. `completed` lists the composite states complete now that
/// were not complete before, or that contain one of those final states.
pub fn conclude(
    statechart: &Statechart,
    configuration: &Configuration,
    completed_before: &[String],
    event: Option<Event>,
    steps: Vec<MicroStep>,
) -> MacroStep {
    let entered: HashSet<&str> = steps
        .iter()
        .flat_map(|s| s.entered.iter().map(String::as_str))
        .collect();

    let finished: Vec<String> = statechart
        .states()
        .iter()
        .map(|s| s.name.as_str())
        .filter(|s| entered.contains(s) && configuration.contains(s) && statechart.is_terminal(s))
        .map(str::to_string)
        .collect();

    let completed: Vec<String> = configuration
        .completed(statechart)
        .into_iter()
        .filter(|name| {
            !completed_before.contains(name)
                || finished.iter().any(|f| statechart.is_ancestor(name, f))
        })
        .collect();

    MacroStep {
        event,
        steps,
        configuration: configuration.ordered(statechart),
        finished,
        completed,
    }
}

fn run_action<E>(
    evaluator: &mut E,
    transition: &Transition,
    event: Option<&Event>,
) -> Result<(), ExecutionError>
where
    E: Evaluator + ?Sized,
{
    if transition.action.is_none() {
        return Ok(());
    }
    evaluator
        .execute_action(transition, event)
        .map_err(|source| ExecutionError::ActionExecution {
            transition: transition.to_string(),
            source,
        })
}

/// Exit the active proper descendants of `domain`, innermost first.
fn exit<E>(
    statechart: &Statechart,
    configuration: &mut Configuration,
    memory: &mut HistoryMemory,
    evaluator: &mut E,
    domain: &str,
    micro: &mut MicroStep,
) -> Result<(), ExecutionError>
where
    E: Evaluator + ?Sized,
{
    let mut exiting: Vec<&str> = statechart
        .descendants_for(domain)
        .into_iter()
        .filter(|s| configuration.contains(s))
        .collect();
    // descendants come in document order; the stable sort keeps it for ties
    exiting.sort_by_key(|s| Reverse(statechart.depth_for(s)));

    let before = configuration.clone();
    for name in exiting {
        let Some(state) = statechart.state(name) else {
            continue;
        };
        memory.snapshot(statechart, &before, name);
        if state.on_exit.is_some() {
            evaluator
                .execute_on_exit(state)
                .map_err(|source| ExecutionError::StateHook {
                    state: name.to_string(),
                    phase: HookPhase::Exit,
                    source,
                })?;
        }
        configuration.remove(name);
        micro.exited.push(name.to_string());
    }
    Ok(())
}

/// Enter `targets` and everything needed to make the configuration
/// consistent below `domain`, outermost first.
///
/// With no domain the root itself is entered.
fn enter<E>(
    statechart: &Statechart,
    configuration: &mut Configuration,
    memory: &HistoryMemory,
    evaluator: &mut E,
    domain: Option<&str>,
    targets: &[String],
    micro: &mut MicroStep,
) -> Result<(), ExecutionError>
where
    E: Evaluator + ?Sized,
{
    for name in entry_set(statechart, memory, domain, targets) {
        let Some(state) = statechart.state(name) else {
            continue;
        };
        if state.on_entry.is_some() {
            evaluator
                .execute_on_entry(state)
                .map_err(|source| ExecutionError::StateHook {
                    state: name.to_string(),
                    phase: HookPhase::Entry,
                    source,
                })?;
        }
        configuration.insert(name);
        micro.entered.push(name.to_string());
    }
    Ok(())
}

/// States to enter, sorted outermost first and then in document order.
fn entry_set<'a>(
    statechart: &'a Statechart,
    memory: &HistoryMemory,
    domain: Option<&str>,
    targets: &[String],
) -> Vec<&'a str> {
    let mut entering: HashSet<&'a str> = HashSet::new();

    for target in targets {
        let Some(state) = statechart.state(target) else {
            continue;
        };
        let resolved: Vec<String> = if state.is_history() {
            memory.resolve(statechart, &state.name)
        } else {
            vec![state.name.clone()]
        };
        for name in resolved.iter().filter_map(|r| statechart.state(r)) {
            let name = name.name.as_str();
            let chain = std::iter::once(name).chain(statechart.ancestors_for(name));
            for link in chain {
                if Some(link) == domain {
                    break;
                }
                entering.insert(link);
            }
        }
    }

    let mut pending: Vec<&'a str> = entering.iter().copied().collect();
    if let Some(domain) = domain.and_then(|d| statechart.state(d)) {
        pending.push(domain.name.as_str());
    }
    while let Some(name) = pending.pop() {
        let Some(state) = statechart.state(name) else {
            continue;
        };
        match state.kind {
            StateKind::Compound => {
                let settled = state
                    .children
                    .iter()
                    .any(|c| entering.contains(c.as_str()));
                if let (false, Some(initial)) = (settled, state.initial.as_deref()) {
                    if let Some(initial) = statechart.state(initial) {
                        if entering.insert(initial.name.as_str()) {
                            pending.push(initial.name.as_str());
                        }
                    }
                }
            }
            StateKind::Orthogonal => {
                for region in &state.children {
                    if let Some(region) = statechart.state(region) {
                        if entering.insert(region.name.as_str()) {
                            pending.push(region.name.as_str());
                        }
                    }
                }
            }
            _ => {}
        }
    }

    let mut ordered: Vec<&'a str> = entering.into_iter().collect();
    ordered.sort_by_key(|s| (statechart.depth_for(s), statechart.position(s)));
    ordered
}
