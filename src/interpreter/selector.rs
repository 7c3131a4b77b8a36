//! Transition selection: which transitions may fire this step.

use super::error::ExecutionError;
use super::policy::EventPriority;
use crate::core::{Configuration, Event, EventQueue, Statechart, Transition};
use crate::evaluator::Evaluator;

/// A transition eligible to fire, with its declaration index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate<'a> {
    pub index: usize,
    pub transition: &'a Transition,
}

/// Outcome of selection.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection<'a> {
    /// The event consumed from the queue, if any.
    pub event: Option<Event>,
    /// Eligible transitions, in declaration order.
    pub transitions: Vec<Candidate<'a>>,
}

impl Selection<'_> {
    /// Nothing to fire and nothing consumed.
    pub fn is_idle(&self) -> bool {
        self.event.is_none() && self.transitions.is_empty()
    }
}

/// Select the transitions eligible to fire from `configuration`.
///
/// The head of `queue` is only peeked until the policy decides to use it;
/// at most one event is consumed. See [`EventPriority`] for the ordering.
/// With [`EventPriority::EventFirst`] an event that neither triggers a
/// transition nor is preempted by an eventless one is consumed and expires.
/// With [`EventPriority::EventlessFirst`] the event is consumed as soon as
/// event-triggered transitions are evaluated, whether any of them apply.
pub fn select<'a, E, Q>(
    statechart: &'a Statechart,
    configuration: &Configuration,
    queue: &mut Q,
    evaluator: &mut E,
    priority: EventPriority,
) -> Result<Selection<'a>, ExecutionError>
where
    E: Evaluator + ?Sized,
    Q: EventQueue + ?Sized,
{
    let pending = queue.peek().cloned();

    match priority {
        EventPriority::EventFirst => {
            if let Some(event) = &pending {
                let triggered = eligible(statechart, configuration, evaluator, Some(event))?;
                if !triggered.is_empty() {
                    return Ok(Selection {
                        event: queue.consume(),
                        transitions: triggered,
                    });
                }
            }

            let automatic = eligible(statechart, configuration, evaluator, None)?;
            if automatic.is_empty() && pending.is_some() {
                let expired = queue.consume();
                tracing::trace!(event = ?expired.as_ref().map(|e| &e.name), "event expired");
                return Ok(Selection {
                    event: expired,
                    transitions: automatic,
                });
            }
            Ok(Selection {
                event: None,
                transitions: automatic,
            })
        }
        EventPriority::EventlessFirst => {
            let automatic = eligible(statechart, configuration, evaluator, None)?;
            if !automatic.is_empty() {
                return Ok(Selection {
                    event: None,
                    transitions: automatic,
                });
            }

            let Some(event) = pending else {
                return Ok(Selection {
                    event: None,
                    transitions: automatic,
                });
            };
            let triggered = eligible(statechart, configuration, evaluator, Some(&event))?;
            Ok(Selection {
                event: queue.consume(),
                transitions: triggered,
            })
        }
    }
}

/// Transitions triggered by `event` (or eventless ones for `None`) whose
/// source is active and whose guard holds. Each guard is evaluated once.
fn eligible<'a, E>(
    statechart: &'a Statechart,
    configuration: &Configuration,
    evaluator: &mut E,
    event: Option<&Event>,
) -> Result<Vec<Candidate<'a>>, ExecutionError>
where
    E: Evaluator + ?Sized,
{
    let name = event.map(|e| e.name.as_str());
    let mut candidates = Vec::new();

    for (index, transition) in statechart.transitions().iter().enumerate() {
        if !transition.is_triggered_by(name) || !configuration.contains(&transition.source) {
            continue;
        }
        if transition.guard.is_some() {
            let holds = evaluator.evaluate_guard(transition, event).map_err(|source| {
                ExecutionError::GuardEvaluation {
                    transition: transition.to_string(),
                    source,
                }
            })?;
            if !holds {
                continue;
            }
        }
        candidates.push(Candidate { index, transition });
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{StateBuilder, StatechartBuilder, TransitionBuilder};
    use crate::evaluator::{HookError, HookRegistry};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// root{a, b}: a --go--> b, a --> b [ready], b --go--> a.
    fn chart() -> Statechart {
        StatechartBuilder::new("selection")
            .state(StateBuilder::compound("root").initial("a"))
            .state(StateBuilder::basic("a").parent("root"))
            .state(StateBuilder::basic("b").parent("root"))
            .transition(TransitionBuilder::new().from("a").to("b").on("go"))
            .unwrap()
            .transition(TransitionBuilder::new().from("a").to("b").when("ready"))
            .unwrap()
            .transition(TransitionBuilder::new().from("b").to("a").on("go"))
            .unwrap()
            .build()
            .unwrap()
    }

    fn active(names: &[&str]) -> Configuration {
        let mut config = Configuration::new();
        for name in names {
            config.insert(name);
        }
        config
    }

    fn queue(names: &[&str]) -> VecDeque<Event> {
        names.iter().map(|n| Event::new(*n)).collect()
    }

    fn registry(ready: bool) -> HookRegistry {
        HookRegistry::new().guard("ready", move |_: Option<&Event>| ready)
    }

    fn sources(selection: &Selection<'_>) -> Vec<usize> {
        selection.transitions.iter().map(|c| c.index).collect()
    }

    #[test]
    fn event_first_prefers_event_and_consumes_it() {
        let chart = chart();
        let mut events = queue(&["go"]);

        let selection = select(
            &chart,
            &active(&["root", "a"]),
            &mut events,
            &mut registry(true),
            EventPriority::EventFirst,
        )
        .unwrap();

        assert_eq!(sources(&selection), vec![0]);
        assert_eq!(selection.event, Some(Event::new("go")));
        assert!(events.is_empty());
    }

    #[test]
    fn event_first_falls_back_to_eventless_keeping_event() {
        let chart = chart();
        let mut events = queue(&["unknown"]);

        let selection = select(
            &chart,
            &active(&["root", "a"]),
            &mut events,
            &mut registry(true),
            EventPriority::EventFirst,
        )
        .unwrap();

        assert_eq!(sources(&selection), vec![1]);
        assert_eq!(selection.event, None);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn event_first_expires_unused_event() {
        let chart = chart();
        let mut events = queue(&["unknown", "go"]);

        let selection = select(
            &chart,
            &active(&["root", "a"]),
            &mut events,
            &mut registry(false),
            EventPriority::EventFirst,
        )
        .unwrap();

        assert!(selection.transitions.is_empty());
        assert_eq!(selection.event, Some(Event::new("unknown")));
        assert_eq!(events.len(), 1);
        assert!(!selection.is_idle());
    }

    #[test]
    fn eventless_first_prefers_eventless_and_keeps_event() {
        let chart = chart();
        let mut events = queue(&["go"]);

        let selection = select(
            &chart,
            &active(&["root", "a"]),
            &mut events,
            &mut registry(true),
            EventPriority::EventlessFirst,
        )
        .unwrap();

        assert_eq!(sources(&selection), vec![1]);
        assert_eq!(selection.event, None);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn eventless_first_consumes_event_when_evaluated() {
        let chart = chart();
        let mut events = queue(&["go"]);

        let selection = select(
            &chart,
            &active(&["root", "a"]),
            &mut events,
            &mut registry(false),
            EventPriority::EventlessFirst,
        )
        .unwrap();
        assert_eq!(sources(&selection), vec![0]);
        assert_eq!(selection.event, Some(Event::new("go")));

        let mut events = queue(&["unknown"]);
        let selection = select(
            &chart,
            &active(&["root", "a"]),
            &mut events,
            &mut registry(false),
            EventPriority::EventlessFirst,
        )
        .unwrap();
        assert!(selection.transitions.is_empty());
        assert_eq!(selection.event, Some(Event::new("unknown")));
        assert!(events.is_empty());
    }

    #[test]
    fn inactive_sources_never_fire() {
        let chart = chart();
        let mut events = queue(&["go"]);

        let selection = select(
            &chart,
            &active(&["root", "b"]),
            &mut events,
            &mut registry(true),
            EventPriority::EventFirst,
        )
        .unwrap();

        assert_eq!(sources(&selection), vec![2]);
    }

    #[test]
    fn nothing_pending_nothing_eligible_is_idle() {
        let chart = chart();
        let mut events = queue(&[]);

        for priority in [EventPriority::EventFirst, EventPriority::EventlessFirst] {
            let selection = select(
                &chart,
                &active(&["root", "b"]),
                &mut events,
                &mut registry(true),
                priority,
            )
            .unwrap();
            assert!(selection.is_idle());
        }
    }

    #[test]
    fn guards_are_evaluated_once_per_step() {
        let chart = chart();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut evaluator = HookRegistry::new().guard("ready", move |_: Option<&Event>| {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        });

        for priority in [EventPriority::EventFirst, EventPriority::EventlessFirst] {
            calls.store(0, Ordering::SeqCst);
            let mut events = queue(&["unknown"]);
            select(
                &chart,
                &active(&["root", "a"]),
                &mut events,
                &mut evaluator,
                priority,
            )
            .unwrap();
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn guard_failure_names_the_transition() {
        let chart = chart();
        let mut events = queue(&[]);
        let mut evaluator = HookRegistry::new().try_guard("ready", |_: Option<&Event>| {
            Err(HookError::Failed("sensor offline".to_string()))
        });

        let error = select(
            &chart,
            &active(&["root", "a"]),
            &mut events,
            &mut evaluator,
            EventPriority::EventlessFirst,
        )
        .unwrap_err();

        assert_eq!(
            error,
            ExecutionError::GuardEvaluation {
                transition: "a -> b [ready]".to_string(),
                source: HookError::Failed("sensor offline".to_string()),
            }
        );
    }
}
