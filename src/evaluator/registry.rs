//! Evaluator backed by host closures registered under their code string.

use super::{Evaluator, HookError};
use crate::core::{Event, State, Transition};
use std::collections::HashMap;
use std::fmt;

/// Boxed guard closure.
pub type GuardFn = Box<dyn FnMut(&Transition, Option<&Event>) -> Result<bool, HookError> + Send>;

/// Boxed action closure, used for transition actions and entry/exit hooks.
pub type ActionFn = Box<dyn FnMut(HookTarget<'_>, Option<&Event>) -> Result<(), HookError> + Send>;

/// What an action closure runs for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HookTarget<'a> {
    /// The action of a transition.
    Transition(&'a Transition),
    /// The entry or exit hook of a state.
    State(&'a State),
}

impl<'a> HookTarget<'a> {
    /// The state the hook belongs to: the hook's own state, or the source
    /// of the transition.
    pub fn state_name(&self) -> &'a str {
        match *self {
            HookTarget::Transition(transition) => &transition.source,
            HookTarget::State(state) => &state.name,
        }
    }
}

/// Evaluator that maps code strings to host closures.
///
/// A guard `"door_closed"` on a transition is evaluated by the closure
/// registered with `.guard("door_closed", ..)`. Entry and exit hooks share
/// the action namespace and receive no event. Code without a registered
/// closure fails with [`HookError::Undefined`].
///
/// `guard` and `action` closures see the event only. `guard_with` and
/// `action_with` closures also see the transition or state they run for,
/// so one closure can serve several transitions.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{Event, Transition};
/// use statecraft::evaluator::{Evaluator, HookRegistry};
///
/// let mut registry = HookRegistry::new()
///     .guard("heavy", |event: Option<&Event>| {
///         event
///             .and_then(|e| e.get("weight"))
///             .and_then(|w| w.as_u64())
///             .is_some_and(|w| w > 10)
///     });
///
/// let mut transition = Transition::new("scale");
/// transition.guard = Some("heavy".to_string());
///
/// let parcel = Event::new("weighed").with("weight", 12);
/// assert_eq!(registry.evaluate_guard(&transition, Some(&parcel)), Ok(true));
/// assert_eq!(registry.evaluate_guard(&transition, None), Ok(false));
/// ```
#[derive(Default)]
pub struct HookRegistry {
    guards: HashMap<String, GuardFn>,
    actions: HashMap<String, ActionFn>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an infallible guard.
    pub fn guard<F>(self, code: impl Into<String>, mut predicate: F) -> Self
    where
        F: FnMut(Option<&Event>) -> bool + Send + 'static,
    {
        self.try_guard(code, move |event: Option<&Event>| Ok(predicate(event)))
    }

    /// Register a guard that may fail.
    pub fn try_guard<F>(self, code: impl Into<String>, mut predicate: F) -> Self
    where
        F: FnMut(Option<&Event>) -> Result<bool, HookError> + Send + 'static,
    {
        self.guard_with(code, move |_: &Transition, event: Option<&Event>| {
            predicate(event)
        })
    }

    /// Register a guard that receives the guarded transition.
    pub fn guard_with<F>(mut self, code: impl Into<String>, predicate: F) -> Self
    where
        F: FnMut(&Transition, Option<&Event>) -> Result<bool, HookError> + Send + 'static,
    {
        self.guards.insert(code.into(), Box::new(predicate));
        self
    }

    /// Register an infallible action.
    pub fn action<F>(self, code: impl Into<String>, mut action: F) -> Self
    where
        F: FnMut(Option<&Event>) + Send + 'static,
    {
        self.try_action(code, move |event: Option<&Event>| {
            action(event);
            Ok(())
        })
    }

    /// Register an action that may fail.
    pub fn try_action<F>(self, code: impl Into<String>, mut action: F) -> Self
    where
        F: FnMut(Option<&Event>) -> Result<(), HookError> + Send + 'static,
    {
        self.action_with(code, move |_: HookTarget<'_>, event: Option<&Event>| {
            action(event)
        })
    }

    /// Register an action that receives the transition or state it runs for.
    pub fn action_with<F>(mut self, code: impl Into<String>, action: F) -> Self
    where
        F: FnMut(HookTarget<'_>, Option<&Event>) -> Result<(), HookError> + Send + 'static,
    {
        self.actions.insert(code.into(), Box::new(action));
        self
    }

    pub fn has_guard(&self, code: &str) -> bool {
        self.guards.contains_key(code)
    }

    pub fn has_action(&self, code: &str) -> bool {
        self.actions.contains_key(code)
    }

    fn run_action(
        &mut self,
        code: &str,
        target: HookTarget<'_>,
        event: Option<&Event>,
    ) -> Result<(), HookError> {
        let action = self
            .actions
            .get_mut(code)
            .ok_or_else(|| HookError::Undefined(code.to_string()))?;
        action(target, event)
    }
}

impl Evaluator for HookRegistry {
    fn evaluate_guard(
        &mut self,
        transition: &Transition,
        event: Option<&Event>,
    ) -> Result<bool, HookError> {
        let Some(code) = transition.guard.as_deref() else {
            return Ok(true);
        };
        let guard = self
            .guards
            .get_mut(code)
            .ok_or_else(|| HookError::Undefined(code.to_string()))?;
        guard(transition, event)
    }

    fn execute_action(
        &mut self,
        transition: &Transition,
        event: Option<&Event>,
    ) -> Result<(), HookError> {
        match transition.action.as_deref() {
            Some(code) => self.run_action(code, HookTarget::Transition(transition), event),
            None => Ok(()),
        }
    }

    fn execute_on_entry(&mut self, state: &State) -> Result<(), HookError> {
        match state.on_entry.as_deref() {
            Some(code) => self.run_action(code, HookTarget::State(state), None),
            None => Ok(()),
        }
    }

    fn execute_on_exit(&mut self, state: &State) -> Result<(), HookError> {
        match state.on_exit.as_deref() {
            Some(code) => self.run_action(code, HookTarget::State(state), None),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut guards: Vec<&str> = self.guards.keys().map(String::as_str).collect();
        let mut actions: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        guards.sort_unstable();
        actions.sort_unstable();
        f.debug_struct("HookRegistry")
            .field("guards", &guards)
            .field("actions", &actions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateKind;
    use std::sync::{Arc, Mutex};

    fn guarded(code: &str) -> Transition {
        let mut transition = Transition::new("a");
        transition.guard = Some(code.to_string());
        transition
    }

    #[test]
    fn registered_guard_sees_event() {
        let mut registry = HookRegistry::new()
            .guard("is_go", |e: Option<&Event>| e.is_some_and(|e| e.name == "go"));

        assert_eq!(
            registry.evaluate_guard(&guarded("is_go"), Some(&Event::new("go"))),
            Ok(true)
        );
        assert_eq!(
            registry.evaluate_guard(&guarded("is_go"), Some(&Event::new("stop"))),
            Ok(false)
        );
    }

    #[test]
    fn unknown_code_is_undefined() {
        let mut registry = HookRegistry::new();

        assert_eq!(
            registry.evaluate_guard(&guarded("nope"), None),
            Err(HookError::Undefined("nope".to_string()))
        );
        let mut state = State::new("s", StateKind::Basic);
        state.on_entry = Some("enter".to_string());
        assert_eq!(
            registry.execute_on_entry(&state),
            Err(HookError::Undefined("enter".to_string()))
        );
    }

    #[test]
    fn missing_code_needs_no_registration() {
        let mut registry = HookRegistry::new();
        let state = State::new("s", StateKind::Basic);

        assert_eq!(registry.evaluate_guard(&Transition::new("a"), None), Ok(true));
        assert_eq!(registry.execute_action(&Transition::new("a"), None), Ok(()));
        assert_eq!(registry.execute_on_exit(&state), Ok(()));
    }

    #[test]
    fn actions_run_with_side_effects() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let mut registry = HookRegistry::new().action("record", move |e: Option<&Event>| {
            sink.lock()
                .unwrap()
                .push(e.map(|e| e.name.clone()).unwrap_or_default());
        });

        let mut transition = Transition::new("a");
        transition.action = Some("record".to_string());
        registry
            .execute_action(&transition, Some(&Event::new("tick")))
            .unwrap();
        registry.execute_action(&transition, None).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["tick".to_string(), String::new()]);
    }

    #[test]
    fn fallible_hooks_propagate_errors() {
        let mut registry = HookRegistry::new()
            .try_guard("broken", |_: Option<&Event>| {
                Err(HookError::Failed("no data".to_string()))
            })
            .try_action("explode", |_: Option<&Event>| {
                Err(HookError::Failed("boom".to_string()))
            });

        assert_eq!(
            registry.evaluate_guard(&guarded("broken"), None),
            Err(HookError::Failed("no data".to_string()))
        );
        let mut state = State::new("s", StateKind::Basic);
        state.on_exit = Some("explode".to_string());
        assert_eq!(
            registry.execute_on_exit(&state),
            Err(HookError::Failed("boom".to_string()))
        );
        assert!(registry.has_guard("broken"));
        assert!(registry.has_action("explode"));
        assert!(!registry.has_action("broken"));
    }

    #[test]
    fn one_guard_serves_several_transitions() {
        let mut registry = HookRegistry::new()
            .guard_with("from_a", |t: &Transition, _: Option<&Event>| Ok(t.source == "a"));

        let mut other = guarded("from_a");
        other.source = "b".to_string();

        assert_eq!(registry.evaluate_guard(&guarded("from_a"), None), Ok(true));
        assert_eq!(registry.evaluate_guard(&other, None), Ok(false));
    }

    #[test]
    fn contextual_action_sees_its_target() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let mut registry = HookRegistry::new().action_with(
            "log",
            move |target: HookTarget<'_>, _: Option<&Event>| {
                let kind = match target {
                    HookTarget::Transition(_) => "transition",
                    HookTarget::State(_) => "state",
                };
                sink.lock()
                    .unwrap()
                    .push(format!("{kind} {}", target.state_name()));
                Ok(())
            },
        );

        let mut state = State::new("s", StateKind::Basic);
        state.on_entry = Some("log".to_string());
        state.on_exit = Some("log".to_string());
        let mut transition = Transition::new("a");
        transition.action = Some("log".to_string());

        registry.execute_on_entry(&state).unwrap();
        registry.execute_action(&transition, None).unwrap();
        registry.execute_on_exit(&state).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["state s", "transition a", "state s"]
        );
    }
}
