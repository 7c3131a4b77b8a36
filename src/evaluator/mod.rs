//! The evaluation contract between the interpreter and its host.
//!
//! Guards, actions and entry/exit hooks are opaque code strings in the
//! model. The interpreter never looks inside them: whenever one needs to
//! run, it is handed to an [`Evaluator`] together with the transition or
//! state it belongs to and, when there is one, the current event.
//!
//! Two evaluators ship with the crate:
//! - [`PermissiveEvaluator`]: every guard holds, every action is a no-op
//! - [`HookRegistry`]: code strings name host closures registered up front

mod registry;

pub use registry::{ActionFn, GuardFn, HookRegistry, HookTarget};

use crate::core::{Event, State, Transition};
use thiserror::Error;

/// Failure raised by an evaluator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HookError {
    #[error("No hook registered for code '{0}'")]
    Undefined(String),

    #[error("{0}")]
    Failed(String),
}

/// Host-side evaluation of guards and actions.
///
/// Each method is only called when the corresponding code is present on
/// the transition or state. Errors are not recovered by the interpreter;
/// they abort the current step and reach the caller.
pub trait Evaluator {
    /// Evaluate the guard of `transition`. `event` is `None` for eventless
    /// transitions.
    fn evaluate_guard(
        &mut self,
        transition: &Transition,
        event: Option<&Event>,
    ) -> Result<bool, HookError>;

    /// Run the action of `transition`.
    fn execute_action(
        &mut self,
        transition: &Transition,
        event: Option<&Event>,
    ) -> Result<(), HookError>;

    /// Run the entry hook of `state`.
    fn execute_on_entry(&mut self, state: &State) -> Result<(), HookError>;

    /// Run the exit hook of `state`.
    fn execute_on_exit(&mut self, state: &State) -> Result<(), HookError>;
}

/// Evaluator for structure-only runs: guards hold and actions do nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct PermissiveEvaluator;

impl Evaluator for PermissiveEvaluator {
    fn evaluate_guard(&mut self, _: &Transition, _: Option<&Event>) -> Result<bool, HookError> {
        Ok(true)
    }

    fn execute_action(&mut self, _: &Transition, _: Option<&Event>) -> Result<(), HookError> {
        Ok(())
    }

    fn execute_on_entry(&mut self, _: &State) -> Result<(), HookError> {
        Ok(())
    }

    fn execute_on_exit(&mut self, _: &State) -> Result<(), HookError> {
        Ok(())
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn evaluate_guard(
        &mut self,
        transition: &Transition,
        event: Option<&Event>,
    ) -> Result<bool, HookError> {
        (**self).evaluate_guard(transition, event)
    }

    fn execute_action(
        &mut self,
        transition: &Transition,
        event: Option<&Event>,
    ) -> Result<(), HookError> {
        (**self).execute_action(transition, event)
    }

    fn execute_on_entry(&mut self, state: &State) -> Result<(), HookError> {
        (**self).execute_on_entry(state)
    }

    fn execute_on_exit(&mut self, state: &State) -> Result<(), HookError> {
        (**self).execute_on_exit(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StateKind;

    #[test]
    fn permissive_evaluator_accepts_everything() {
        let mut evaluator = PermissiveEvaluator;
        let mut transition = Transition::new("a");
        transition.guard = Some("false".to_string());

        assert_eq!(evaluator.evaluate_guard(&transition, None), Ok(true));
        assert_eq!(evaluator.execute_action(&transition, None), Ok(()));
        assert_eq!(
            evaluator.execute_on_entry(&State::new("a", StateKind::Basic)),
            Ok(())
        );
    }

    #[test]
    fn boxed_evaluators_delegate() {
        let mut evaluator: Box<dyn Evaluator> = Box::new(PermissiveEvaluator);

        assert_eq!(
            evaluator.evaluate_guard(&Transition::new("a"), Some(&Event::new("e"))),
            Ok(true)
        );
        assert_eq!(
            evaluator.execute_on_exit(&State::new("a", StateKind::Basic)),
            Ok(())
        );
    }

    #[test]
    fn hook_errors_display_their_cause() {
        assert_eq!(
            HookError::Undefined("x > 1".to_string()).to_string(),
            "No hook registered for code 'x > 1'"
        );
        assert_eq!(HookError::Failed("boom".to_string()).to_string(), "boom");
    }
}
