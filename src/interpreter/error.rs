//! Errors raised while executing a step.

use crate::evaluator::HookError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which state hook failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookPhase {
    Entry,
    Exit,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => f.write_str("entry"),
            Self::Exit => f.write_str("exit"),
        }
    }
}

/// Errors surfaced from the evaluator during a step.
///
/// The step is aborted where the error occurred. States whose exit hook
/// completed have already left the configuration, states whose entry hook
/// completed have already joined it; nothing past the failing hook ran.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExecutionError {
    #[error("Guard of transition '{transition}' failed: {source}")]
    GuardEvaluation {
        transition: String,
        source: HookError,
    },

    #[error("Action of transition '{transition}' failed: {source}")]
    ActionExecution {
        transition: String,
        source: HookError,
    },

    #[error("{phase} hook of state '{state}' failed: {source}")]
    StateHook {
        state: String,
        phase: HookPhase,
        source: HookError,
    },
}

impl ExecutionError {
    /// The underlying evaluator failure.
    pub fn hook_error(&self) -> &HookError {
        match self {
            Self::GuardEvaluation { source, .. }
            | Self::ActionExecution { source, .. }
            | Self::StateHook { source, .. } => source,
        }
    }
}
