//! The interpreter: owns the runtime state of one statechart run.

use super::error::ExecutionError;
use super::executor::{conclude, initialize, step};
use super::policy::{InterpreterConfig, Policy};
use super::resolver::resolve;
use super::selector::select;
use super::step::MacroStep;
use super::trace::ExecutionTrace;
use crate::core::{Configuration, Event, EventQueue, HistoryMemory, Statechart, Transition};
use crate::evaluator::Evaluator;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;
use uuid::Uuid;

/// Runs a statechart one big step at a time.
///
/// The statechart is shared and immutable; the configuration, history
/// memory, event queue and evaluator belong to this interpreter alone.
///
/// # Example
///
/// ```rust
/// use statecraft::builder::{StateBuilder, StatechartBuilder, TransitionBuilder};
/// use statecraft::evaluator::PermissiveEvaluator;
/// use statecraft::interpreter::Interpreter;
///
/// let chart = StatechartBuilder::new("door")
///     .state(StateBuilder::compound("root").initial("closed"))
///     .state(StateBuilder::basic("closed").parent("root"))
///     .state(StateBuilder::basic("open").parent("root"))
///     .transition(TransitionBuilder::new().from("closed").to("open").on("push"))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let mut interpreter = Interpreter::new(chart, PermissiveEvaluator);
/// interpreter.execute().unwrap();
/// assert_eq!(interpreter.configuration(), vec!["root", "closed"]);
///
/// interpreter.queue("push").execute().unwrap();
/// assert!(interpreter.is_active("open"));
/// ```
#[derive(Debug)]
pub struct Interpreter<E, Q = VecDeque<Event>> {
    id: Uuid,
    statechart: Arc<Statechart>,
    config: InterpreterConfig,
    evaluator: E,
    configuration: Configuration,
    memory: HistoryMemory,
    queue: Q,
    started: bool,
    trace: ExecutionTrace,
}

impl<E: Evaluator> Interpreter<E> {
    /// Interpreter with the default policy and an in-memory queue.
    pub fn new(statechart: impl Into<Arc<Statechart>>, evaluator: E) -> Self {
        Self::with_config(statechart, evaluator, InterpreterConfig::default())
    }

    pub fn with_config(
        statechart: impl Into<Arc<Statechart>>,
        evaluator: E,
        config: impl Into<InterpreterConfig>,
    ) -> Self {
        Self::with_queue(statechart, evaluator, config, VecDeque::new())
    }
}

impl<E: Evaluator, Q: EventQueue> Interpreter<E, Q> {
    /// Interpreter reading events from a host-provided queue.
    pub fn with_queue(
        statechart: impl Into<Arc<Statechart>>,
        evaluator: E,
        config: impl Into<InterpreterConfig>,
        queue: Q,
    ) -> Self {
        let statechart = statechart.into();
        let config = config.into();
        let id = Uuid::new_v4();
        tracing::debug!(
            interpreter = %id,
            statechart = statechart.name(),
            policy = ?config.policy,
            "interpreter created"
        );
        Self {
            id,
            statechart,
            config,
            evaluator,
            configuration: Configuration::new(),
            memory: HistoryMemory::new(),
            queue,
            started: false,
            trace: ExecutionTrace::new(),
        }
    }

    /// Enter the root and its default descendants.
    ///
    /// Returns `None` when the interpreter already started. The first
    /// `execute_once` calls this implicitly.
    pub fn start(&mut self) -> Result<Option<MacroStep>, ExecutionError> {
        if self.started {
            return Ok(None);
        }
        self.started = true;

        let statechart = Arc::clone(&self.statechart);
        let micro = initialize(
            &statechart,
            &mut self.configuration,
            &self.memory,
            &mut self.evaluator,
        )?;
        let initial = conclude(&statechart, &self.configuration, &[], None, vec![micro]);

        tracing::debug!(
            interpreter = %self.id,
            configuration = ?initial.configuration,
            "interpreter started"
        );
        self.finish(&statechart, &initial);
        Ok(Some(initial))
    }

    /// Add an event to the queue.
    pub fn queue(&mut self, event: impl Into<Event>) -> &mut Self {
        let event = event.into();
        tracing::trace!(interpreter = %self.id, event = %event.name, "event queued");
        self.queue.push(event);
        self
    }

    /// Execute one big step.
    ///
    /// Returns `None` when nothing happened: no transition was eligible and
    /// no event was consumed.
    pub fn execute_once(&mut self) -> Result<Option<MacroStep>, ExecutionError> {
        if !self.started {
            return self.start();
        }

        let statechart = Arc::clone(&self.statechart);
        let selection = select(
            &statechart,
            &self.configuration,
            &mut self.queue,
            &mut self.evaluator,
            self.config.policy.event,
        )?;
        if selection.is_idle() {
            return Ok(None);
        }

        let surviving = resolve(&statechart, &selection.transitions, self.config.policy.region);
        let transitions: Vec<&Transition> = surviving.iter().map(|c| c.transition).collect();
        let completed_before = self.configuration.completed(&statechart);

        let steps = step(
            &statechart,
            &mut self.configuration,
            &mut self.memory,
            &mut self.evaluator,
            &transitions,
            selection.event.as_ref(),
        )?;
        let macro_step = conclude(
            &statechart,
            &self.configuration,
            &completed_before,
            selection.event,
            steps,
        );

        tracing::debug!(
            interpreter = %self.id,
            event = ?macro_step.event.as_ref().map(|e| &e.name),
            transitions = macro_step.steps.len(),
            configuration = ?macro_step.configuration,
            "macro step"
        );
        self.finish(&statechart, &macro_step);
        Ok(Some(macro_step))
    }

    /// Execute big steps until nothing happens, or until the configured
    /// step bound is reached.
    pub fn execute(&mut self) -> Result<Vec<MacroStep>, ExecutionError> {
        let mut executed = Vec::new();
        loop {
            if let Some(max) = self.config.max_steps {
                if executed.len() >= max {
                    tracing::warn!(interpreter = %self.id, max_steps = max, "step bound reached");
                    break;
                }
            }
            match self.execute_once()? {
                Some(step) => executed.push(step),
                None => break,
            }
        }
        Ok(executed)
    }

    fn finish(&mut self, statechart: &Statechart, step: &MacroStep) {
        if let Err(violation) = self.configuration.check(statechart) {
            tracing::warn!(interpreter = %self.id, %violation, "inconsistent configuration");
        }
        for name in &step.finished {
            tracing::debug!(interpreter = %self.id, state = %name, "final state reached");
        }
        self.trace
            .push(step.clone(), Utc::now(), self.config.max_trace);
    }

    /// Active states in document order.
    pub fn configuration(&self) -> Vec<String> {
        self.configuration.ordered(&self.statechart)
    }

    pub fn active(&self) -> &Configuration {
        &self.configuration
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.configuration.contains(name)
    }

    /// Whether the root has completed.
    pub fn is_done(&self) -> bool {
        self.configuration
            .is_complete(&self.statechart, self.statechart.root())
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn statechart(&self) -> &Statechart {
        &self.statechart
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn policy(&self) -> Policy {
        self.config.policy
    }

    pub fn memory(&self) -> &HistoryMemory {
        &self.memory
    }

    pub fn trace(&self) -> &ExecutionTrace {
        &self.trace
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn evaluator_mut(&mut self) -> &mut E {
        &mut self.evaluator
    }

    pub fn pending_events(&self) -> &Q {
        &self.queue
    }
}
