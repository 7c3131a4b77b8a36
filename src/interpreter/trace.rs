//! Timestamped record of executed macro steps.
//!
//! `record` returns a new trace with the step appended and leaves the
//! original untouched. The interpreter owns its trace and appends in place
//! with a bound on the number of entries kept.

use super::step::MacroStep;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One executed macro step and when it finished.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub step: MacroStep,
    pub timestamp: DateTime<Utc>,
}

/// Ordered record of the macro steps an interpreter executed.
///
/// # Example
///
/// ```rust
/// use statecraft::interpreter::{ExecutionTrace, MacroStep};
///
/// let step = MacroStep {
///     event: None,
///     steps: vec![],
///     configuration: vec!["root".to_string()],
///     finished: vec![],
///     completed: vec![],
/// };
///
/// let trace = ExecutionTrace::new();
/// let recorded = trace.record(step);
///
/// assert_eq!(recorded.len(), 1);
/// assert!(trace.is_empty()); // original unchanged
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTrace {
    entries: Vec<TraceEntry>,
}

impl ExecutionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step, returning a new trace.
    pub fn record(&self, step: MacroStep) -> Self {
        self.record_at(step, Utc::now())
    }

    /// Record a step with an explicit timestamp.
    pub fn record_at(&self, step: MacroStep, timestamp: DateTime<Utc>) -> Self {
        let mut entries = self.entries.clone();
        entries.push(TraceEntry { step, timestamp });
        Self { entries }
    }

    /// Append a step in place, dropping the oldest entries beyond `limit`.
    pub(crate) fn push(
        &mut self,
        step: MacroStep,
        timestamp: DateTime<Utc>,
        limit: Option<usize>,
    ) {
        if limit == Some(0) {
            return;
        }
        self.entries.push(TraceEntry { step, timestamp });
        if let Some(limit) = limit {
            let excess = self.entries.len().saturating_sub(limit);
            if excess > 0 {
                self.entries.drain(..excess);
            }
        }
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn steps(&self) -> impl Iterator<Item = &MacroStep> {
        self.entries.iter().map(|e| &e.step)
    }

    pub fn last(&self) -> Option<&MacroStep> {
        self.entries.last().map(|e| &e.step)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configurations after each step, oldest first.
    pub fn configurations(&self) -> Vec<&[String]> {
        self.steps().map(|s| s.configuration.as_slice()).collect()
    }

    /// Time between the first and the last recorded step.
    ///
    /// `None` when empty, or when the timestamps run backwards.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.entries.first()?, self.entries.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn step(active: &[&str]) -> MacroStep {
        MacroStep {
            event: None,
            steps: vec![],
            configuration: active.iter().map(|s| s.to_string()).collect(),
            finished: vec![],
            completed: vec![],
        }
    }

    #[test]
    fn new_trace_is_empty() {
        let trace = ExecutionTrace::new();

        assert!(trace.is_empty());
        assert!(trace.last().is_none());
        assert!(trace.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let trace = ExecutionTrace::new();
        let recorded = trace.record(step(&["root"]));

        assert_eq!(trace.len(), 0);
        assert_eq!(recorded.len(), 1);
    }

    #[test]
    fn configurations_follow_recording_order() {
        let trace = ExecutionTrace::new()
            .record(step(&["root", "a"]))
            .record(step(&["root", "b"]));

        let configurations = trace.configurations();
        assert_eq!(configurations.len(), 2);
        assert_eq!(configurations[1], ["root".to_string(), "b".to_string()]);
        assert_eq!(trace.last(), Some(&step(&["root", "b"])));
    }

    #[test]
    fn duration_spans_first_to_last() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 5).unwrap();
        let trace = ExecutionTrace::new()
            .record_at(step(&["root"]), start)
            .record_at(step(&["root"]), end);

        assert_eq!(trace.duration(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn push_keeps_the_newest_entries_within_limit() {
        let mut trace = ExecutionTrace::new();
        for name in ["a", "b", "c", "d"] {
            trace.push(step(&[name]), Utc::now(), Some(2));
        }

        assert_eq!(trace.len(), 2);
        let configurations = trace.configurations();
        assert_eq!(configurations[0], ["c".to_string()]);
        assert_eq!(configurations[1], ["d".to_string()]);
    }

    #[test]
    fn push_without_limit_keeps_everything() {
        let mut trace = ExecutionTrace::new();
        for _ in 0..5 {
            trace.push(step(&["root"]), Utc::now(), None);
        }

        assert_eq!(trace.len(), 5);
    }

    #[test]
    fn zero_limit_disables_recording() {
        let mut trace = ExecutionTrace::new();
        trace.push(step(&["root"]), Utc::now(), Some(0));

        assert!(trace.is_empty());
    }

    #[test]
    fn trace_serializes() {
        let trace = ExecutionTrace::new().record(step(&["root"]));
        let json = serde_json::to_string(&trace).unwrap();
        let back: ExecutionTrace = serde_json::from_str(&json).unwrap();

        assert_eq!(back, trace);
    }
}
