//! Step semantics policies and interpreter configuration.

use serde::{Deserialize, Serialize};

/// Which of two hierarchically related transitions fires.
///
/// Only transitions whose sources are ancestor and descendant of each other
/// are affected; transitions in unrelated regions always fire together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionPriority {
    /// The transition leaving the outer (ancestor) state wins.
    OuterFirst,
    /// The transition leaving the inner (descendant) state wins.
    #[default]
    InnerFirst,
}

/// Whether a pending event or eventless transitions are considered first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventPriority {
    /// Event-triggered transitions first; eventless ones only if none apply.
    EventFirst,
    /// Eventless transitions first; the event waits while any apply.
    #[default]
    EventlessFirst,
}

/// The two independent policy choices of the step algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub region: RegionPriority,
    pub event: EventPriority,
}

impl Policy {
    pub fn new(region: RegionPriority, event: EventPriority) -> Self {
        Self { region, event }
    }

    /// Outer transitions win; eventless transitions first.
    pub fn outer_first() -> Self {
        Self::new(RegionPriority::OuterFirst, EventPriority::EventlessFirst)
    }

    /// Inner transitions win; the pending event is tried first.
    pub fn event_first() -> Self {
        Self::new(RegionPriority::InnerFirst, EventPriority::EventFirst)
    }
}

/// Trace entries kept by default.
pub const DEFAULT_TRACE_LIMIT: usize = 1024;

/// Interpreter settings.
///
/// Every field has a default, so partial JSON documents are accepted:
///
/// ```rust
/// use statecraft::interpreter::{
///     EventPriority, InterpreterConfig, RegionPriority, DEFAULT_TRACE_LIMIT,
/// };
///
/// let json = r#"{ "policy": { "region": "OuterFirst" } }"#;
/// let config = InterpreterConfig::from_json(json).unwrap();
/// assert_eq!(config.policy.region, RegionPriority::OuterFirst);
/// assert_eq!(config.policy.event, EventPriority::EventlessFirst);
/// assert_eq!(config.max_steps, None);
/// assert_eq!(config.max_trace, Some(DEFAULT_TRACE_LIMIT));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    pub policy: Policy,
    /// Upper bound on macro steps run by one `execute` call. `None` runs
    /// until no step happens.
    pub max_steps: Option<usize>,
    /// Number of most recent macro steps kept in the trace. `None` keeps
    /// all of them, `Some(0)` disables the trace.
    pub max_trace: Option<usize>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self::new(Policy::default())
    }
}

impl InterpreterConfig {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            max_steps: None,
            max_trace: Some(DEFAULT_TRACE_LIMIT),
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Keep at most `max_trace` entries in the trace; `None` is unbounded.
    pub fn with_max_trace(mut self, max_trace: Option<usize>) -> Self {
        self.max_trace = max_trace;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<Policy> for InterpreterConfig {
    fn from(policy: Policy) -> Self {
        Self::new(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_inner_and_eventless_first() {
        let policy = Policy::default();

        assert_eq!(policy.region, RegionPriority::InnerFirst);
        assert_eq!(policy.event, EventPriority::EventlessFirst);
    }

    #[test]
    fn presets_select_policies() {
        assert_eq!(Policy::outer_first().region, RegionPriority::OuterFirst);
        assert_eq!(Policy::outer_first().event, EventPriority::EventlessFirst);
        assert_eq!(Policy::event_first().region, RegionPriority::InnerFirst);
        assert_eq!(Policy::event_first().event, EventPriority::EventFirst);
    }

    #[test]
    fn empty_json_yields_defaults() {
        let config = InterpreterConfig::from_json("{}").unwrap();

        assert_eq!(config, InterpreterConfig::default());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = InterpreterConfig::new(Policy::event_first()).with_max_steps(50);
        let json = config.to_json().unwrap();

        assert_eq!(InterpreterConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn trace_limit_defaults_and_can_be_lifted() {
        assert_eq!(InterpreterConfig::default().max_trace, Some(DEFAULT_TRACE_LIMIT));

        let config = InterpreterConfig::from_json(r#"{ "max_trace": null }"#).unwrap();
        assert_eq!(config.max_trace, None);

        let config = InterpreterConfig::from_json(r#"{ "max_trace": 8 }"#).unwrap();
        assert_eq!(config.max_trace, Some(8));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let result = InterpreterConfig::from_json(r#"{ "policy": { "event": "Sometimes" } }"#);

        assert!(result.is_err());
    }
}
