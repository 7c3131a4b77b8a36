//! Events and the queue abstraction the selector consumes them from.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::VecDeque;

/// An event: a name plus optional auxiliary data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Map::new(),
        }
    }

    /// Attach a named value to the event.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

impl From<&str> for Event {
    fn from(name: &str) -> Self {
        Event::new(name)
    }
}

impl From<String> for Event {
    fn from(name: String) -> Self {
        Event::new(name)
    }
}

/// Queue of pending events.
///
/// The selector only ever looks at the head: it peeks without consuming,
/// and consumes at most one event per step.
pub trait EventQueue {
    /// Head of the queue, left in place.
    fn peek(&self) -> Option<&Event>;

    /// Remove and return the head of the queue.
    fn consume(&mut self) -> Option<Event>;

    fn push(&mut self, event: Event);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventQueue for VecDeque<Event> {
    fn peek(&self) -> Option<&Event> {
        self.front()
    }

    fn consume(&mut self) -> Option<Event> {
        self.pop_front()
    }

    fn push(&mut self, event: Event) {
        self.push_back(event);
    }

    fn len(&self) -> usize {
        VecDeque::len(self)
    }
}
