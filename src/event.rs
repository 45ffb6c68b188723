// src/event.rs

//! Combat-log events as seen by analysis modules.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::types::{ActorId, Timestamp};

/// Type tag of an [`Event`].
///
/// `init` and `complete` are reserved for the boundary events the engine
/// fabricates around the trigger phase; everything else is a named kind taken
/// verbatim from the log (e.g. `"cast"`, `"damage"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "String")]
pub enum EventKind {
    Init,
    Complete,
    Named(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Init => "init",
            EventKind::Complete => "complete",
            EventKind::Named(name) => name,
        }
    }

    /// Whether this kind is one the engine fabricates itself.
    pub fn is_boundary(&self) -> bool {
        matches!(self, EventKind::Init | EventKind::Complete)
    }
}

impl From<String> for EventKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "init" => EventKind::Init,
            "complete" => EventKind::Complete,
            _ => EventKind::Named(s),
        }
    }
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        EventKind::from(s.to_string())
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single timestamped log record.
///
/// Events in an event file look like:
///
/// ```toml
/// [[event]]
/// type = "cast"
/// timestamp = 1200
/// source = 1
/// target = 100
/// ability = "Fire IV"
/// ```
///
/// Any key other than `type`, `timestamp`, `source` and `target` lands in
/// [`Event::fields`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,

    pub timestamp: Timestamp,

    #[serde(default)]
    pub source: Option<ActorId>,

    #[serde(default)]
    pub target: Option<ActorId>,

    /// Set on events the engine injected rather than read from the log.
    #[serde(skip)]
    pub fabricated: bool,

    #[serde(flatten)]
    pub fields: BTreeMap<String, toml::Value>,
}

impl Event {
    pub fn new(kind: impl Into<EventKind>, timestamp: Timestamp) -> Self {
        Self {
            kind: kind.into(),
            timestamp,
            source: None,
            target: None,
            fabricated: false,
            fields: BTreeMap::new(),
        }
    }

    /// Build an engine-fabricated event.
    pub(crate) fn fabricated(kind: EventKind, timestamp: Timestamp) -> Self {
        Self {
            fabricated: true,
            ..Self::new(kind, timestamp)
        }
    }

    pub fn with_source(mut self, actor: ActorId) -> Self {
        self.source = Some(actor);
        self
    }

    pub fn with_target(mut self, actor: ActorId) -> Self {
        self.target = Some(actor);
        self
    }

    pub fn with_field(mut self, key: &str, value: impl Into<toml::Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&toml::Value> {
        self.fields.get(key)
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind.as_str() == kind
    }
}
