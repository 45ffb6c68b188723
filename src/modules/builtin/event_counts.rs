// src/modules/builtin/event_counts.rs

use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::Result;

use crate::context::ExecutionContext;
use crate::event::Event;
use crate::modules::{Module, ReportPayload};

pub const ID: &str = "event_counts";

/// Counts events involving the participant (or its subordinates), by kind.
#[derive(Debug)]
pub struct EventCounts {
    context: Rc<ExecutionContext>,
    outgoing: BTreeMap<String, usize>,
    incoming: BTreeMap<String, usize>,
}

impl EventCounts {
    pub fn new(context: Rc<ExecutionContext>) -> Self {
        Self {
            context,
            outgoing: BTreeMap::new(),
            incoming: BTreeMap::new(),
        }
    }

    /// Events of `kind` originating from the participant.
    pub fn outgoing(&self, kind: &str) -> usize {
        self.outgoing.get(kind).copied().unwrap_or(0)
    }

    /// Events of `kind` targeting the participant.
    pub fn incoming(&self, kind: &str) -> usize {
        self.incoming.get(kind).copied().unwrap_or(0)
    }

    /// Every event originating from the participant.
    pub fn actions(&self) -> usize {
        self.outgoing.values().sum()
    }
}

impl Module for EventCounts {
    fn handle_event(&mut self, event: &Event) -> Result<()> {
        if event.fabricated {
            return Ok(());
        }

        let kind = event.kind.as_str();
        if self.context.by_participant(event) {
            *self.outgoing.entry(kind.to_string()).or_default() += 1;
        }
        if self.context.to_participant(event) {
            *self.incoming.entry(kind.to_string()).or_default() += 1;
        }
        Ok(())
    }

    fn output(&self) -> Option<Box<dyn ReportPayload>> {
        if self.outgoing.is_empty() && self.incoming.is_empty() {
            return None;
        }

        let mut lines = Vec::new();
        for (kind, n) in &self.outgoing {
            lines.push(format!("  out {kind}: {n}"));
        }
        for (kind, n) in &self.incoming {
            lines.push(format!("  in  {kind}: {n}"));
        }
        Some(Box::new(lines.join("\n")))
    }
}
