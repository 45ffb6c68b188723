// src/modules/builtin/activity.rs

use std::rc::Rc;

use anyhow::Result;

use crate::context::ExecutionContext;
use crate::event::{Event, EventKind};
use crate::modules::builtin::format_duration;
use crate::modules::{Module, ReportPayload};
use crate::types::Timestamp;

pub const ID: &str = "activity";

/// First and last action of the participant.
#[derive(Debug)]
pub struct Activity {
    context: Rc<ExecutionContext>,
    first: Option<Timestamp>,
    last: Option<Timestamp>,
    finished_at: Option<Timestamp>,
}

impl Activity {
    pub fn new(context: Rc<ExecutionContext>) -> Self {
        Self {
            context,
            first: None,
            last: None,
            finished_at: None,
        }
    }

    pub fn first(&self) -> Option<Timestamp> {
        self.first
    }

    pub fn last(&self) -> Option<Timestamp> {
        self.last
    }

    /// Clock value when the `complete` event arrived.
    pub fn finished_at(&self) -> Option<Timestamp> {
        self.finished_at
    }

    /// Time between the first and last action.
    pub fn active_span(&self) -> Timestamp {
        match (self.first, self.last) {
            (Some(first), Some(last)) => last - first,
            _ => 0,
        }
    }

    /// Share of the encounter spent between first and last action, 0.0..=1.0.
    pub fn active_share(&self) -> f64 {
        let duration = self.context.encounter().duration();
        if duration == 0 {
            return 0.0;
        }
        self.active_span() as f64 / duration as f64
    }
}

impl Module for Activity {
    fn handle_event(&mut self, event: &Event) -> Result<()> {
        match event.kind {
            EventKind::Init => {}
            EventKind::Complete => self.finished_at = Some(self.context.now()),
            EventKind::Named(_) => {
                if self.context.by_participant(event) {
                    // Use the clock rather than the raw timestamp so actions
                    // logged after the encounter end are clamped.
                    let now = self.context.now();
                    self.first.get_or_insert(now);
                    self.last = Some(now);
                }
            }
        }
        Ok(())
    }

    fn output(&self) -> Option<Box<dyn ReportPayload>> {
        let (first, last) = (self.first?, self.last?);
        Some(Box::new(format!(
            "  active from {} to {} ({:.1}% of encounter)",
            format_duration(self.context.relative(first)),
            format_duration(self.context.relative(last)),
            self.active_share() * 100.0
        )))
    }
}
