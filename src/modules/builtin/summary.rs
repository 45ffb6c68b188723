// src/modules/builtin/summary.rs

use std::rc::Rc;

use anyhow::Result;

use crate::context::ExecutionContext;
use crate::event::Event;
use crate::modules::builtin::{Activity, EventCounts, format_duration};
use crate::modules::{Dep, Module, ReportPayload};

pub const ID: &str = "summary";

/// Actions per minute over the whole encounter.
#[derive(Debug)]
pub struct Summary {
    counts: Dep<EventCounts>,
    activity: Dep<Activity>,
    context: Rc<ExecutionContext>,
}

impl Summary {
    pub fn new(
        counts: Dep<EventCounts>,
        activity: Dep<Activity>,
        context: Rc<ExecutionContext>,
    ) -> Self {
        Self {
            counts,
            activity,
            context,
        }
    }

    pub fn actions_per_minute(&self) -> f64 {
        let duration = self.context.encounter().duration();
        if duration == 0 {
            return 0.0;
        }
        self.counts.borrow().actions() as f64 * 60_000.0 / duration as f64
    }
}

impl Module for Summary {
    fn handle_event(&mut self, _event: &Event) -> Result<()> {
        Ok(())
    }

    fn output(&self) -> Option<Box<dyn ReportPayload>> {
        let actions = self.counts.borrow().actions();
        let active = self.activity.borrow().active_span();
        Some(Box::new(format!(
            "  {actions} actions over {} ({:.1} per minute, {} active)",
            format_duration(self.context.encounter().duration()),
            self.actions_per_minute(),
            format_duration(active)
        )))
    }
}
