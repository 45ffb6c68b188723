// src/modules/builtin/dedupe.rs

//! Drops exact duplicate consecutive events, a common artefact of merged
//! log exports.

use anyhow::Result;
use tracing::debug;

use crate::event::Event;
use crate::modules::Module;

pub const ID: &str = "dedupe";

#[derive(Debug, Default)]
pub struct Dedupe {
    removed: usize,
}

impl Dedupe {
    pub fn removed(&self) -> usize {
        self.removed
    }
}

impl Module for Dedupe {
    fn normalize(&mut self, mut events: Vec<Event>) -> Result<Vec<Event>> {
        let before = events.len();
        events.dedup();
        self.removed = before - events.len();
        if self.removed > 0 {
            debug!(removed = self.removed, "dropped duplicate events");
        }
        Ok(events)
    }

    fn handle_event(&mut self, _event: &Event) -> Result<()> {
        Ok(())
    }
}
