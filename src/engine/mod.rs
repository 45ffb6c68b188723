// src/engine/mod.rs

//! Orchestration engine.
//!
//! A [`Run`] is built from a [`ModuleRegistry`] (resolve order, instantiate,
//! inject dependencies), then executed over an event sequence:
//! - [`pipeline`] drives the normalize and trigger phases
//! - [`faults`] contains failures raised while handling events
//!
//! Everything is synchronous and single-threaded; a run is deterministic for
//! a given registry, context and event sequence.

pub mod faults;
pub mod pipeline;
pub mod run;

pub use faults::{FaultTracker, ModuleFailure};
pub use run::{CompletedRun, Run};

use crate::context::ExecutionContext;
use crate::errors::Result;
use crate::event::Event;
use crate::modules::ModuleRegistry;
use crate::report::Report;

/// Build, execute and report in one go.
pub fn analyse(
    registry: &ModuleRegistry,
    context: ExecutionContext,
    events: Vec<Event>,
) -> Result<Report> {
    let run = Run::build(registry, context)?;
    let completed = run.execute(events)?;
    Ok(completed.report())
}
