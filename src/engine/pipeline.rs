// src/engine/pipeline.rs

//! The two event passes of a run.
//!
//! 1. normalize: each module rewrites the sequence in turn; any error is
//!    fatal because later modules may rely on earlier rewrites.
//! 2. trigger: `init`, every normalized event, then `complete`, each
//!    delivered to the live modules in execution order. Errors here are
//!    contained by the [`FaultTracker`].

use tracing::{debug, trace};

use crate::context::ExecutionContext;
use crate::engine::faults::FaultTracker;
use crate::engine::run::BuiltModule;
use crate::errors::{AnalysisError, Result};
use crate::event::{Event, EventKind};
use crate::types::Timestamp;

pub(crate) fn normalize_phase(modules: &[BuiltModule], mut events: Vec<Event>) -> Result<Vec<Event>> {
    for m in modules {
        let before = events.len();
        events = m
            .handle
            .module()
            .borrow_mut()
            .normalize(events)
            .map_err(|source| AnalysisError::Normalization {
                module: m.id.clone(),
                source,
            })?;

        if events.len() != before {
            debug!(module = %m.id, before, after = events.len(), "module rewrote event sequence");
        }
    }

    Ok(events)
}

pub(crate) fn trigger_phase(
    modules: &[BuiltModule],
    faults: &mut FaultTracker,
    context: &ExecutionContext,
    events: &[Event],
) {
    let init = fabricate(context, EventKind::Init, None);
    deliver(modules, faults, &init);

    for event in events {
        context.advance_to(event.timestamp);
        deliver(modules, faults, event);
    }

    let complete = fabricate(context, EventKind::Complete, None);
    deliver(modules, faults, &complete);
}

/// Build a boundary event, stamped with the current clock unless `at` says
/// otherwise.
pub(crate) fn fabricate(
    context: &ExecutionContext,
    kind: EventKind,
    at: Option<Timestamp>,
) -> Event {
    Event::fabricated(kind, at.unwrap_or_else(|| context.now()))
}

/// Hand one event to every module that is still live when its turn comes.
///
/// A failure disables dependents immediately, and dependents always come
/// later in the order, so they already miss this event.
fn deliver(modules: &[BuiltModule], faults: &mut FaultTracker, event: &Event) {
    for m in modules {
        if !faults.is_live(&m.id) {
            continue;
        }

        trace!(module = %m.id, event = %event.kind, timestamp = event.timestamp, "deliver");
        let result = m.handle.module().borrow_mut().handle_event(event);

        if let Err(err) = result {
            faults.record_runtime_failure(&m.id, &err, event);
        }
    }
}
