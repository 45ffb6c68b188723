// src/modules/builtin/mod.rs

//! Generic modules shipped with the `encounterdag` binary.
//!
//! They are deliberately game-agnostic and small; their main job is to give
//! the CLI something to run and to exercise every engine capability
//! (normalization, typed dependencies, absent output, boundary events).

pub mod activity;
pub mod dedupe;
pub mod event_counts;
pub mod summary;

pub use activity::Activity;
pub use dedupe::Dedupe;
pub use event_counts::EventCounts;
pub use summary::Summary;

use crate::errors::Result;
use crate::modules::{ModuleDescriptor, ModuleRegistry};
use crate::types::Timestamp;

/// Register every built-in module.
pub fn register_all(registry: &mut ModuleRegistry) -> Result<()> {
    registry.register(
        ModuleDescriptor::new(dedupe::ID)
            .titled("Duplicate events")
            .priority(100),
        |_| Ok(Dedupe::default()),
    )?;

    registry.register(
        ModuleDescriptor::new(event_counts::ID)
            .titled("Event counts")
            .after(dedupe::ID)
            .priority(20),
        |deps| Ok(EventCounts::new(deps.context())),
    )?;

    registry.register(
        ModuleDescriptor::new(activity::ID)
            .titled("Activity")
            .after(dedupe::ID)
            .priority(10),
        |deps| Ok(Activity::new(deps.context())),
    )?;

    registry.register(
        ModuleDescriptor::new(summary::ID)
            .titled("Summary")
            .after(event_counts::ID)
            .after(activity::ID),
        |deps| {
            Ok(Summary::new(
                deps.get::<EventCounts>(event_counts::ID)?,
                deps.get::<Activity>(activity::ID)?,
                deps.context(),
            ))
        },
    )?;

    Ok(())
}

/// Format milliseconds as `m:ss.mmm`.
pub fn format_duration(ms: Timestamp) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{minutes}:{seconds:02}.{millis:03}")
}
