// src/modules/mod.rs

//! Analysis modules and how they are declared.
//!
//! - [`registry`] holds module descriptors and their typed factories.
//! - [`deps`] is the injector handed to factories at build time.
//! - [`builtin`] contains a handful of generic modules shipped with the CLI.

use std::fmt;

use anyhow::Result;

use crate::event::Event;

pub mod builtin;
pub mod deps;
pub mod registry;

pub use deps::{Dep, ModuleDeps};
pub use registry::{ModuleDescriptor, ModuleRegistry};

/// Opaque renderable output of a module.
///
/// The engine never looks inside; it only cares whether a module produced
/// one.
pub trait ReportPayload: fmt::Display + fmt::Debug {}

impl<T: fmt::Display + fmt::Debug> ReportPayload for T {}

/// Contract every orchestrated analysis module implements.
pub trait Module: 'static {
    /// Rewrite the event sequence before any module sees events.
    ///
    /// Runs once per module, in dependency order; the returned sequence is
    /// handed to the next module. An error aborts the whole run.
    fn normalize(&mut self, events: Vec<Event>) -> Result<Vec<Event>> {
        Ok(events)
    }

    /// React to one event of the trigger phase.
    ///
    /// An error disables this module and every module depending on it for
    /// the rest of the run.
    fn handle_event(&mut self, event: &Event) -> Result<()>;

    /// Report payload, or `None` when there is nothing to report.
    fn output(&self) -> Option<Box<dyn ReportPayload>> {
        None
    }
}
