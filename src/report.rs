// src/report.rs

//! Final, ordered report of a completed run.

use std::fmt;

use crate::engine::faults::{FaultTracker, ModuleFailure};
use crate::engine::run::BuiltModule;
use crate::modules::ReportPayload;
use crate::types::ModuleId;

/// Content of a report entry.
#[derive(Debug)]
pub enum EntryBody {
    /// What the module produced.
    Output(Box<dyn ReportPayload>),
    /// Placeholder for a module that failed or was disabled by a cascade.
    Error(ModuleFailure),
}

#[derive(Debug)]
pub struct ReportEntry {
    pub module: ModuleId,
    pub title: String,
    pub body: EntryBody,
}

impl ReportEntry {
    pub fn is_error(&self) -> bool {
        matches!(self.body, EntryBody::Error(_))
    }

    pub fn failure(&self) -> Option<&ModuleFailure> {
        match &self.body {
            EntryBody::Error(f) => Some(f),
            EntryBody::Output(_) => None,
        }
    }
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            EntryBody::Output(payload) => write!(f, "{}\n{}", self.title, payload),
            EntryBody::Error(failure) => {
                write!(f, "{}\n[error] module '{}' {}", self.title, self.module, failure)
            }
        }
    }
}

/// Entries in display order.
#[derive(Debug, Default)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn entry(&self, module: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.module == module)
    }

    /// Module identifiers in display order.
    pub fn modules(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.module.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| e.is_error())
    }

    /// Plain-text rendering, one block per entry.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// blake3 digest of the rendered report.
    ///
    /// Two runs over identical inputs yield the same fingerprint.
    pub fn fingerprint(&self) -> String {
        blake3::hash(self.render().as_bytes()).to_hex().to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Indices into the build order, stably sorted by display priority.
pub(crate) fn display_order(priorities: impl IntoIterator<Item = i32>) -> Vec<usize> {
    let mut order: Vec<(usize, i32)> = priorities.into_iter().enumerate().collect();
    order.sort_by_key(|&(_, priority)| priority);
    order.into_iter().map(|(i, _)| i).collect()
}

/// Visit modules in display order and collect their entries.
///
/// Failed modules get an error placeholder; modules with no output are
/// skipped.
pub(crate) fn aggregate(
    modules: &[BuiltModule],
    display_order: &[usize],
    faults: &FaultTracker,
) -> Report {
    let entries = display_order
        .iter()
        .map(|&i| &modules[i])
        .filter_map(|m| {
            let body = match faults.failure_of(&m.id) {
                Some(failure) => EntryBody::Error(failure.clone()),
                None => EntryBody::Output(m.handle.module().borrow().output()?),
            };
            Some(ReportEntry {
                module: m.id.clone(),
                title: m.title.clone(),
                body,
            })
        })
        .collect();

    Report { entries }
}
