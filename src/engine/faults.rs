// src/engine/faults.rs

//! Fault isolation for the trigger phase.
//!
//! [`FaultTracker`] is the only owner of the live set and the failure map of
//! a run. A module leaves the live set exactly when a failure is recorded for
//! it, and never comes back.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;

use tracing::warn;

use crate::dag::DependencyGraph;
use crate::event::{Event, EventKind};
use crate::types::{ModuleId, Timestamp};

/// Why a module was taken out of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleFailure {
    /// The module itself returned an error from `handle_event`.
    Runtime {
        message: String,
        event: EventKind,
        timestamp: Timestamp,
    },
    /// A module this one depends on failed.
    DependencyCascade {
        /// The direct dependency whose failure disabled this module.
        upstream: ModuleId,
        /// The module whose runtime error started the cascade.
        origin: ModuleId,
    },
}

impl ModuleFailure {
    pub fn is_cascade(&self) -> bool {
        matches!(self, ModuleFailure::DependencyCascade { .. })
    }
}

impl fmt::Display for ModuleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleFailure::Runtime {
                message,
                event,
                timestamp,
            } => write!(
                f,
                "failed while handling '{event}' at {timestamp}ms: {message}"
            ),
            ModuleFailure::DependencyCascade { upstream, origin } if upstream == origin => {
                write!(f, "disabled because dependency '{upstream}' failed")
            }
            ModuleFailure::DependencyCascade { upstream, origin } => write!(
                f,
                "disabled because dependency '{upstream}' was disabled (failure originated in '{origin}')"
            ),
        }
    }
}

/// Live set + failure map for one run.
#[derive(Debug, Clone)]
pub struct FaultTracker {
    order: Vec<ModuleId>,
    live: HashSet<ModuleId>,
    failures: BTreeMap<ModuleId, ModuleFailure>,
    dependents: HashMap<ModuleId, Vec<ModuleId>>,
}

impl FaultTracker {
    /// Every module in `order` starts out live.
    pub fn new(order: &[ModuleId], graph: &DependencyGraph) -> Self {
        let dependents = order
            .iter()
            .map(|id| {
                let ds = graph
                    .dependents_of(id)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                (id.clone(), ds)
            })
            .collect();

        Self {
            order: order.to_vec(),
            live: order.iter().cloned().collect(),
            failures: BTreeMap::new(),
            dependents,
        }
    }

    pub fn is_live(&self, module: &str) -> bool {
        self.live.contains(module)
    }

    pub fn failure_of(&self, module: &str) -> Option<&ModuleFailure> {
        self.failures.get(module)
    }

    /// Live modules in execution order.
    pub fn live_modules(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|id| self.live.contains(id.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Failed modules in execution order, with their failure.
    pub fn failures(&self) -> Vec<(&str, &ModuleFailure)> {
        self.order
            .iter()
            .filter_map(|id| self.failures.get(id).map(|f| (id.as_str(), f)))
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Record that `module` failed on `event`, and disable everything that
    /// depends on it.
    ///
    /// Returns every module newly taken out of the run, starting with
    /// `module` itself. Recording a failure for a module that is not live is
    /// a no-op.
    pub fn record_runtime_failure(
        &mut self,
        module: &str,
        error: &anyhow::Error,
        event: &Event,
    ) -> Vec<ModuleId> {
        if !self.is_live(module) {
            warn!(module = %module, "failure reported for a module that is not live; ignoring");
            return Vec::new();
        }

        let message = format!("{error:#}");
        warn!(
            module = %module,
            event = %event.kind,
            timestamp = event.timestamp,
            error = %message,
            "module failed; disabling it and its dependents"
        );

        self.disable(
            module,
            ModuleFailure::Runtime {
                message,
                event: event.kind.clone(),
                timestamp: event.timestamp,
            },
        );

        let mut disabled = vec![module.to_string()];
        disabled.extend(self.cascade(module));
        disabled
    }

    /// Breadth-first over dependents so each one records the nearest failed
    /// upstream module.
    fn cascade(&mut self, origin: &str) -> Vec<ModuleId> {
        let mut queue: VecDeque<ModuleId> = VecDeque::from([origin.to_string()]);
        let mut newly_disabled = Vec::new();

        while let Some(upstream) = queue.pop_front() {
            let dependents = self.dependents.get(&upstream).cloned().unwrap_or_default();

            for dependent in dependents {
                if !self.is_live(&dependent) {
                    continue;
                }

                warn!(
                    module = %dependent,
                    upstream = %upstream,
                    origin = %origin,
                    "disabling module because a dependency failed"
                );

                self.disable(
                    &dependent,
                    ModuleFailure::DependencyCascade {
                        upstream: upstream.clone(),
                        origin: origin.to_string(),
                    },
                );
                newly_disabled.push(dependent.clone());
                queue.push_back(dependent);
            }
        }

        newly_disabled
    }

    fn disable(&mut self, module: &str, failure: ModuleFailure) {
        self.live.remove(module);
        self.failures.entry(module.to_string()).or_insert(failure);
    }
}
