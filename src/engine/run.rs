// src/engine/run.rs

//! Building and executing a single analysis run.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, info};

use crate::context::ExecutionContext;
use crate::dag::{DependencyGraph, resolve_order};
use crate::engine::faults::{FaultTracker, ModuleFailure};
use crate::engine::pipeline;
use crate::errors::{AnalysisError, Result};
use crate::event::Event;
use crate::modules::deps::ModuleHandle;
use crate::modules::{Dep, Module, ModuleDeps, ModuleRegistry};
use crate::report::{self, Report};
use crate::types::ModuleId;

/// A module instance together with what the engine needs to know about it.
pub(crate) struct BuiltModule {
    pub(crate) id: ModuleId,
    pub(crate) title: String,
    pub(crate) priority: i32,
    pub(crate) handle: ModuleHandle,
}

/// A fully wired run that has not seen any events yet.
///
/// Owns its module instances, its context and its fault state; nothing is
/// shared with other runs built from the same registry.
pub struct Run {
    context: Rc<ExecutionContext>,
    graph: DependencyGraph,
    modules: Vec<BuiltModule>,
    faults: FaultTracker,
    display_order: Vec<usize>,
}

impl Run {
    /// Resolve the module order and build one instance per descriptor.
    ///
    /// Fails on unknown dependencies, cycles, or a factory error; in every
    /// case no partially built run is returned.
    pub fn build(registry: &ModuleRegistry, context: ExecutionContext) -> Result<Self> {
        let graph = DependencyGraph::from_registry(registry)?;
        let order = resolve_order(&graph)?;

        context.reset_clock();
        let context = Rc::new(context);

        let mut built: HashMap<ModuleId, ModuleHandle> = HashMap::with_capacity(order.len());
        let mut modules = Vec::with_capacity(order.len());

        for id in &order {
            let descriptor = registry
                .descriptor(id)
                .ok_or_else(|| AnalysisError::UnknownModule(id.clone()))?;

            let deps = ModuleDeps::new(id, descriptor.dependencies(), &built, &context);
            let handle = registry
                .build(id, &deps)
                .map_err(|source| AnalysisError::Construction {
                    module: id.clone(),
                    source,
                })?;

            debug!(module = %id, "built module");
            built.insert(id.clone(), handle.clone());
            modules.push(BuiltModule {
                id: id.clone(),
                title: descriptor.title().to_string(),
                priority: descriptor.display_priority(),
                handle,
            });
        }

        let faults = FaultTracker::new(&order, &graph);
        let display_order = report::display_order(modules.iter().map(|m| m.priority));

        info!(modules = modules.len(), "run built");

        Ok(Self {
            context,
            graph,
            modules,
            faults,
            display_order,
        })
    }

    /// Execution order of the run.
    pub fn order(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.id.as_str()).collect()
    }

    /// Module identifiers in the order their report entries appear.
    pub fn display_order(&self) -> Vec<&str> {
        self.display_order
            .iter()
            .map(|&i| self.modules[i].id.as_str())
            .collect()
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Typed access to a module instance of this run.
    pub fn module<M: Module>(&self, id: &str) -> Option<Dep<M>> {
        self.modules
            .iter()
            .find(|m| m.id == id)
            .and_then(|m| m.handle.downcast::<M>())
    }

    /// Push `events` through the normalize and trigger phases.
    pub fn execute(mut self, events: Vec<Event>) -> Result<CompletedRun> {
        info!(events = events.len(), "normalize phase");
        let events = pipeline::normalize_phase(&self.modules, events)?;

        info!(events = events.len(), "trigger phase");
        pipeline::trigger_phase(&self.modules, &mut self.faults, &self.context, &events);

        let failed = self.faults.failures().len();
        if failed > 0 {
            info!(failed, live = self.faults.live_modules().len(), "run complete with failures");
        } else {
            info!("run complete");
        }

        Ok(CompletedRun { run: self })
    }
}

/// A run whose trigger phase has finished.
pub struct CompletedRun {
    run: Run,
}

impl CompletedRun {
    /// Assemble the report. Calling this repeatedly yields the same entries
    /// in the same order.
    pub fn report(&self) -> Report {
        report::aggregate(&self.run.modules, &self.run.display_order, &self.run.faults)
    }

    pub fn faults(&self) -> &FaultTracker {
        &self.run.faults
    }

    pub fn failure_of(&self, module: &str) -> Option<&ModuleFailure> {
        self.run.faults.failure_of(module)
    }

    pub fn order(&self) -> Vec<&str> {
        self.run.order()
    }

    pub fn context(&self) -> &ExecutionContext {
        self.run.context()
    }

    pub fn module<M: Module>(&self, id: &str) -> Option<Dep<M>> {
        self.run.module(id)
    }
}
