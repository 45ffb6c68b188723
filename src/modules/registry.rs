// src/modules/registry.rs

//! Module descriptors and the registry that owns their factories.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::debug;

use crate::errors::{AnalysisError, Result};
use crate::modules::deps::{ModuleDeps, ModuleHandle};
use crate::modules::Module;
use crate::types::ModuleId;

type Factory = Rc<dyn Fn(&ModuleDeps<'_>) -> anyhow::Result<ModuleHandle>>;

/// Static declaration of a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    id: ModuleId,
    title: Option<String>,
    dependencies: Vec<ModuleId>,
    display_priority: i32,
}

impl ModuleDescriptor {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: None,
            dependencies: Vec::new(),
            display_priority: 0,
        }
    }

    /// Declare a dependency on another module.
    pub fn after(mut self, dependency: &str) -> Self {
        self.dependencies.push(dependency.to_string());
        self
    }

    /// Lower priorities are displayed first.
    pub fn priority(mut self, display_priority: i32) -> Self {
        self.display_priority = display_priority;
        self
    }

    pub fn titled(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable name; falls back to the identifier.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    pub fn dependencies(&self) -> &[ModuleId] {
        &self.dependencies
    }

    pub fn display_priority(&self) -> i32 {
        self.display_priority
    }
}

struct Registration {
    descriptor: ModuleDescriptor,
    factory: Factory,
}

/// Registry of module descriptors, in registration order.
///
/// Registration order is significant: it is the tie-break for every ordering
/// the engine computes.
#[derive(Default)]
pub struct ModuleRegistry {
    entries: Vec<Registration>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module with a typed factory.
    ///
    /// Dependencies may name modules that are registered later; unknown
    /// names are reported when the dependency graph is built.
    pub fn register<M, F>(&mut self, descriptor: ModuleDescriptor, factory: F) -> Result<()>
    where
        M: Module,
        F: Fn(&ModuleDeps<'_>) -> anyhow::Result<M> + 'static,
    {
        if self.contains(descriptor.id()) {
            return Err(AnalysisError::DuplicateModule(descriptor.id.clone()));
        }

        let mut seen = HashSet::new();
        for dep in descriptor.dependencies() {
            if dep == descriptor.id() {
                return Err(AnalysisError::SelfDependency(descriptor.id.clone()));
            }
            if !seen.insert(dep.as_str()) {
                return Err(AnalysisError::DuplicateDependency {
                    module: descriptor.id.clone(),
                    dependency: dep.clone(),
                });
            }
        }

        debug!(
            module = %descriptor.id(),
            deps = ?descriptor.dependencies(),
            priority = descriptor.display_priority(),
            "registered module"
        );

        let erased: Factory =
            Rc::new(move |deps: &ModuleDeps<'_>| factory(deps).map(ModuleHandle::new));
        self.entries.push(Registration {
            descriptor,
            factory: erased,
        });
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.descriptor.id() == id)
    }

    pub fn descriptor(&self, id: &str) -> Option<&ModuleDescriptor> {
        self.entries
            .iter()
            .map(|e| &e.descriptor)
            .find(|d| d.id() == id)
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.entries.iter().map(|e| &e.descriptor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Narrow the registry to `ids` plus everything they (transitively)
    /// depend on. Registration order is preserved.
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> Result<ModuleRegistry> {
        let by_id: HashMap<&str, &Registration> = self
            .entries
            .iter()
            .map(|e| (e.descriptor.id(), e))
            .collect();

        let mut keep: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = Vec::new();

        for id in ids {
            let id = id.as_ref();
            if !by_id.contains_key(id) {
                return Err(AnalysisError::UnknownModule(id.to_string()));
            }
            stack.push(id);
        }

        while let Some(id) = stack.pop() {
            if !keep.insert(id) {
                continue;
            }
            let entry = by_id
                .get(id)
                .ok_or_else(|| AnalysisError::UnknownModule(id.to_string()))?;
            for dep in entry.descriptor.dependencies() {
                if !by_id.contains_key(dep.as_str()) {
                    return Err(AnalysisError::UnknownDependency {
                        module: id.to_string(),
                        dependency: dep.clone(),
                    });
                }
                stack.push(dep);
            }
        }

        let entries = self
            .entries
            .iter()
            .filter(|e| keep.contains(e.descriptor.id()))
            .map(|e| Registration {
                descriptor: e.descriptor.clone(),
                factory: Rc::clone(&e.factory),
            })
            .collect();

        Ok(ModuleRegistry { entries })
    }

    /// Invoke the factory for `id`.
    pub(crate) fn build(&self, id: &str, deps: &ModuleDeps<'_>) -> anyhow::Result<ModuleHandle> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.descriptor.id() == id)
            .ok_or_else(|| anyhow::anyhow!("module '{id}' is not registered"))?;
        (entry.factory)(deps)
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.descriptors().collect::<Vec<_>>())
            .finish()
    }
}
