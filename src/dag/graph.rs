// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::errors::{AnalysisError, Result};
use crate::modules::{ModuleDescriptor, ModuleRegistry};
use crate::types::ModuleId;

/// Dependency graph keyed by module identifier.
///
/// Edge direction: dependency -> dependent. For a module `B` declaring
/// `after("A")` we add the edge `A -> B`.
///
/// Node indices follow registration order, which the resolver relies on for
/// its tie-break.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<ModuleId, ()>,
    index: HashMap<ModuleId, NodeIndex>,
    /// Declared dependencies, by node index, in declaration order.
    deps: Vec<Vec<ModuleId>>,
}

impl DependencyGraph {
    pub fn from_registry(registry: &ModuleRegistry) -> Result<Self> {
        Self::from_descriptors(registry.descriptors())
    }

    /// Build the graph, checking that every dependency names a known module.
    ///
    /// Cycles are *not* rejected here; see [`crate::dag::resolve_order`].
    pub fn from_descriptors<'a>(
        descriptors: impl IntoIterator<Item = &'a ModuleDescriptor>,
    ) -> Result<Self> {
        let descriptors: Vec<&ModuleDescriptor> = descriptors.into_iter().collect();

        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for d in &descriptors {
            if index.contains_key(d.id()) {
                return Err(AnalysisError::DuplicateModule(d.id().to_string()));
            }
            let node = graph.add_node(d.id().to_string());
            index.insert(d.id().to_string(), node);
        }

        for d in &descriptors {
            let node = index[d.id()];
            for dep in d.dependencies() {
                let dep_node = index.get(dep).copied().ok_or_else(|| {
                    AnalysisError::UnknownDependency {
                        module: d.id().to_string(),
                        dependency: dep.clone(),
                    }
                })?;
                graph.update_edge(dep_node, node, ());
            }
        }

        let deps = descriptors
            .iter()
            .map(|d| d.dependencies().to_vec())
            .collect();

        Ok(Self { graph, index, deps })
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All module identifiers, in registration order.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(|n| self.graph[n].as_str())
    }

    /// Registration position of a module.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).map(|n| n.index())
    }

    /// Immediate dependencies of a module, as declared.
    pub fn dependencies_of(&self, id: &str) -> &[ModuleId] {
        self.index
            .get(id)
            .map(|n| self.deps[n.index()].as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a module, in registration order.
    pub fn dependents_of(&self, id: &str) -> Vec<&str> {
        let Some(&node) = self.index.get(id) else {
            return Vec::new();
        };

        let mut dependents: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .collect();
        dependents.sort_unstable();
        dependents
            .into_iter()
            .map(|n| self.graph[n].as_str())
            .collect()
    }

    /// Whether `module` depends on `upstream`, directly or transitively.
    pub fn depends_on(&self, module: &str, upstream: &str) -> bool {
        match (self.index.get(upstream), self.index.get(module)) {
            (Some(&from), Some(&to)) if from != to => {
                has_path_connecting(&self.graph, from, to, None)
            }
            _ => false,
        }
    }

    pub(crate) fn inner(&self) -> &DiGraph<ModuleId, ()> {
        &self.graph
    }
}
