// src/dag/resolver.rs

//! Linear build order for a dependency graph.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use tracing::{debug, warn};

use crate::dag::graph::DependencyGraph;
use crate::errors::{AnalysisError, Result};
use crate::types::ModuleId;

/// Compute a total order in which every dependency precedes its dependents.
///
/// Among modules that are ready at the same time, the earliest-registered one
/// goes first, so with no constraints at all the order is the registration
/// order. Fails with [`AnalysisError::CyclicDependency`] if the graph has a
/// cycle.
pub fn resolve_order(graph: &DependencyGraph) -> Result<Vec<ModuleId>> {
    let g = graph.inner();

    let mut in_degree: Vec<usize> = g
        .node_indices()
        .map(|n| g.neighbors_directed(n, Direction::Incoming).count())
        .collect();

    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &deg)| deg == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(g.node_count());

    while let Some(Reverse(i)) = ready.pop() {
        let node = NodeIndex::new(i);
        order.push(g[node].clone());

        for dependent in g.neighbors_directed(node, Direction::Outgoing) {
            let deg = &mut in_degree[dependent.index()];
            *deg -= 1;
            if *deg == 0 {
                ready.push(Reverse(dependent.index()));
            }
        }
    }

    if order.len() < g.node_count() {
        let modules = cycle_members(graph);
        warn!(?modules, "module dependency graph contains a cycle");
        return Err(AnalysisError::CyclicDependency { modules });
    }

    debug!(?order, "resolved module order");
    Ok(order)
}

/// Modules that sit on at least one cycle, in registration order.
fn cycle_members(graph: &DependencyGraph) -> Vec<ModuleId> {
    let g = graph.inner();

    let mut members: Vec<NodeIndex> = tarjan_scc(g)
        .into_iter()
        .filter(|scc| scc.len() > 1 || scc.iter().any(|&n| g.contains_edge(n, n)))
        .flatten()
        .collect();
    members.sort_unstable();

    members.into_iter().map(|n| g[n].clone()).collect()
}
