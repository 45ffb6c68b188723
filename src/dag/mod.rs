// src/dag/mod.rs

//! Module dependency graph and ordering.
//!
//! - [`graph`] holds the dependency graph built from a registry.
//! - [`resolver`] turns it into a deterministic build/execution order.

pub mod graph;
pub mod resolver;

pub use graph::DependencyGraph;
pub use resolver::resolve_order;
