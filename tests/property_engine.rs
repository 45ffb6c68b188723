// tests/property_engine.rs

mod common;
use crate::common::builders::{ContextBuilder, cast};
use crate::common::probe::{Journal, Probe, ProbeBehaviour, register_probe};

use std::collections::BTreeSet;

use proptest::prelude::*;

use encounterdag::dag::{DependencyGraph, resolve_order};
use encounterdag::engine::{ModuleFailure, Run};
use encounterdag::errors::AnalysisError;
use encounterdag::modules::{ModuleDescriptor, ModuleRegistry};

// Acyclic by construction: module i may only depend on modules 0..i. The
// registration order is then shuffled so the resolver has real work to do.
fn dag_strategy(max_modules: usize) -> impl Strategy<Value = Vec<ModuleDescriptor>> {
    (1..=max_modules)
        .prop_flat_map(|n| {
            proptest::collection::vec(proptest::collection::vec(any::<usize>(), 0..n), n)
        })
        .prop_map(|raw_deps| {
            raw_deps
                .into_iter()
                .enumerate()
                .map(|(i, potential)| {
                    // Sanitize dependencies: only allow deps < i
                    let valid: BTreeSet<usize> = if i == 0 {
                        BTreeSet::new()
                    } else {
                        potential.into_iter().map(|d| d % i).collect()
                    };
                    valid
                        .into_iter()
                        .fold(ModuleDescriptor::new(&format!("m{i}")), |d, dep| {
                            d.after(&format!("m{dep}"))
                        })
                })
                .collect::<Vec<_>>()
        })
        .prop_flat_map(|descriptors| Just(descriptors).prop_shuffle())
}

fn probe_registry(descriptors: &[ModuleDescriptor], failing: Option<&str>) -> ModuleRegistry {
    let journal = Journal::new();
    let mut registry = ModuleRegistry::new();
    for d in descriptors {
        let behaviour = if Some(d.id()) == failing {
            ProbeBehaviour::fail_on_delivery(1)
        } else {
            ProbeBehaviour::default()
        };
        register_probe(&mut registry, d.clone(), behaviour, &journal).unwrap();
    }
    registry
}

proptest! {
    #[test]
    fn resolved_order_respects_every_edge(descriptors in dag_strategy(10)) {
        let graph = DependencyGraph::from_descriptors(&descriptors).unwrap();
        let order = resolve_order(&graph).unwrap();

        prop_assert_eq!(order.len(), descriptors.len());
        for d in &descriptors {
            let pos = order.iter().position(|id| id == d.id()).unwrap();
            for dep in d.dependencies() {
                let dep_pos = order.iter().position(|id| id == dep).unwrap();
                prop_assert!(dep_pos < pos, "{} must come before {}", dep, d.id());
            }
        }

        // Same input, same order.
        prop_assert_eq!(resolve_order(&graph).unwrap(), order);
    }

    #[test]
    fn closing_a_cycle_is_always_detected(descriptors in dag_strategy(8)) {
        // m0 has no dependencies; make it depend on the first module that
        // (transitively) depends on it, which closes a cycle through m0.
        let graph = DependencyGraph::from_descriptors(&descriptors).unwrap();
        let dependent = descriptors
            .iter()
            .map(|d| d.id().to_string())
            .find(|id| graph.depends_on(id, "m0"));
        prop_assume!(dependent.is_some());
        let dependent = dependent.unwrap();

        let cyclic: Vec<ModuleDescriptor> = descriptors
            .iter()
            .map(|d| if d.id() == "m0" { d.clone().after(&dependent) } else { d.clone() })
            .collect();

        let graph = DependencyGraph::from_descriptors(&cyclic).unwrap();
        match resolve_order(&graph) {
            Err(AnalysisError::CyclicDependency { modules }) => {
                prop_assert!(modules.iter().any(|m| m == "m0"));
                prop_assert!(modules.iter().any(|m| *m == dependent));
            }
            other => prop_assert!(false, "expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn failure_disables_exactly_the_dependents(
        descriptors in dag_strategy(8),
        pick in any::<usize>(),
    ) {
        let failing = descriptors[pick % descriptors.len()].id().to_string();
        let registry = probe_registry(&descriptors, Some(&failing));

        let run = Run::build(&registry, ContextBuilder::new().build()).unwrap();
        let graph = run.graph().clone();
        let completed = run.execute(vec![cast(100), cast(200)]).unwrap();

        for d in &descriptors {
            let id = d.id();
            let failure = completed.failure_of(id);

            if id == failing {
                let is_runtime = matches!(failure, Some(ModuleFailure::Runtime { .. }));
                prop_assert!(is_runtime, "{} should have a runtime failure", id);
            } else if graph.depends_on(id, &failing) {
                match failure {
                    Some(ModuleFailure::DependencyCascade { origin, .. }) => {
                        prop_assert_eq!(origin, &failing);
                    }
                    other => prop_assert!(false, "{} should cascade, got {:?}", id, other),
                }
            } else {
                prop_assert!(failure.is_none(), "{} must be unaffected", id);
                let probe = completed.module::<Probe>(id).unwrap();
                // init + 2 events + complete
                prop_assert_eq!(probe.borrow().delivered(), 4);
            }
        }

        let live: BTreeSet<&str> = completed.faults().live_modules().into_iter().collect();
        for (id, _) in completed.faults().failures() {
            prop_assert!(!live.contains(id));
        }
    }

    #[test]
    fn identical_inputs_give_identical_reports(
        descriptors in dag_strategy(8),
        pick in any::<usize>(),
    ) {
        let failing = descriptors[pick % descriptors.len()].id().to_string();
        let events = vec![cast(100), cast(200), cast(300)];

        let first = encounterdag::engine::analyse(
            &probe_registry(&descriptors, Some(&failing)),
            ContextBuilder::new().build(),
            events.clone(),
        ).unwrap();
        let second = encounterdag::engine::analyse(
            &probe_registry(&descriptors, Some(&failing)),
            ContextBuilder::new().build(),
            events,
        ).unwrap();

        prop_assert_eq!(first.render(), second.render());
        prop_assert_eq!(first.fingerprint(), second.fingerprint());
    }
}
