// tests/report.rs

mod common;
use crate::common::TestResult;
use crate::common::builders::{ContextBuilder, cast, hit};
use crate::common::probe::{Journal, ProbeBehaviour, plain, register_probe};

use encounterdag::engine::{ModuleFailure, Run, analyse};
use encounterdag::modules::{ModuleDescriptor, ModuleRegistry};
use encounterdag::report::EntryBody;

#[test]
fn healthy_run_reports_every_module_in_priority_order() -> TestResult {
    let journal = Journal::new();
    let mut registry = ModuleRegistry::new();
    plain(&mut registry, ModuleDescriptor::new("A").priority(30), &journal)?;
    plain(&mut registry, ModuleDescriptor::new("B").after("A").priority(10), &journal)?;
    plain(&mut registry, ModuleDescriptor::new("C").after("A").priority(20), &journal)?;

    let report = analyse(
        &registry,
        ContextBuilder::new().build(),
        vec![cast(100), hit(200)],
    )?;

    assert_eq!(report.modules(), vec!["B", "C", "A"]);
    assert_eq!(report.errors().count(), 0);
    for entry in report.entries() {
        match &entry.body {
            EntryBody::Output(payload) => {
                assert_eq!(payload.to_string(), format!("{} saw 4 events", entry.module));
            }
            EntryBody::Error(f) => panic!("unexpected error entry: {f}"),
        }
    }
    Ok(())
}

#[test]
fn equal_priorities_keep_build_order() -> TestResult {
    let journal = Journal::new();
    let mut registry = ModuleRegistry::new();
    plain(&mut registry, ModuleDescriptor::new("late").after("early"), &journal)?;
    plain(&mut registry, ModuleDescriptor::new("early"), &journal)?;
    plain(&mut registry, ModuleDescriptor::new("first").priority(-5), &journal)?;
    plain(&mut registry, ModuleDescriptor::new("other"), &journal)?;

    let run = Run::build(&registry, ContextBuilder::new().build())?;
    assert_eq!(run.order(), vec!["early", "late", "first", "other"]);
    assert_eq!(run.display_order(), vec!["first", "early", "late", "other"]);

    let report = run.execute(vec![cast(1)])?.report();
    assert_eq!(report.modules(), vec!["first", "early", "late", "other"]);
    Ok(())
}

#[test]
fn failed_modules_get_error_placeholders() -> TestResult {
    let journal = Journal::new();
    let mut registry = ModuleRegistry::new();
    register_probe(
        &mut registry,
        ModuleDescriptor::new("A").titled("Module A"),
        ProbeBehaviour::fail_on_delivery(1),
        &journal,
    )?;
    plain(&mut registry, ModuleDescriptor::new("B").after("A"), &journal)?;
    plain(&mut registry, ModuleDescriptor::new("C").after("A"), &journal)?;
    plain(&mut registry, ModuleDescriptor::new("D"), &journal)?;

    let report = analyse(
        &registry,
        ContextBuilder::new().build(),
        vec![cast(100), hit(200)],
    )?;

    assert_eq!(report.len(), 4);
    assert_eq!(report.errors().count(), 3);

    let a = report.entry("A").expect("A entry");
    assert_eq!(a.title, "Module A");
    assert!(matches!(a.failure(), Some(ModuleFailure::Runtime { .. })));

    for id in ["B", "C"] {
        let entry = report.entry(id).expect("cascaded entry");
        assert!(matches!(
            entry.failure(),
            Some(ModuleFailure::DependencyCascade { origin, .. }) if origin == "A"
        ));
    }

    let d = report.entry("D").expect("D entry");
    assert!(!d.is_error());

    let rendered = report.render();
    assert!(rendered.contains("[error] module 'A' failed while handling 'cast' at 100ms"));
    assert!(rendered.contains("[error] module 'B' disabled because dependency 'A' failed"));
    assert!(rendered.contains("D saw 4 events"));
    Ok(())
}

#[test]
fn absent_output_is_skipped_without_error() -> TestResult {
    let journal = Journal::new();
    let mut registry = ModuleRegistry::new();
    plain(&mut registry, ModuleDescriptor::new("loud"), &journal)?;
    register_probe(
        &mut registry,
        ModuleDescriptor::new("quiet"),
        ProbeBehaviour::silent(),
        &journal,
    )?;

    let completed = Run::build(&registry, ContextBuilder::new().build())?
        .execute(vec![cast(100), cast(200)])?;
    let report = completed.report();

    assert_eq!(report.modules(), vec!["loud"]);
    assert!(completed.failure_of("quiet").is_none());
    assert_eq!(journal.matching("quiet:").len(), 4);
    Ok(())
}

#[test]
fn silent_module_that_failed_still_gets_an_entry() -> TestResult {
    let journal = Journal::new();
    let mut registry = ModuleRegistry::new();
    register_probe(
        &mut registry,
        ModuleDescriptor::new("quiet"),
        ProbeBehaviour {
            silent: true,
            fail_on_delivery: Some(0),
            ..ProbeBehaviour::default()
        },
        &journal,
    )?;

    let report = analyse(&registry, ContextBuilder::new().build(), vec![])?;

    assert_eq!(report.modules(), vec!["quiet"]);
    assert!(report.entries()[0].is_error());
    Ok(())
}

#[test]
fn report_generation_is_repeatable() -> TestResult {
    let journal = Journal::new();
    let mut registry = ModuleRegistry::new();
    plain(&mut registry, ModuleDescriptor::new("x").priority(2), &journal)?;
    plain(&mut registry, ModuleDescriptor::new("y").priority(1), &journal)?;
    register_probe(
        &mut registry,
        ModuleDescriptor::new("z").priority(1),
        ProbeBehaviour::fail_on_delivery(1),
        &journal,
    )?;

    let completed = Run::build(&registry, ContextBuilder::new().build())?
        .execute(vec![cast(5), cast(6)])?;

    let first = completed.report();
    let second = completed.report();
    assert_eq!(first.modules(), vec!["y", "z", "x"]);
    assert_eq!(first.modules(), second.modules());
    assert_eq!(first.render(), second.render());
    assert_eq!(first.fingerprint(), second.fingerprint());

    let rerun = analyse(
        &registry,
        ContextBuilder::new().build(),
        vec![cast(5), cast(6)],
    )?;
    assert_eq!(rerun.fingerprint(), first.fingerprint());
    Ok(())
}

#[test]
fn empty_registry_yields_empty_report() -> TestResult {
    let registry = ModuleRegistry::new();
    let report = analyse(&registry, ContextBuilder::new().build(), vec![cast(1)])?;
    assert!(report.is_empty());
    assert_eq!(report.render(), "");
    Ok(())
}
