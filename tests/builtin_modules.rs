// tests/builtin_modules.rs

mod common;
use crate::common::TestResult;
use crate::common::builders::{ContextBuilder, ENEMY, cast, hit, pet_cast};
use crate::common::init_tracing;

use encounterdag::engine::Run;
use encounterdag::event::Event;
use encounterdag::modules::ModuleRegistry;
use encounterdag::modules::builtin::{self, Activity, Dedupe, EventCounts, Summary, format_duration};

fn builtin_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    builtin::register_all(&mut registry).expect("built-ins register cleanly");
    registry
}

fn encounter_events() -> Vec<Event> {
    vec![
        cast(1_000),
        cast(1_000),
        pet_cast(2_000),
        hit(3_000),
        cast(31_000),
        Event::new("cast", 40_000).with_source(ENEMY),
    ]
}

#[test]
fn builtins_resolve_in_dependency_order() -> TestResult {
    let run = Run::build(&builtin_registry(), ContextBuilder::new().build())?;
    assert_eq!(
        run.order(),
        vec!["dedupe", "event_counts", "activity", "summary"]
    );
    assert_eq!(
        run.display_order(),
        vec!["summary", "activity", "event_counts", "dedupe"]
    );
    Ok(())
}

#[test]
fn builtins_analyse_an_encounter() -> TestResult {
    init_tracing();
    let completed = Run::build(&builtin_registry(), ContextBuilder::new().build())?
        .execute(encounter_events())?;

    let dedupe = completed.module::<Dedupe>("dedupe").expect("dedupe");
    assert_eq!(dedupe.borrow().removed(), 1);

    let counts = completed.module::<EventCounts>("event_counts").expect("counts");
    assert_eq!(counts.borrow().outgoing("cast"), 3);
    assert_eq!(counts.borrow().incoming("damage"), 1);
    assert_eq!(counts.borrow().actions(), 3);

    let activity = completed.module::<Activity>("activity").expect("activity");
    assert_eq!(activity.borrow().first(), Some(1_000));
    assert_eq!(activity.borrow().last(), Some(31_000));
    assert_eq!(activity.borrow().finished_at(), Some(40_000));
    assert!((activity.borrow().active_share() - 0.5).abs() < 1e-9);

    let summary = completed.module::<Summary>("summary").expect("summary");
    assert!((summary.borrow().actions_per_minute() - 3.0).abs() < 1e-9);

    let report = completed.report();
    assert_eq!(report.modules(), vec!["summary", "activity", "event_counts"]);
    assert_eq!(
        report.render(),
        [
            "Summary\n  3 actions over 1:00.000 (3.0 per minute, 0:30.000 active)",
            "Activity\n  active from 0:01.000 to 0:31.000 (50.0% of encounter)",
            "Event counts\n  out cast: 3\n  in  damage: 1",
        ]
        .join("\n\n")
    );
    Ok(())
}

#[test]
fn activity_without_participant_actions_has_no_entry() -> TestResult {
    let completed = Run::build(&builtin_registry(), ContextBuilder::new().build())?
        .execute(vec![Event::new("cast", 500).with_source(ENEMY)])?;

    let report = completed.report();
    assert_eq!(report.modules(), vec!["summary"]);
    Ok(())
}

#[test]
fn selection_keeps_only_what_is_needed() -> TestResult {
    let registry = builtin_registry().select(&["activity"])?;
    let run = Run::build(&registry, ContextBuilder::new().build())?;
    assert_eq!(run.order(), vec!["dedupe", "activity"]);
    Ok(())
}

#[test]
fn durations_are_formatted_as_minutes_seconds_millis() {
    assert_eq!(format_duration(0), "0:00.000");
    assert_eq!(format_duration(61_005), "1:01.005");
    assert_eq!(format_duration(600_000), "10:00.000");
}
