// src/lib.rs

pub mod cli;
pub mod config;
pub mod context;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod event;
pub mod logging;
pub mod modules;
pub mod report;
pub mod types;

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_and_validate, load_events};
use crate::engine::Run;
use crate::modules::ModuleRegistry;
use crate::report::Report;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - module registration (built-ins, narrowed by `--select` or
///   `[modules].select`)
/// - event loading
/// - building and executing the run, then printing the report
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config;
    let cfg = load_and_validate(&config_path)?;
    let registry = if args.select.is_empty() {
        registry_for(&cfg)?
    } else {
        info!(select = ?args.select, "narrowing modules to CLI selection");
        builtin_registry()?.select(&args.select)?
    };

    if args.dry_run {
        print_dry_run(&cfg, &registry)?;
        return Ok(());
    }

    let events_path = match (args.events, &cfg.modules.events) {
        (Some(cli), _) => cli,
        (None, Some(from_cfg)) => config_root_dir(&config_path).join(from_cfg),
        (None, None) => bail!("no event file given (use --events or [modules].events)"),
    };

    let report = analyse_files(&cfg, &registry, &events_path)?;

    println!("{report}");
    println!();
    println!("fingerprint: {}", report.fingerprint());
    Ok(())
}

/// Registry holding every built-in module.
pub fn builtin_registry() -> errors::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::builtin::register_all(&mut registry)?;
    Ok(registry)
}

/// Built-in registry, narrowed to the configured selection.
pub fn registry_for(cfg: &ConfigFile) -> errors::Result<ModuleRegistry> {
    let registry = builtin_registry()?;

    match &cfg.modules.select {
        Some(select) => {
            info!(?select, "narrowing modules to selection");
            registry.select(select)
        }
        None => Ok(registry),
    }
}

/// Load events from `events_path` and analyse them with `registry`.
pub fn analyse_files(
    cfg: &ConfigFile,
    registry: &ModuleRegistry,
    events_path: &Path,
) -> errors::Result<Report> {
    let events = load_events(events_path)?;
    engine::analyse(registry, cfg.context(), events)
}

/// Directory the config lives in; bare filenames resolve against the
/// current working directory.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Print the encounter and the resolved module order without running.
fn print_dry_run(cfg: &ConfigFile, registry: &ModuleRegistry) -> Result<()> {
    let run = Run::build(registry, cfg.context())?;

    println!("encounterdag dry-run");
    println!(
        "  encounter = {}..{} ms",
        cfg.encounter.start, cfg.encounter.end
    );
    println!("  participant = {}", cfg.participant.id);
    println!();

    println!("modules ({}), in execution order:", run.order().len());
    for id in run.order() {
        println!("  - {id}");
        let deps = run.graph().dependencies_of(id);
        if !deps.is_empty() {
            println!("      after: {:?}", deps);
        }
        if let Some(d) = registry.descriptor(id) {
            println!("      priority: {}", d.display_priority());
        }
    }

    println!();
    println!("report order: {:?}", run.display_order());

    debug!("dry-run complete (no analysis)");
    Ok(())
}
