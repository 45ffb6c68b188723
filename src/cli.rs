// src/cli.rs

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Run dependency-ordered analysis modules over one participant's events in
/// a recorded encounter.
#[derive(Debug, Clone, Parser)]
#[command(name = "encounterdag", version, long_about = None)]
pub struct CliArgs {
    /// Encounter config (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Event file (TOML, `[[event]]` tables). Overrides `[modules].events`.
    #[arg(long, value_name = "PATH")]
    pub events: Option<PathBuf>,

    /// Run only these modules (and what they depend on). Overrides
    /// `[modules].select`; may be repeated or comma-separated.
    #[arg(long, value_name = "MODULE", value_delimiter = ',')]
    pub select: Vec<String>,

    /// Log level; falls back to `ENCOUNTERDAG_LOG`, then `info`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate the config and print the resolved module order without
    /// analysing anything.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
