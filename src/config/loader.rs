// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{AnalysisError, Result};
use crate::event::Event;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a configuration file and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// `Encounterdag.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Encounterdag.toml")
}

#[derive(Debug, Deserialize)]
struct EventFile {
    #[serde(default)]
    event: Vec<Event>,
}

/// Load an event file made of `[[event]]` tables.
///
/// Events are returned in file order. The engine expects ascending
/// timestamps and does not re-sort; out-of-order input is only warned about.
pub fn load_events(path: impl AsRef<Path>) -> Result<Vec<Event>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let file: EventFile = toml::from_str(&contents)?;

    for (i, event) in file.event.iter().enumerate() {
        if event.kind.is_boundary() {
            return Err(AnalysisError::ConfigError(format!(
                "event #{i} in {} uses reserved type '{}'",
                path.display(),
                event.kind
            )));
        }
    }

    if let Some(i) = file
        .event
        .windows(2)
        .position(|w| w[1].timestamp < w[0].timestamp)
    {
        warn!(
            path = %path.display(),
            index = i + 1,
            "events are not sorted by timestamp; they will be processed in file order"
        );
    }

    debug!(path = %path.display(), events = file.event.len(), "loaded events");
    Ok(file.event)
}
