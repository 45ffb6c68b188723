// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{AnalysisError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = AnalysisError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_encounter(cfg)?;
    validate_actors(cfg)?;
    validate_module_selection(cfg)?;
    Ok(())
}

fn validate_encounter(cfg: &RawConfigFile) -> Result<()> {
    if cfg.encounter.end < cfg.encounter.start {
        return Err(AnalysisError::ConfigError(format!(
            "[encounter].end ({}) must not be before [encounter].start ({})",
            cfg.encounter.end, cfg.encounter.start
        )));
    }
    Ok(())
}

fn validate_actors(cfg: &RawConfigFile) -> Result<()> {
    let mut ids = HashSet::new();

    for actor in &cfg.actors {
        if !ids.insert(actor.id) {
            return Err(AnalysisError::ConfigError(format!(
                "actor {} is declared more than once",
                actor.id
            )));
        }
    }

    // An unlisted participant is still a valid owner.
    ids.insert(cfg.participant.id);

    for actor in &cfg.actors {
        if let Some(owner) = actor.owner {
            if owner == actor.id {
                return Err(AnalysisError::ConfigError(format!(
                    "actor {} cannot own itself",
                    actor.id
                )));
            }
            if !ids.contains(&owner) {
                return Err(AnalysisError::ConfigError(format!(
                    "actor {} has unknown owner {}",
                    actor.id, owner
                )));
            }
        }
    }

    Ok(())
}

fn validate_module_selection(cfg: &RawConfigFile) -> Result<()> {
    if let Some(select) = &cfg.modules.select {
        if select.is_empty() {
            return Err(AnalysisError::ConfigError(
                "[modules].select must name at least one module (omit it to run all)".to_string(),
            ));
        }
    }
    Ok(())
}
