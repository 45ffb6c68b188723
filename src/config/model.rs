// src/config/model.rs

use serde::Deserialize;

use crate::context::{Actor, Encounter, ExecutionContext};
use crate::types::{ActorId, Timestamp};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [encounter]
/// start = 0
/// end = 60000
///
/// [participant]
/// id = 1
///
/// [[actor]]
/// id = 2
/// name = "Carbuncle"
/// owner = 1
///
/// [modules]
/// select = ["summary"]
/// events = "events.toml"
/// ```
///
/// This is the unchecked form; see [`ConfigFile`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    pub encounter: EncounterSection,

    pub participant: ParticipantSection,

    /// Other actors of the encounter, from `[[actor]]`.
    #[serde(default, rename = "actor")]
    pub actors: Vec<ActorConfig>,

    #[serde(default)]
    pub modules: ModulesSection,
}

/// `[encounter]` section; timestamps in milliseconds.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EncounterSection {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// `[participant]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantSection {
    pub id: ActorId,

    #[serde(default)]
    pub name: Option<String>,
}

/// `[[actor]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ActorConfig {
    pub id: ActorId,

    #[serde(default)]
    pub name: Option<String>,

    /// Controlling actor, for pets and other subordinate entities.
    #[serde(default)]
    pub owner: Option<ActorId>,
}

/// `[modules]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModulesSection {
    /// Modules to run. Their dependencies are pulled in automatically.
    /// If `None`, every registered module runs.
    #[serde(default)]
    pub select: Option<Vec<String>>,

    /// Event file, relative to the config file's directory.
    #[serde(default)]
    pub events: Option<String>,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see
/// [`crate::config::validate`]).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub encounter: EncounterSection,
    pub participant: ParticipantSection,
    pub actors: Vec<ActorConfig>,
    pub modules: ModulesSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            encounter: raw.encounter,
            participant: raw.participant,
            actors: raw.actors,
            modules: raw.modules,
        }
    }

    /// Fresh execution context for one run.
    ///
    /// A participant listed under `[[actor]]` keeps that entry's name and
    /// owner; `[participant].name` fills in a missing name.
    pub fn context(&self) -> ExecutionContext {
        let mut actors: Vec<Actor> = self
            .actors
            .iter()
            .map(|a| Actor {
                id: a.id,
                name: a.name.clone(),
                owner: a.owner,
            })
            .collect();

        match actors.iter_mut().find(|a| a.id == self.participant.id) {
            Some(listed) => {
                if listed.name.is_none() {
                    listed.name = self.participant.name.clone();
                }
            }
            None => actors.push(Actor {
                id: self.participant.id,
                name: self.participant.name.clone(),
                owner: None,
            }),
        }

        ExecutionContext::new(
            Encounter::new(self.encounter.start, self.encounter.end),
            self.participant.id,
            actors,
        )
    }
}
