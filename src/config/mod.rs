// src/config/mod.rs

//! Run configuration: encounter bounds, participant, actors, module
//! selection.
//!
//! - [`model`] mirrors the TOML layout.
//! - [`validate`] turns a raw file into a checked [`ConfigFile`].
//! - [`loader`] reads config and event files from disk.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_events, load_from_path};
pub use model::{
    ActorConfig, ConfigFile, EncounterSection, ModulesSection, ParticipantSection, RawConfigFile,
};
