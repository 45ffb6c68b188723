// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Everything in [`AnalysisError`] is fatal for a run. Failures that the
//! engine contains (a module erroring while handling events) are recorded as
//! [`crate::engine::ModuleFailure`] instead and never surface here.

use thiserror::Error;

use crate::types::ModuleId;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Module registered twice: {0}")]
    DuplicateModule(ModuleId),

    #[error("Module '{module}' has unknown dependency '{dependency}'")]
    UnknownDependency {
        module: ModuleId,
        dependency: ModuleId,
    },

    #[error("Module '{0}' cannot depend on itself")]
    SelfDependency(ModuleId),

    #[error("Module '{module}' lists dependency '{dependency}' more than once")]
    DuplicateDependency {
        module: ModuleId,
        dependency: ModuleId,
    },

    #[error("Module not found: {0}")]
    UnknownModule(ModuleId),

    #[error("Cyclic module dependency involving: {}", .modules.join(", "))]
    CyclicDependency { modules: Vec<ModuleId> },

    #[error("Failed to construct module '{module}': {source:#}")]
    Construction {
        module: ModuleId,
        #[source]
        source: anyhow::Error,
    },

    #[error("Module '{module}' failed to normalize events: {source:#}")]
    Normalization {
        module: ModuleId,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, AnalysisError>;
