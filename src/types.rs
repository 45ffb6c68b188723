// src/types.rs

//! Primitive identifiers shared across the crate.

/// Canonical module identifier type used throughout the engine.
pub type ModuleId = String;

/// Milliseconds, in the same time base as the recorded log.
pub type Timestamp = u64;

/// Identifier of an actor (player, pet, enemy) in the recorded log.
pub type ActorId = u32;
