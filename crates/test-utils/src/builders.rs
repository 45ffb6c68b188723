#![allow(dead_code)]

use encounterdag::context::{Actor, Encounter, ExecutionContext};
use encounterdag::event::Event;
use encounterdag::types::{ActorId, Timestamp};

/// Participant id used by every builder in this module.
pub const PLAYER: ActorId = 1;
/// A pet owned by [`PLAYER`].
pub const PET: ActorId = 2;
/// Someone unrelated to the participant.
pub const ENEMY: ActorId = 100;

/// Builder for `ExecutionContext` to simplify test setup.
pub struct ContextBuilder {
    encounter: Encounter,
    participant: ActorId,
    actors: Vec<Actor>,
}

impl ContextBuilder {
    /// Encounter from 0 to 60s, with [`PLAYER`], its [`PET`] and an [`ENEMY`].
    pub fn new() -> Self {
        Self {
            encounter: Encounter::new(0, 60_000),
            participant: PLAYER,
            actors: vec![
                Actor::new(PLAYER).named("Player"),
                Actor::new(PET).named("Pet").owned_by(PLAYER),
                Actor::new(ENEMY).named("Boss"),
            ],
        }
    }

    pub fn encounter(mut self, start: Timestamp, end: Timestamp) -> Self {
        self.encounter = Encounter::new(start, end);
        self
    }

    pub fn participant(mut self, id: ActorId) -> Self {
        self.participant = id;
        self
    }

    pub fn actor(mut self, actor: Actor) -> Self {
        self.actors.push(actor);
        self
    }

    pub fn build(self) -> ExecutionContext {
        ExecutionContext::new(self.encounter, self.participant, self.actors)
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `cast` by the player on the enemy.
pub fn cast(timestamp: Timestamp) -> Event {
    Event::new("cast", timestamp).with_source(PLAYER).with_target(ENEMY)
}

/// `damage` from the enemy to the player.
pub fn hit(timestamp: Timestamp) -> Event {
    Event::new("damage", timestamp).with_source(ENEMY).with_target(PLAYER)
}

/// `cast` by the player's pet on the enemy.
pub fn pet_cast(timestamp: Timestamp) -> Event {
    Event::new("cast", timestamp).with_source(PET).with_target(ENEMY)
}

/// `n` player casts spaced `step` ms apart, starting at `start`.
pub fn casts(n: usize, start: Timestamp, step: Timestamp) -> Vec<Event> {
    (0..n as u64).map(|i| cast(start + i * step)).collect()
}
