// src/context.rs

//! Shared, read-mostly state visible to every module in a run.

use std::cell::Cell;
use std::collections::BTreeMap;

use crate::event::Event;
use crate::types::{ActorId, Timestamp};

/// Bounds of the recorded encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encounter {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Encounter {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Timestamp {
        self.end.saturating_sub(self.start)
    }
}

/// An actor known to the run.
///
/// `owner` links subordinate entities (pets, summons) to the actor that
/// controls them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: ActorId,
    pub name: Option<String>,
    pub owner: Option<ActorId>,
}

impl Actor {
    pub fn new(id: ActorId) -> Self {
        Self {
            id,
            name: None,
            owner: None,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn owned_by(mut self, owner: ActorId) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// Execution context for a single run.
///
/// The clock is advanced only by the engine: it starts at the encounter start,
/// never moves backwards, and never passes the encounter end.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    encounter: Encounter,
    participant: ActorId,
    actors: BTreeMap<ActorId, Actor>,
    now: Cell<Timestamp>,
}

impl ExecutionContext {
    /// The participant is registered as an actor if `actors` does not
    /// already contain it.
    pub fn new(
        encounter: Encounter,
        participant: ActorId,
        actors: impl IntoIterator<Item = Actor>,
    ) -> Self {
        let mut actors: BTreeMap<ActorId, Actor> =
            actors.into_iter().map(|a| (a.id, a)).collect();
        actors
            .entry(participant)
            .or_insert_with(|| Actor::new(participant));

        Self {
            encounter,
            participant,
            actors,
            now: Cell::new(encounter.start),
        }
    }

    pub fn encounter(&self) -> Encounter {
        self.encounter
    }

    pub fn participant(&self) -> ActorId {
        self.participant
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Current logical time.
    pub fn now(&self) -> Timestamp {
        self.now.get()
    }

    /// Time elapsed since the encounter start.
    pub fn relative(&self, timestamp: Timestamp) -> Timestamp {
        timestamp.saturating_sub(self.encounter.start)
    }

    /// Move the clock to `timestamp`, clamped to the encounter end.
    ///
    /// Returns the clock value after the move.
    pub(crate) fn advance_to(&self, timestamp: Timestamp) -> Timestamp {
        let clamped = timestamp.min(self.encounter.end);
        if clamped > self.now.get() {
            self.now.set(clamped);
        }
        self.now.get()
    }

    pub(crate) fn reset_clock(&self) {
        self.now.set(self.encounter.start);
    }

    /// Actors directly owned by `owner`.
    pub fn subordinates_of(&self, owner: ActorId) -> impl Iterator<Item = ActorId> + '_ {
        self.actors
            .values()
            .filter(move |a| a.owner == Some(owner))
            .map(|a| a.id)
    }

    /// Whether `id` is `actor` itself or (transitively) owned by it.
    pub fn is_or_owned_by(&self, id: ActorId, actor: ActorId) -> bool {
        let mut current = id;
        // Bounded walk; owner chains in valid data are short and acyclic.
        for _ in 0..=self.actors.len() {
            if current == actor {
                return true;
            }
            match self.actors.get(&current).and_then(|a| a.owner) {
                Some(owner) => current = owner,
                None => return false,
            }
        }
        false
    }

    pub fn by(&self, event: &Event, actor: ActorId) -> bool {
        event.source == Some(actor)
    }

    pub fn to(&self, event: &Event, actor: ActorId) -> bool {
        event.target == Some(actor)
    }

    pub fn by_or_subordinate(&self, event: &Event, actor: ActorId) -> bool {
        event
            .source
            .is_some_and(|source| self.is_or_owned_by(source, actor))
    }

    pub fn to_or_subordinate(&self, event: &Event, actor: ActorId) -> bool {
        event
            .target
            .is_some_and(|target| self.is_or_owned_by(target, actor))
    }

    /// Event originates from the participant or one of its subordinates.
    pub fn by_participant(&self, event: &Event) -> bool {
        self.by_or_subordinate(event, self.participant)
    }

    /// Event targets the participant or one of its subordinates.
    pub fn to_participant(&self, event: &Event) -> bool {
        self.to_or_subordinate(event, self.participant)
    }
}
