//! Actors and the roster.
//!
//! An [`Actor`] is a damage-dealing combatant as the tick formula sees it:
//! a display name for trace output plus the `empowered` damage-multiplier
//! flag. Everything else about an actor (rotation, casts, crits) lives in
//! host code; the core only ever reads these two fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an actor in the roster.
///
/// `ActorId` is a newtype around `u32`. IDs are assigned sequentially by
/// the [`Roster`] and ordered by their numeric value, which gives damage
/// summaries a deterministic iteration order.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates an `ActorId` from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw `u32` value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({})", self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A damage-dealing combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Display name used in trace output.
    pub name: String,
    /// Whether the actor carries the 10% damage-multiplier buff that the
    /// tick formula double-dips on.
    pub empowered: bool,
}

impl Actor {
    /// Creates an actor without the damage-multiplier buff.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            empowered: false,
        }
    }

    /// Creates an actor carrying the damage-multiplier buff.
    #[must_use]
    pub fn empowered(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            empowered: true,
        }
    }
}

/// Append-only actor table.
///
/// Actors are never removed; IDs stay valid for the life of the simulation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    actors: Vec<Actor>,
}

impl Roster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self { actors: Vec::new() }
    }

    /// Adds an actor, returning its assigned ID.
    #[allow(clippy::cast_possible_truncation)] // rosters are tiny
    pub fn add(&mut self, actor: Actor) -> ActorId {
        let id = ActorId::new(self.actors.len() as u32);
        self.actors.push(actor);
        id
    }

    /// Adds several actors at once, returning their IDs in order.
    pub fn add_all(&mut self, actors: impl IntoIterator<Item = Actor>) -> Vec<ActorId> {
        actors.into_iter().map(|a| self.add(a)).collect()
    }

    /// Looks up an actor by ID.
    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.as_u32() as usize)
    }

    /// Number of actors in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Returns true if no actors have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Iterates over `(id, actor)` pairs in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (ActorId, &Actor)> + '_ {
        self.actors
            .iter()
            .enumerate()
            .map(|(i, a)| (ActorId::new(u32::try_from(i).unwrap_or(u32::MAX)), a))
    }
}
