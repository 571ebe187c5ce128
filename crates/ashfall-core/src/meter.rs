//! Damage statistics collector.
//!
//! The meter records `(actor, amount)` pairs as the tick process emits
//! them. Totals are keyed by `ActorId` in a `BTreeMap` so summaries
//! iterate in a deterministic order.

use std::collections::BTreeMap;

use hourglass::SimTime;

use crate::actor::ActorId;

/// Per-actor damage totals.
#[derive(Debug, Clone, Default)]
pub struct DamageMeter {
    totals: BTreeMap<ActorId, u64>,
}

impl DamageMeter {
    /// Creates an empty meter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a damage event for an actor.
    pub fn register(&mut self, actor: ActorId, amount: u64) {
        *self.totals.entry(actor).or_insert(0) += amount;
    }

    /// Total damage recorded for an actor (zero if never seen).
    #[must_use]
    pub fn total(&self, actor: ActorId) -> u64 {
        self.totals.get(&actor).copied().unwrap_or(0)
    }

    /// Sum of all recorded damage.
    #[must_use]
    pub fn grand_total(&self) -> u64 {
        self.totals.values().sum()
    }

    /// Damage per second for an actor over an elapsed duration.
    ///
    /// Returns 0 for a non-positive duration rather than dividing by zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn dps(&self, actor: ActorId, elapsed: SimTime) -> f64 {
        if elapsed <= 0.0 {
            return 0.0;
        }
        self.total(actor) as f64 / elapsed
    }

    /// Iterates `(actor, total)` pairs in actor-ID order.
    pub fn totals(&self) -> impl Iterator<Item = (ActorId, u64)> + '_ {
        self.totals.iter().map(|(id, total)| (*id, *total))
    }
}
