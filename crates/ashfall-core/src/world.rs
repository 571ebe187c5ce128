//! Shared world state for the simulation's processes.
//!
//! The [`World`] is owned by the scheduler; the decay, monitor, and tick
//! processes plus external refresh calls are its only mutators, and all of
//! them run cooperatively on one logical thread. Components own their own
//! state (the debuff tracker owns the stack families, the Ignite engine
//! owns the effect) and cross-component access is read-only (the tick
//! formula reads Scorch stacks, nothing more).

use hourglass::SimTime;

use crate::actor::Roster;
use crate::config::SimConfig;
use crate::debuffs::DebuffTracker;
use crate::error::SimError;
use crate::ignite::{
    IgniteState, DOUBLE_DIP_MULTIPLIER, SCORCH_BONUS_PER_STACK, TICK_COEFFICIENT,
};
use crate::meter::DamageMeter;

/// All state shared by the simulation's processes.
#[derive(Debug)]
pub struct World {
    /// Immutable run configuration.
    pub config: SimConfig,
    /// Actor table.
    pub roster: Roster,
    /// Scorch and Winter's Chill stack families.
    pub debuffs: DebuffTracker,
    /// The Ignite effect.
    pub ignite: IgniteState,
    /// Damage statistics collector.
    pub meter: DamageMeter,
}

impl World {
    /// Creates a world with empty roster and no active effects.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            roster: Roster::new(),
            debuffs: DebuffTracker::new(),
            ignite: IgniteState::new(),
            meter: DamageMeter::new(),
        }
    }

    /// Emits one Ignite damage tick at simulated time `now`.
    ///
    /// The tick amount is the accrued damage scaled by the tick
    /// coefficient, then double-dipped multiplicatively on Curse of the
    /// Elements, Scorch stacks, and the owner's empowerment buff, and
    /// finally truncated to an integer. The amount is appended to the tick
    /// history, forwarded to the meter, and traced with time, owner, stack
    /// count, and damage.
    ///
    /// # Errors
    ///
    /// [`SimError::Invariant`] if called while the effect has no owner;
    /// [`SimError::UnknownActor`] if the owner is not in the roster.
    pub fn emit_ignite_tick(&mut self, now: SimTime) -> Result<(), SimError> {
        let owner = self
            .ignite
            .owner()
            .ok_or_else(|| SimError::Invariant("tick emission with no owner".into()))?;
        let actor = self
            .roster
            .get(owner)
            .ok_or(SimError::UnknownActor(owner))?;

        let mut amount = self.ignite.cumulative_damage() * TICK_COEFFICIENT;
        if self.config.curse_of_elements {
            amount *= DOUBLE_DIP_MULTIPLIER;
        }
        amount *= 1.0 + f64::from(self.debuffs.scorch_stacks()) * SCORCH_BONUS_PER_STACK;
        if actor.empowered {
            amount *= DOUBLE_DIP_MULTIPLIER;
        }
        // Integer truncation, not rounding.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let amount = amount as u64;

        tracing::info!(
            t = now,
            owner = %actor.name,
            stacks = self.ignite.stacks(),
            amount,
            "ignite tick"
        );
        self.meter.register(owner, amount);
        self.ignite.record_tick(amount);
        Ok(())
    }
}
