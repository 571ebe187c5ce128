//! Stacking target debuffs with periodic decay.
//!
//! Two independent families, Scorch and Winter's Chill, each hold up to
//! five stacks and a 30-second timer that every refresh resets. A single
//! decay process ages both timers down once per simulated second,
//! unconditionally: decay never skips a beat just because nothing was
//! refreshed. When a family's timer reaches zero its stacks reset to zero
//! in the same step.
//!
//! The Ignite tick formula reads the Scorch stack count as a damage
//! multiplier; Winter's Chill is tracked for parity with the combat model
//! but nothing in the core consumes it.

use hourglass::{Process, SimTime, Step};

use crate::error::SimError;
use crate::world::World;

/// Seconds a debuff family persists after its latest refresh.
pub const DEBUFF_DURATION: SimTime = 30.0;
/// Maximum stacks per family.
pub const MAX_STACKS: u8 = 5;
/// Interval between decay steps.
pub const DECAY_PERIOD: SimTime = 1.0;

/// One stacking debuff family: a capped stack count plus a decay timer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StackedDebuff {
    stacks: u8,
    timer: SimTime,
}

impl StackedDebuff {
    /// Adds a stack (capped at [`MAX_STACKS`]) and resets the timer.
    pub fn refresh(&mut self) {
        self.stacks = (self.stacks + 1).min(MAX_STACKS);
        self.timer = DEBUFF_DURATION;
    }

    /// Ages the timer by one second; at zero the stacks clear.
    pub fn decay_step(&mut self) {
        self.timer = (self.timer - 1.0).max(0.0);
        if self.timer == 0.0 {
            self.stacks = 0;
        }
    }

    /// Current stack count.
    #[must_use]
    pub fn stacks(&self) -> u8 {
        self.stacks
    }

    /// Remaining seconds before full decay.
    #[must_use]
    pub fn timer(&self) -> SimTime {
        self.timer
    }
}

/// The two debuff families on the simulated target.
#[derive(Debug, Clone, Default)]
pub struct DebuffTracker {
    scorch: StackedDebuff,
    winter_chill: StackedDebuff,
}

impl DebuffTracker {
    /// Creates a tracker with no stacks on either family.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a Scorch application.
    pub fn refresh_scorch(&mut self) {
        self.scorch.refresh();
    }

    /// Registers a Winter's Chill application.
    pub fn refresh_winter_chill(&mut self) {
        self.winter_chill.refresh();
    }

    /// Current Scorch stacks, consumed by the Ignite damage formula.
    #[must_use]
    pub fn scorch_stacks(&self) -> u8 {
        self.scorch.stacks()
    }

    /// Current Winter's Chill stacks.
    #[must_use]
    pub fn winter_chill_stacks(&self) -> u8 {
        self.winter_chill.stacks()
    }

    /// Read access to the Scorch family for tests and reporting.
    #[must_use]
    pub fn scorch(&self) -> &StackedDebuff {
        &self.scorch
    }

    /// Read access to the Winter's Chill family.
    #[must_use]
    pub fn winter_chill(&self) -> &StackedDebuff {
        &self.winter_chill
    }

    /// Ages both families by one second.
    ///
    /// Both families decay against their own timer, so each stack gets
    /// the full 30-second window.
    pub fn decay_step(&mut self) {
        self.scorch.decay_step();
        self.winter_chill.decay_step();
    }
}

/// Perpetual process aging both debuff families once per simulated second.
///
/// The first resume only suspends: decay steps land at `t = 1, 2, 3, ...`,
/// never at the spawn instant, so a refresh at `t = 0` keeps its full
/// 30-second window. Wakes are scheduled by whole-second index rather than
/// by accumulating deltas, keeping them exactly on integer times.
#[derive(Debug, Default)]
pub struct DecayProcess {
    /// Completed wakes; the next wake is at `wakes` seconds after spawn.
    wakes: u64,
}

impl DecayProcess {
    /// Creates the decay process.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Process<World> for DecayProcess {
    type Error = SimError;

    fn label(&self) -> &'static str {
        "debuff_decay"
    }

    fn resume(&mut self, world: &mut World, now: SimTime) -> Result<Step, SimError> {
        if self.wakes > 0 {
            world.debuffs.decay_step();
            tracing::trace!(
                t = now,
                scorch = world.debuffs.scorch_stacks(),
                winter_chill = world.debuffs.winter_chill_stacks(),
                "debuff decay step"
            );
        }
        self.wakes += 1;
        #[allow(clippy::cast_precision_loss)]
        let next = self.wakes as f64 * DECAY_PERIOD;
        Ok(Step::Sleep(next - now))
    }
}
