//! The Ignite damage-over-time engine.
//!
//! Ignite is a refreshable, stacking DoT with two cooperating processes:
//!
//! - The **monitor** polls every 0.1 s, dropping the effect once no refresh
//!   has landed for more than 4.15 s and accounting active uptime.
//! - The **tick** process emits a damage tick every 2.0 s while the effect
//!   is active. The interesting part is the race it has to resolve: a full
//!   expire-and-reapply can happen *during* its two-second wait. The
//!   process captures the effect's epoch before sleeping and compares it on
//!   resume: a changed epoch means the tick it was waiting for belongs to
//!   a dead application, so instead of emitting it realigns to the new
//!   application's cadence with a corrective wait.
//!
//! Refreshes onto an *already active* effect do not bump the epoch: they
//! intentionally do not invalidate a mid-flight tick. Only a fresh
//! acquisition after a full drop does.
//!
//! All interleaving happens at scheduler suspension boundaries; within one
//! resume the state reads and writes here are atomic with respect to the
//! monitor, the decay process, and external refresh calls.

use hourglass::{Process, SimTime, Step};
use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::error::SimError;
use crate::world::World;

/// Base interval between damage ticks.
pub const TICK_INTERVAL: SimTime = 2.0;
/// Monitor and idle-poll interval.
pub const POLL_INTERVAL: SimTime = 0.1;
/// The effect drops once this long passes without a refresh.
pub const STALE_AFTER: SimTime = 4.15;
/// Fraction of accrued damage dealt per tick.
pub const TICK_COEFFICIENT: f64 = 0.2;
/// Maximum Ignite stacks; the cap on damage contributions.
pub const MAX_STACKS: u8 = 5;
/// Additional multiplier per Scorch stack (double-dip).
pub const SCORCH_BONUS_PER_STACK: f64 = 0.03;
/// Multiplier for Curse of the Elements and the empowerment buff, each of
/// which Ignite double-dips on.
pub const DOUBLE_DIP_MULTIPLIER: f64 = 1.10;

const POLLS_PER_SECOND: f64 = 10.0;

/// Absolute time of poll index `n`.
///
/// Computed by division rather than by summing [`POLL_INTERVAL`]: repeated
/// addition of the inexact `0.1` drifts off the decisecond grid, and a
/// horizon written as a decimal literal (`run_until(4.2)`) would then miss
/// the poll scheduled a few ulps past it.
fn poll_time(n: u64) -> SimTime {
    #[allow(clippy::cast_precision_loss)]
    let n = n as f64;
    n / POLLS_PER_SECOND
}

/// Index of the first poll grid point strictly after `now`.
fn next_poll_index(now: SimTime) -> u64 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mut n = (now * POLLS_PER_SECOND).floor() as u64 + 1;
    // The product can round to either side of an integer when `now` sits
    // on the grid; a zero-length sleep here would wake at the same instant
    // forever.
    if poll_time(n) <= now {
        n += 1;
    }
    n
}

// =============================================================================
// Effect state
// =============================================================================

/// Accrued state of the Ignite effect.
///
/// Owned exclusively by the simulation world; mutated only by `refresh`
/// (external combat actions), the monitor process, and the tick process,
/// all of which run cooperatively on one logical thread.
#[derive(Debug, Clone, Default)]
pub struct IgniteState {
    /// Actor currently credited with the effect; `None` means inactive.
    owner: Option<ActorId>,
    /// Base damage accrued across refreshes, reset when the effect drops.
    cumulative_damage: f64,
    /// Stack count in `[0, 5]`; the 5th stack is the last to add damage.
    stacks: u8,
    /// Simulated time of the most recent refresh; staleness reference.
    last_refresh: Option<SimTime>,
    /// Activation-lifetime counter. Incremented only on the
    /// inactive-to-active transition, never on refreshes of a live effect.
    epoch: u64,
    /// Emitted tick amounts, append-only.
    ticks: Vec<u64>,
    /// Total simulated time the effect has been active.
    uptime: SimTime,
}

impl IgniteState {
    /// Creates an inactive effect.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a refresh from `actor` contributing `damage`.
    ///
    /// Acquires ownership (and bumps the epoch) when the effect is
    /// inactive. Always records the refresh time. Damage and a stack are
    /// added only while under the cap: at most [`MAX_STACKS`] contributions
    /// accumulate per activation lifetime.
    pub fn refresh(&mut self, actor: ActorId, damage: f64, now: SimTime) {
        if self.owner.is_none() {
            self.owner = Some(actor);
            self.epoch += 1;
            tracing::debug!(t = now, owner = %actor, epoch = self.epoch, "ignite acquired");
        }
        self.last_refresh = Some(now);
        if self.stacks < MAX_STACKS {
            self.cumulative_damage += damage;
            self.stacks += 1;
        }
    }

    /// Clears owner, accrued damage, and stacks. The epoch and the emitted
    /// tick history persist across drops.
    pub fn drop_effect(&mut self) {
        self.owner = None;
        self.cumulative_damage = 0.0;
        self.stacks = 0;
    }

    /// True iff the effect currently has an owner.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.owner.is_some()
    }

    /// Current owner, if any.
    #[must_use]
    pub fn owner(&self) -> Option<ActorId> {
        self.owner
    }

    /// Accrued base damage.
    #[must_use]
    pub fn cumulative_damage(&self) -> f64 {
        self.cumulative_damage
    }

    /// Current stack count.
    #[must_use]
    pub fn stacks(&self) -> u8 {
        self.stacks
    }

    /// Time of the most recent refresh.
    #[must_use]
    pub fn last_refresh(&self) -> Option<SimTime> {
        self.last_refresh
    }

    /// Current activation epoch.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Emitted tick amounts in emission order.
    #[must_use]
    pub fn ticks(&self) -> &[u64] {
        &self.ticks
    }

    /// Total active time accounted by the monitor.
    #[must_use]
    pub fn uptime(&self) -> SimTime {
        self.uptime
    }

    /// Records an emitted tick amount.
    pub(crate) fn record_tick(&mut self, amount: u64) {
        self.ticks.push(amount);
    }

    /// Advances the uptime accumulator by one monitor interval.
    pub(crate) fn accrue_uptime(&mut self) {
        self.uptime += POLL_INTERVAL;
    }

    /// Defensive invariant check; a failure here is a logic defect, not a
    /// recoverable condition.
    ///
    /// # Errors
    ///
    /// [`SimError::Invariant`] when the stack count escapes `[0, 5]` or an
    /// active effect has no recorded refresh time.
    pub fn check_invariants(&self) -> Result<(), SimError> {
        if self.stacks > MAX_STACKS {
            return Err(SimError::Invariant(format!(
                "ignite stacks {} above cap {MAX_STACKS}",
                self.stacks
            )));
        }
        if self.is_active() && self.last_refresh.is_none() {
            return Err(SimError::Invariant(
                "active ignite with no refresh timestamp".into(),
            ));
        }
        Ok(())
    }

    /// Builds the end-of-run summary.
    ///
    /// # Errors
    ///
    /// [`SimError::EmptyReport`] when no tick was emitted (the average is
    /// undefined); [`SimError::Config`] when `total_elapsed` is not a
    /// positive finite duration.
    pub fn report(&self, total_elapsed: SimTime) -> Result<IgniteReport, SimError> {
        if !total_elapsed.is_finite() || total_elapsed <= 0.0 {
            return Err(SimError::Config(format!(
                "report requires positive elapsed time, got {total_elapsed}"
            )));
        }
        if self.ticks.is_empty() {
            return Err(SimError::EmptyReport);
        }
        #[allow(clippy::cast_precision_loss)]
        let average_tick =
            self.ticks.iter().map(|&t| t as f64).sum::<f64>() / self.ticks.len() as f64;
        Ok(IgniteReport {
            uptime_fraction: self.uptime / total_elapsed,
            average_tick,
        })
    }
}

/// End-of-run Ignite summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IgniteReport {
    /// Active time divided by total elapsed simulated time.
    pub uptime_fraction: f64,
    /// Mean of the emitted tick amounts.
    pub average_tick: f64,
}

// =============================================================================
// Monitor process
// =============================================================================

/// Perpetual staleness monitor.
///
/// Every 0.1 s: drop the effect if the last refresh is more than
/// [`STALE_AFTER`] seconds old, then credit 0.1 s of uptime if the effect
/// is (still) active. The drop check runs first, so the interval in which
/// the drop is detected contributes no uptime.
///
/// Wakes are scheduled by poll index, keeping every wake exactly on the
/// decisecond grid.
#[derive(Debug, Default)]
pub struct MonitorProcess {
    /// Completed polls; the next wake is at `poll_time(polls + 1)`.
    polls: u64,
}

impl MonitorProcess {
    /// Creates the monitor at poll index zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Process<World> for MonitorProcess {
    type Error = SimError;

    fn label(&self) -> &'static str {
        "ignite_monitor"
    }

    fn resume(&mut self, world: &mut World, now: SimTime) -> Result<Step, SimError> {
        if let Some(last) = world.ignite.last_refresh() {
            if now - last > STALE_AFTER {
                tracing::debug!(t = now, stale_for = now - last, "ignite dropped");
                world.ignite.drop_effect();
            }
        }
        if world.ignite.is_active() {
            world.ignite.accrue_uptime();
        }
        world.ignite.check_invariants()?;
        self.polls += 1;
        Ok(Step::Sleep(poll_time(self.polls) - now))
    }
}

// =============================================================================
// Tick process
// =============================================================================

/// Where the tick process is in its wait cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickPhase {
    /// Effect inactive; polling for activation.
    Poll,
    /// Sleeping out a full tick interval; `expected` is the epoch captured
    /// at the suspension boundary.
    Await {
        /// Epoch the pending tick belongs to.
        expected: u64,
    },
    /// Sleeping out the corrective wait after an epoch mismatch.
    Corrective,
}

/// Perpetual tick emitter for the Ignite effect.
///
/// An explicit state machine; see the module docs for the
/// refresh-during-wait race it resolves.
#[derive(Debug)]
pub struct TickProcess {
    phase: TickPhase,
}

impl TickProcess {
    /// Creates the tick process in its idle-polling state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: TickPhase::Poll,
        }
    }

    /// Re-arms for the next tick if the effect is active, otherwise falls
    /// back to idle polling on the next grid point.
    fn rearm(&mut self, world: &World, now: SimTime) -> Step {
        if world.ignite.is_active() {
            self.phase = TickPhase::Await {
                expected: world.ignite.epoch(),
            };
            Step::Sleep(TICK_INTERVAL)
        } else {
            self.phase = TickPhase::Poll;
            Step::Sleep(poll_time(next_poll_index(now)) - now)
        }
    }
}

impl Default for TickProcess {
    fn default() -> Self {
        Self::new()
    }
}

impl Process<World> for TickProcess {
    type Error = SimError;

    fn label(&self) -> &'static str {
        "ignite_tick"
    }

    fn resume(&mut self, world: &mut World, now: SimTime) -> Result<Step, SimError> {
        match self.phase {
            TickPhase::Poll => Ok(self.rearm(world, now)),
            TickPhase::Await { expected } => {
                if !world.ignite.is_active() {
                    // Dropped during the wait; nothing to emit.
                    return Ok(self.rearm(world, now));
                }
                if world.ignite.epoch() == expected {
                    world.emit_ignite_tick(now)?;
                    return Ok(self.rearm(world, now));
                }
                // The application this tick was pending for fully dropped
                // and a new one took its place mid-wait. Realign to the new
                // application's cadence instead of emitting a stale tick.
                let last = world.ignite.last_refresh().ok_or_else(|| {
                    SimError::Invariant("active ignite with no refresh timestamp".into())
                })?;
                let correction = (last + TICK_INTERVAL - now).max(0.0);
                tracing::debug!(t = now, correction, "ignite tick realigned to new epoch");
                self.phase = TickPhase::Corrective;
                Ok(Step::Sleep(correction))
            }
            TickPhase::Corrective => {
                // The effect can have dropped while the corrective wait
                // was pending; emitting then would violate the no-owner
                // invariant in emit_ignite_tick.
                if world.ignite.is_active() {
                    world.emit_ignite_tick(now)?;
                }
                Ok(self.rearm(world, now))
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
