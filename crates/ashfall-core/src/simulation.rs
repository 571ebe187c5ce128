//! Simulation orchestrator.
//!
//! `Simulation` wires the world and the three built-in processes into an
//! [`hourglass::Scheduler`] and exposes the host-facing surface: actor
//! setup, direct refresh entry points, script attachment, run control, and
//! the end-of-run report.
//!
//! # Process start order
//!
//! The decay, monitor, and tick processes are spawned in that order at
//! construction; host scripts are spawned afterwards. The scheduler's
//! stable same-time ordering makes this observable, so it is fixed: at a
//! shared instant, decay runs first, the monitor's drop check precedes
//! tick emission, and scripted refreshes land last.

use hourglass::{ProcessId, Scheduler, SimTime};

use crate::actor::{Actor, ActorId, Roster};
use crate::config::SimConfig;
use crate::debuffs::{DebuffTracker, DecayProcess};
use crate::error::SimError;
use crate::ignite::{IgniteReport, IgniteState, MonitorProcess, TickProcess};
use crate::meter::DamageMeter;
use crate::script::CombatScript;
use crate::world::World;

/// A complete, runnable combat-effect simulation.
///
/// # Example
///
/// ```
/// use ashfall_core::{Actor, SimConfig, Simulation};
///
/// let mut sim = Simulation::new(SimConfig::default()).unwrap();
/// let mage = sim.add_actor(Actor::new("Pyra"));
///
/// // One Ignite-refreshing crit at t=0, then nothing: the effect ticks at
/// // t=2 and t=4 and expires just after t=4.15.
/// sim.refresh_ignite(mage, 100.0).unwrap();
/// sim.run_until(10.0).unwrap();
///
/// assert_eq!(sim.ignite().ticks(), &[22, 22]);
/// assert!(!sim.ignite().is_active());
/// ```
#[derive(Debug)]
pub struct Simulation {
    sched: Scheduler<World, SimError>,
}

impl Simulation {
    /// Builds a simulation from a validated configuration.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] if the configuration is malformed; nothing is
    /// scheduled in that case.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let mut sched = Scheduler::new(World::new(config));
        sched.spawn(DecayProcess::new());
        sched.spawn(MonitorProcess::new());
        sched.spawn(TickProcess::new());
        Ok(Self { sched })
    }

    /// Adds an actor to the roster.
    pub fn add_actor(&mut self, actor: Actor) -> ActorId {
        self.sched.world_mut().roster.add(actor)
    }

    /// Adds several actors, returning their IDs in order.
    pub fn add_actors(&mut self, actors: impl IntoIterator<Item = Actor>) -> Vec<ActorId> {
        self.sched.world_mut().roster.add_all(actors)
    }

    /// Attaches a combat script; its actions fire at their scheduled times
    /// once the simulation runs.
    pub fn add_script(&mut self, script: CombatScript) -> ProcessId {
        self.sched.spawn(script)
    }

    /// Refreshes the Ignite effect at the current simulated time.
    ///
    /// Usable before the first run (at `t = 0`) and between runs; during a
    /// run, refreshes come from scripts.
    ///
    /// # Errors
    ///
    /// [`SimError::UnknownActor`] if `actor` is not in the roster.
    pub fn refresh_ignite(&mut self, actor: ActorId, damage: f64) -> Result<(), SimError> {
        let now = self.sched.now();
        let world = self.sched.world_mut();
        if world.roster.get(actor).is_none() {
            return Err(SimError::UnknownActor(actor));
        }
        world.ignite.refresh(actor, damage, now);
        world.ignite.check_invariants()
    }

    /// Applies a Scorch stack at the current simulated time.
    pub fn refresh_scorch(&mut self) {
        self.sched.world_mut().debuffs.refresh_scorch();
    }

    /// Applies a Winter's Chill stack at the current simulated time.
    pub fn refresh_winter_chill(&mut self) {
        self.sched.world_mut().debuffs.refresh_winter_chill();
    }

    /// Runs to the configured horizon.
    ///
    /// # Errors
    ///
    /// Any process or scheduler error, flattened into [`SimError`].
    pub fn run(&mut self) -> Result<(), SimError> {
        let horizon = self.sched.world().config.horizon;
        self.run_until(horizon)
    }

    /// Runs until the clock reaches `horizon`. Resumable: a later call with
    /// a larger horizon continues the same run.
    ///
    /// # Errors
    ///
    /// Any process or scheduler error, flattened into [`SimError`].
    pub fn run_until(&mut self, horizon: SimTime) -> Result<(), SimError> {
        self.sched.run_until(horizon).map_err(SimError::from)
    }

    /// Current simulated time.
    #[must_use]
    pub fn now(&self) -> SimTime {
        self.sched.now()
    }

    /// The run configuration.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.sched.world().config
    }

    /// The actor roster.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.sched.world().roster
    }

    /// The debuff stack tracker.
    #[must_use]
    pub fn debuffs(&self) -> &DebuffTracker {
        &self.sched.world().debuffs
    }

    /// The Ignite effect state.
    #[must_use]
    pub fn ignite(&self) -> &IgniteState {
        &self.sched.world().ignite
    }

    /// The damage meter.
    #[must_use]
    pub fn meter(&self) -> &DamageMeter {
        &self.sched.world().meter
    }

    /// End-of-run Ignite summary against the time elapsed so far.
    ///
    /// # Errors
    ///
    /// [`SimError::EmptyReport`] if no tick was emitted;
    /// [`SimError::Config`] if no simulated time has elapsed.
    pub fn report(&self) -> Result<IgniteReport, SimError> {
        self.sched.world().ignite.report(self.sched.now())
    }
}
