//! # Ashfall Core
//!
//! Deterministic combat-effect simulation core for Ashfall.
//!
//! Models a single refreshable, stacking damage-over-time effect (Ignite)
//! plus two decaying debuff stack families (Scorch and Winter's Chill),
//! driven by the [`hourglass`] discrete-event scheduler over a shared
//! virtual clock. The combat math is simple; the substance is the
//! concurrency: three perpetual processes (debuff decay, a staleness
//! monitor, and a tick emitter) observe each other's state at scheduler
//! suspension boundaries, and the tick emitter resolves refresh/tick races
//! with an epoch check rather than cancellation.
//!
//! ## Architecture
//!
//! - **`hourglass`**: virtual clock + cooperative process scheduling
//! - **Debuff tracker**: two capped stack counters with unconditional
//!   once-per-second decay
//! - **Ignite engine**: effect state, monitor process, tick process
//! - **Damage meter**: per-actor totals for reporting
//! - **Combat scripts**: host-decided action schedules run as processes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ashfall_core::{Actor, CombatAction, CombatScript, SimConfig, Simulation};
//!
//! let mut sim = Simulation::new(SimConfig::default())?;
//! let mage = sim.add_actor(Actor::new("Pyra"));
//! sim.add_script(CombatScript::new(vec![
//!     (0.0, CombatAction::Ignite { actor: mage, damage: 100.0 }),
//!     (1.5, CombatAction::Scorch),
//! ])?);
//! sim.run_until(60.0)?;
//! println!("{:?}", sim.report()?);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actor;
pub mod config;
pub mod debuffs;
pub mod error;
pub mod ignite;
pub mod meter;
pub mod script;
pub mod simulation;
pub mod world;

// Re-exports for convenience
pub use actor::{Actor, ActorId, Roster};
pub use config::SimConfig;
pub use debuffs::{DebuffTracker, DecayProcess, StackedDebuff};
pub use error::SimError;
pub use ignite::{IgniteReport, IgniteState, MonitorProcess, TickProcess};
pub use meter::DamageMeter;
pub use script::{CombatAction, CombatScript};
pub use simulation::Simulation;
pub use world::World;

#[cfg(test)]
mod tests;
