//! Test helper functions for setting up simulations.

use crate::actor::{Actor, ActorId};
use crate::config::SimConfig;
use crate::simulation::Simulation;

/// Routes tracing output through the test harness so `--nocapture` shows
/// per-tick events. Safe to call from every test; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A default-config simulation with one non-empowered actor.
///
/// Curse of the Elements is on (the default), so a 100-damage accrual
/// ticks for `floor(100 * 0.2 * 1.10) = 22`.
pub fn single_mage_sim() -> (Simulation, ActorId) {
    init_tracing();
    let mut sim = Simulation::new(SimConfig::default()).expect("default config is valid");
    let mage = sim.add_actor(Actor::new("Pyra"));
    (sim, mage)
}

/// Like [`single_mage_sim`] but with Curse of the Elements off, so the
/// tick math reduces to the bare coefficient.
pub fn single_mage_sim_no_curse() -> (Simulation, ActorId) {
    init_tracing();
    let mut sim = Simulation::new(SimConfig {
        curse_of_elements: false,
        ..SimConfig::default()
    })
    .expect("config is valid");
    let mage = sim.add_actor(Actor::new("Pyra"));
    (sim, mage)
}
