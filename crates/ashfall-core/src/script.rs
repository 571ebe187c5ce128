//! Scripted combat actions.
//!
//! Rotation decision logic lives outside the core; what the core provides
//! is the boundary it acts through. A [`CombatScript`] carries a host's
//! pre-decided action schedule into the simulation as a regular process:
//! it sleeps until each action's time, applies it through the owning
//! component's public method, and terminates when the schedule is
//! exhausted.

use std::collections::VecDeque;

use hourglass::{Process, SimTime, Step};
use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::error::SimError;
use crate::world::World;

/// One combat action a script can apply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CombatAction {
    /// Refresh the Ignite effect with a damage contribution from `actor`.
    Ignite {
        /// Acting combatant.
        actor: ActorId,
        /// Base damage contributed to the accrual.
        damage: f64,
    },
    /// Apply a Scorch stack.
    Scorch,
    /// Apply a Winter's Chill stack.
    WinterChill,
}

/// A time-sorted schedule of combat actions, run as a process.
#[derive(Debug, Clone)]
pub struct CombatScript {
    steps: VecDeque<(SimTime, CombatAction)>,
}

impl CombatScript {
    /// Builds a script from `(time, action)` pairs.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] if any time is negative or non-finite, or the
    /// times are not non-decreasing.
    pub fn new(steps: Vec<(SimTime, CombatAction)>) -> Result<Self, SimError> {
        let mut previous = 0.0;
        for &(at, _) in &steps {
            if !at.is_finite() || at < 0.0 {
                return Err(SimError::Config(format!("script action at invalid time {at}")));
            }
            if at < previous {
                return Err(SimError::Config(format!(
                    "script actions out of order: {at} after {previous}"
                )));
            }
            previous = at;
        }
        Ok(Self {
            steps: steps.into(),
        })
    }

    /// Number of actions not yet applied.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    fn apply(world: &mut World, action: CombatAction, now: SimTime) {
        match action {
            CombatAction::Ignite { actor, damage } => world.ignite.refresh(actor, damage, now),
            CombatAction::Scorch => world.debuffs.refresh_scorch(),
            CombatAction::WinterChill => world.debuffs.refresh_winter_chill(),
        }
    }
}

impl Process<World> for CombatScript {
    type Error = SimError;

    fn label(&self) -> &'static str {
        "combat_script"
    }

    fn resume(&mut self, world: &mut World, now: SimTime) -> Result<Step, SimError> {
        // Apply everything due, then sleep until the next action.
        while let Some(&(at, action)) = self.steps.front() {
            if at > now {
                return Ok(Step::Sleep(at - now));
            }
            self.steps.pop_front();
            Self::apply(world, action, now);
        }
        Ok(Step::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_times() {
        let err = CombatScript::new(vec![(-1.0, CombatAction::Scorch)]);
        assert!(matches!(err, Err(SimError::Config(_))));
    }

    #[test]
    fn rejects_unsorted_times() {
        let err = CombatScript::new(vec![
            (2.0, CombatAction::Scorch),
            (1.0, CombatAction::WinterChill),
        ]);
        assert!(matches!(err, Err(SimError::Config(_))));
    }

    #[test]
    fn equal_times_are_allowed() {
        let script = CombatScript::new(vec![
            (1.0, CombatAction::Scorch),
            (1.0, CombatAction::Scorch),
        ])
        .unwrap();
        assert_eq!(script.remaining(), 2);
    }

    #[test]
    fn empty_script_terminates_immediately() {
        use crate::config::SimConfig;

        let mut script = CombatScript::new(vec![]).unwrap();
        let mut world = World::new(SimConfig::default());
        let step = script.resume(&mut world, 0.0).unwrap();
        assert_eq!(step, Step::Done);
    }

    #[test]
    fn applies_due_actions_and_sleeps_to_next() {
        use crate::config::SimConfig;

        let mut script = CombatScript::new(vec![
            (0.0, CombatAction::Scorch),
            (0.0, CombatAction::Scorch),
            (3.5, CombatAction::WinterChill),
        ])
        .unwrap();
        let mut world = World::new(SimConfig::default());

        let step = script.resume(&mut world, 0.0).unwrap();
        assert_eq!(step, Step::Sleep(3.5));
        assert_eq!(world.debuffs.scorch_stacks(), 2);
        assert_eq!(script.remaining(), 1);

        let step = script.resume(&mut world, 3.5).unwrap();
        assert_eq!(step, Step::Done);
        assert_eq!(world.debuffs.winter_chill_stacks(), 1);
    }
}
