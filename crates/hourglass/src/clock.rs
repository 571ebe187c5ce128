//! Virtual clock for discrete-event simulation.
//!
//! [`SimClock`] tracks simulated time independently of wall-clock time. It
//! only moves when the scheduler dispatches a wake, which makes runs
//! deterministic and instant regardless of how much simulated time they span.

use crate::process::SimTime;

/// Monotonically non-decreasing virtual clock.
///
/// The clock starts at `t = 0.0` and is advanced exclusively by the
/// scheduler as it dispatches wakes in time order. No process may ever
/// observe it decrease.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    /// Creates a clock at `t = 0.0`.
    #[must_use]
    pub fn new() -> Self {
        Self { now: 0.0 }
    }

    /// Current simulated time in seconds.
    #[must_use]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Advances the clock to an absolute time.
    ///
    /// The scheduler's event queue guarantees targets are non-decreasing;
    /// a regression here indicates a queue-ordering defect.
    pub fn advance_to(&mut self, target: SimTime) {
        debug_assert!(
            target >= self.now,
            "clock regression: now={}, target={}",
            self.now,
            target,
        );
        if target > self.now {
            self.now = target;
        }
    }
}
