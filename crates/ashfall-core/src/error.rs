//! Error types for the simulation core.
//!
//! Two families matter here:
//!
//! - **Configuration errors**: malformed setup (bad horizon, unknown actor,
//!   a report requested before any tick was emitted). Surfaced to the
//!   caller, never retried.
//! - **Invariant violations**: internal logic defects (stack counts outside
//!   range, an active effect with no refresh timestamp). Fatal: the
//!   simulation's correctness depends entirely on these holding, so there
//!   is nothing sensible to recover to.
//!
//! Scheduler-level faults (invalid suspension durations, bad horizons) are
//! folded into [`SimError`] at the orchestrator boundary so hosts deal with
//! a single error type.

use thiserror::Error;

use crate::actor::ActorId;

/// Error type for simulation setup and execution.
#[derive(Debug, Error)]
pub enum SimError {
    /// Malformed configuration, rejected before any simulated time advances.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// `report()` requires at least one emitted tick; the average is
    /// undefined otherwise.
    #[error("no ticks emitted; average tick damage is undefined")]
    EmptyReport,

    /// An actor ID that was never added to the roster.
    #[error("unknown actor {0}")]
    UnknownActor(ActorId),

    /// Internal logic defect; not recoverable.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Fault reported by the scheduler itself (not by a process body).
    #[error("scheduler fault: {0}")]
    Scheduler(String),
}

impl From<hourglass::RunError<SimError>> for SimError {
    fn from(err: hourglass::RunError<SimError>) -> Self {
        match err {
            hourglass::RunError::Process(e) => e,
            other => SimError::Scheduler(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_errors_pass_through_unwrapped() {
        let inner = SimError::EmptyReport;
        let flattened: SimError = hourglass::RunError::Process(inner).into();
        assert!(matches!(flattened, SimError::EmptyReport));
    }

    #[test]
    fn scheduler_faults_are_labelled() {
        let err: SimError = hourglass::RunError::<SimError>::InvalidHorizon {
            horizon: -1.0,
            now: 0.0,
        }
        .into();
        assert!(matches!(err, SimError::Scheduler(_)));
        assert!(err.to_string().contains("horizon"));
    }
}
