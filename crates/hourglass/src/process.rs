//! Cooperative process abstraction.
//!
//! A [`Process`] is a unit of concurrent work expressed as an explicit state
//! machine. Each call to [`Process::resume`] runs one segment of the
//! process's logic (everything between two suspension points) and returns
//! a [`Step`] telling the scheduler what to do next.
//!
//! Segments execute atomically with respect to all other processes: the
//! scheduler is single-threaded and never preempts a running segment. All
//! interleaving happens at the suspension boundaries a process chooses, so
//! code that captures state, sleeps, and re-checks on resume expresses
//! exactly the races it means to.

/// Simulated time in seconds. Continuous, non-negative.
pub type SimTime = f64;

/// A process's request at a suspension boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Suspend and resume after the given delay (must be finite and `>= 0`).
    Sleep(SimTime),
    /// Terminate; the process will never be resumed again.
    Done,
}

/// A cooperative timed process over shared world state `W`.
///
/// Implementors hold their own per-process state (the "stack" of the
/// coroutine they replace) and mutate the shared world only inside
/// `resume`. Errors returned from `resume` terminate the process and abort
/// the run; the scheduler never retries.
pub trait Process<W> {
    /// Error type surfaced to the simulation driver.
    type Error;

    /// Short static name used in trace output and error reports.
    fn label(&self) -> &'static str;

    /// Runs one segment of this process at simulated time `now`.
    ///
    /// # Errors
    ///
    /// Any error from the process body; it is propagated unchanged out of
    /// the scheduler run loop.
    fn resume(&mut self, world: &mut W, now: SimTime) -> Result<Step, Self::Error>;
}
