//! Time-ordered process scheduler.
//!
//! The [`Scheduler`] owns the virtual clock, the shared world state, and a
//! priority queue of pending wakes. Wakes are keyed by `(resume time,
//! schedule sequence)`: the sequence is a global monotone counter assigned
//! when the wake is pushed, so same-time wakes dispatch in the order they
//! were scheduled. That stable tie-break is what makes interleavings of
//! cooperating processes reproducible run-to-run.
//!
//! # Failure semantics
//!
//! The scheduler itself does no I/O and cannot fail except on malformed
//! durations: a process asking to sleep for a negative or non-finite delay
//! is a programming error, reported as [`RunError::InvalidDelay`] and never
//! retried. Errors returned by process bodies abort the run and surface to
//! the caller unchanged; the failing process's wake is consumed, so it is
//! effectively terminated.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use thiserror::Error;

use crate::clock::SimClock;
use crate::process::{Process, SimTime, Step};

// =============================================================================
// Identifiers and errors
// =============================================================================

/// Handle for a spawned process.
///
/// Process IDs are assigned sequentially at spawn time and are stable for
/// the lifetime of the scheduler.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(usize);

impl ProcessId {
    /// Creates a `ProcessId` from a raw index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index of this process.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors surfaced from a scheduler run.
#[derive(Debug, Error)]
pub enum RunError<E> {
    /// A process requested a negative or non-finite suspension.
    #[error("process `{label}` requested invalid suspension {requested} at t={at}")]
    InvalidDelay {
        /// Label of the offending process.
        label: &'static str,
        /// The requested delay.
        requested: SimTime,
        /// Simulated time at which the request was made.
        at: SimTime,
    },
    /// `run_until` was called with a horizon behind the clock or non-finite.
    #[error("invalid horizon {horizon} (current time {now})")]
    InvalidHorizon {
        /// The rejected horizon.
        horizon: SimTime,
        /// Simulated time when the run was requested.
        now: SimTime,
    },
    /// A process body returned an error; the run is aborted.
    #[error(transparent)]
    Process(E),
}

// =============================================================================
// Wake queue
// =============================================================================

/// A pending resumption. Ordered for a min-heap on `(at, seq)`.
#[derive(Debug, Clone, Copy)]
struct Wake {
    at: SimTime,
    seq: u64,
    pid: ProcessId,
}

impl PartialEq for Wake {
    fn eq(&self, other: &Self) -> bool {
        self.at.total_cmp(&other.at) == Ordering::Equal && self.seq == other.seq
    }
}

impl Eq for Wake {}

impl PartialOrd for Wake {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Wake {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, earliest wake must win.
        other
            .at
            .total_cmp(&self.at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

// =============================================================================
// Scheduler
// =============================================================================

/// Discrete-event scheduler over shared world state `W`.
///
/// All processes spawned into one scheduler share the world `W` and the
/// error type `E`. Execution is single-threaded and cooperative: exactly
/// one process segment runs at a time, and the clock advances only between
/// segments.
///
/// # Example
///
/// ```
/// use hourglass::{Process, Scheduler, SimTime, Step};
///
/// struct Once;
///
/// impl Process<u32> for Once {
///     type Error = std::convert::Infallible;
///
///     fn label(&self) -> &'static str {
///         "once"
///     }
///
///     fn resume(&mut self, world: &mut u32, _now: SimTime) -> Result<Step, Self::Error> {
///         *world += 1;
///         Ok(Step::Done)
///     }
/// }
///
/// let mut sched = Scheduler::new(0_u32);
/// sched.spawn(Once);
/// sched.run_to_completion().unwrap();
/// assert_eq!(*sched.world(), 1);
/// ```
pub struct Scheduler<W, E> {
    clock: SimClock,
    world: W,
    /// Process slots; `None` marks a terminated process.
    processes: Vec<Option<Box<dyn Process<W, Error = E>>>>,
    queue: BinaryHeap<Wake>,
    /// Monotone sequence counter for stable same-time ordering.
    next_seq: u64,
}

impl<W, E> Scheduler<W, E> {
    /// Creates a scheduler at `t = 0` owning the given world state.
    #[must_use]
    pub fn new(world: W) -> Self {
        Self {
            clock: SimClock::new(),
            world,
            processes: Vec::new(),
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Current simulated time.
    #[must_use]
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// Read access to the shared world state.
    #[must_use]
    pub fn world(&self) -> &W {
        &self.world
    }

    /// Mutable access to the shared world state.
    ///
    /// Intended for setup and inspection between runs; during a run,
    /// processes are the only mutators.
    #[must_use]
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Registers a process and schedules its first resume at the current
    /// time, after every wake already scheduled for that time.
    pub fn spawn<P>(&mut self, process: P) -> ProcessId
    where
        P: Process<W, Error = E> + 'static,
    {
        let pid = ProcessId::new(self.processes.len());
        self.processes.push(Some(Box::new(process)));
        self.push_wake(self.clock.now(), pid);
        pid
    }

    /// Number of processes that have not yet terminated.
    #[must_use]
    pub fn active_processes(&self) -> usize {
        self.processes.iter().filter(|slot| slot.is_some()).count()
    }

    /// Number of pending wakes in the event queue.
    #[must_use]
    pub fn pending_wakes(&self) -> usize {
        self.queue.len()
    }

    /// Drives the simulation until the clock reaches `horizon`.
    ///
    /// Dispatches every wake scheduled at or before `horizon` in
    /// `(time, sequence)` order, then advances the clock to `horizon` so
    /// that elapsed-time readings cover the full run even when the last
    /// wake fired earlier.
    ///
    /// # Errors
    ///
    /// [`RunError::InvalidHorizon`] if `horizon` is non-finite or behind
    /// the clock; [`RunError::InvalidDelay`] or [`RunError::Process`]
    /// propagated from dispatch.
    pub fn run_until(&mut self, horizon: SimTime) -> Result<(), RunError<E>> {
        if !horizon.is_finite() || horizon < self.clock.now() {
            return Err(RunError::InvalidHorizon {
                horizon,
                now: self.clock.now(),
            });
        }
        loop {
            match self.queue.peek() {
                Some(head) if head.at <= horizon => {}
                _ => break,
            }
            if let Some(wake) = self.queue.pop() {
                self.dispatch(wake)?;
            }
        }
        self.clock.advance_to(horizon);
        Ok(())
    }

    /// Drives the simulation until no wake remains.
    ///
    /// Only terminates if every process eventually returns [`Step::Done`];
    /// simulations with perpetual processes should use [`run_until`]
    /// instead.
    ///
    /// # Errors
    ///
    /// [`RunError::InvalidDelay`] or [`RunError::Process`] propagated from
    /// dispatch.
    ///
    /// [`run_until`]: Scheduler::run_until
    pub fn run_to_completion(&mut self) -> Result<(), RunError<E>> {
        while let Some(wake) = self.queue.pop() {
            self.dispatch(wake)?;
        }
        Ok(())
    }

    fn push_wake(&mut self, at: SimTime, pid: ProcessId) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Wake { at, seq, pid });
    }

    /// Advances the clock to the wake's time and resumes its process.
    fn dispatch(&mut self, wake: Wake) -> Result<(), RunError<E>> {
        self.clock.advance_to(wake.at);
        let Some(slot) = self.processes.get_mut(wake.pid.as_usize()) else {
            return Ok(());
        };
        let Some(process) = slot.as_mut() else {
            // Terminated process; stale wake.
            return Ok(());
        };

        tracing::trace!(t = wake.at, process = process.label(), "wake");
        let step = process
            .resume(&mut self.world, wake.at)
            .map_err(RunError::Process)?;

        match step {
            Step::Sleep(delay) => {
                if !delay.is_finite() || delay < 0.0 {
                    return Err(RunError::InvalidDelay {
                        label: process.label(),
                        requested: delay,
                        at: wake.at,
                    });
                }
                self.push_wake(wake.at + delay, wake.pid);
            }
            Step::Done => {
                *slot = None;
            }
        }
        Ok(())
    }
}

impl<W: std::fmt::Debug, E> std::fmt::Debug for Scheduler<W, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.clock.now())
            .field("world", &self.world)
            .field("processes", &format!("[{} slots]", self.processes.len()))
            .field("pending_wakes", &self.queue.len())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    /// World that records which process ran at which time.
    #[derive(Default, Debug)]
    struct Journal {
        entries: Vec<(SimTime, &'static str)>,
    }

    /// Logs its label on every resume, sleeping a fixed period.
    struct Periodic {
        name: &'static str,
        period: SimTime,
        remaining: u32,
    }

    impl Process<Journal> for Periodic {
        type Error = Infallible;

        fn label(&self) -> &'static str {
            self.name
        }

        fn resume(&mut self, world: &mut Journal, now: SimTime) -> Result<Step, Infallible> {
            world.entries.push((now, self.name));
            if self.remaining == 0 {
                return Ok(Step::Done);
            }
            self.remaining -= 1;
            Ok(Step::Sleep(self.period))
        }
    }

    struct BadSleeper;

    impl Process<Journal> for BadSleeper {
        type Error = Infallible;

        fn label(&self) -> &'static str {
            "bad_sleeper"
        }

        fn resume(&mut self, _world: &mut Journal, _now: SimTime) -> Result<Step, Infallible> {
            Ok(Step::Sleep(-1.0))
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    struct Faulty;

    impl Process<Journal> for Faulty {
        type Error = Boom;

        fn label(&self) -> &'static str {
            "faulty"
        }

        fn resume(&mut self, _world: &mut Journal, _now: SimTime) -> Result<Step, Boom> {
            Err(Boom)
        }
    }

    mod ordering_tests {
        use super::*;

        #[test]
        fn wakes_dispatch_in_time_order() {
            let mut sched: Scheduler<Journal, Infallible> = Scheduler::new(Journal::default());
            sched.spawn(Periodic {
                name: "slow",
                period: 3.0,
                remaining: 2,
            });
            sched.spawn(Periodic {
                name: "fast",
                period: 1.0,
                remaining: 4,
            });
            sched.run_to_completion().unwrap();

            let times: Vec<SimTime> = sched.world().entries.iter().map(|(t, _)| *t).collect();
            let mut sorted = times.clone();
            sorted.sort_by(SimTime::total_cmp);
            assert_eq!(times, sorted);
            assert_eq!(sched.world().entries.last(), Some(&(6.0, "slow")));
        }

        #[test]
        fn same_time_wakes_are_fifo_by_schedule_order() {
            let mut sched: Scheduler<Journal, Infallible> = Scheduler::new(Journal::default());
            // Both resume at t=0 and then at every integer second; the
            // first spawned must always run first.
            sched.spawn(Periodic {
                name: "first",
                period: 1.0,
                remaining: 3,
            });
            sched.spawn(Periodic {
                name: "second",
                period: 1.0,
                remaining: 3,
            });
            sched.run_to_completion().unwrap();

            let entries = &sched.world().entries;
            for pair in entries.chunks(2) {
                assert_eq!(pair[0].0, pair[1].0);
                assert_eq!(pair[0].1, "first");
                assert_eq!(pair[1].1, "second");
            }
        }

        #[test]
        fn clock_never_decreases_across_dispatch() {
            let mut sched: Scheduler<Journal, Infallible> = Scheduler::new(Journal::default());
            sched.spawn(Periodic {
                name: "a",
                period: 0.1,
                remaining: 50,
            });
            sched.spawn(Periodic {
                name: "b",
                period: 0.7,
                remaining: 7,
            });
            sched.run_to_completion().unwrap();

            let mut last = 0.0;
            for (t, _) in &sched.world().entries {
                assert!(*t >= last);
                last = *t;
            }
        }
    }

    mod horizon_tests {
        use super::*;

        #[test]
        fn run_until_stops_at_horizon_and_advances_clock() {
            let mut sched: Scheduler<Journal, Infallible> = Scheduler::new(Journal::default());
            sched.spawn(Periodic {
                name: "tick",
                period: 2.0,
                remaining: 100,
            });
            sched.run_until(5.0).unwrap();

            // Resumes at t=0, 2, 4; the t=6 wake stays queued.
            assert_eq!(sched.world().entries.len(), 3);
            assert_eq!(sched.now(), 5.0);
            assert_eq!(sched.pending_wakes(), 1);
        }

        #[test]
        fn run_until_is_resumable() {
            let mut sched: Scheduler<Journal, Infallible> = Scheduler::new(Journal::default());
            sched.spawn(Periodic {
                name: "tick",
                period: 1.0,
                remaining: 10,
            });
            sched.run_until(3.5).unwrap();
            let after_first = sched.world().entries.len();
            sched.run_until(10.0).unwrap();

            assert_eq!(after_first, 4); // t=0..3
            assert_eq!(sched.world().entries.len(), 11); // t=0..10
        }

        #[test]
        fn horizon_behind_clock_is_rejected() {
            let mut sched: Scheduler<Journal, Infallible> = Scheduler::new(Journal::default());
            sched.run_until(5.0).unwrap();
            let err = sched.run_until(1.0).unwrap_err();
            assert!(matches!(err, RunError::InvalidHorizon { .. }));
        }

        #[test]
        fn nan_horizon_is_rejected() {
            let mut sched: Scheduler<Journal, Infallible> = Scheduler::new(Journal::default());
            assert!(matches!(
                sched.run_until(SimTime::NAN),
                Err(RunError::InvalidHorizon { .. })
            ));
        }
    }

    mod failure_tests {
        use super::*;

        #[test]
        fn negative_delay_surfaces_invalid_delay() {
            let mut sched: Scheduler<Journal, Infallible> = Scheduler::new(Journal::default());
            sched.spawn(BadSleeper);
            let err = sched.run_until(1.0).unwrap_err();
            match err {
                RunError::InvalidDelay { label, requested, .. } => {
                    assert_eq!(label, "bad_sleeper");
                    assert_eq!(requested, -1.0);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn process_error_aborts_run() {
            let mut sched: Scheduler<Journal, Boom> = Scheduler::new(Journal::default());
            sched.spawn(Faulty);
            let err = sched.run_until(1.0).unwrap_err();
            assert!(matches!(err, RunError::Process(Boom)));
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn done_process_is_removed() {
            let mut sched: Scheduler<Journal, Infallible> = Scheduler::new(Journal::default());
            sched.spawn(Periodic {
                name: "short",
                period: 1.0,
                remaining: 2,
            });
            assert_eq!(sched.active_processes(), 1);
            sched.run_to_completion().unwrap();
            assert_eq!(sched.active_processes(), 0);
            assert_eq!(sched.pending_wakes(), 0);
        }

        #[test]
        fn spawn_after_run_resumes_at_current_time() {
            let mut sched: Scheduler<Journal, Infallible> = Scheduler::new(Journal::default());
            sched.run_until(4.0).unwrap();
            sched.spawn(Periodic {
                name: "late",
                period: 1.0,
                remaining: 1,
            });
            sched.run_until(6.0).unwrap();
            assert_eq!(sched.world().entries, vec![(4.0, "late"), (5.0, "late")]);
        }
    }
}
