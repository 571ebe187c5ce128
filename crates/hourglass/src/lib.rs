//! # Hourglass
//!
//! Discrete-event scheduling substrate: a virtual clock plus cooperative
//! timed processes resumed in strict time order.
//!
//! Hourglass models concurrency the classic DES way: every process is an
//! explicit state machine that runs one segment at a time, then asks to be
//! suspended for a simulated duration. A priority queue keyed by
//! `(resume time, schedule order)` drives resumption, so:
//!
//! - **Virtual time**: waits cost nothing in wall-clock terms
//! - **Determinism**: same-time wakes resume in stable FIFO order
//! - **Atomic segments**: no process is preempted between suspension points
//!
//! ## Quick Start
//!
//! ```
//! use hourglass::{Process, Scheduler, SimTime, Step};
//!
//! #[derive(Default)]
//! struct Counter(u32);
//!
//! struct TickEverySecond;
//!
//! impl Process<Counter> for TickEverySecond {
//!     type Error = std::convert::Infallible;
//!
//!     fn label(&self) -> &'static str {
//!         "tick"
//!     }
//!
//!     fn resume(&mut self, world: &mut Counter, _now: SimTime) -> Result<Step, Self::Error> {
//!         world.0 += 1;
//!         Ok(Step::Sleep(1.0))
//!     }
//! }
//!
//! let mut sched = Scheduler::new(Counter::default());
//! sched.spawn(TickEverySecond);
//! sched.run_until(10.0).unwrap();
//!
//! // First resume fires at t=0, then once per second through t=10.
//! assert_eq!(sched.world().0, 11);
//! assert_eq!(sched.now(), 10.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod process;
pub mod scheduler;

// Re-exports for convenience
pub use clock::SimClock;
pub use process::{Process, SimTime, Step};
pub use scheduler::{ProcessId, RunError, Scheduler};
