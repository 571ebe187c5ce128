//! Test module for timing, race, and determinism tests.
//!
//! - `timing.rs`: decay windows, expiration, tick cadence, and both sides
//!   of the refresh/tick race
//! - `determinism.rs`: identical schedules produce identical output
//! - `helpers.rs`: simulation setup utilities

mod helpers;
