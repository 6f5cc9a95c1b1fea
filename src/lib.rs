//! `korri-delay` library: a cancellable delay primitive for `no_std` async
//! code. A delay is started on caller-owned storage, awaited through its
//! completion signal, and cancelled through an exclusively owned handle.
//! Timers come from a pluggable scheduling engine.
#![no_std]

#[cfg(test)]
extern crate std;
//==================================================================================
/// Core data types: validated durations, delay states, and outcomes.
pub mod core;
/// Cancellable delay plus the helpers composed from it (sleep, all, race, sequence).
pub mod delay;
/// Scheduling engine abstraction and the optional embassy-time engine.
pub mod engine;
/// Error raised when a delay is requested with an invalid duration.
pub mod error;
//==================================================================================
pub use crate::core::{DelayMs, DelayState, Outcome};
pub use crate::delay::{
    all, race, sleep, start, start_for, Completion, DelayCell, DelayHandle, Sequence, Started,
    Winner,
};
pub use crate::engine::{Clock, SchedulingEngine};
pub use crate::error::DelayError;
