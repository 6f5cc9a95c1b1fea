//! Scheduling engines: the external timer facility a delay registers with.
//! The library only consumes the [`SchedulingEngine`] and [`Clock`]
//! contracts; concrete engines live behind features or in the application.
pub mod scheduling_engine;

/// Engine backed by `embassy-time`.
#[cfg(feature = "embassy")]
pub mod embassy;

pub use scheduling_engine::{Clock, SchedulingEngine};

#[cfg(feature = "embassy")]
pub use embassy::EmbassyEngine;
