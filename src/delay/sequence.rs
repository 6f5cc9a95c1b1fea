//! Chain of delays awaited one after another.
//!
//! Replaces nested "after this, wait again" callbacks with a flat list of
//! steps and a single callback invoked after each step.
use core::ops::ControlFlow;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;

use super::{start_for, DelayCell};
use crate::core::DelayMs;
use crate::engine::SchedulingEngine;
use crate::error::DelayError;

/// `N` validated delay steps bound to one scheduling engine.
pub struct Sequence<T: SchedulingEngine, const N: usize> {
    engine: T,
    steps: [DelayMs; N],
}

impl<T: SchedulingEngine, const N: usize> Sequence<T, N> {
    /// Validate every step up front.
    ///
    /// A single invalid step rejects the whole sequence and no timer is registered.
    pub fn new(engine: T, steps_ms: [f64; N]) -> Result<Self, DelayError> {
        let mut steps = [DelayMs::ZERO; N];
        for (step, duration_ms) in steps.iter_mut().zip(steps_ms) {
            *step = DelayMs::try_from(duration_ms)?;
        }
        Ok(Self { engine, steps })
    }

    /// Validated steps, in execution order.
    pub fn steps(&self) -> &[DelayMs] {
        &self.steps
    }

    /// Sum of all steps, saturating at [`DelayMs::MAX`].
    pub fn total(&self) -> DelayMs {
        let total = self
            .steps
            .iter()
            .fold(0u64, |acc, step| acc.saturating_add(step.as_millis()));
        DelayMs::from_millis(total)
    }

    /// Await each step in order, calling `on_step(index, duration)` after it
    /// elapses. Returning [`ControlFlow::Break`] stops the chain early.
    ///
    /// Returns the number of steps that completed.
    pub async fn run<F>(mut self, mut on_step: F) -> usize
    where
        F: FnMut(usize, DelayMs) -> ControlFlow<()>,
    {
        let mut cell = DelayCell::<NoopRawMutex>::new();
        let mut completed = 0;

        for (index, step) in self.steps.iter().copied().enumerate() {
            let (completion, _handle) = start_for(&mut cell, &mut self.engine, step);
            completion.wait().await;
            completed += 1;

            #[cfg(feature = "defmt")]
            defmt::debug!("Sequence step {} of {} completed ({})", index + 1, N, step);

            if on_step(index, step).is_break() {
                break;
            }
        }

        completed
    }
}
