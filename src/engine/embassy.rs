//! [`SchedulingEngine`] on top of `embassy-time`: the global time driver
//! provides the clock and `Timer` registers wake-ups in its queue.
use embassy_time::{Instant, Timer};

use super::{Clock, SchedulingEngine};

/// Zero-sized engine; any number of copies share the embassy time driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyEngine;

impl Clock for EmbassyEngine {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

impl SchedulingEngine for EmbassyEngine {
    type Clock = Self;

    fn clock(&self) -> Self::Clock {
        *self
    }

    async fn delay_ms(&mut self, millis: u64) {
        Timer::after_millis(millis).await;
    }
}
