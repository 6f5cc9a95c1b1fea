//! Timer facility a delay registers with.
//!
//! An engine offers two things: a [`Clock`] that delay handles keep to
//! decide whether a deadline has already elapsed, and timers that complete
//! after a requested number of milliseconds. Dropping the future returned by
//! [`SchedulingEngine::delay_ms`] suppresses that timer.
use futures_util::Future;

/// Monotonic millisecond clock shared between an engine and its handles.
pub trait Clock {
    /// Whole milliseconds elapsed since an engine-defined epoch, truncated.
    /// Successive reads never decrease.
    fn now_ms(&self) -> u64;
}

/// Source of clocks and timers driving delay expiry.
pub trait SchedulingEngine {
    type Clock: Clock;

    /// Clock reading the same timeline as this engine's timers.
    fn clock(&self) -> Self::Clock;

    /// Asynchronously wait for at least `millis` milliseconds.
    fn delay_ms<'a>(&'a mut self, millis: u64) -> impl Future<Output = ()> + 'a;
}

/// Lets callers lend an engine (`&mut engine`) instead of moving it into a delay.
impl<T: SchedulingEngine> SchedulingEngine for &mut T {
    type Clock = T::Clock;

    fn clock(&self) -> Self::Clock {
        (**self).clock()
    }

    fn delay_ms<'a>(&'a mut self, millis: u64) -> impl Future<Output = ()> + 'a {
        (**self).delay_ms(millis)
    }
}
