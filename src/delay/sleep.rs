//! Promise-style `delay(ms)`: validate the request now, wait later.
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use futures_util::Future;

use super::{deadline_after, start_until, DelayCell};
use crate::core::DelayMs;
use crate::engine::{Clock, SchedulingEngine};
use crate::error::DelayError;

/// Wait `duration_ms` milliseconds on a private, non-cancellable delay.
///
/// The duration is checked and the deadline fixed when `sleep` is called;
/// the returned future only suspends the caller until that deadline.
///
/// ```rust,ignore
/// sleep(&mut engine, 1000.0)?.await;
/// sleep(&mut engine, 2000.0)?.await;
/// ```
pub fn sleep<T: SchedulingEngine>(
    engine: T,
    duration_ms: f64,
) -> Result<impl Future<Output = ()>, DelayError> {
    let duration = DelayMs::try_from(duration_ms)?;
    let deadline_ms = deadline_after(engine.clock().now_ms(), duration);

    Ok(async move {
        let mut cell = DelayCell::<NoopRawMutex>::new();
        let (completion, _handle) = start_until(&mut cell, engine, duration, deadline_ms);
        completion.wait().await;
    })
}
