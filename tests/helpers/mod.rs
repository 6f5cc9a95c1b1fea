/// Test doubles to drive delays from the tokio clock during integration tests.
use korri_delay::engine::{Clock, SchedulingEngine};
use tokio::time::{sleep, Duration, Instant};

#[derive(Clone, Copy)]
#[allow(dead_code)]
/// Scheduling engine based on `tokio::time`; works with paused test time.
pub struct MockEngine {
    origin: Instant,
}

#[allow(dead_code)]
impl MockEngine {
    /// Engine whose epoch is the current tokio instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MockEngine {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

impl SchedulingEngine for MockEngine {
    type Clock = Self;

    fn clock(&self) -> Self::Clock {
        *self
    }

    async fn delay_ms(&mut self, millis: u64) {
        sleep(Duration::from_millis(millis)).await;
    }
}

#[allow(dead_code)]
/// Utility: true when `future` is still pending after `window` of tokio time.
pub(crate) async fn stays_pending<F: std::future::Future>(future: F, window: Duration) -> bool {
    tokio::time::timeout(window, future).await.is_err()
}

#[allow(dead_code)]
/// Utility: assert that `started.elapsed()` lies in `[min_ms, min_ms + slack_ms]`.
/// Deadlines sit one tick past the requested duration per delay, so chains
/// of `n` delays need a slack of `n` milliseconds.
pub(crate) fn assert_elapsed(started: Instant, min_ms: u64, slack_ms: u64) {
    let elapsed = started.elapsed();
    assert!(
        elapsed >= Duration::from_millis(min_ms),
        "fired early: {elapsed:?} < {min_ms} ms"
    );
    assert!(
        elapsed <= Duration::from_millis(min_ms + slack_ms),
        "fired late: {elapsed:?} > {min_ms} ms + {slack_ms} ms"
    );
}
