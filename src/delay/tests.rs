//! Unit tests for the delay cell state machine and `start` validation.
use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;

use super::*;

/// Clock reading a millisecond counter the test moves by hand.
#[derive(Clone, Copy)]
struct ManualClock<'c>(&'c Cell<u64>);

impl Clock for ManualClock<'_> {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

/// Engine on a [`ManualClock`] whose timers elapse on the first poll.
/// Counts clock requests so tests can tell whether a timer was registered.
struct ManualEngine<'c> {
    now: &'c Cell<u64>,
    clock_requests: Cell<usize>,
    timers: usize,
}

impl<'c> ManualEngine<'c> {
    fn on(now: &'c Cell<u64>) -> Self {
        Self {
            now,
            clock_requests: Cell::new(0),
            timers: 0,
        }
    }
}

impl<'c> SchedulingEngine for ManualEngine<'c> {
    type Clock = ManualClock<'c>;

    fn clock(&self) -> Self::Clock {
        self.clock_requests.set(self.clock_requests.get() + 1);
        ManualClock(self.now)
    }

    async fn delay_ms(&mut self, _millis: u64) {
        self.timers += 1;
    }
}

//==================================================================================START
#[test]
/// A valid request arms the cell and fixes the deadline past the engine clock.
fn test_start_arms_cell() {
    let now = Cell::new(1_000);
    let mut engine = ManualEngine::on(&now);
    let mut cell = DelayCell::<NoopRawMutex>::new();
    assert_eq!(cell.state(), None);

    let (_completion, handle) = start(&mut cell, &mut engine, 100.0).unwrap();
    assert_eq!(handle.state(), DelayState::Pending);
    assert_eq!(handle.duration(), DelayMs::from_millis(100));
    // One extra millisecond covers the fraction the truncated clock hides.
    assert_eq!(handle.deadline_ms(), 1_101);
}

#[test]
/// The deadline is never reached before the full duration on the true timeline.
fn test_deadline_after_rounds_up() {
    assert_eq!(deadline_after(0, DelayMs::ZERO), 0);
    assert_eq!(deadline_after(7, DelayMs::ZERO), 7);
    assert_eq!(deadline_after(0, DelayMs::from_millis(1)), 2);
    assert_eq!(deadline_after(41, DelayMs::from_millis(100)), 142);
    assert_eq!(deadline_after(u64::MAX - 1, DelayMs::from_millis(5)), u64::MAX);
}

#[test]
/// Invalid durations fail synchronously and never touch the engine or the cell.
fn test_start_rejects_invalid_duration() {
    let now = Cell::new(0);
    let mut engine = ManualEngine::on(&now);
    let mut cell = DelayCell::<NoopRawMutex>::new();

    for bad in [-5.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let result = start(&mut cell, &mut engine, bad);
        assert!(matches!(result, Err(DelayError::InvalidArgument { .. })));
    }

    assert_eq!(engine.clock_requests.get(), 0);
    assert_eq!(engine.timers, 0);
    assert_eq!(cell.state(), None);
}

#[test]
/// The error carries the offending value.
fn test_invalid_argument_payload() {
    let now = Cell::new(0);
    let mut cell = DelayCell::<NoopRawMutex>::new();
    match start(&mut cell, ManualEngine::on(&now), -5.0) {
        Err(DelayError::InvalidArgument { duration_ms }) => assert_eq!(duration_ms, -5.0),
        Ok(_) => panic!("negative duration must be rejected"),
    }
}

//==================================================================================CANCEL
#[test]
/// Cancel moves `Pending` to `Cancelled`; further cancels change nothing.
fn test_cancel_is_idempotent() {
    let now = Cell::new(0);
    let mut cell = DelayCell::<NoopRawMutex>::new();
    let (_completion, handle) = start(&mut cell, ManualEngine::on(&now), 100.0).unwrap();

    handle.cancel();
    assert_eq!(handle.state(), DelayState::Cancelled);
    handle.cancel();
    assert_eq!(handle.state(), DelayState::Cancelled);

    // Time passing does not revive a cancelled delay.
    now.set(500);
    assert_eq!(handle.state(), DelayState::Cancelled);
}

#[test]
/// Once the clock reaches the deadline the handle reports `Fired` and cancel
/// has no effect, even though nobody awaited the completion.
fn test_expiry_observed_by_handle() {
    let now = Cell::new(0);
    let mut cell = DelayCell::<NoopRawMutex>::new();
    let (_completion, handle) = start(&mut cell, ManualEngine::on(&now), 100.0).unwrap();

    now.set(handle.deadline_ms() - 1);
    assert_eq!(handle.state(), DelayState::Pending);

    now.set(handle.deadline_ms());
    handle.cancel();
    assert_eq!(handle.state(), DelayState::Fired);
    assert_eq!(cell_state(&handle), Some(DelayState::Fired));
}

fn cell_state<C: Clock>(handle: &DelayHandle<'_, NoopRawMutex, C>) -> Option<DelayState> {
    handle.cell.state()
}

#[test]
/// A settled cell refuses any second transition.
fn test_settle_happens_once() {
    let now = Cell::new(0);
    let mut cell = DelayCell::<NoopRawMutex>::new();
    let (_completion, handle) = start(&mut cell, ManualEngine::on(&now), 10.0).unwrap();

    assert_eq!(handle.cell.settle(None, 0), Some(DelayState::Pending));
    assert_eq!(
        handle.cell.settle(Some(Outcome::Fired), 0),
        Some(DelayState::Fired)
    );
    assert_eq!(
        handle.cell.settle(Some(Outcome::Cancelled), 0),
        Some(DelayState::Fired)
    );

    handle.cancel();
    assert_eq!(handle.state(), DelayState::Fired);
}

//==================================================================================COMPLETION
#[tokio::test]
/// A pending delay fires once the engine timer elapses.
async fn test_outcome_fired() {
    let now = Cell::new(0);
    let mut engine = ManualEngine::on(&now);
    let mut cell = DelayCell::<NoopRawMutex>::new();
    {
        let (completion, handle) = start(&mut cell, &mut engine, 10.0).unwrap();
        assert_eq!(completion.outcome().await, Outcome::Fired);
        assert_eq!(handle.state(), DelayState::Fired);

        // Cancelling after expiry is a no-op.
        handle.cancel();
        assert_eq!(handle.state(), DelayState::Fired);
    }
    assert_eq!(engine.timers, 1);
    assert_eq!(cell.state(), Some(DelayState::Fired));
}

#[tokio::test]
/// A completion polled after its deadline fires without registering a timer.
async fn test_outcome_after_deadline_skips_timer() {
    let now = Cell::new(0);
    let mut engine = ManualEngine::on(&now);
    let mut cell = DelayCell::<NoopRawMutex>::new();
    {
        let (completion, _handle) = start(&mut cell, &mut engine, 10.0).unwrap();
        now.set(50);
        assert_eq!(completion.outcome().await, Outcome::Fired);
    }
    assert_eq!(engine.timers, 0);
}

#[tokio::test]
/// A delay cancelled before it is awaited reports `Cancelled` without
/// registering a timer, even though the engine would fire immediately.
async fn test_cancel_before_wait_wins() {
    let now = Cell::new(0);
    let mut engine = ManualEngine::on(&now);
    let mut cell = DelayCell::<NoopRawMutex>::new();
    {
        let (completion, handle) = start(&mut cell, &mut engine, 5.0).unwrap();
        handle.cancel();
        assert_eq!(completion.outcome().await, Outcome::Cancelled);
        assert_eq!(handle.state(), DelayState::Cancelled);
    }
    assert_eq!(engine.timers, 0);
}

#[tokio::test]
/// A zero delay has elapsed as soon as it starts: cancel cannot stop it.
async fn test_zero_delay_is_already_fired() {
    let now = Cell::new(3);
    let mut cell = DelayCell::<NoopRawMutex>::new();
    let (completion, handle) = start(&mut cell, ManualEngine::on(&now), 0.0).unwrap();

    handle.cancel();
    assert_eq!(handle.state(), DelayState::Fired);
    assert_eq!(completion.outcome().await, Outcome::Fired);
}

#[tokio::test]
/// A settled cell can be armed again once the previous parts are dropped.
async fn test_cell_can_be_rearmed() {
    let now = Cell::new(0);
    let mut cell = DelayCell::<NoopRawMutex>::new();
    {
        let (_completion, handle) = start(&mut cell, ManualEngine::on(&now), 5.0).unwrap();
        handle.cancel();
    }
    assert_eq!(cell.state(), Some(DelayState::Cancelled));

    let (completion, handle) = start(&mut cell, ManualEngine::on(&now), 5.0).unwrap();
    assert_eq!(handle.state(), DelayState::Pending);
    assert_eq!(completion.outcome().await, Outcome::Fired);
}
