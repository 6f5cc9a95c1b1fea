//! Cancellable delay: a deferred completion signal plus the handle that can
//! cancel it before it fires.
//!
//! The caller provides the storage ([`DelayCell`]) and the scheduling engine.
//! [`start`] validates the request, fixes the deadline and splits the armed
//! cell into two parts:
//!
//! * a [`Completion`] that resolves once, with no payload, when the deadline
//!   elapses;
//! * a [`DelayHandle`] the owner uses to cancel it.
//!
//! Leaving `Pending` happens under a blocking mutex and is decided by the
//! engine clock: a delay whose deadline has been reached is `Fired`, whoever
//! observes it first, and a cancellation before that point always wins. No
//! allocation is performed and there is no dependency on a particular executor.
use core::cell::Cell;

use embassy_sync::{
    blocking_mutex::{raw::RawMutex, Mutex},
    signal::Signal,
};
use futures_util::{
    future::{select, Either},
    pin_mut,
};

use crate::core::{DelayMs, DelayState, Outcome};
use crate::engine::{Clock, SchedulingEngine};
use crate::error::DelayError;

/// Wait for several delays at once.
pub mod all;
/// Race two pending delays against each other.
pub mod race;
/// Fixed chains of delays awaited one after another.
pub mod sequence;
/// One-shot "wait this long" helper.
pub mod sleep;

pub use all::all;
pub use race::{race, Winner};
pub use sequence::Sequence;
pub use sleep::sleep;

/// Completion and handle returned by [`start`] for engine `T`.
pub type Started<'a, M, T> = (
    Completion<'a, M, T>,
    DelayHandle<'a, M, <T as SchedulingEngine>::Clock>,
);

#[derive(Debug, Clone, Copy)]
struct Slot {
    /// `None` until the cell is armed for the first time.
    state: Option<DelayState>,
    duration: DelayMs,
    deadline_ms: u64,
}

impl Slot {
    const IDLE: Self = Self {
        state: None,
        duration: DelayMs::ZERO,
        deadline_ms: 0,
    };
}

/// Storage backing one delay at a time.
///
/// `M` selects the locking discipline: `NoopRawMutex` when the completion
/// and the handle stay on one executor, `CriticalSectionRawMutex` when they
/// are split across tasks or interrupt priorities.
pub struct DelayCell<M: RawMutex> {
    slot: Mutex<M, Cell<Slot>>,
    settled: Signal<M, ()>,
}

impl<M: RawMutex> DelayCell<M> {
    /// Empty cell, never armed.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(Slot::IDLE)),
            settled: Signal::new(),
        }
    }

    /// State last recorded for the delay started on this cell, `None` if the
    /// cell has never been armed.
    ///
    /// Without a clock the cell cannot tell that a deadline passed unobserved;
    /// [`DelayHandle::state`] can.
    pub fn state(&self) -> Option<DelayState> {
        self.snapshot().state
    }

    fn snapshot(&self) -> Slot {
        self.slot.lock(|slot| slot.get())
    }

    fn arm(&self, duration: DelayMs, deadline_ms: u64) {
        self.settled.reset();
        self.slot.lock(|slot| {
            slot.set(Slot {
                state: Some(DelayState::Pending),
                duration,
                deadline_ms,
            })
        });
    }

    /// Leave `Pending`. A deadline already reached at `now_ms` settles as
    /// `Fired` whatever was requested; otherwise `requested` is applied, if any.
    ///
    /// Returns the state held afterwards.
    fn settle(&self, requested: Option<Outcome>, now_ms: u64) -> Option<DelayState> {
        self.slot.lock(|slot| {
            let mut current = slot.get();
            if current.state != Some(DelayState::Pending) {
                return current.state;
            }

            let next = if now_ms >= current.deadline_ms {
                DelayState::Fired
            } else {
                match requested {
                    Some(outcome) => outcome.into(),
                    None => return current.state,
                }
            };
            current.state = Some(next);
            slot.set(current);
            Some(next)
        })
    }
}

impl<M: RawMutex> Default for DelayCell<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Deadline on a truncating millisecond clock that is never reached before
/// `duration` has fully elapsed: `now_ms` may lag the true time by up to 1 ms.
fn deadline_after(now_ms: u64, duration: DelayMs) -> u64 {
    match duration.as_millis() {
        0 => now_ms,
        millis => now_ms.saturating_add(millis).saturating_add(1),
    }
}

/// Request a delay of `duration_ms` milliseconds on `cell`.
///
/// Fails with [`DelayError::InvalidArgument`] for negative or non-finite
/// durations; in that case the engine is not consulted and the cell is left
/// untouched. Returns immediately: waiting happens only when the caller
/// awaits the returned [`Completion`].
pub fn start<'a, M: RawMutex, T: SchedulingEngine>(
    cell: &'a mut DelayCell<M>,
    engine: T,
    duration_ms: f64,
) -> Result<Started<'a, M, T>, DelayError> {
    let duration = match DelayMs::try_from(duration_ms) {
        Ok(duration) => duration,
        Err(err) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("Rejected delay request: {}", err);
            return Err(err);
        }
    };

    Ok(start_for(cell, engine, duration))
}

/// Infallible form of [`start`] for an already validated duration.
pub fn start_for<'a, M: RawMutex, T: SchedulingEngine>(
    cell: &'a mut DelayCell<M>,
    engine: T,
    duration: DelayMs,
) -> Started<'a, M, T> {
    let deadline_ms = deadline_after(engine.clock().now_ms(), duration);
    start_until(cell, engine, duration, deadline_ms)
}

/// Arm `cell` with a deadline computed by the caller.
pub(crate) fn start_until<'a, M: RawMutex, T: SchedulingEngine>(
    cell: &'a mut DelayCell<M>,
    engine: T,
    duration: DelayMs,
    deadline_ms: u64,
) -> Started<'a, M, T> {
    cell.arm(duration, deadline_ms);

    #[cfg(feature = "defmt")]
    defmt::debug!("Delay armed: {}, deadline at {} ms", duration, deadline_ms);

    // The exclusive borrow keeps the cell from being re-armed while either part lives.
    let cell: &'a DelayCell<M> = cell;
    let clock = engine.clock();
    (Completion { cell, engine }, DelayHandle { cell, clock })
}

/// One-shot completion signal of a started delay.
#[must_use = "a delay only elapses while its completion is awaited"]
pub struct Completion<'a, M: RawMutex, T: SchedulingEngine> {
    cell: &'a DelayCell<M>,
    engine: T,
}

impl<'a, M: RawMutex, T: SchedulingEngine> Completion<'a, M, T> {
    /// Resolve once the deadline has elapsed.
    ///
    /// If the delay is cancelled, before or while this future is pending, it
    /// never resolves. Use [`Completion::outcome`] to observe cancellation instead.
    pub async fn wait(self) {
        if self.outcome().await == Outcome::Cancelled {
            core::future::pending::<()>().await;
        }
    }

    /// Wait for the delay to settle and report how it ended.
    pub async fn outcome(mut self) -> Outcome {
        let clock = self.engine.clock();
        let settled = match self.cell.settle(None, clock.now_ms()) {
            Some(DelayState::Pending) => {
                let remaining = self
                    .cell
                    .snapshot()
                    .deadline_ms
                    .saturating_sub(clock.now_ms());
                let expired = {
                    let expiry = self.engine.delay_ms(remaining);
                    let woken = self.cell.settled.wait();
                    pin_mut!(expiry);
                    pin_mut!(woken);

                    // `select` resolves with whichever future completes first (expiry or handle).
                    matches!(select(expiry, woken).await, Either::Left(_))
                };

                if expired {
                    self.cell.settle(Some(Outcome::Fired), clock.now_ms())
                } else {
                    self.cell.state()
                }
            }
            state => state,
        };

        if settled == Some(DelayState::Fired) {
            #[cfg(feature = "defmt")]
            defmt::debug!("Delay fired at {} ms", clock.now_ms());
            Outcome::Fired
        } else {
            #[cfg(feature = "defmt")]
            defmt::trace!("Delay settled as cancelled");
            Outcome::Cancelled
        }
    }
}

/// Exclusive cancellation handle of a started delay. Not `Clone`: only the
/// party that requested the delay may cancel it.
///
/// The handle keeps the engine clock, so an elapsed deadline counts as fired
/// even when no one is awaiting the completion.
pub struct DelayHandle<'a, M: RawMutex, C: Clock> {
    cell: &'a DelayCell<M>,
    clock: C,
}

impl<'a, M: RawMutex, C: Clock> DelayHandle<'a, M, C> {
    /// Cancel the delay if it is still pending.
    ///
    /// Once this returns the completion is guaranteed never to resolve, unless
    /// the deadline had already elapsed: then the delay has fired and this
    /// does nothing, as for an already cancelled delay.
    pub fn cancel(&self) {
        let state = self
            .cell
            .settle(Some(Outcome::Cancelled), self.clock.now_ms());
        // Wake a waiting completion so it returns the recorded state.
        self.cell.settled.signal(());

        #[cfg(feature = "defmt")]
        match state {
            Some(DelayState::Cancelled) => defmt::info!("Delay cancelled"),
            _ => defmt::trace!("Cancel ignored, delay already fired"),
        }
        #[cfg(not(feature = "defmt"))]
        let _ = state;
    }

    /// Current state of the delay, recording the expiry if the deadline has passed.
    pub fn state(&self) -> DelayState {
        self.cell
            .settle(None, self.clock.now_ms())
            .unwrap_or(DelayState::Pending)
    }

    /// Requested duration, rounded up to whole milliseconds.
    pub fn duration(&self) -> DelayMs {
        self.cell.snapshot().duration
    }

    /// Engine time (ms) from which the delay counts as fired.
    pub fn deadline_ms(&self) -> u64 {
        self.cell.snapshot().deadline_ms
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
