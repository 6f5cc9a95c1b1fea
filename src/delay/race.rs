//! First-to-fire race between two started delays (the `Promise.race` shape),
//! with the losing delay cancelled through its handle.
use embassy_sync::blocking_mutex::raw::RawMutex;
use futures_util::{
    future::{select, Either},
    pin_mut,
};

use super::Started;
use crate::engine::SchedulingEngine;

/// Which side of a [`race`] fired first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Winner {
    /// The delay passed as `first` fired first (or tied).
    First,
    /// The delay passed as `second` fired strictly first.
    Second,
}

/// Await two delays and return the one that fires first.
///
/// Both handles are taken over, so neither delay can be cancelled from
/// outside while the race runs. The loser is cancelled before returning.
/// When both deadlines elapse on the same poll, `first` wins.
pub async fn race<'a, 'b, M, N, T, U>(
    first: Started<'a, M, T>,
    second: Started<'b, N, U>,
) -> Winner
where
    M: RawMutex,
    N: RawMutex,
    T: SchedulingEngine,
    U: SchedulingEngine,
{
    let (first_completion, first_handle) = first;
    let (second_completion, second_handle) = second;

    let first_done = first_completion.wait();
    let second_done = second_completion.wait();
    pin_mut!(first_done);
    pin_mut!(second_done);

    match select(first_done, second_done).await {
        Either::Left(_) => {
            second_handle.cancel();
            #[cfg(feature = "defmt")]
            defmt::debug!("Race won by the first delay ({})", first_handle.duration());
            Winner::First
        }
        Either::Right(_) => {
            first_handle.cancel();
            #[cfg(feature = "defmt")]
            defmt::debug!("Race won by the second delay ({})", second_handle.duration());
            Winner::Second
        }
    }
}
