//! Wait for every delay of a batch (the `Promise.all` shape). The delays run
//! concurrently, so the batch completes with the longest one.
use embassy_futures::join::join_array;
use embassy_sync::blocking_mutex::raw::RawMutex;

use super::Started;
use crate::engine::SchedulingEngine;

/// Await `N` started delays concurrently and resolve once all of them fired.
///
/// The handles are taken over, so no delay of the batch can be cancelled
/// while it runs. An empty batch resolves immediately.
pub async fn all<'a, M, T, const N: usize>(delays: [Started<'a, M, T>; N])
where
    M: RawMutex,
    T: SchedulingEngine,
{
    #[cfg(feature = "defmt")]
    defmt::debug!("Waiting for {} delays", N);

    // Dropping a handle leaves its delay running; only the completions are needed.
    let completions = delays.map(|(completion, _handle)| completion.wait());
    join_array(completions).await;
}
