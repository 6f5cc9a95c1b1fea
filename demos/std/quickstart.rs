//! # Quickstart Example
//!
//! Minimal tour of korri-delay on a desktop executor:
//! - Start a delay and await it
//! - Cancel a delay before it fires
//! - Reject an invalid duration
//! - Chain, race, and join delays
//!
//! This example uses `std` and tokio as the scheduling engine.
//!
//! ```bash
//! cargo run --example quickstart
//! ```

use std::ops::ControlFlow;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use korri_delay::{
    all, race, start, Clock, DelayCell, DelayError, Outcome, SchedulingEngine, Sequence, Winner,
};
use tokio::time::{sleep, Duration, Instant};

/// Scheduling engine backed by `tokio::time`.
#[derive(Clone, Copy)]
struct TokioEngine {
    origin: Instant,
}

impl Clock for TokioEngine {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

impl SchedulingEngine for TokioEngine {
    type Clock = Self;

    fn clock(&self) -> Self::Clock {
        *self
    }

    async fn delay_ms(&mut self, millis: u64) {
        sleep(Duration::from_millis(millis)).await;
    }
}

#[tokio::main]
async fn main() -> Result<(), DelayError> {
    println!("=== korri-delay Quickstart ===\n");
    let engine = TokioEngine {
        origin: Instant::now(),
    };

    // ======================================================================
    // 1. Start a delay and wait for it
    // ======================================================================
    println!("1. Waiting 500 ms");

    let mut cell = DelayCell::<NoopRawMutex>::new();
    let (completion, handle) = start(&mut cell, engine, 500.0)?;
    println!("   Deadline: {} ms", handle.deadline_ms());
    completion.wait().await;
    println!("   State: {:?} at {} ms\n", handle.state(), engine.now_ms());

    // ======================================================================
    // 2. Cancel before it fires
    // ======================================================================
    println!("2. Cancelling a 1 s delay after 200 ms");

    let mut cell = DelayCell::<NoopRawMutex>::new();
    let (completion, handle) = start(&mut cell, engine, 1000.0)?;
    let (outcome, _) = tokio::join!(completion.outcome(), async {
        sleep(Duration::from_millis(200)).await;
        handle.cancel();
        handle.cancel(); // Idempotent
    });
    assert_eq!(outcome, Outcome::Cancelled);
    println!("   Outcome: {:?} at {} ms\n", outcome, engine.now_ms());

    // ======================================================================
    // 3. Invalid durations are rejected synchronously
    // ======================================================================
    println!("3. Requesting -5 ms");

    let mut cell = DelayCell::<NoopRawMutex>::new();
    match start(&mut cell, engine, -5.0) {
        Ok(_) => println!("   Unexpectedly accepted"),
        Err(err) => println!("   Rejected: {}\n", err),
    }

    // ======================================================================
    // 4. Chain delays instead of nesting callbacks
    // ======================================================================
    println!("4. Running three 300 ms steps");

    let steps = Sequence::new(engine, [300.0, 300.0, 300.0])?;
    let completed = steps
        .run(|index, step| {
            println!("   Step {} completed ({})", index + 1, step);
            ControlFlow::Continue(())
        })
        .await;
    println!("   {} steps done\n", completed);

    // ======================================================================
    // 5. Race two delays
    // ======================================================================
    println!("5. Racing 100 ms against 300 ms");

    let mut fast = DelayCell::<NoopRawMutex>::new();
    let mut slow = DelayCell::<NoopRawMutex>::new();
    let winner = race(
        start(&mut fast, engine, 100.0)?,
        start(&mut slow, engine, 300.0)?,
    )
    .await;
    assert_eq!(winner, Winner::First);
    println!("   Winner: {:?}, loser state: {:?}\n", winner, slow.state());

    // ======================================================================
    // 6. Wait for several delays at once
    // ======================================================================
    println!("6. Waiting for 100, 300 and 200 ms together");

    let mut first = DelayCell::<NoopRawMutex>::new();
    let mut second = DelayCell::<NoopRawMutex>::new();
    let mut third = DelayCell::<NoopRawMutex>::new();
    let before = engine.now_ms();
    all([
        start(&mut first, engine, 100.0)?,
        start(&mut second, engine, 300.0)?,
        start(&mut third, engine, 200.0)?,
    ])
    .await;
    println!("   All done after {} ms", engine.now_ms() - before);

    println!("\n=== Quickstart complete ===");
    Ok(())
}
