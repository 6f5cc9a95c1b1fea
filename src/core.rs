//! Core data types shared by the delay primitive, its helpers, and the
//! scheduling engines: validated durations, handle states, and outcomes.
use crate::error::DelayError;

/// Requested delay, in whole milliseconds.
///
/// Built from a caller-supplied `f64` through [`TryFrom`], which rejects
/// negative and non-finite values. Fractional milliseconds are rounded up so
/// that a delay never completes before the requested amount of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DelayMs(u64);

impl DelayMs {
    /// Zero-length delay: completes on the first poll of the engine timer.
    pub const ZERO: Self = Self(0);
    /// Longest representable delay. Larger finite requests saturate here.
    pub const MAX: Self = Self(u64::MAX);

    /// Build a delay from an already valid integral millisecond count.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Millisecond count carried by this delay.
    pub const fn as_millis(self) -> u64 {
        self.0
    }
}

impl TryFrom<f64> for DelayMs {
    type Error = DelayError;

    fn try_from(duration_ms: f64) -> Result<Self, Self::Error> {
        // NaN fails the comparison as well.
        if !duration_ms.is_finite() || !(duration_ms >= 0.0) {
            return Err(DelayError::InvalidArgument { duration_ms });
        }

        // `as` saturates; `ceil` is not available in `core`.
        let whole = duration_ms as u64;
        if (whole as f64) < duration_ms {
            Ok(Self(whole.saturating_add(1)))
        } else {
            Ok(Self(whole))
        }
    }
}

impl From<u32> for DelayMs {
    fn from(millis: u32) -> Self {
        Self(millis as u64)
    }
}

impl core::fmt::Display for DelayMs {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ms", self.0)
    }
}

/// Lifecycle of a started delay.
///
/// `Pending` is the only non-terminal state; a delay leaves it exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DelayState {
    /// Armed, neither expired nor cancelled yet.
    Pending,
    /// The deadline elapsed.
    Fired,
    /// The owner cancelled the delay before it fired.
    Cancelled,
}

impl DelayState {
    /// `true` for `Fired` and `Cancelled`.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, DelayState::Pending)
    }
}

/// How a completion ended, reported by [`Completion::outcome`](crate::delay::Completion::outcome).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// The deadline elapsed.
    Fired,
    /// The owner cancelled the delay first.
    Cancelled,
}

impl From<Outcome> for DelayState {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Fired => DelayState::Fired,
            Outcome::Cancelled => DelayState::Cancelled,
        }
    }
}
