//! Error definitions shared across library modules.
//! The only reportable failure is a request for an invalid duration;
//! cancelling an already settled delay is a no-op, never an error.
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised synchronously when a delay is requested.
pub enum DelayError {
    /// Duration is negative, NaN, or infinite.
    #[error("Invalid argument: duration must be finite and >= 0 ms, got {duration_ms}")]
    InvalidArgument { duration_ms: f64 },
}
