//! Unified error type for hunterbit.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Hunt
    /// The host did not produce a sensor reading.
    SensorUnavailable,

    /// A reading outside the 0..=10 scan range (still rendered, clamped).
    OutOfRangeReading(i32),

    /// The host did not acknowledge a transmit or decode request.
    TransmitFailure,

    // Host link
    /// UART read/write failed.
    Serial,

    /// A frame from the host was malformed.
    Protocol,

    /// No reply within `HOST_REPLY_TIMEOUT_MS`.
    Timeout,

    // Motion
    /// I²C transaction to the accelerometer failed.
    Accelerometer,

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,
}

impl Error {
    /// Collapse a transport failure into what a sensor probe reports.
    pub fn as_probe_failure(self) -> Self {
        match self {
            Error::OutOfRangeReading(_) => self,
            _ => Error::SensorUnavailable,
        }
    }

    /// Collapse a transport failure into what a transmit/decode reports.
    pub fn as_transmit_failure(self) -> Self {
        Error::TransmitFailure
    }
}
