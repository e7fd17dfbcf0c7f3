use core::fmt;

use crate::DriverError;

/// Errors reported by the smoothing engine
///
/// None of them is fatal: the engine keeps its state and keeps ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothingError {
    /// The engine has been switched off
    RejectedAfterShutdown,
    /// Non-positive frequency, zero interval or unsupported output delay
    InvalidProfile,
    /// No room left in the profile registry
    ProfileLimitReached,
    /// Frame is longer than supported or its length changed after the first write
    InvalidFrame,
    /// The output driver rejected a frame
    SinkWriteFailed(DriverError),
}

impl fmt::Display for SmoothingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RejectedAfterShutdown => f.write_str("smoothing is switched off"),
            Self::InvalidProfile => f.write_str("invalid smoothing profile"),
            Self::ProfileLimitReached => f.write_str("smoothing profile limit reached"),
            Self::InvalidFrame => f.write_str("frame length does not match the device"),
            Self::SinkWriteFailed(_) => f.write_str("output driver write failed"),
        }
    }
}

impl From<DriverError> for SmoothingError {
    fn from(error: DriverError) -> Self {
        Self::SinkWriteFailed(error)
    }
}
