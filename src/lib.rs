#![no_std]

pub mod color;
pub mod delay_queue;
pub mod error;
pub mod frame;
pub mod frame_scheduler;
pub mod math8;
pub mod profile;
pub mod smoothing;
pub mod transition;

pub use delay_queue::DelayQueue;
pub use error::SmoothingError;
pub use frame::Frame;
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use profile::{Profile, ProfileId, ProfileRegistry};
pub use smoothing::{
    DEFAULT_SETTLING_TIME, DEFAULT_UPDATE_FREQUENCY_HZ, LinearSmoothing, SmoothingConfig,
    SmoothingPhase,
};
pub use transition::{FrameTransition, interpolate};

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Failure reported by an [`OutputDriver`].
///
/// Carries no details: the status is only used for logging and is never
/// retried by the smoothing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverError;

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The smoothing engine is generic over this trait and implements it
/// itself, so it can be placed in front of any driver transparently.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]) -> Result<(), DriverError>;

    /// Extinguish the output immediately
    fn switch_off(&mut self) -> Result<(), DriverError>;

    /// Driver-level enable flag
    fn enabled(&self) -> bool {
        true
    }
}
