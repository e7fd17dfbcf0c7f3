//! Frame scheduling and timing utilities.
//!
//! Paces [`LinearSmoothing::update_leds_at`] at the active profile's update
//! interval. [`FrameScheduler::tick`] is portable: the caller is responsible
//! for sleeping until the returned deadline. [`FrameScheduler::run`] does the
//! waiting with an `embassy-time` timer.

use embassy_time::{Duration, Instant, Timer};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::error::SmoothingError;
use crate::smoothing::LinearSmoothing;

/// Number of missed firings after which the schedule restarts at `now`.
///
/// Keeps at most one pending tick: a stalled caller never gets a catch-up burst.
pub const MAX_DRIFT_FRAMES: u32 = 1;

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Error reported by this tick, if any. Ticking continues regardless.
    pub error: Option<SmoothingError>,
}

/// Periodic driver of a [`LinearSmoothing`] engine.
///
/// This scheduler:
/// - Re-reads the update interval on every firing, so profile switches change
///   the spacing from the next deadline on
/// - Coalesces missed firings instead of queueing them
/// - Halts once the engine is switched off
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(&smoothing);
///
/// while let Some(result) = scheduler.tick(Instant::from_millis(now_ms())) {
///     // Platform-specific sleep
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct FrameScheduler<'a, O: OutputDriver, const N: usize, const D: usize, const P: usize> {
    smoothing: &'a LinearSmoothing<O, N, D, P>,
    next_frame: Instant,
}

impl<'a, O: OutputDriver, const N: usize, const D: usize, const P: usize>
    FrameScheduler<'a, O, N, D, P>
{
    /// Create a new frame scheduler.
    ///
    /// The first tick fires immediately.
    pub fn new(smoothing: &'a LinearSmoothing<O, N, D, P>) -> Self {
        Self {
            smoothing,
            next_frame: Instant::from_millis(0),
        }
    }

    /// Process one frame and return timing information.
    ///
    /// Returns `None` once the engine has been switched off; the scheduler
    /// is halted from then on.
    pub fn tick(&mut self, now: Instant) -> Option<FrameResult> {
        if self.smoothing.is_switched_off() {
            return None;
        }
        let frame_duration = self.smoothing.update_interval();

        // Drift correction: drop missed firings rather than catching up
        let max_drift = frame_duration * MAX_DRIFT_FRAMES;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        let error = match self.smoothing.update_leds_at(now) {
            Ok(()) => None,
            Err(SmoothingError::RejectedAfterShutdown) => return None,
            Err(error) => {
                #[cfg(feature = "esp32-log")]
                println!("[smoothing] tick failed: {}", error);
                Some(error)
            }
        };

        self.next_frame += frame_duration;

        let sleep_duration = if self.next_frame > now {
            self.next_frame - now
        } else {
            Duration::from_millis(0)
        };

        Some(FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            error,
        })
    }

    /// Tick until the engine is switched off, waiting for each deadline.
    pub async fn run(&mut self) {
        while let Some(result) = self.tick(Instant::now()) {
            Timer::at(result.next_deadline).await;
        }
    }

    /// Get a reference to the engine.
    pub fn smoothing(&self) -> &'a LinearSmoothing<O, N, D, P> {
        self.smoothing
    }
}
