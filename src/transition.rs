use embassy_time::{Duration, Instant};

use crate::color::{Rgb, lerp_color};
use crate::frame::{Frame, frame_from_slice};
use crate::math8::progress;

/// Interpolate between two frames
///
/// Returns `target` unchanged once `elapsed` reaches `settling_time`, so a
/// finished ramp carries no rounding residue. A zero settling time is a step.
pub fn interpolate<const N: usize>(
    previous: &Frame<N>,
    target: &Frame<N>,
    elapsed: Duration,
    settling_time: Duration,
) -> Frame<N> {
    let fraction = progress(elapsed, settling_time);
    if fraction >= 1.0 {
        return target.clone();
    }

    previous
        .iter()
        .zip(target.iter())
        .map(|(&from, &to)| lerp_color(from, to, fraction))
        .collect()
}

/// Linear ramp between two frames
///
/// The ramp starts at the output that was current when the target was set,
/// and reaches the target after the settling time.
#[derive(Debug, Clone)]
pub struct FrameTransition<const N: usize> {
    /// Output at the moment the target was set
    source: Frame<N>,
    /// Time at which `source` was captured
    source_time: Instant,
    /// Frame the ramp converges to
    target: Frame<N>,
    /// Time at which the target was set
    target_time: Instant,
}

impl<const N: usize> FrameTransition<N> {
    /// Create a settled transition holding `initial`
    ///
    /// Returns `None` if `initial` has more than `N` colors.
    pub fn new(initial: &[Rgb], now: Instant) -> Option<Self> {
        let frame = frame_from_slice(initial)?;
        Some(Self {
            source: frame.clone(),
            source_time: now,
            target: frame,
            target_time: now,
        })
    }

    /// Number of LEDs in the ramp
    pub fn len(&self) -> usize {
        self.target.len()
    }

    /// Check if the ramp covers no LEDs
    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Frame the ramp converges to
    pub fn target(&self) -> &Frame<N> {
        &self.target
    }

    /// Timestamp of the current ramp start
    pub fn source_time(&self) -> Instant {
        self.source_time
    }

    /// Timestamp of the last target change
    pub fn target_time(&self) -> Instant {
        self.target_time
    }

    /// Time elapsed since the target was set
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.target_time)
    }

    /// Start a new ramp from the current output towards `target`
    ///
    /// `target` must have the same length as the ramp.
    pub fn set(&mut self, target: Frame<N>, settling_time: Duration, now: Instant) {
        self.source = self.current(now, settling_time);
        self.source_time = now;
        self.target = target;
        self.target_time = now;
    }

    /// Interpolated frame at `now`
    pub fn current(&self, now: Instant, settling_time: Duration) -> Frame<N> {
        interpolate(
            &self.source,
            &self.target,
            self.elapsed(now),
            settling_time,
        )
    }

    /// Check if the ramp has reached its target
    pub fn is_settled(&self, now: Instant, settling_time: Duration) -> bool {
        self.elapsed(now) >= settling_time
    }
}
