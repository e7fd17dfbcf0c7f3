use embassy_time::Duration;

/// Linearly interpolate between two 8-bit values
///
/// `fraction` is clamped to `0.0..=1.0`; the result is rounded half away
/// from zero.
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn lerp8(a: u8, b: u8, fraction: f32) -> u8 {
    let fraction = fraction.clamp(0.0, 1.0);
    let start = f32::from(a);
    let value = start + (f32::from(b) - start) * fraction;
    libm::roundf(value).clamp(0.0, 255.0) as u8
}

/// Calculate progress (0.0-1.0) based on elapsed time and duration
///
/// A zero duration is a step: progress is always complete.
#[allow(clippy::cast_precision_loss)]
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.as_ticks() == 0 || elapsed >= duration {
        return 1.0;
    }

    elapsed.as_ticks() as f32 / duration.as_ticks() as f32
}
