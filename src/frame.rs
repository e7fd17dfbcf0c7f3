//! Fixed-capacity LED frames.

use heapless::Vec;

use crate::color::{BLACK, Rgb};

/// One color per LED, at most `N` LEDs
pub type Frame<const N: usize> = Vec<Rgb, N>;

/// Copy colors into a frame
///
/// Returns `None` if there are more than `N` colors.
pub fn frame_from_slice<const N: usize>(colors: &[Rgb]) -> Option<Frame<N>> {
    Frame::from_slice(colors).ok()
}

/// Frame of `len` LEDs with every channel at its minimum
pub fn off_frame<const N: usize>(len: usize) -> Frame<N> {
    core::iter::repeat_n(BLACK, len.min(N)).collect()
}
