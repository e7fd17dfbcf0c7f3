use smart_leds::RGB8;

use crate::math8::lerp8;

pub type Rgb = RGB8;

/// Lowest value of every channel
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Linear blend of two colors, `fraction` of the way from `from` to `to`
pub fn lerp_color(from: Rgb, to: Rgb, fraction: f32) -> Rgb {
    Rgb {
        r: lerp8(from.r, to.r, fraction),
        g: lerp8(from.g, to.g, fraction),
        b: lerp8(from.b, to.b, fraction),
    }
}
