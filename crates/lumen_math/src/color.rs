//! Color conversions between linear radiance and displayable 8-bit values.

use crate::{Interval, Vec3};

/// Color type alias (linear RGB, typically 0-1 but unbounded for radiance)
pub type Color = Vec3;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Encode a linear channel with the sRGB transfer curve.
#[inline]
pub fn linear_to_srgb(linear: f32) -> f32 {
    if linear <= 0.003_130_8 {
        linear.max(0.0) * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Clamp a value to [0, 1] range. NaN maps to 0.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        Interval::UNIT.clamp(x)
    }
}

/// Quantize an already tone-mapped color to 8-bit RGBA with opaque alpha.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let r = (255.0 * clamp_01(color.x)) as u8;
    let g = (255.0 * clamp_01(color.y)) as u8;
    let b = (255.0 * clamp_01(color.z)) as u8;
    [r, g, b, 255]
}
