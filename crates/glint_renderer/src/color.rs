//! Linear RGBA color and byte packing.

use glint_math::Vec4;

/// Linear RGBA color. Channels are unbounded while shading and clamped
/// only when packed into bytes.
pub type Color = Vec4;

/// Pack a linear channel value into a byte without any transfer curve.
#[inline]
pub fn linear_to_byte(value: f32) -> u8 {
    let value = value.clamp(0.0, 1.0);
    (value * 255.0 + 0.5) as u8
}

/// Pack a linear channel value into a byte using the sRGB transfer curve.
#[inline]
pub fn srgb_to_byte(value: f32) -> u8 {
    let value = value.clamp(0.0, 1.0);
    let encoded = if value <= 0.0031308 {
        value * 12.92
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0 + 0.5) as u8
}
