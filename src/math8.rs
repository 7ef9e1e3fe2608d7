//! 8-bit fixed point helpers.

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Blend two 8-bit values
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation, clippy::cast_lossless)]
pub const fn blend8(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let delta = b as i16 - a as i16;

    let mut partial: u32 = (a as u32) << 16;
    partial = partial.wrapping_add(
        (delta as u32)
            .wrapping_mul(amount_of_b as u32)
            .wrapping_mul(257),
    );
    partial = partial.wrapping_add(0x8000);

    (partial >> 16) as u8
}

/// Linear interpolation with an integer weight `step / steps`.
///
/// `step` is clamped to `steps`; zero `steps` yields `b`.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
pub const fn lerp_steps(a: u8, b: u8, step: u32, steps: u32) -> u8 {
    if steps == 0 || step >= steps {
        return b;
    }
    let a = a as u64;
    let b = b as u64;
    let (step, steps) = (step as u64, steps as u64);
    ((a * (steps - step) + b * step) / steps) as u8
}

/// Clamp a wide value into the 8-bit channel range.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn clamp8(value: i32) -> u8 {
    if value < 0 {
        0
    } else if value > 255 {
        255
    } else {
        value as u8
    }
}
