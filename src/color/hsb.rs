//! Hue/saturation/brightness conversion.
//!
//! Hue is in degrees `[0, 360)`, saturation in percent `[0, 100]` and
//! brightness on the 8-bit channel scale `[0, 255]`. These are the units the
//! light state and the messaging surface speak.

use libm::{fabsf, fmodf, roundf};

use super::Rgb;

/// Convert hue (degrees), saturation (percent) and brightness to RGB.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: u8) -> Rgb {
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let v = f32::from(brightness) / 255.0;

    let chroma = v * s;
    let x = chroma * (1.0 - fabsf(fmodf(hue / 60.0, 2.0) - 1.0));
    let m = v - chroma;

    let (r, g, b) = if hue < 60.0 {
        (chroma, x, 0.0)
    } else if hue < 120.0 {
        (x, chroma, 0.0)
    } else if hue < 180.0 {
        (0.0, chroma, x)
    } else if hue < 240.0 {
        (0.0, x, chroma)
    } else if hue < 300.0 {
        (x, 0.0, chroma)
    } else {
        (chroma, 0.0, x)
    };

    let channel = |c: f32| roundf((c + m) * 255.0).clamp(0.0, 255.0) as u8;
    Rgb {
        r: channel(r),
        g: channel(g),
        b: channel(b),
    }
}

/// Convert RGB to `(hue, saturation, brightness)`.
///
/// Hue is 0 for greys. Saturation is 0 when the colour is black.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::float_cmp)]
pub fn rgb_to_hsb(color: Rgb) -> (f32, f32, u8) {
    let r = f32::from(color.r) / 255.0;
    let g = f32::from(color.g) / 255.0;
    let b = f32::from(color.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let mut hue = 0.0;
    if delta != 0.0 {
        if max == r {
            hue = 60.0 * fmodf((g - b) / delta, 6.0);
        } else if max == g {
            hue = 60.0 * ((b - r) / delta + 2.0);
        } else {
            hue = 60.0 * ((r - g) / delta + 4.0);
        }
    }
    if hue < 0.0 {
        hue += 360.0;
    }

    let saturation = if max == 0.0 { 0.0 } else { delta / max };
    let brightness = roundf(max * 255.0).clamp(0.0, 255.0) as u8;

    (hue, saturation * 100.0, brightness)
}
