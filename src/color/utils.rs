use super::{Rgb, gamma8};
use crate::math8::{blend8, scale8};

/// Per-pixel operations used by the rendering strategies.
pub trait PixelExt: Sized {
    /// Scale every channel by `amount` (255 keeps the colour).
    #[must_use]
    fn fade(self, amount: u8) -> Self;

    /// Move toward `target` by `amount_of_target` (0 keeps `self`).
    #[must_use]
    fn blend(self, target: Self, amount_of_target: u8) -> Self;

    /// Apply the gamma table to every channel.
    ///
    /// Strategies call this once, when a logical colour is written into the
    /// outgoing frame.
    #[must_use]
    fn gamma_corrected(self) -> Self;
}

impl PixelExt for Rgb {
    #[inline]
    fn fade(self, amount: u8) -> Self {
        Rgb {
            r: scale8(self.r, amount),
            g: scale8(self.g, amount),
            b: scale8(self.b, amount),
        }
    }

    #[inline]
    fn blend(self, target: Self, amount_of_target: u8) -> Self {
        blend_colors(self, target, amount_of_target)
    }

    #[inline]
    fn gamma_corrected(self) -> Self {
        Rgb {
            r: gamma8(self.r),
            g: gamma8(self.g),
            b: gamma8(self.b),
        }
    }
}

/// Blend two RGB colors
///
/// # Arguments
/// * `a` - First color
/// * `b` - Second color
/// * `amount_of_b` - Blend factor (0 = all a, 255 = all b)
#[inline]
pub fn blend_colors(a: Rgb, b: Rgb, amount_of_b: u8) -> Rgb {
    Rgb {
        r: blend8(a.r, b.r, amount_of_b),
        g: blend8(a.g, b.g, amount_of_b),
        b: blend8(a.b, b.b, amount_of_b),
    }
}
