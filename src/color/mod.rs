mod gamma;
mod hsb;
mod utils;

pub use gamma::{GAMMA8, gamma8};
pub use hsb::{hsb_to_rgb, rgb_to_hsb};
use smart_leds::RGB8;
pub use utils::{PixelExt, blend_colors};

pub type Rgb = RGB8;

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};
