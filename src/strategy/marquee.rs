use super::Strategy;
use crate::color::{PixelExt, Rgb};
use crate::frame::Frame;
use crate::layout::Position;

const MAGENTA: Rgb = Rgb { r: 200, g: 0, b: 200 };
const CYAN: Rgb = Rgb { r: 0, g: 200, b: 200 };

const MARQUEE_FRAME_DELAY_MS: u32 = 10;

/// 16 pixel wide stripes scrolling across the figure's 2D layout.
///
/// Stripes run along x for 2048 frames, then along y. Pixels without a
/// position stay dark.
#[derive(Debug, Clone)]
pub struct Marquee<'a> {
    positions: &'a [Position],
}

impl<'a> Marquee<'a> {
    pub const fn new(positions: &'a [Position]) -> Self {
        Self { positions }
    }
}

impl Strategy for Marquee<'_> {
    fn draw_frame(&mut self, frame: &mut Frame<'_>, frame_counter: u32) -> u32 {
        let offset = frame_counter & 31;
        let along_y = frame_counter & 0x800 != 0;
        let stripe = MAGENTA.gamma_corrected();
        let gap = CYAN.gamma_corrected();

        frame.clear();
        for (index, position) in self.positions.iter().enumerate().take(frame.len()) {
            let axis = if along_y { position.y } else { position.x };
            let color = if (u32::from(axis) + offset) & 0x10 != 0 {
                stripe
            } else {
                gap
            };
            frame.set(index, color);
        }

        MARQUEE_FRAME_DELAY_MS
    }
}
