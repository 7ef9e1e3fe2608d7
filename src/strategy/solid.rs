//! Static fills.

use super::{STATIC_FRAME_DELAY_MS, Strategy};
use crate::color::{PixelExt, Rgb};
use crate::frame::Frame;
use crate::layout::Layout;

/// Fills every pixel with one colour.
#[derive(Debug, Clone)]
pub struct SolidColor {
    color: Rgb,
}

impl SolidColor {
    /// `color` is written as given; pass an already gamma-corrected colour.
    pub const fn new(color: Rgb) -> Self {
        Self { color }
    }
}

impl Strategy for SolidColor {
    fn draw_frame(&mut self, frame: &mut Frame<'_>, _frame_counter: u32) -> u32 {
        frame.fill(self.color);
        STATIC_FRAME_DELAY_MS
    }
}

/// Every region in its own base colour, faded by a brightness.
#[derive(Debug, Clone)]
pub struct SolidFigure<'a> {
    layout: &'a Layout<'a>,
    brightness: u8,
}

impl<'a> SolidFigure<'a> {
    pub const fn new(layout: &'a Layout<'a>, brightness: u8) -> Self {
        Self { layout, brightness }
    }
}

impl Strategy for SolidFigure<'_> {
    fn draw_frame(&mut self, frame: &mut Frame<'_>, _frame_counter: u32) -> u32 {
        frame.clear();
        for part in self.layout.parts {
            let color = part.color.fade(self.brightness).gamma_corrected();
            for index in part.indices() {
                frame.set(index, color);
            }
        }
        STATIC_FRAME_DELAY_MS
    }
}
