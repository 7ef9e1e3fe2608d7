use super::{EDIT_PREVIEW_DELAY_MS, Strategy};
use crate::color::Rgb;
use crate::frame::Frame;

/// Raw snapshot of a pattern being edited, shown as-is.
#[derive(Debug, Clone)]
pub struct EditPreview<const N: usize> {
    pixels: [Rgb; N],
}

impl<const N: usize> EditPreview<N> {
    pub const fn new(pixels: [Rgb; N]) -> Self {
        Self { pixels }
    }
}

impl<const N: usize> Strategy for EditPreview<N> {
    fn draw_frame(&mut self, frame: &mut Frame<'_>, _frame_counter: u32) -> u32 {
        for (index, pixel) in self.pixels.iter().enumerate() {
            frame.set(index, *pixel);
        }
        EDIT_PREVIEW_DELAY_MS
    }
}
