use super::{FAST_FRAME_DELAY_MS, Strategy};
use crate::color::PixelExt;
use crate::frame::Frame;
use crate::layout::{Layout, Region};

/// A window of four consecutive regions walking around the figure.
///
/// The first region of the window fades out while the fourth fades in, with
/// the middle two at full brightness. `speed` is the fade step per frame.
#[derive(Debug, Clone)]
pub struct PartCycle<'a> {
    layout: &'a Layout<'a>,
    speed: u32,
}

impl<'a> PartCycle<'a> {
    pub const fn new(layout: &'a Layout<'a>, speed: u32) -> Self {
        Self { layout, speed }
    }
}

fn paint(frame: &mut Frame<'_>, part: &Region, brightness: u8) {
    let color = part.color.fade(brightness).gamma_corrected();
    for index in part.indices() {
        frame.set(index, color);
    }
}

impl Strategy for PartCycle<'_> {
    #[allow(clippy::cast_possible_truncation)]
    fn draw_frame(&mut self, frame: &mut Frame<'_>, frame_counter: u32) -> u32 {
        frame.clear();
        let parts = self.layout.parts;
        if parts.is_empty() {
            return FAST_FRAME_DELAY_MS;
        }

        let step = frame_counter.wrapping_mul(self.speed);
        let fade = (step % 256) as u8;
        let first = (step / 256) as usize % parts.len();
        let part_at = |offset: usize| &parts[(first + offset) % parts.len()];

        paint(frame, part_at(0), 255 - fade);
        paint(frame, part_at(1), 255);
        paint(frame, part_at(2), 255);
        paint(frame, part_at(3), fade);

        FAST_FRAME_DELAY_MS
    }
}
