use heapless::Vec;

use super::{FAST_FRAME_DELAY_MS, Strategy};
use crate::color::{PixelExt, WHITE};
use crate::frame::Frame;
use crate::layout::Layout;
use crate::rng::Rng64;

const MAX_GROUPS: usize = 8;

const REST_LEVEL: u16 = 64;
const PEAK_LEVEL: u16 = 512;
const SLOW_DECAY_ABOVE: u16 = 384;

/// Region groups resting at a dim level, with one group occasionally
/// flashing toward white and decaying back.
///
/// Levels above 256 blend the base colour toward white; levels at or below
/// 256 fade it.
#[derive(Debug, Clone)]
pub struct Pulsing<'a> {
    layout: &'a Layout<'a>,
    levels: Vec<u16, MAX_GROUPS>,
    rng: Rng64,
}

impl<'a> Pulsing<'a> {
    pub fn new(layout: &'a Layout<'a>, seed: u64) -> Self {
        let mut levels = Vec::new();
        for _ in layout.groups.iter().take(MAX_GROUPS) {
            let _ = levels.push(REST_LEVEL);
        }
        Self {
            layout,
            levels,
            rng: Rng64::new(seed),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn level_to_u8(level: u16) -> u8 {
    level.min(255) as u8
}

impl Strategy for Pulsing<'_> {
    fn draw_frame(&mut self, frame: &mut Frame<'_>, _frame_counter: u32) -> u32 {
        if self.rng.next_u32() & 0xFF == 0 && !self.levels.is_empty() {
            let group = self.rng.below(self.levels.len());
            self.levels[group] = PEAK_LEVEL;
        }

        frame.clear();
        for (group, level) in self.layout.groups.iter().zip(self.levels.iter_mut()) {
            for part in *group {
                let color = if *level > 256 {
                    part.color.blend(WHITE, level_to_u8(*level - 256))
                } else {
                    part.color.fade(level_to_u8(*level))
                }
                .gamma_corrected();
                for index in part.indices() {
                    frame.set(index, color);
                }
            }

            if *level > SLOW_DECAY_ABOVE {
                *level -= 4;
            } else if *level > REST_LEVEL {
                *level -= 16;
            }
        }

        FAST_FRAME_DELAY_MS
    }
}
