use super::{FAST_FRAME_DELAY_MS, Strategy};
use crate::color::Rgb;
use crate::frame::Frame;
use crate::rng::Rng64;

/// Coloured drops that smear out and fade.
///
/// Each frame is a blur of the previously transmitted frame, so drops spread
/// to their neighbours (wrapping at the ends) and decay over time.
#[derive(Debug, Clone)]
pub struct RandomDrops {
    rng: Rng64,
}

impl RandomDrops {
    pub const fn new(seed: u64) -> Self {
        Self {
            rng: Rng64::new(seed),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn drop_color(&mut self) -> Rgb {
        let mut color = match self.rng.below(3) {
            0 => Rgb { r: 127, g: 0, b: 0 },
            1 => Rgb { r: 0, g: 127, b: 0 },
            _ => Rgb {
                r: 127,
                g: 127,
                b: 127,
            },
        };
        color.r += (self.rng.next_u32() & 127) as u8;
        color.g += (self.rng.next_u32() & 127) as u8;
        color.b += (self.rng.next_u32() & 127) as u8;
        color
    }
}

#[allow(clippy::cast_possible_truncation)]
fn blur(left: u8, center: u8, right: u8) -> u8 {
    ((u16::from(left) + 2 * u16::from(center) + u16::from(right)) / 4) as u8
}

impl Strategy for RandomDrops {
    fn draw_frame(&mut self, frame: &mut Frame<'_>, _frame_counter: u32) -> u32 {
        let len = frame.len();
        for x in 0..len {
            let left = frame.previous((x + len - 1) % len);
            let center = frame.previous(x);
            let right = frame.previous((x + 1) % len);
            let mut color = Rgb {
                r: blur(left.r, center.r, right.r),
                g: blur(left.g, center.g, right.g),
                b: blur(left.b, center.b, right.b),
            };
            if self.rng.next_u32() & 1023 == 100 {
                color = self.drop_color();
            }
            frame.set(x, color);
        }
        FAST_FRAME_DELAY_MS
    }
}
