//! Cross-fading playback of linked stored patterns.

use super::{Strategy, TRANSITION_FRAME_DELAY_MS};
use crate::color::{BLACK, PixelExt, Rgb};
use crate::frame::Frame;
use crate::math8::lerp_steps;
use crate::pattern::{StoredPattern, load_pattern};
use crate::store::ConfigStore;

/// Delay while there is nothing to show.
pub const MISSING_PATTERN_RETRY_MS: u32 = 1000;

/// Stored transition times are divided by this to get a step count.
const TRANSITION_STEP_DIVISOR: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Transition {
    start_frame: u32,
    steps: u32,
}

/// Shows a stored pattern, then cross-fades along its successor chain.
///
/// While steady the pattern's own frame time is returned. A cross-fade runs
/// at a fixed ~60 Hz cadence regardless of frame times; each step blends the
/// gamma-corrected pixels of the current and next pattern linearly. When the
/// fade completes the successor becomes current and its own successor is
/// looked up in the store.
pub struct PatternSequencer<'a, const N: usize> {
    store: &'a dyn ConfigStore,
    current: Option<StoredPattern<N>>,
    next: Option<StoredPattern<N>>,
    transition: Option<Transition>,
}

impl<'a, const N: usize> PatternSequencer<'a, N> {
    /// Start at the stored pattern `start_id`.
    ///
    /// A missing pattern is not an error: the sequencer draws black.
    pub fn new(store: &'a dyn ConfigStore, start_id: u16) -> Self {
        let current = load_pattern::<N>(store, start_id);
        if current.is_none() {
            log::debug!("patterns: pattern {start_id} not found, showing black");
        }
        Self::from_current(store, current)
    }

    /// Start at an already loaded pattern.
    pub fn with_pattern(store: &'a dyn ConfigStore, pattern: StoredPattern<N>) -> Self {
        Self::from_current(store, Some(pattern))
    }

    fn from_current(store: &'a dyn ConfigStore, current: Option<StoredPattern<N>>) -> Self {
        let mut sequencer = Self {
            store,
            current,
            next: None,
            transition: None,
        };
        sequencer.next = sequencer.current.as_ref().and_then(|p| sequencer.resolve_next(p));
        sequencer
    }

    fn resolve_next(&self, pattern: &StoredPattern<N>) -> Option<StoredPattern<N>> {
        let id = pattern.next_id()?;
        let next = load_pattern::<N>(self.store, id);
        if next.is_none() {
            log::debug!("patterns: successor {id} not found");
        }
        next
    }

    pub fn current(&self) -> Option<&StoredPattern<N>> {
        self.current.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    fn commit(&mut self) {
        if let Some(next) = self.next.take() {
            self.next = self.resolve_next(&next);
            self.current = Some(next);
        }
        self.transition = None;
    }
}

fn blend_pixel(from: Rgb, to: Rgb, step: u32, steps: u32) -> Rgb {
    Rgb {
        r: lerp_steps(from.r, to.r, step, steps),
        g: lerp_steps(from.g, to.g, step, steps),
        b: lerp_steps(from.b, to.b, step, steps),
    }
}

impl<const N: usize> Strategy for PatternSequencer<'_, N> {
    fn draw_frame(&mut self, frame: &mut Frame<'_>, frame_counter: u32) -> u32 {
        if self.current.is_none() {
            frame.fill(BLACK);
            return MISSING_PATTERN_RETRY_MS;
        }

        if let Some(transition) = self.transition {
            let elapsed = frame_counter.wrapping_sub(transition.start_frame);
            if elapsed >= transition.steps {
                self.commit();
            } else if let (Some(current), Some(next)) = (&self.current, &self.next) {
                for (index, (from, to)) in current.pixels.iter().zip(next.pixels.iter()).enumerate() {
                    let color = blend_pixel(
                        from.gamma_corrected(),
                        to.gamma_corrected(),
                        elapsed,
                        transition.steps,
                    );
                    frame.set(index, color);
                }
                return TRANSITION_FRAME_DELAY_MS;
            }
        }

        let Some(current) = &self.current else {
            frame.fill(BLACK);
            return MISSING_PATTERN_RETRY_MS;
        };
        for (index, pixel) in current.pixels.iter().enumerate() {
            frame.set(index, pixel.gamma_corrected());
        }
        let frame_time = current.frame_time_ms();

        if current.next_id().is_none() || current.transition_time == 0 {
            return frame_time;
        }
        if self.next.is_some() {
            self.transition = Some(Transition {
                start_frame: frame_counter,
                steps: current.transition_time_ms() / TRANSITION_STEP_DIVISOR,
            });
        }
        frame_time
    }
}
