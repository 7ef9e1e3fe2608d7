//! Frame buffers and the double-buffered sink protocol.

use crate::OutputDriver;
use crate::color::{BLACK, Rgb};

/// Writable view of the frame being drawn.
///
/// `previous` is the frame currently being transmitted, for strategies that
/// filter over time. Neither slice may be retained past the draw call.
pub struct Frame<'b> {
    pixels: &'b mut [Rgb],
    previous: &'b [Rgb],
}

impl<'b> Frame<'b> {
    pub fn new(pixels: &'b mut [Rgb], previous: &'b [Rgb]) -> Self {
        Self { pixels, previous }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Set one pixel. Out of range indices are ignored.
    #[inline]
    pub fn set(&mut self, index: usize, color: Rgb) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    pub fn clear(&mut self) {
        self.fill(BLACK);
    }

    pub fn pixels(&self) -> &[Rgb] {
        &*self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut *self.pixels
    }

    /// Pixel of the previously transmitted frame, black when out of range.
    #[inline]
    pub fn previous(&self, index: usize) -> Rgb {
        self.previous.get(index).copied().unwrap_or(BLACK)
    }
}

/// Double-buffered output.
///
/// `swap` starts transmitting the buffer filled during the previous call and
/// hands back the other one for drawing.
pub trait FrameSink {
    fn swap(&mut self) -> Frame<'_>;
}

/// [`FrameSink`] over a synchronous [`OutputDriver`].
pub struct DoubleBuffer<D: OutputDriver, const N: usize> {
    driver: D,
    front: [Rgb; N],
    back: [Rgb; N],
}

impl<D: OutputDriver, const N: usize> DoubleBuffer<D, N> {
    pub const fn new(driver: D) -> Self {
        Self {
            driver,
            front: [BLACK; N],
            back: [BLACK; N],
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}

impl<D: OutputDriver, const N: usize> FrameSink for DoubleBuffer<D, N> {
    fn swap(&mut self) -> Frame<'_> {
        core::mem::swap(&mut self.front, &mut self.back);
        self.driver.write(&self.front);
        Frame::new(&mut self.back, &self.front)
    }
}
