//! Frame scheduling and strategy hand-off.
//!
//! [`FrameScheduler`] is shared between the control context, which hands it
//! new strategies, and the render context, which drives a [`RenderLoop`].
//! The only shared state is a single pending-strategy slot and a stop flag
//! behind a critical section.
//!
//! The buffer transmitted by an iteration is the one drawn by the iteration
//! before it, so each iteration waits out the delay the *previous* draw
//! asked for. A newly requested strategy is therefore on display two
//! iterations after the request.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::{Duration, Instant, Timer};

use crate::frame::FrameSink;
use crate::strategy::{Strategy, StrategySlot};

/// Delay used while no strategy has been adopted yet.
pub const IDLE_FRAME_DELAY_MS: u32 = 1000;

/// Long waits are sliced into chunks of this length so that a pending
/// strategy or a shutdown is noticed early.
pub const WAIT_CHUNK: Duration = Duration::from_millis(500);

/// Remaining wait below which the loop just sleeps until the deadline.
pub const UNINTERRUPTIBLE_TAIL: Duration = Duration::from_secs(1);

struct Handoff<'a, const N: usize> {
    pending: Option<StrategySlot<'a, N>>,
    stop_requested: bool,
}

enum Adoption<'a, const N: usize> {
    Stop,
    Adopt(StrategySlot<'a, N>),
    Keep,
}

/// Single-slot strategy hand-off between execution contexts.
pub struct FrameScheduler<'a, const N: usize> {
    handoff: Mutex<RefCell<Handoff<'a, N>>>,
}

impl<'a, const N: usize> FrameScheduler<'a, N> {
    pub const fn new() -> Self {
        Self {
            handoff: Mutex::new(RefCell::new(Handoff {
                pending: None,
                stop_requested: false,
            })),
        }
    }

    /// Hand a strategy to the render loop.
    ///
    /// Replaces any strategy that has not been adopted yet; the replaced one
    /// is dropped without ever being drawn. Ignored after [`Self::shutdown`].
    /// Returns whether the strategy was accepted.
    pub fn request_strategy(&self, strategy: StrategySlot<'a, N>) -> bool {
        let mut incoming = Some(strategy);
        let accepted = critical_section::with(|cs| {
            let mut handoff = self.handoff.borrow(cs).borrow_mut();
            if handoff.stop_requested {
                return false;
            }
            core::mem::swap(&mut handoff.pending, &mut incoming);
            true
        });
        // Superseded or rejected strategy, released outside the critical section.
        drop(incoming);
        accepted
    }

    /// Ask the render loop to stop after its current iteration.
    pub fn shutdown(&self) {
        critical_section::with(|cs| {
            self.handoff.borrow(cs).borrow_mut().stop_requested = true;
        });
    }

    pub fn is_shutdown(&self) -> bool {
        critical_section::with(|cs| self.handoff.borrow(cs).borrow().stop_requested)
    }

    /// Whether a strategy is waiting to be adopted.
    pub fn has_pending(&self) -> bool {
        critical_section::with(|cs| self.handoff.borrow(cs).borrow().pending.is_some())
    }

    fn needs_attention(&self) -> bool {
        critical_section::with(|cs| {
            let handoff = self.handoff.borrow(cs).borrow();
            handoff.stop_requested || handoff.pending.is_some()
        })
    }

    fn adopt(&self) -> Adoption<'a, N> {
        critical_section::with(|cs| {
            let mut handoff = self.handoff.borrow(cs).borrow_mut();
            if handoff.stop_requested {
                return Adoption::Stop;
            }
            match handoff.pending.take() {
                Some(strategy) => Adoption::Adopt(strategy),
                None => Adoption::Keep,
            }
        })
    }

    /// Create the render loop driving `sink`. Run it on the render context.
    pub fn render_loop<S: FrameSink>(&self, sink: S) -> RenderLoop<'_, 'a, S, N> {
        RenderLoop {
            scheduler: self,
            sink,
            current: None,
            frame_counter: 0,
            previous_delay: 0,
        }
    }
}

impl<const N: usize> Default for FrameScheduler<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Render side of a [`FrameScheduler`]. Owns the active strategy.
pub struct RenderLoop<'s, 'a, S: FrameSink, const N: usize> {
    scheduler: &'s FrameScheduler<'a, N>,
    sink: S,
    current: Option<StrategySlot<'a, N>>,
    frame_counter: u32,
    previous_delay: u32,
}

impl<S: FrameSink, const N: usize> RenderLoop<'_, '_, S, N> {
    /// Run until the scheduler is shut down.
    pub async fn run(&mut self) {
        log::info!("scheduler: render loop started");
        loop {
            let Some(deadline) = self.render_frame(Instant::now()) else {
                break;
            };
            self.wait_until(deadline).await;
        }
        log::info!("scheduler: render loop stopped");
    }

    /// One iteration without the wait: adopt a pending strategy, swap
    /// buffers, draw. Returns when the transmitted frame may be replaced, or
    /// `None` once shutdown was requested.
    pub fn render_frame(&mut self, frame_start: Instant) -> Option<Instant> {
        match self.scheduler.adopt() {
            Adoption::Stop => return None,
            Adoption::Adopt(strategy) => {
                self.current = Some(strategy);
                self.frame_counter = 0;
                self.previous_delay = 0;
            }
            Adoption::Keep => {}
        }

        let mut frame = self.sink.swap();
        let delay = match self.current.as_mut() {
            Some(strategy) => strategy.draw_frame(&mut frame, self.frame_counter),
            None => IDLE_FRAME_DELAY_MS,
        };
        self.frame_counter = self.frame_counter.wrapping_add(1);

        let deadline = frame_start + Duration::from_millis(u64::from(self.previous_delay));
        self.previous_delay = delay;
        Some(deadline)
    }

    async fn wait_until(&self, deadline: Instant) {
        loop {
            if deadline <= Instant::now() + UNINTERRUPTIBLE_TAIL {
                Timer::at(deadline).await;
                return;
            }
            Timer::after(WAIT_CHUNK).await;
            if self.scheduler.needs_attention() {
                return;
            }
        }
    }

    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
