//! Light-state controller
//!
//! Single writer of the canonical [`LightState`]. Every command is a state
//! transition that hands a fresh strategy to the [`FrameScheduler`] and
//! rearms two debounced side effects: broadcasting the state and persisting
//! it. A burst of commands therefore produces one broadcast and one write,
//! both describing the final state.

mod broadcast;
mod state;

pub use broadcast::{DisabledBroadcaster, StateBroadcaster, StateTopic, publish_state};
use embassy_time::Instant;
pub use state::{LightMode, LightState};

use crate::color::{BLACK, PixelExt, Rgb, hsb_to_rgb, rgb_to_hsb};
use crate::config::LightControllerConfig;
use crate::debounce::TimerQueue;
use crate::frame_scheduler::FrameScheduler;
use crate::math8::clamp8;
use crate::pattern::load_pattern;
use crate::rng::Rng64;
use crate::store::{StoreKey, load, save};
use crate::strategy::{
    EffectId, PatternSequencer, SolidColor, SolidFigure, StrategyContext, StrategySlot,
};

/// Source of the current time.
pub type Clock = fn() -> Instant;

const DEFAULT_SEED: u64 = 0x4649_4755_5245;

/// Debounced side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    Broadcast,
    Persist,
}

/// Light-state controller. Lives on the control context.
pub struct LightController<'a, B: StateBroadcaster, const N: usize> {
    scheduler: &'a FrameScheduler<'a, N>,
    context: StrategyContext<'a>,
    broadcaster: B,
    config: LightControllerConfig,
    state: LightState,
    timers: TimerQueue<Deferred, 2>,
    clock: Clock,
    rng: Rng64,
}

fn round_tenth(value: f32) -> f32 {
    libm::roundf(value * 10.0) / 10.0
}

impl<'a, B: StateBroadcaster, const N: usize> LightController<'a, B, N> {
    pub fn new(
        scheduler: &'a FrameScheduler<'a, N>,
        context: StrategyContext<'a>,
        broadcaster: B,
        config: LightControllerConfig,
    ) -> Self {
        Self {
            scheduler,
            context,
            broadcaster,
            state: LightState::new(config.default_brightness),
            config,
            timers: TimerQueue::new(),
            clock: Instant::now,
            rng: Rng64::new(DEFAULT_SEED),
        }
    }

    /// Replace the time source used for debounce deadlines.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Seed for the randomised effects.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Rng64::new(seed);
        self
    }

    pub fn state(&self) -> &LightState {
        &self.state
    }

    pub fn broadcaster(&self) -> &B {
        &self.broadcaster
    }

    pub fn broadcaster_mut(&mut self) -> &mut B {
        &mut self.broadcaster
    }

    pub fn context(&self) -> &StrategyContext<'a> {
        &self.context
    }

    pub fn scheduler(&self) -> &'a FrameScheduler<'a, N> {
        self.scheduler
    }

    /// When `action` will next fire, if armed.
    pub fn deadline_of(&self, action: Deferred) -> Option<Instant> {
        self.timers.deadline_of(action)
    }

    /// Restore the persisted state, or fall back to the default look.
    ///
    /// A persisted "off" comes back dimly lit rather than dark. After a
    /// restore both side effects fire right away.
    pub fn load(&mut self) {
        let Some(saved) = load::<LightState>(self.context.store, StoreKey::LightState) else {
            log::info!("light: no saved state, using defaults");
            self.set_effect_brightness(i32::from(self.config.default_brightness));
            return;
        };

        log::info!("light: restoring {:?}", saved.mode);
        self.state = LightState {
            mode: LightMode::Off,
            ..saved
        };
        match saved.mode {
            LightMode::Off => {
                self.set_effect_brightness(i32::from(self.config.restore_brightness));
            }
            LightMode::SolidEffect { brightness } => {
                self.set_effect_brightness(i32::from(brightness));
            }
            LightMode::CustomColor {
                hue,
                saturation,
                brightness,
            } => {
                self.set_rgb(hsb_to_rgb(hue, saturation, brightness));
            }
            LightMode::NamedAnimation(id) => {
                if !self.start_animation(id) {
                    self.set_effect_brightness(i32::from(saved.brightness));
                }
            }
            LightMode::StoredPattern(id) => {
                if !self.activate_pattern(id) {
                    self.set_effect_brightness(i32::from(saved.brightness));
                }
            }
        }

        let now = (self.clock)();
        self.timers.rearm(Deferred::Broadcast, now);
        self.timers.rearm(Deferred::Persist, now);
        self.poll();
    }

    /// Show a single colour. All-zero switches off and keeps the
    /// remembered colour.
    pub fn set_custom_color(&mut self, r: i32, g: i32, b: i32) {
        self.set_rgb(Rgb {
            r: clamp8(r),
            g: clamp8(g),
            b: clamp8(b),
        });
    }

    fn set_rgb(&mut self, color: Rgb) {
        self.hand_off(StrategySlot::SolidColor(SolidColor::new(
            color.gamma_corrected(),
        )));

        self.state.animation_id = 0;
        if color == Rgb::default() {
            self.state.mode = LightMode::Off;
        } else {
            let (hue, saturation, brightness) = rgb_to_hsb(color);
            self.state.hue = round_tenth(hue);
            self.state.saturation = round_tenth(saturation);
            self.state.brightness = brightness;
            self.state.mode = LightMode::CustomColor {
                hue: self.state.hue,
                saturation: self.state.saturation,
                brightness,
            };
        }
        self.trigger_state_changed();
    }

    /// Show the figure in its own colours. Zero switches off.
    pub fn set_effect_brightness(&mut self, brightness: i32) {
        let brightness = clamp8(brightness);
        self.hand_off(StrategySlot::SolidFigure(SolidFigure::new(
            self.context.layout,
            brightness,
        )));

        if brightness > 0 {
            self.state.brightness = brightness;
            self.state.saturation = 0.0;
            self.state.animation_id = 0;
            self.state.mode = LightMode::SolidEffect { brightness };
        } else {
            self.state.mode = LightMode::Off;
        }
        self.trigger_state_changed();
    }

    /// Brightness shared by the colour and the solid figure looks.
    ///
    /// With zero remembered saturation this is the solid figure at the new
    /// brightness, otherwise the remembered colour at the new brightness.
    #[allow(clippy::float_cmp)]
    pub fn set_brightness(&mut self, brightness: i32) {
        if self.state.saturation == 0.0 {
            self.set_effect_brightness(brightness);
        } else {
            let color = hsb_to_rgb(self.state.hue, self.state.saturation, clamp8(brightness));
            self.set_rgb(color);
        }
    }

    #[allow(clippy::float_cmp)]
    pub fn set_hue_saturation(&mut self, hue: f32, saturation: f32) {
        let hue = if hue.is_finite() { hue.clamp(0.0, 360.0) } else { 0.0 };
        let saturation = if saturation.is_finite() {
            saturation.clamp(0.0, 100.0)
        } else {
            0.0
        };

        if saturation == 0.0 {
            self.state.hue = hue;
            self.state.saturation = 0.0;
            self.set_effect_brightness(i32::from(self.state.brightness));
        } else {
            let color = hsb_to_rgb(hue, saturation, self.state.brightness);
            self.set_rgb(color);
        }
    }

    /// Start a registry effect. Starting the effect that is already running
    /// does nothing.
    pub fn start_animation(&mut self, id: u8) -> bool {
        let Some(effect) = EffectId::from_raw(id) else {
            log::debug!("light: unknown animation id {id}");
            return false;
        };
        if self.state.mode == LightMode::NamedAnimation(id) {
            return true;
        }

        let seed = self.rng.next_u64();
        self.hand_off(effect.to_slot(&self.context, seed));
        self.state.mode = LightMode::NamedAnimation(id);
        self.state.animation_id = id;
        self.trigger_state_changed();
        true
    }

    /// Play the stored pattern sequence starting at `id`.
    pub fn activate_pattern(&mut self, id: u16) -> bool {
        let Some(pattern) = load_pattern::<N>(self.context.store, id) else {
            log::debug!("light: no pattern {id} to activate");
            return false;
        };

        self.hand_off(StrategySlot::PatternSequence(PatternSequencer::with_pattern(
            self.context.store,
            pattern,
        )));
        self.state.mode = LightMode::StoredPattern(id);
        self.state.pattern_id = id;
        self.state.animation_id = 0;
        self.trigger_state_changed();
        true
    }

    /// Restore the remembered look. Does nothing unless off.
    #[allow(clippy::float_cmp)]
    pub fn switch_on(&mut self) {
        if !self.state.mode.is_off() {
            return;
        }
        if self.state.animation_id > 0 {
            self.start_animation(self.state.animation_id);
        } else if self.state.saturation == 0.0 {
            self.set_effect_brightness(i32::from(self.state.brightness));
        } else {
            let color = hsb_to_rgb(self.state.hue, self.state.saturation, self.state.brightness);
            self.set_rgb(color);
        }
    }

    pub fn switch_off(&mut self) {
        self.set_effect_brightness(0);
    }

    /// Hand the strategy for the current mode to the scheduler again.
    ///
    /// Used after something else took over the display, such as the pattern
    /// editor. The state and the debounce deadlines are left as they are.
    pub fn reapply(&mut self) {
        let strategy = match self.state.mode {
            LightMode::Off => StrategySlot::SolidColor(SolidColor::new(BLACK)),
            LightMode::SolidEffect { brightness } => {
                StrategySlot::SolidFigure(SolidFigure::new(self.context.layout, brightness))
            }
            LightMode::CustomColor {
                hue,
                saturation,
                brightness,
            } => StrategySlot::SolidColor(SolidColor::new(
                hsb_to_rgb(hue, saturation, brightness).gamma_corrected(),
            )),
            LightMode::NamedAnimation(id) => {
                let Some(effect) = EffectId::from_raw(id) else {
                    log::debug!("light: unknown animation id {id}");
                    return;
                };
                let seed = self.rng.next_u64();
                effect.to_slot(&self.context, seed)
            }
            LightMode::StoredPattern(id) => {
                StrategySlot::PatternSequence(PatternSequencer::new(self.context.store, id))
            }
        };
        self.hand_off(strategy);
    }

    /// Rearm both debounced side effects.
    pub fn trigger_state_changed(&mut self) {
        let now = (self.clock)();
        self.timers
            .rearm(Deferred::Broadcast, now + self.config.broadcast_delay);
        self.timers
            .rearm(Deferred::Persist, now + self.config.persist_delay);
    }

    /// Fire every side effect that is due and return the next deadline.
    ///
    /// Call from the control context's loop, at the latest by the returned
    /// deadline.
    pub fn poll(&mut self) -> Option<Instant> {
        let now = (self.clock)();
        while let Some(action) = self.timers.pop_due(now) {
            match action {
                Deferred::Broadcast => self.broadcast(),
                Deferred::Persist => self.persist(),
            }
        }
        self.timers.next_deadline()
    }

    fn broadcast(&mut self) {
        if !self.broadcaster.is_enabled() {
            return;
        }
        publish_state(&mut self.broadcaster, &self.state);
    }

    fn persist(&mut self) {
        if let Err(err) = save(self.context.store, StoreKey::LightState, &self.state) {
            log::warn!("light: failed to persist state: {err}");
        }
    }

    fn hand_off(&mut self, strategy: StrategySlot<'a, N>) {
        if !self.scheduler.request_strategy(strategy) {
            log::debug!("light: scheduler stopped, strategy dropped");
        }
    }
}
