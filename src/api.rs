//! Transport-independent command surface.
//!
//! Handlers take either decoded key/value parameters (as a local HTTP API
//! delivers them) or a raw messaging payload. Malformed input returns
//! `false` or an empty result and leaves the state untouched.

use core::str::FromStr;

use heapless::Vec;

use crate::color::Rgb;
use crate::controller::{LightController, StateBroadcaster};
use crate::library::PatternLibrary;
use crate::math8::clamp8;
use crate::pattern::{MAX_PATTERNS, NO_NEXT_PATTERN, PatternName, StoredPattern};
use crate::strategy::EffectId;

/// Decoded request parameters.
pub type Params<'p> = [(&'p str, &'p str)];

const DEFAULT_FRAME_TIME_MS: i32 = 1000;
const DEFAULT_TRANSITION_TIME_MS: i32 = 0;

fn param<'p>(params: &Params<'p>, key: &str) -> Option<&'p str> {
    params
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value.trim())
}

fn parse<T: FromStr>(params: &Params<'_>, key: &str) -> Option<T> {
    let raw = param(params, key)?;
    let value = raw.parse().ok();
    if value.is_none() {
        log::debug!("api: malformed {key}={raw}");
    }
    value
}

fn parse_or<T: FromStr>(params: &Params<'_>, key: &str, default: T) -> Option<T> {
    match param(params, key) {
        Some(_) => parse(params, key),
        None => Some(default),
    }
}

fn parse_finite(raw: &str) -> Option<f32> {
    raw.trim().parse::<f32>().ok().filter(|value| value.is_finite())
}

/// Controller and pattern library behind one command surface.
pub struct DeviceApi<'a, B: StateBroadcaster, const N: usize> {
    light: LightController<'a, B, N>,
    patterns: PatternLibrary<'a, N>,
    preview_shown: bool,
}

impl<'a, B: StateBroadcaster, const N: usize> DeviceApi<'a, B, N> {
    pub fn new(light: LightController<'a, B, N>, patterns: PatternLibrary<'a, N>) -> Self {
        Self {
            light,
            patterns,
            preview_shown: false,
        }
    }

    pub fn light(&self) -> &LightController<'a, B, N> {
        &self.light
    }

    pub fn light_mut(&mut self) -> &mut LightController<'a, B, N> {
        &mut self.light
    }

    pub fn patterns(&self) -> &PatternLibrary<'a, N> {
        &self.patterns
    }

    /// `r`, `g`, `b`.
    pub fn set_rgb(&mut self, params: &Params<'_>) -> bool {
        let (Some(r), Some(g), Some(b)) = (
            parse::<i32>(params, "r"),
            parse::<i32>(params, "g"),
            parse::<i32>(params, "b"),
        ) else {
            return false;
        };
        self.light.set_custom_color(r, g, b);
        true
    }

    /// `value`.
    pub fn set_brightness(&mut self, params: &Params<'_>) -> bool {
        let Some(value) = parse::<i32>(params, "value") else {
            return false;
        };
        self.light.set_brightness(value);
        true
    }

    /// `hue`, `sat`.
    pub fn set_hue_saturation(&mut self, params: &Params<'_>) -> bool {
        let (Some(hue), Some(sat)) = (
            param(params, "hue").and_then(parse_finite),
            param(params, "sat").and_then(parse_finite),
        ) else {
            return false;
        };
        self.light.set_hue_saturation(hue, sat);
        true
    }

    /// `id` (registry index) or `name` (short key or display name).
    pub fn set_effect(&mut self, params: &Params<'_>) -> bool {
        if let Some(id) = parse::<u8>(params, "id") {
            return self.light.start_animation(id);
        }
        match param(params, "name") {
            Some(name) => self.set_named_effect(name),
            None => false,
        }
    }

    pub fn set_named_effect(&mut self, name: &str) -> bool {
        match EffectId::parse_from_str(name) {
            Some(effect) => self.light.start_animation(effect.as_raw()),
            None => {
                log::debug!("api: unknown effect {name}");
                false
            }
        }
    }

    /// `id`.
    pub fn activate_pattern(&mut self, params: &Params<'_>) -> bool {
        parse::<u16>(params, "id").is_some_and(|id| self.light.activate_pattern(id))
    }

    /// `state` = `on` | `off`.
    pub fn switch(&mut self, params: &Params<'_>) -> bool {
        match param(params, "state") {
            Some(state) if state.eq_ignore_ascii_case("on") => {
                self.light.switch_on();
                true
            }
            Some(state) if state.eq_ignore_ascii_case("off") => {
                self.light.switch_off();
                true
            }
            _ => false,
        }
    }

    /// `id`.
    pub fn begin_edit(&mut self, params: &Params<'_>) -> bool {
        let started = parse::<u16>(params, "id").is_some_and(|id| self.patterns.begin_edit(id));
        self.preview_shown |= started;
        started
    }

    /// `index`, `r`, `g`, `b`.
    pub fn set_led(&mut self, params: &Params<'_>) -> bool {
        let (Some(index), Some(r), Some(g), Some(b)) = (
            parse::<usize>(params, "index"),
            parse::<i32>(params, "r"),
            parse::<i32>(params, "g"),
            parse::<i32>(params, "b"),
        ) else {
            return false;
        };
        let color = Rgb {
            r: clamp8(r),
            g: clamp8(g),
            b: clamp8(b),
        };
        self.patterns.set_pixel(index, color)
    }

    /// `id`, `name`, and optionally `next`, `frameTime`, `transitionTime`.
    pub fn end_edit(&mut self, params: &Params<'_>) -> bool {
        let (Some(id), Some(name)) = (parse::<u16>(params, "id"), param(params, "name")) else {
            return false;
        };
        let (Some(next), Some(frame_time), Some(transition_time)) = (
            parse_or(params, "next", NO_NEXT_PATTERN),
            parse_or(params, "frameTime", DEFAULT_FRAME_TIME_MS),
            parse_or(params, "transitionTime", DEFAULT_TRANSITION_TIME_MS),
        ) else {
            return false;
        };
        let stored = self
            .patterns
            .end_edit(id, name, next, frame_time, transition_time);
        self.restore_after_edit();
        stored
    }

    /// `id`. Deleting the pattern being edited ends the session.
    pub fn delete_pattern(&mut self, params: &Params<'_>) -> bool {
        let Some(id) = parse::<u16>(params, "id") else {
            return false;
        };
        match self.patterns.delete_pattern(id) {
            Ok(deleted) => {
                self.restore_after_edit();
                deleted
            }
            Err(err) => {
                log::warn!("api: failed to delete pattern {id}: {err}");
                false
            }
        }
    }

    /// Give the display back to the controller once no edit session is open.
    fn restore_after_edit(&mut self) {
        if self.patterns.editing_id().is_none() && self.preview_shown {
            self.preview_shown = false;
            self.light.reapply();
        }
    }

    /// `name`.
    pub fn add_pattern(&mut self, params: &Params<'_>) -> Option<u16> {
        let name = param(params, "name")?;
        self.patterns.add_pattern(name)
    }

    /// `id`.
    pub fn get_pattern(&self, params: &Params<'_>) -> Option<StoredPattern<N>> {
        let id = parse::<u16>(params, "id")?;
        self.patterns.get_pattern(id)
    }

    pub fn list_patterns(&self) -> Vec<(u16, PatternName), MAX_PATTERNS> {
        self.patterns.list_patterns()
    }

    /// `(id, display name)` of every registry effect.
    pub fn list_effects(&self) -> impl Iterator<Item = (u8, &'static str)> {
        EffectId::ALL
            .into_iter()
            .map(|effect| (effect.as_raw(), effect.display_name()))
    }

    /// `ON` or `OFF`.
    pub fn on_switch_payload(&mut self, payload: &str) -> bool {
        match payload.trim() {
            "ON" => {
                self.light.switch_on();
                true
            }
            "OFF" => {
                self.light.switch_off();
                true
            }
            other => {
                log::debug!("api: unknown switch command {other}");
                false
            }
        }
    }

    /// Decimal brightness, shared by the colour and solid looks.
    pub fn on_brightness_payload(&mut self, payload: &str) -> bool {
        match payload.trim().parse::<i32>() {
            Ok(value) => {
                self.light.set_brightness(value);
                true
            }
            Err(_) => {
                log::debug!("api: malformed brightness {payload}");
                false
            }
        }
    }

    /// `"<hue>,<saturation>"`.
    pub fn on_hue_saturation_payload(&mut self, payload: &str) -> bool {
        let mut parts = payload.split(',');
        let (Some(hue), Some(sat), None) = (parts.next(), parts.next(), parts.next()) else {
            log::debug!("api: hue/saturation needs exactly one comma: {payload}");
            return false;
        };
        let (Some(hue), Some(sat)) = (parse_finite(hue), parse_finite(sat)) else {
            log::debug!("api: malformed hue/saturation {payload}");
            return false;
        };
        self.light.set_hue_saturation(hue, sat);
        true
    }

    /// Effect short key or display name.
    pub fn on_effect_payload(&mut self, payload: &str) -> bool {
        self.set_named_effect(payload.trim())
    }

    /// Decimal brightness of the solid figure.
    pub fn on_white_payload(&mut self, payload: &str) -> bool {
        match payload.trim().parse::<i32>() {
            Ok(value) => {
                self.light.set_effect_brightness(value);
                true
            }
            Err(_) => {
                log::debug!("api: malformed white level {payload}");
                false
            }
        }
    }
}
