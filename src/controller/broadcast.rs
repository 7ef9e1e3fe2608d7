//! Outward state broadcast.

use core::fmt::Write;

use heapless::String;

use super::{LightMode, LightState};
use crate::strategy::EffectId;

const ON: &str = "ON";
const OFF: &str = "OFF";
const SOLID: &str = "solid";

/// State topics published on every broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTopic {
    Switch,
    Brightness,
    HueSaturation,
    Effect,
}

impl StateTopic {
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Switch => "sw",
            Self::Brightness => "br",
            Self::HueSaturation => "hs",
            Self::Effect => "fx",
        }
    }

    /// Full topic name, `<prefix>/<device>/<suffix>/state`.
    pub fn state_topic<const L: usize>(self, prefix: &str, device: &str) -> Option<String<L>> {
        let mut topic = String::new();
        write!(topic, "{}/{}/{}/state", prefix, device, self.suffix()).ok()?;
        Some(topic)
    }
}

/// Fire-and-forget channel for the controller's state.
pub trait StateBroadcaster {
    /// A disabled broadcaster makes a broadcast a silent no-op.
    fn is_enabled(&self) -> bool;

    fn publish(&mut self, topic: StateTopic, payload: &str);
}

/// Broadcaster for devices without a messaging channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledBroadcaster;

impl StateBroadcaster for DisabledBroadcaster {
    fn is_enabled(&self) -> bool {
        false
    }

    fn publish(&mut self, _topic: StateTopic, _payload: &str) {}
}

type Payload = String<24>;

fn publish_brightness<B: StateBroadcaster>(broadcaster: &mut B, brightness: u8) {
    let mut payload = Payload::new();
    let _ = write!(payload, "{brightness}");
    broadcaster.publish(StateTopic::Brightness, &payload);
}

/// Publish the topics describing `state`.
pub fn publish_state<B: StateBroadcaster>(broadcaster: &mut B, state: &LightState) {
    match state.mode {
        LightMode::Off => broadcaster.publish(StateTopic::Switch, OFF),
        LightMode::CustomColor {
            hue,
            saturation,
            brightness,
        } => {
            publish_brightness(broadcaster, brightness);
            let mut hs = Payload::new();
            let _ = write!(hs, "{hue:.1},{saturation:.1}");
            broadcaster.publish(StateTopic::HueSaturation, &hs);
            broadcaster.publish(StateTopic::Switch, ON);
            broadcaster.publish(StateTopic::Effect, SOLID);
        }
        LightMode::SolidEffect { brightness } => {
            publish_brightness(broadcaster, brightness);
            let mut hs = Payload::new();
            let _ = write!(hs, "{:.1},0", state.hue);
            broadcaster.publish(StateTopic::HueSaturation, &hs);
            broadcaster.publish(StateTopic::Switch, ON);
            broadcaster.publish(StateTopic::Effect, SOLID);
        }
        LightMode::NamedAnimation(id) => {
            broadcaster.publish(StateTopic::Switch, ON);
            let effect = EffectId::from_raw(id).map_or(SOLID, EffectId::as_str);
            broadcaster.publish(StateTopic::Effect, effect);
        }
        LightMode::StoredPattern(_) => {
            broadcaster.publish(StateTopic::Switch, ON);
            broadcaster.publish(StateTopic::Effect, SOLID);
        }
    }
}
