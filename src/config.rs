//! Device and controller configuration.

use embassy_time::Duration;
use heapless::String;

/// Default MQTT broker port.
pub const DEFAULT_MQTT_PORT: u16 = 1883;

/// Tunables of the light-state controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightControllerConfig {
    /// Quiet period before the state is broadcast.
    pub broadcast_delay: Duration,
    /// Quiet period before the state is written to storage.
    pub persist_delay: Duration,
    /// Brightness used when the persisted state was "off".
    pub restore_brightness: u8,
    /// Brightness used when no state was persisted.
    pub default_brightness: u8,
}

impl Default for LightControllerConfig {
    fn default() -> Self {
        Self {
            broadcast_delay: Duration::from_millis(250),
            persist_delay: Duration::from_millis(60_000),
            restore_brightness: 64,
            default_brightness: 127,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WifiConfig {
    pub ssid: String<36>,
    pub password: String<64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttConfig {
    pub broker_address: String<16>,
    pub port: u16,
    pub username: String<32>,
    pub password: String<64>,
    pub topic: String<128>,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_address: String::new(),
            port: DEFAULT_MQTT_PORT,
            username: String::new(),
            password: String::new(),
            topic: String::new(),
        }
    }
}
