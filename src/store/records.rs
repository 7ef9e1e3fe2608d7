use bytemuck::{Pod, Zeroable};
use heapless::String;

use super::{
    BLOCK_SIZE, ConfigStore, Encodable, StoreError, StoreKey, decode_pod, encode_pod, load, save,
};
use crate::config::{MqttConfig, WifiConfig};
use crate::pattern::{PatternIdList, load_pattern_ids};

#[derive(Debug, Clone, Copy, Zeroable, Pod)]
#[repr(C)]
struct PersistentWifiConfig {
    ssid: [u8; 36],
    password: [u8; 64],
}

#[derive(Debug, Clone, Copy, Zeroable, Pod)]
#[repr(C)]
struct PersistentMqttConfig {
    broker_address: [u8; 16],
    port: u16,
    _padding: [u8; 2],
    username: [u8; 32],
    password: [u8; 64],
    topic: [u8; 128],
}

impl Encodable for WifiConfig {
    const KEY_MAGIC: u32 = 0x5749_4649;

    fn encode(&self, buf: &mut heapless::Vec<u8, BLOCK_SIZE>) -> Result<(), StoreError> {
        let record = PersistentWifiConfig {
            ssid: string_to_array(&self.ssid),
            password: string_to_array(&self.password),
        };
        encode_pod(Self::KEY_MAGIC, &record, buf)
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        let (record, _) = decode_pod::<PersistentWifiConfig>(Self::KEY_MAGIC, bytes)?;
        Some(Self {
            ssid: parse_padded_string(&record.ssid),
            password: parse_padded_string(&record.password),
        })
    }
}

impl Encodable for MqttConfig {
    const KEY_MAGIC: u32 = 0x4D51_5454;

    fn encode(&self, buf: &mut heapless::Vec<u8, BLOCK_SIZE>) -> Result<(), StoreError> {
        let record = PersistentMqttConfig {
            broker_address: string_to_array(&self.broker_address),
            port: self.port,
            _padding: [0; 2],
            username: string_to_array(&self.username),
            password: string_to_array(&self.password),
            topic: string_to_array(&self.topic),
        };
        encode_pod(Self::KEY_MAGIC, &record, buf)
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        let (record, _) = decode_pod::<PersistentMqttConfig>(Self::KEY_MAGIC, bytes)?;
        Some(Self {
            broker_address: parse_padded_string(&record.broker_address),
            port: record.port,
            username: parse_padded_string(&record.username),
            password: parse_padded_string(&record.password),
            topic: parse_padded_string(&record.topic),
        })
    }
}

pub fn load_wifi_config(store: &dyn ConfigStore) -> Option<WifiConfig> {
    load(store, StoreKey::Wifi)
}

pub fn save_wifi_config(store: &dyn ConfigStore, config: &WifiConfig) -> Result<(), StoreError> {
    save(store, StoreKey::Wifi, config)
}

pub fn load_mqtt_config(store: &dyn ConfigStore) -> Option<MqttConfig> {
    load(store, StoreKey::Mqtt)
}

pub fn save_mqtt_config(store: &dyn ConfigStore, config: &MqttConfig) -> Result<(), StoreError> {
    save(store, StoreKey::Mqtt, config)
}

/// Erase light state and every stored pattern, then write blank network
/// credentials and the default broker settings.
pub fn hard_reset(store: &dyn ConfigStore) -> Result<(), StoreError> {
    log::info!("store: hard reset");
    let ids = load_pattern_ids(store).unwrap_or_else(PatternIdList::new);
    for id in ids {
        store.remove(StoreKey::Pattern(id));
    }
    store.remove(StoreKey::PatternIds);
    store.remove(StoreKey::LightState);
    save_wifi_config(store, &WifiConfig::default())?;
    save_mqtt_config(store, &MqttConfig::default())
}

/// Copy a string into a zero padded array, truncating to `N` bytes.
pub fn string_to_array<const N: usize>(value: &str) -> [u8; N] {
    let mut array = [0u8; N];
    let len = value.len().min(N);
    array[..len].copy_from_slice(&value.as_bytes()[..len]);
    array
}

/// Read a zero padded string. Invalid UTF-8 reads as empty.
pub fn parse_padded_string<const N: usize>(bytes: &[u8]) -> String<N> {
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let Some(raw) = bytes.get(..len.min(N)) else {
        return String::new();
    };
    core::str::from_utf8(raw)
        .ok()
        .and_then(|s| String::try_from(s).ok())
        .unwrap_or_default()
}
