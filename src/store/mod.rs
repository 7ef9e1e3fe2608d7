//! Durable key/value configuration storage.
//!
//! The controller and the pattern library talk to storage only through
//! [`ConfigStore`]. Records are fixed-layout [`bytemuck::Pod`] structs tagged
//! with a magic number, so a block that fails to decode reads as absent.

mod memory;
mod records;

pub use memory::MemoryStore;
pub use records::{
    hard_reset, load_mqtt_config, load_wifi_config, parse_padded_string, save_mqtt_config,
    save_wifi_config, string_to_array,
};

/// Largest block a store has to hold.
pub const BLOCK_SIZE: usize = 4096;

const WIFI_BLOCK_ID: u32 = 0x1984_1984;
const MQTT_BLOCK_ID: u32 = 0x1984_1985;
const LIGHT_STATE_BLOCK_ID: u32 = 0x1984_1986;
const PATTERN_IDS_BLOCK_ID: u32 = 0xDEAD_BEEF;
const PATTERN_BLOCK_BASE: u32 = 0xBEEF_0000;

/// Well-known storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Wifi,
    Mqtt,
    LightState,
    PatternIds,
    Pattern(u16),
}

impl StoreKey {
    /// Stable block id of the key on the storage medium.
    #[allow(clippy::cast_lossless)]
    pub const fn block_id(self) -> u32 {
        match self {
            Self::Wifi => WIFI_BLOCK_ID,
            Self::Mqtt => MQTT_BLOCK_ID,
            Self::LightState => LIGHT_STATE_BLOCK_ID,
            Self::PatternIds => PATTERN_IDS_BLOCK_ID,
            Self::Pattern(id) => PATTERN_BLOCK_BASE | id as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("block is larger than {} bytes", BLOCK_SIZE)]
    TooLarge,
    #[error("no free block slot")]
    Full,
    #[error("storage medium failure")]
    Medium,
}

/// Block store contract.
///
/// Implementations synchronise internally: the control context writes while
/// a running pattern sequence reads from the render context.
pub trait ConfigStore: Sync {
    /// Copy the block stored under `key` into `buf` and return its length.
    ///
    /// Returns `None` when the block is absent or does not fit `buf`.
    fn get(&self, key: StoreKey, buf: &mut [u8]) -> Option<usize>;

    /// Store `data` under `key`, replacing any previous block.
    fn put(&self, key: StoreKey, data: &[u8]) -> Result<(), StoreError>;

    /// Erase the block stored under `key`, if any.
    fn remove(&self, key: StoreKey);
}

/// Record types that know how to read and write themselves as one block.
pub trait Encodable: Sized {
    const KEY_MAGIC: u32;

    fn encode(&self, buf: &mut heapless::Vec<u8, BLOCK_SIZE>) -> Result<(), StoreError>;

    fn decode(bytes: &[u8]) -> Option<Self>;
}

/// Read and decode a record, treating any decode failure as absent.
pub fn load<T: Encodable>(store: &dyn ConfigStore, key: StoreKey) -> Option<T> {
    let mut buf = [0u8; BLOCK_SIZE];
    let len = store.get(key, &mut buf)?;
    let record = T::decode(&buf[..len]);
    if record.is_none() {
        log::debug!("store: block {:#010x} did not decode", key.block_id());
    }
    record
}

/// Encode and write a record.
pub fn save<T: Encodable>(store: &dyn ConfigStore, key: StoreKey, record: &T) -> Result<(), StoreError> {
    let mut buf = heapless::Vec::new();
    record.encode(&mut buf)?;
    store.put(key, &buf)
}

/// Encode a Pod record preceded by its magic number.
pub(crate) fn encode_pod<T: bytemuck::Pod>(
    magic: u32,
    record: &T,
    buf: &mut heapless::Vec<u8, BLOCK_SIZE>,
) -> Result<(), StoreError> {
    buf.extend_from_slice(&magic.to_le_bytes())
        .map_err(|()| StoreError::TooLarge)?;
    buf.extend_from_slice(bytemuck::bytes_of(record))
        .map_err(|()| StoreError::TooLarge)
}

/// Decode a Pod record written by [`encode_pod`], returning it and the
/// remaining bytes.
pub(crate) fn decode_pod<T: bytemuck::Pod>(magic: u32, bytes: &[u8]) -> Option<(T, &[u8])> {
    let (tag, rest) = bytes.split_first_chunk::<4>()?;
    if u32::from_le_bytes(*tag) != magic {
        return None;
    }
    let size = core::mem::size_of::<T>();
    if rest.len() < size {
        return None;
    }
    let (head, tail) = rest.split_at(size);
    let record = bytemuck::try_pod_read_unaligned::<T>(head).ok()?;
    Some((record, tail))
}
