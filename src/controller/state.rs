use bytemuck::{Pod, Zeroable};

use crate::store::{BLOCK_SIZE, Encodable, StoreError, decode_pod, encode_pod};

const TAG_OFF: u8 = 0;
const TAG_SOLID_EFFECT: u8 = 1;
const TAG_CUSTOM_COLOR: u8 = 2;
const TAG_NAMED_ANIMATION: u8 = 3;
const TAG_STORED_PATTERN: u8 = 4;

/// What the device is displaying.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightMode {
    Off,
    /// The figure in its own colours at a brightness.
    SolidEffect { brightness: u8 },
    /// A single colour, hue in degrees and saturation in percent.
    CustomColor {
        hue: f32,
        saturation: f32,
        brightness: u8,
    },
    /// A registry effect by index.
    NamedAnimation(u8),
    /// A stored pattern sequence starting at a pattern id.
    StoredPattern(u16),
}

impl LightMode {
    pub const fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }

    const fn tag(&self) -> u8 {
        match self {
            Self::Off => TAG_OFF,
            Self::SolidEffect { .. } => TAG_SOLID_EFFECT,
            Self::CustomColor { .. } => TAG_CUSTOM_COLOR,
            Self::NamedAnimation(_) => TAG_NAMED_ANIMATION,
            Self::StoredPattern(_) => TAG_STORED_PATTERN,
        }
    }
}

/// Canonical device state.
///
/// The remembered fields outlive the mode: switching off keeps them so that
/// switching on can restore the previous look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightState {
    pub mode: LightMode,
    pub hue: f32,
    pub saturation: f32,
    pub brightness: u8,
    pub animation_id: u8,
    pub pattern_id: u16,
}

impl LightState {
    pub const fn new(brightness: u8) -> Self {
        Self {
            mode: LightMode::SolidEffect { brightness },
            hue: 0.0,
            saturation: 0.0,
            brightness,
            animation_id: 0,
            pattern_id: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Zeroable, Pod)]
#[repr(C)]
struct PersistentLightState {
    hue: f32,
    saturation: f32,
    pattern_id: u16,
    tag: u8,
    brightness: u8,
    animation_id: u8,
    _padding: [u8; 3],
}

impl From<&LightState> for PersistentLightState {
    fn from(state: &LightState) -> Self {
        Self {
            hue: state.hue,
            saturation: state.saturation,
            pattern_id: state.pattern_id,
            tag: state.mode.tag(),
            brightness: state.brightness,
            animation_id: state.animation_id,
            _padding: [0; 3],
        }
    }
}

impl Encodable for LightState {
    const KEY_MAGIC: u32 = 0x4C49_4748;

    fn encode(&self, buf: &mut heapless::Vec<u8, BLOCK_SIZE>) -> Result<(), StoreError> {
        encode_pod(Self::KEY_MAGIC, &PersistentLightState::from(self), buf)
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        let (record, _) = decode_pod::<PersistentLightState>(Self::KEY_MAGIC, bytes)?;
        let mode = match record.tag {
            TAG_OFF => LightMode::Off,
            TAG_SOLID_EFFECT => LightMode::SolidEffect {
                brightness: record.brightness,
            },
            TAG_CUSTOM_COLOR => LightMode::CustomColor {
                hue: record.hue,
                saturation: record.saturation,
                brightness: record.brightness,
            },
            TAG_NAMED_ANIMATION => LightMode::NamedAnimation(record.animation_id),
            TAG_STORED_PATTERN => LightMode::StoredPattern(record.pattern_id),
            _ => return None,
        };
        Some(Self {
            mode,
            hue: record.hue,
            saturation: record.saturation,
            brightness: record.brightness,
            animation_id: record.animation_id,
            pattern_id: record.pattern_id,
        })
    }
}
