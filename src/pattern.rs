//! Stored multi-frame patterns.
//!
//! A pattern is a named full-frame snapshot with an optional successor.
//! Following successor ids gives a singly linked, possibly cyclic, sequence.

use bytemuck::{Pod, Zeroable};
use heapless::{String, Vec};

use crate::color::{BLACK, Rgb};
use crate::store::{
    BLOCK_SIZE, ConfigStore, Encodable, StoreError, StoreKey, decode_pod, encode_pod, load,
    parse_padded_string, save, string_to_array,
};

/// Longest pattern name.
pub const PATTERN_NAME_LEN: usize = 48;

/// Most patterns the id list can track.
pub const MAX_PATTERNS: usize = 64;

/// Successor id meaning "no successor".
pub const NO_NEXT_PATTERN: i32 = -1;

pub type PatternName = String<PATTERN_NAME_LEN>;
pub type PatternIdList = Vec<u16, MAX_PATTERNS>;

const PATTERN_MAGIC: u32 = 0x5041_5454;
const PATTERN_IDS_MAGIC: u32 = 0x5049_4453;

#[derive(Debug, Clone, Copy, Zeroable, Pod)]
#[repr(C)]
struct PatternHeader {
    name: [u8; PATTERN_NAME_LEN],
    next_pattern_id: i32,
    frame_time: i32,
    transition_time: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPattern<const N: usize> {
    pub name: PatternName,
    pub pixels: [Rgb; N],
    /// Successor pattern id, [`NO_NEXT_PATTERN`] for none.
    pub next_pattern_id: i32,
    /// Display duration in milliseconds.
    pub frame_time: i32,
    /// Cross-fade length into the successor.
    pub transition_time: i32,
}

impl<const N: usize> StoredPattern<N> {
    const ENCODED_LEN: usize = 4 + core::mem::size_of::<PatternHeader>() + 3 * N;
    const FITS_IN_BLOCK: () = assert!(Self::ENCODED_LEN <= BLOCK_SIZE);

    /// All-black pattern with no successor.
    pub fn blank(name: &str) -> Self {
        Self {
            name: truncated_name(name),
            pixels: [BLACK; N],
            next_pattern_id: NO_NEXT_PATTERN,
            frame_time: 1000,
            transition_time: 0,
        }
    }

    /// Successor id, if the pattern links to one.
    pub fn next_id(&self) -> Option<u16> {
        u16::try_from(self.next_pattern_id).ok()
    }

    /// Display duration, negative values read as zero.
    pub fn frame_time_ms(&self) -> u32 {
        u32::try_from(self.frame_time).unwrap_or(0)
    }

    pub fn transition_time_ms(&self) -> u32 {
        u32::try_from(self.transition_time).unwrap_or(0)
    }
}

impl<const N: usize> Encodable for StoredPattern<N> {
    const KEY_MAGIC: u32 = PATTERN_MAGIC;

    fn encode(&self, buf: &mut Vec<u8, BLOCK_SIZE>) -> Result<(), StoreError> {
        let () = Self::FITS_IN_BLOCK;
        let header = PatternHeader {
            name: string_to_array(&self.name),
            next_pattern_id: self.next_pattern_id,
            frame_time: self.frame_time,
            transition_time: self.transition_time,
        };
        encode_pod(Self::KEY_MAGIC, &header, buf)?;
        for pixel in &self.pixels {
            buf.extend_from_slice(&[pixel.r, pixel.g, pixel.b])
                .map_err(|()| StoreError::TooLarge)?;
        }
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        let (header, payload) = decode_pod::<PatternHeader>(Self::KEY_MAGIC, bytes)?;
        // A pattern saved for a different pixel count is not usable here.
        if payload.len() != 3 * N {
            return None;
        }
        let mut pixels = [BLACK; N];
        for (pixel, chunk) in pixels.iter_mut().zip(payload.chunks_exact(3)) {
            *pixel = Rgb {
                r: chunk[0],
                g: chunk[1],
                b: chunk[2],
            };
        }
        Some(Self {
            name: parse_padded_string(&header.name),
            pixels,
            next_pattern_id: header.next_pattern_id,
            frame_time: header.frame_time,
            transition_time: header.transition_time,
        })
    }
}

struct IdList(PatternIdList);

impl Encodable for IdList {
    const KEY_MAGIC: u32 = PATTERN_IDS_MAGIC;

    fn encode(&self, buf: &mut Vec<u8, BLOCK_SIZE>) -> Result<(), StoreError> {
        buf.extend_from_slice(&Self::KEY_MAGIC.to_le_bytes())
            .map_err(|()| StoreError::TooLarge)?;
        #[allow(clippy::cast_possible_truncation)]
        let count = self.0.len() as u16;
        buf.extend_from_slice(&count.to_le_bytes())
            .map_err(|()| StoreError::TooLarge)?;
        for id in &self.0 {
            buf.extend_from_slice(&id.to_le_bytes())
                .map_err(|()| StoreError::TooLarge)?;
        }
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        let (magic, rest) = bytes.split_first_chunk::<4>()?;
        if u32::from_le_bytes(*magic) != Self::KEY_MAGIC {
            return None;
        }
        let (count, rest) = rest.split_first_chunk::<2>()?;
        let count = usize::from(u16::from_le_bytes(*count));
        if rest.len() != count * 2 || count > MAX_PATTERNS {
            return None;
        }
        let mut ids = PatternIdList::new();
        for chunk in rest.chunks_exact(2) {
            ids.push(u16::from_le_bytes([chunk[0], chunk[1]])).ok()?;
        }
        Some(Self(ids))
    }
}

pub fn load_pattern<const N: usize>(store: &dyn ConfigStore, id: u16) -> Option<StoredPattern<N>> {
    load(store, StoreKey::Pattern(id))
}

/// Store a pattern, skipping the write when the stored copy is identical.
pub fn save_pattern<const N: usize>(
    store: &dyn ConfigStore,
    id: u16,
    pattern: &StoredPattern<N>,
) -> Result<(), StoreError> {
    if load_pattern::<N>(store, id).as_ref() == Some(pattern) {
        log::debug!("store: pattern {id} unchanged, skipping write");
        return Ok(());
    }
    save(store, StoreKey::Pattern(id), pattern)
}

/// Ordered list of stored pattern ids.
pub fn load_pattern_ids(store: &dyn ConfigStore) -> Option<PatternIdList> {
    load::<IdList>(store, StoreKey::PatternIds).map(|list| list.0)
}

pub fn save_pattern_ids(store: &dyn ConfigStore, ids: &PatternIdList) -> Result<(), StoreError> {
    save(store, StoreKey::PatternIds, &IdList(ids.clone()))
}

pub(crate) fn truncated_name(name: &str) -> PatternName {
    let mut end = name.len().min(PATTERN_NAME_LEN);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = PatternName::new();
    // Cannot overflow: `end` is at most the capacity.
    let _ = out.push_str(&name[..end]);
    out
}
