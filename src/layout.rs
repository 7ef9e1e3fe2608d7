//! Physical description of the figure: named regions and pixel positions.

use crate::color::Rgb;

/// Number of pixels on the figure.
pub const FIGURE_PIXEL_COUNT: usize = 329;

/// Contiguous run of pixels sharing a base colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: u16,
    pub len: u16,
    pub color: Rgb,
}

impl Region {
    pub const fn new(start: u16, len: u16, color: Rgb) -> Self {
        Self { start, len, color }
    }

    /// Pixel indices covered by the region.
    pub fn indices(&self) -> core::ops::Range<usize> {
        let start = usize::from(self.start);
        start..start + usize::from(self.len)
    }
}

/// Regions in display order plus the aggregated groups used by effects that
/// animate several parts together.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    pub parts: &'a [Region],
    pub groups: &'a [&'a [Region]],
}

const HAIR: Rgb = Rgb { r: 0, g: 240, b: 150 };
const HAIRBAND: Rgb = Rgb { r: 255, g: 0, b: 200 };
const SHIRT: Rgb = Rgb { r: 190, g: 245, b: 220 };
const TIE: Rgb = Rgb { r: 0, g: 255, b: 100 };
const FACE: Rgb = Rgb { r: 245, g: 140, b: 140 };

pub const RIGHT_HAIR_1: Region = Region::new(0, 12, HAIR);
pub const RIGHT_HAIRBAND: Region = Region::new(12, 16, HAIRBAND);
pub const RIGHT_HAIR_2: Region = Region::new(28, 42, HAIR);
pub const SHIRT_REGION: Region = Region::new(70, 82, SHIRT);
pub const TIE_REGION: Region = Region::new(152, 21, TIE);
pub const FACE_REGION: Region = Region::new(173, 16, FACE);
pub const LEFT_HAIRBAND: Region = Region::new(189, 15, HAIRBAND);
pub const HAIR_REGION: Region = Region::new(204, 73, HAIR);
pub const LEFT_HAIR_1: Region = Region::new(277, 10, HAIR);
#[allow(clippy::cast_possible_truncation)]
pub const LEFT_HAIR_2: Region = Region::new(287, (FIGURE_PIXEL_COUNT - 287) as u16, HAIR);

static FIGURE_PARTS: [Region; 10] = [
    RIGHT_HAIR_2,
    RIGHT_HAIR_1,
    RIGHT_HAIRBAND,
    HAIR_REGION,
    LEFT_HAIRBAND,
    LEFT_HAIR_1,
    LEFT_HAIR_2,
    SHIRT_REGION,
    TIE_REGION,
    FACE_REGION,
];

static HEAD: [Region; 2] = [FACE_REGION, HAIR_REGION];
static HAIRBANDS: [Region; 2] = [RIGHT_HAIRBAND, LEFT_HAIRBAND];
static BUNCHES: [Region; 4] = [RIGHT_HAIR_1, RIGHT_HAIR_2, LEFT_HAIR_1, LEFT_HAIR_2];
static SHIRT_AND_TIE: [Region; 2] = [SHIRT_REGION, TIE_REGION];

static FIGURE_GROUPS: [&[Region]; 4] = [&HEAD, &HAIRBANDS, &BUNCHES, &SHIRT_AND_TIE];

/// The figure the controller ships with.
pub static FIGURE_LAYOUT: Layout<'static> = Layout {
    parts: &FIGURE_PARTS,
    groups: &FIGURE_GROUPS,
};

/// 2D coordinate of a pixel, on a 128x128 grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

/// Raster positions for `N` pixels laid out `width` per row.
///
/// Stand-in for a measured map when the physical placement is not known.
#[allow(clippy::cast_possible_truncation)]
pub const fn raster_positions<const N: usize>(width: usize) -> [Position; N] {
    let mut positions = [Position { x: 0, y: 0 }; N];
    let width = if width == 0 { 1 } else { width };
    let mut i = 0;
    while i < N {
        positions[i] = Position {
            x: (i % width) as u8,
            y: (i / width) as u8,
        };
        i += 1;
    }
    positions
}
