//! Rendering strategies
//!
//! A strategy fills one frame per call and says how long that frame should
//! stay on display. All strategies live in [`StrategySlot`] so a strategy can
//! be handed between execution contexts by value, without allocation.

mod drops;
mod edit_preview;
mod marquee;
mod part_cycle;
mod pattern_sequence;
mod pulsing;
mod solid;
pub mod track;

pub use drops::RandomDrops;
pub use edit_preview::EditPreview;
pub use marquee::Marquee;
pub use part_cycle::PartCycle;
pub use pattern_sequence::{MISSING_PATTERN_RETRY_MS, PatternSequencer};
pub use pulsing::Pulsing;
pub use solid::{SolidColor, SolidFigure};
pub use track::{FIGURE_TRACKS, FIGURE_TRAINS, Track, TrackSimulation, TrainSpec};

use crate::frame::Frame;
use crate::layout::{FIGURE_LAYOUT, Layout, Position};
use crate::store::ConfigStore;

/// Delay of strategies whose output never changes.
pub const STATIC_FRAME_DELAY_MS: u32 = 1000;
/// ~60 FPS.
pub const FAST_FRAME_DELAY_MS: u32 = 16;
/// Cadence of pattern cross-fades.
pub const TRANSITION_FRAME_DELAY_MS: u32 = 1000 / 60;
pub const TRAIN_FRAME_DELAY_MS: u32 = 1000 / 30;
pub const EDIT_PREVIEW_DELAY_MS: u32 = 33;

/// Brightness of the solid figure entry of the registry.
pub const SOLID_FIGURE_BRIGHTNESS: u8 = 128;

/// A unit of rendering logic.
pub trait Strategy {
    /// Fill `frame` and return how many milliseconds it should be displayed.
    ///
    /// `frame_counter` starts at 0 when the strategy is adopted and increases
    /// by one per call. The frame is not cleared beforehand. Faults must not
    /// escape: draw a safe fallback and return a conservative delay instead.
    fn draw_frame(&mut self, frame: &mut Frame<'_>, frame_counter: u32) -> u32;
}

/// What strategies need to know about the device.
#[derive(Clone, Copy)]
pub struct StrategyContext<'a> {
    pub store: &'a dyn ConfigStore,
    pub layout: &'a Layout<'a>,
    pub tracks: &'a [Track],
    pub trains: &'a [TrainSpec],
    pub positions: &'a [Position],
}

impl<'a> StrategyContext<'a> {
    /// Context for the stock figure.
    pub fn figure(store: &'a dyn ConfigStore, positions: &'a [Position]) -> Self {
        Self {
            store,
            layout: &FIGURE_LAYOUT,
            tracks: &FIGURE_TRACKS,
            trains: &FIGURE_TRAINS,
            positions,
        }
    }
}

/// Strategy slot - enum containing every strategy
pub enum StrategySlot<'a, const N: usize> {
    SolidColor(SolidColor),
    SolidFigure(SolidFigure<'a>),
    PartCycle(PartCycle<'a>),
    Pulsing(Pulsing<'a>),
    RandomDrops(RandomDrops),
    Trains(TrackSimulation<'a>),
    Marquee(Marquee<'a>),
    PatternSequence(PatternSequencer<'a, N>),
    EditPreview(EditPreview<N>),
}

impl<const N: usize> Strategy for StrategySlot<'_, N> {
    fn draw_frame(&mut self, frame: &mut Frame<'_>, frame_counter: u32) -> u32 {
        match self {
            Self::SolidColor(strategy) => strategy.draw_frame(frame, frame_counter),
            Self::SolidFigure(strategy) => strategy.draw_frame(frame, frame_counter),
            Self::PartCycle(strategy) => strategy.draw_frame(frame, frame_counter),
            Self::Pulsing(strategy) => strategy.draw_frame(frame, frame_counter),
            Self::RandomDrops(strategy) => strategy.draw_frame(frame, frame_counter),
            Self::Trains(strategy) => strategy.draw_frame(frame, frame_counter),
            Self::Marquee(strategy) => strategy.draw_frame(frame, frame_counter),
            Self::PatternSequence(strategy) => strategy.draw_frame(frame, frame_counter),
            Self::EditPreview(strategy) => strategy.draw_frame(frame, frame_counter),
        }
    }
}

const EFFECT_KEY_SOLID: &str = "solid";
const EFFECT_KEY_PULSING: &str = "pulsing";
const EFFECT_KEY_SLOW_CYCLE: &str = "slowcycle";
const EFFECT_KEY_FAST_CYCLE: &str = "fastcycle";
const EFFECT_KEY_DROPS: &str = "drops";
const EFFECT_KEY_TRAINS: &str = "trains";
const EFFECT_KEY_MARQUEE: &str = "marquee";

const EFFECT_NAME_SOLID: &str = "Solid Figure";
const EFFECT_NAME_PULSING: &str = "Pulsing Figure";
const EFFECT_NAME_SLOW_CYCLE: &str = "Part Cycle Slow";
const EFFECT_NAME_FAST_CYCLE: &str = "Part Cycle Fast";
const EFFECT_NAME_DROPS: &str = "Random Drops";
const EFFECT_NAME_TRAINS: &str = "Trains";
const EFFECT_NAME_MARQUEE: &str = "Marquee";

const EFFECT_ID_SOLID: u8 = 0;
const EFFECT_ID_PULSING: u8 = 1;
const EFFECT_ID_SLOW_CYCLE: u8 = 2;
const EFFECT_ID_FAST_CYCLE: u8 = 3;
const EFFECT_ID_DROPS: u8 = 4;
const EFFECT_ID_TRAINS: u8 = 5;
const EFFECT_ID_MARQUEE: u8 = 6;

/// Registered named effects, in registry order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectId {
    Solid = EFFECT_ID_SOLID,
    Pulsing = EFFECT_ID_PULSING,
    SlowCycle = EFFECT_ID_SLOW_CYCLE,
    FastCycle = EFFECT_ID_FAST_CYCLE,
    Drops = EFFECT_ID_DROPS,
    Trains = EFFECT_ID_TRAINS,
    Marquee = EFFECT_ID_MARQUEE,
}

impl EffectId {
    pub const ALL: [Self; 7] = [
        Self::Solid,
        Self::Pulsing,
        Self::SlowCycle,
        Self::FastCycle,
        Self::Drops,
        Self::Trains,
        Self::Marquee,
    ];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_SOLID => Self::Solid,
            EFFECT_ID_PULSING => Self::Pulsing,
            EFFECT_ID_SLOW_CYCLE => Self::SlowCycle,
            EFFECT_ID_FAST_CYCLE => Self::FastCycle,
            EFFECT_ID_DROPS => Self::Drops,
            EFFECT_ID_TRAINS => Self::Trains,
            EFFECT_ID_MARQUEE => Self::Marquee,
            _ => return None,
        })
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// Short key, as used on the messaging surface.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solid => EFFECT_KEY_SOLID,
            Self::Pulsing => EFFECT_KEY_PULSING,
            Self::SlowCycle => EFFECT_KEY_SLOW_CYCLE,
            Self::FastCycle => EFFECT_KEY_FAST_CYCLE,
            Self::Drops => EFFECT_KEY_DROPS,
            Self::Trains => EFFECT_KEY_TRAINS,
            Self::Marquee => EFFECT_KEY_MARQUEE,
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Solid => EFFECT_NAME_SOLID,
            Self::Pulsing => EFFECT_NAME_PULSING,
            Self::SlowCycle => EFFECT_NAME_SLOW_CYCLE,
            Self::FastCycle => EFFECT_NAME_FAST_CYCLE,
            Self::Drops => EFFECT_NAME_DROPS,
            Self::Trains => EFFECT_NAME_TRAINS,
            Self::Marquee => EFFECT_NAME_MARQUEE,
        }
    }

    /// Look an effect up by short key or display name (exact match).
    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s || id.display_name() == s)
    }

    /// Instantiate the effect.
    pub fn to_slot<'a, const N: usize>(
        self,
        context: &StrategyContext<'a>,
        seed: u64,
    ) -> StrategySlot<'a, N> {
        match self {
            Self::Solid => StrategySlot::SolidFigure(SolidFigure::new(
                context.layout,
                SOLID_FIGURE_BRIGHTNESS,
            )),
            Self::Pulsing => StrategySlot::Pulsing(Pulsing::new(context.layout, seed)),
            Self::SlowCycle => StrategySlot::PartCycle(PartCycle::new(context.layout, 1)),
            Self::FastCycle => StrategySlot::PartCycle(PartCycle::new(context.layout, 8)),
            Self::Drops => StrategySlot::RandomDrops(RandomDrops::new(seed)),
            Self::Trains => StrategySlot::Trains(TrackSimulation::new(
                context.tracks,
                context.trains,
                seed,
            )),
            Self::Marquee => StrategySlot::Marquee(Marquee::new(context.positions)),
        }
    }
}
