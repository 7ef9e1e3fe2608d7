#![no_std]

pub mod api;
pub mod color;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod frame;
pub mod frame_scheduler;
pub mod layout;
pub mod library;
pub mod math8;
pub mod pattern;
pub mod rng;
pub mod store;
pub mod strategy;

pub use api::DeviceApi;
pub use color::Rgb;
pub use config::{LightControllerConfig, MqttConfig, WifiConfig};
pub use controller::{
    DisabledBroadcaster, LightController, LightMode, LightState, StateBroadcaster, StateTopic,
};
pub use embassy_time::{Duration, Instant};
pub use frame::{DoubleBuffer, Frame, FrameSink};
pub use frame_scheduler::{FrameScheduler, RenderLoop};
pub use layout::FIGURE_PIXEL_COUNT;
pub use library::PatternLibrary;
pub use store::{ConfigStore, MemoryStore, StoreError, StoreKey};
pub use strategy::{EffectId, Strategy, StrategyContext, StrategySlot};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms. Writing
/// starts transmission of `colors`; the slice is not touched again until the
/// next write.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
