#![no_std]

extern crate alloc;

pub mod color;
pub mod compositor;
pub mod config;
pub mod control;
pub mod decay;
pub mod effect;
pub mod error;
pub mod frame_scheduler;
pub mod input;
pub mod layer;
pub mod pixel_buffer;
pub mod random;

pub use color::{Color, ColorOrder, Rgb};
pub use compositor::BlendMode;
pub use config::{
    EffectConfig, LayerConfig, LedSelection, LedTarget, RestartPolicy, ShutdownPolicy,
};
pub use control::{ControlChannel, ControlCommand, ControlReceiver, ControlSender};
pub use effect::{Effect, EffectState};
pub use error::ConfigError;
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use input::{ExternalInputs, InputState, StepperAdapter};
pub use layer::{LayerKind, LayerSlot};
pub use pixel_buffer::PixelBuffer;
pub use random::{RandomSource, SplitMix64};
pub use embassy_time::{Duration, Instant};

/// Abstract LED chain
///
/// Implement this trait to support different hardware platforms.
/// Effects write packed color bytes into `color_data` and call
/// `send_data` once per frame.
pub trait LedChain {
    fn color_order(&self) -> ColorOrder;

    /// Number of pixels on the chain
    fn led_count(&self) -> usize;

    /// Packed bytes, `led_count * color_order().stride()` long
    fn color_data(&mut self) -> &mut [u8];

    /// Push the current color data to the hardware
    fn send_data(&mut self);
}
