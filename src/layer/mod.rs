//! Layer system with compile-time known layer variants
//!
//! All layers are stored in an enum and dispatched with `match`.
//! Each layer implements the `Layer` trait.
//!
//! Layers whose output only depends on the tick count precompute a
//! [`FrameTable`] at construction, so picking a frame is an index lookup.
//! Layers that read external inputs or keep random state compute their frame
//! from the tick context instead.

mod analog;
mod blink;
mod breathing;
mod comet;
mod fire;
mod gradient;
mod heater;
mod position;
mod static_gradient;
mod strobe;
mod twinkle;

use alloc::vec::Vec;

pub use analog::AnalogPinLayer;
pub use blink::BlinkLayer;
pub use breathing::BreathingLayer;
pub use comet::{CometLayer, TrailShape};
pub use fire::{FireLayer, SparkSource};
pub use gradient::GradientLayer;
pub use heater::HeaterLayer;
pub use position::{PositionLayer, PositionSource};
pub use static_gradient::StaticLayer;
pub use strobe::StrobeLayer;
pub use twinkle::TwinkleLayer;

use crate::color::Color;
use crate::input::ExternalInputs;
use crate::pixel_buffer::{PixelBuffer, ShiftDirection};
use crate::random::RandomSource;

const LAYER_NAME_STATIC: &str = "static";
const LAYER_NAME_BREATHING: &str = "breathing";
const LAYER_NAME_BLINK: &str = "blink";
const LAYER_NAME_TWINKLE: &str = "twinkle";
const LAYER_NAME_STROBE: &str = "strobe";
const LAYER_NAME_COMET: &str = "comet";
const LAYER_NAME_CHASE: &str = "chase";
const LAYER_NAME_GRADIENT: &str = "gradient";
const LAYER_NAME_HEATER: &str = "heater";
const LAYER_NAME_ANALOG_PIN: &str = "analogpin";
const LAYER_NAME_STEPPER: &str = "stepper";
const LAYER_NAME_PROGRESS: &str = "progress";
const LAYER_NAME_FIRE: &str = "fire";
const LAYER_NAME_HEATER_FIRE: &str = "heaterfire";

/// Fallback for a zero or negative cutoff where it is used as a divisor
/// or a trail length factor
pub(crate) const MIN_CUTOFF: f32 = 0.1;

/// Everything a layer sees during one tick
pub struct TickContext<'a> {
    /// Ticks since the effect (re)started
    pub tick: u64,
    pub inputs: &'a ExternalInputs,
    pub rng: &'a mut dyn RandomSource,
}

pub trait Layer {
    /// Produce the frame for this tick
    ///
    /// `None` means the layer contributes nothing and blending is skipped.
    fn next_frame(&mut self, ctx: &mut TickContext<'_>) -> Option<&PixelBuffer>;

    /// Reset animation state
    fn reset(&mut self) {}
}

/// Construction parameters shared by every layer variant
#[derive(Debug, Clone, PartialEq)]
pub struct LayerParams {
    pub led_count: usize,
    pub palette: Vec<Color>,
    /// Magnitude of the configured rate
    pub effect_rate: f32,
    pub effect_cutoff: f32,
    /// Frames per second of the owning effect
    pub frame_rate: f32,
    /// `Right` for a positive configured rate, `Left` otherwise
    pub direction: ShiftDirection,
}

impl LayerParams {
    /// Normalize a signed rate into magnitude and direction
    pub fn new(
        led_count: usize,
        palette: Vec<Color>,
        effect_rate: f32,
        effect_cutoff: f32,
        frame_rate: f32,
    ) -> Self {
        let direction = if effect_rate > 0.0 {
            ShiftDirection::Right
        } else {
            ShiftDirection::Left
        };
        Self {
            led_count,
            palette,
            effect_rate: libm::fabsf(effect_rate),
            effect_cutoff,
            frame_rate,
            direction,
        }
    }

    /// Palette with a single color duplicated, for layers that interpolate
    pub(crate) fn palette_pair(&self) -> Vec<Color> {
        let mut palette = self.palette.clone();
        if let [color] = palette.as_slice() {
            palette.push(*color);
        }
        palette
    }

    pub(crate) fn cutoff_or_min(&self) -> f32 {
        if self.effect_cutoff > 0.0 {
            self.effect_cutoff
        } else {
            MIN_CUTOFF
        }
    }
}

/// Precomputed frames, each held for `hold` ticks, cycling forever
#[derive(Debug, Clone, Default)]
pub struct FrameTable {
    frames: Vec<PixelBuffer>,
    hold: u64,
}

impl FrameTable {
    pub fn new(frames: Vec<PixelBuffer>) -> Self {
        Self::with_hold(frames, 1)
    }

    pub fn with_hold(frames: Vec<PixelBuffer>, hold: u64) -> Self {
        Self {
            frames,
            hold: hold.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PixelBuffer> {
        self.frames.get(index)
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn frame_at(&self, tick: u64) -> Option<&PixelBuffer> {
        if self.frames.is_empty() {
            return None;
        }
        let index = (tick / self.hold) % self.frames.len() as u64;
        self.frames.get(index as usize)
    }
}

/// Frames of `strip` rotating by `speed` pixels per frame
///
/// Speeds below one pixel hold each position for several frames. A zero
/// speed gives a single still frame. Every frame is the first `led_count`
/// pixels of the rotated strip.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub(crate) fn shifting_frames(
    mut strip: PixelBuffer,
    speed: f32,
    direction: ShiftDirection,
    led_count: usize,
) -> FrameTable {
    if speed <= 0.0 || strip.is_empty() {
        return FrameTable::new(alloc::vec![strip.slice(0..led_count)]);
    }

    let shift = (libm::roundf(speed) as usize).max(1);
    let hold = if speed < 1.0 {
        libm::floorf(1.0 / speed) as u64
    } else {
        1
    };

    let mut frames = Vec::with_capacity(strip.len());
    for _ in 0..strip.len() {
        strip.shift(shift, direction);
        frames.push(strip.slice(0..led_count));
    }
    FrameTable::with_hold(frames, hold)
}

/// Layer slot - enum containing all possible layers
#[derive(Debug, Clone)]
pub enum LayerSlot {
    Static(StaticLayer),
    Breathing(BreathingLayer),
    Blink(BlinkLayer),
    Twinkle(TwinkleLayer),
    Strobe(StrobeLayer),
    Comet(CometLayer),
    Chase(CometLayer),
    Gradient(GradientLayer),
    Heater(HeaterLayer),
    AnalogPin(AnalogPinLayer),
    Stepper(PositionLayer),
    Progress(PositionLayer),
    Fire(FireLayer),
    HeaterFire(FireLayer),
}

/// Known layer types that can be configured
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Static,
    Breathing,
    Blink,
    Twinkle,
    Strobe,
    Comet,
    Chase,
    Gradient,
    Heater,
    AnalogPin,
    Stepper,
    Progress,
    Fire,
    HeaterFire,
}

impl LayerKind {
    pub const ALL: [Self; 14] = [
        Self::Static,
        Self::Breathing,
        Self::Blink,
        Self::Twinkle,
        Self::Strobe,
        Self::Comet,
        Self::Chase,
        Self::Gradient,
        Self::Heater,
        Self::AnalogPin,
        Self::Stepper,
        Self::Progress,
        Self::Fire,
        Self::HeaterFire,
    ];

    pub fn build(self, params: &LayerParams) -> LayerSlot {
        match self {
            Self::Static => LayerSlot::Static(StaticLayer::new(params)),
            Self::Breathing => LayerSlot::Breathing(BreathingLayer::new(params)),
            Self::Blink => LayerSlot::Blink(BlinkLayer::new(params)),
            Self::Twinkle => LayerSlot::Twinkle(TwinkleLayer::new(params)),
            Self::Strobe => LayerSlot::Strobe(StrobeLayer::new(params)),
            Self::Comet => LayerSlot::Comet(CometLayer::new(params, TrailShape::Single)),
            Self::Chase => LayerSlot::Chase(CometLayer::new(params, TrailShape::Tiled)),
            Self::Gradient => LayerSlot::Gradient(GradientLayer::new(params)),
            Self::Heater => LayerSlot::Heater(HeaterLayer::new(params)),
            Self::AnalogPin => LayerSlot::AnalogPin(AnalogPinLayer::new(params)),
            Self::Stepper => {
                LayerSlot::Stepper(PositionLayer::new(params, PositionSource::Stepper))
            }
            Self::Progress => {
                LayerSlot::Progress(PositionLayer::new(params, PositionSource::Progress))
            }
            Self::Fire => LayerSlot::Fire(FireLayer::new(params, SparkSource::Random)),
            Self::HeaterFire => LayerSlot::HeaterFire(FireLayer::new(params, SparkSource::Heater)),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => LAYER_NAME_STATIC,
            Self::Breathing => LAYER_NAME_BREATHING,
            Self::Blink => LAYER_NAME_BLINK,
            Self::Twinkle => LAYER_NAME_TWINKLE,
            Self::Strobe => LAYER_NAME_STROBE,
            Self::Comet => LAYER_NAME_COMET,
            Self::Chase => LAYER_NAME_CHASE,
            Self::Gradient => LAYER_NAME_GRADIENT,
            Self::Heater => LAYER_NAME_HEATER,
            Self::AnalogPin => LAYER_NAME_ANALOG_PIN,
            Self::Stepper => LAYER_NAME_STEPPER,
            Self::Progress => LAYER_NAME_PROGRESS,
            Self::Fire => LAYER_NAME_FIRE,
            Self::HeaterFire => LAYER_NAME_HEATER_FIRE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        Some(match s {
            LAYER_NAME_STATIC => Self::Static,
            LAYER_NAME_BREATHING => Self::Breathing,
            LAYER_NAME_BLINK => Self::Blink,
            LAYER_NAME_TWINKLE => Self::Twinkle,
            LAYER_NAME_STROBE => Self::Strobe,
            LAYER_NAME_COMET => Self::Comet,
            LAYER_NAME_CHASE => Self::Chase,
            LAYER_NAME_GRADIENT => Self::Gradient,
            LAYER_NAME_HEATER => Self::Heater,
            LAYER_NAME_ANALOG_PIN => Self::AnalogPin,
            LAYER_NAME_STEPPER => Self::Stepper,
            LAYER_NAME_PROGRESS => Self::Progress,
            LAYER_NAME_FIRE => Self::Fire,
            LAYER_NAME_HEATER_FIRE => Self::HeaterFire,
            _ => return None,
        })
    }

    /// Whether frames depend on live external inputs
    pub const fn reads_inputs(self) -> bool {
        matches!(
            self,
            Self::Heater | Self::AnalogPin | Self::Stepper | Self::Progress | Self::HeaterFire
        )
    }
}

impl LayerSlot {
    /// Produce the frame for this tick
    pub fn next_frame(&mut self, ctx: &mut TickContext<'_>) -> Option<&PixelBuffer> {
        match self {
            Self::Static(layer) => layer.next_frame(ctx),
            Self::Breathing(layer) => layer.next_frame(ctx),
            Self::Blink(layer) => layer.next_frame(ctx),
            Self::Twinkle(layer) => layer.next_frame(ctx),
            Self::Strobe(layer) => layer.next_frame(ctx),
            Self::Comet(layer) | Self::Chase(layer) => layer.next_frame(ctx),
            Self::Gradient(layer) => layer.next_frame(ctx),
            Self::Heater(layer) => layer.next_frame(ctx),
            Self::AnalogPin(layer) => layer.next_frame(ctx),
            Self::Stepper(layer) | Self::Progress(layer) => layer.next_frame(ctx),
            Self::Fire(layer) | Self::HeaterFire(layer) => layer.next_frame(ctx),
        }
    }

    /// Reset the layer state
    pub fn reset(&mut self) {
        match self {
            Self::Static(layer) => Layer::reset(layer),
            Self::Breathing(layer) => Layer::reset(layer),
            Self::Blink(layer) => Layer::reset(layer),
            Self::Twinkle(layer) => Layer::reset(layer),
            Self::Strobe(layer) => Layer::reset(layer),
            Self::Comet(layer) | Self::Chase(layer) => Layer::reset(layer),
            Self::Gradient(layer) => Layer::reset(layer),
            Self::Heater(layer) => Layer::reset(layer),
            Self::AnalogPin(layer) => Layer::reset(layer),
            Self::Stepper(layer) | Self::Progress(layer) => Layer::reset(layer),
            Self::Fire(layer) | Self::HeaterFire(layer) => Layer::reset(layer),
        }
    }

    /// Get the layer kind for external observation
    pub fn kind(&self) -> LayerKind {
        match self {
            Self::Static(_) => LayerKind::Static,
            Self::Breathing(_) => LayerKind::Breathing,
            Self::Blink(_) => LayerKind::Blink,
            Self::Twinkle(_) => LayerKind::Twinkle,
            Self::Strobe(_) => LayerKind::Strobe,
            Self::Comet(_) => LayerKind::Comet,
            Self::Chase(_) => LayerKind::Chase,
            Self::Gradient(_) => LayerKind::Gradient,
            Self::Heater(_) => LayerKind::Heater,
            Self::AnalogPin(_) => LayerKind::AnalogPin,
            Self::Stepper(_) => LayerKind::Stepper,
            Self::Progress(_) => LayerKind::Progress,
            Self::Fire(_) => LayerKind::Fire,
            Self::HeaterFire(_) => LayerKind::HeaterFire,
        }
    }
}
