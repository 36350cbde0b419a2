//! Effects: named layer stacks bound to LED pixels
//!
//! An effect owns its layers (stored bottom to top), its output frame and
//! the mapping from logical pixel to chain byte offset. It runs through
//! three states:
//!
//! - `Disabled`: not ticking, the strip keeps whatever was last written
//! - `Running`: ticks every `1 / frame_rate` seconds
//! - `Blackout`: final state after a host shutdown, all outputs zeroed

use alloc::boxed::Box;
use alloc::vec::Vec;

use embassy_time::{Duration, Instant};
#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::LedChain;
use crate::color::{Color, ColorOrder};
use crate::compositor::{BlendMode, blend_into};
use crate::config::{EffectConfig, EffectName, RestartPolicy, ShutdownPolicy};
use crate::error::{ConfigError, Result};
use crate::input::ExternalInputs;
use crate::layer::{LayerKind, LayerParams, LayerSlot, TickContext};
use crate::pixel_buffer::PixelBuffer;
use crate::random::{RandomSource, SplitMix64};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectState {
    Disabled,
    Running,
    Blackout,
}

/// Where one logical pixel lives on the hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelAddress {
    pub chain: usize,
    /// Byte offset of the pixel inside the chain's color data
    pub offset: usize,
    pub order: ColorOrder,
}

/// A layer and the rule used to blend it onto the layers below
#[derive(Debug, Clone)]
pub struct StackedLayer {
    pub slot: LayerSlot,
    pub blend: BlendMode,
}

pub struct Effect {
    name: EffectName,
    frame_duration: Duration,
    restart: RestartPolicy,
    shutdown: ShutdownPolicy,
    state: EffectState,

    layers: Vec<StackedLayer>,
    pixels: Vec<PixelAddress>,
    chains: Vec<usize>,
    frame: PixelBuffer,
    rng: Box<dyn RandomSource>,

    tick: u64,
    next_frame: Instant,
}

impl Effect {
    /// Build an effect against the chains it will draw on
    ///
    /// Fails on any configuration problem; no partially built effect is
    /// ever returned.
    pub fn new<C: LedChain>(config: &EffectConfig, chains: &[C]) -> Result<Self> {
        config.validate()?;

        let mut pixels = Vec::new();
        let mut used_chains = Vec::new();
        for target in &config.targets {
            let chain = chains
                .get(target.chain)
                .ok_or(ConfigError::UnknownChain(target.chain))?;
            let order = chain.color_order();
            for index in target.selection.indices(chain.led_count())? {
                pixels.push(PixelAddress {
                    chain: target.chain,
                    offset: index * order.stride(),
                    order,
                });
            }
            if !used_chains.contains(&target.chain) {
                used_chains.push(target.chain);
            }
        }
        if pixels.is_empty() {
            return Err(ConfigError::NoLeds(config.name.as_str().into()));
        }

        let led_count = pixels.len();
        let layers = config
            .layers
            .iter()
            .rev()
            .map(|layer| {
                let params = LayerParams::new(
                    led_count,
                    layer.palette.clone(),
                    layer.effect_rate,
                    layer.effect_cutoff,
                    config.frame_rate,
                );
                StackedLayer {
                    slot: layer.kind.build(&params),
                    blend: layer.blend,
                }
            })
            .collect::<Vec<_>>();

        #[cfg(feature = "esp32-log")]
        println!(
            "[Effect.new] '{}': {} leds, {} layers",
            config.name,
            led_count,
            layers.len()
        );

        Ok(Self {
            name: config.name.clone(),
            frame_duration: frame_duration(config.frame_rate),
            restart: config.restart,
            shutdown: config.shutdown_policy(),
            state: EffectState::Disabled,
            layers,
            pixels,
            chains: used_chains,
            frame: PixelBuffer::off(led_count),
            rng: Box::new(SplitMix64::new(config.seed)),
            tick: 0,
            next_frame: Instant::from_ticks(0),
        })
    }

    /// Replace the random source used by stateful layers
    #[must_use]
    pub fn with_random_source(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = rng;
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub const fn state(&self) -> EffectState {
        self.state
    }

    pub const fn is_running(&self) -> bool {
        matches!(self.state, EffectState::Running)
    }

    pub const fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    pub const fn shutdown_policy(&self) -> ShutdownPolicy {
        self.shutdown
    }

    /// Number of logical pixels
    pub fn led_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn pixels(&self) -> &[PixelAddress] {
        &self.pixels
    }

    /// Layer kinds from bottom to top
    pub fn layer_kinds(&self) -> impl Iterator<Item = LayerKind> + '_ {
        self.layers.iter().map(|layer| layer.slot.kind())
    }

    /// Last composed frame
    pub const fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    /// Ticks rendered since the last restart
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Deadline of the next frame while running
    pub fn next_deadline(&self) -> Option<Instant> {
        self.is_running().then_some(self.next_frame)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.is_running() && now >= self.next_frame
    }

    /// Start ticking, the first frame is due at `now`
    pub fn enable(&mut self, now: Instant) {
        match self.state {
            EffectState::Running => return,
            EffectState::Blackout => {
                #[cfg(feature = "esp32-log")]
                println!("[Effect.enable] '{}' ignored after shutdown", self.name);
                return;
            }
            EffectState::Disabled => {}
        }

        if self.restart == RestartPolicy::Restart {
            self.tick = 0;
            for layer in &mut self.layers {
                layer.slot.reset();
            }
        }
        self.state = EffectState::Running;
        self.next_frame = now;

        #[cfg(feature = "esp32-log")]
        println!("[Effect.enable] '{}' started at tick {}", self.name, self.tick);
    }

    /// Stop ticking
    ///
    /// Unless the effect is set to keep running on errors, its pixels are
    /// zeroed and pushed once.
    pub fn disable<C: LedChain>(&mut self, chains: &mut [C]) {
        if self.state != EffectState::Running {
            return;
        }
        self.state = EffectState::Disabled;
        if self.shutdown != ShutdownPolicy::Continue {
            self.frame.fill(Color::OFF);
            self.write(chains);
        }

        #[cfg(feature = "esp32-log")]
        println!("[Effect.disable] '{}' stopped at tick {}", self.name, self.tick);
    }

    /// React to a host shutdown according to the shutdown policy
    pub fn shutdown<C: LedChain>(&mut self, now: Instant, chains: &mut [C]) {
        #[cfg(feature = "esp32-log")]
        println!("[Effect.shutdown] '{}': {:?}", self.name, self.shutdown);

        match self.shutdown {
            ShutdownPolicy::Blackout => {
                self.state = EffectState::Blackout;
                for &index in &self.chains {
                    if let Some(chain) = chains.get_mut(index) {
                        chain.color_data().fill(0);
                        chain.send_data();
                    }
                }
            }
            ShutdownPolicy::Continue => self.enable(now),
            ShutdownPolicy::HoldLastFrame => {
                if self.state == EffectState::Running {
                    self.state = EffectState::Disabled;
                }
            }
        }
    }

    /// Compose the next frame from all layers, bottom to top
    pub fn render(&mut self, inputs: &ExternalInputs) -> &PixelBuffer {
        self.frame.fill(Color::OFF);

        let mut ctx = TickContext {
            tick: self.tick,
            inputs,
            rng: &mut *self.rng,
        };
        for layer in &mut self.layers {
            if let Some(layer_frame) = layer.slot.next_frame(&mut ctx) {
                blend_into(&mut self.frame, layer_frame, layer.blend);
            }
        }

        self.tick = self.tick.wrapping_add(1);
        &self.frame
    }

    /// Quantize the current frame into the chains and push them
    pub fn write<C: LedChain>(&self, chains: &mut [C]) {
        for (i, address) in self.pixels.iter().enumerate() {
            let Some(chain) = chains.get_mut(address.chain) else {
                continue;
            };
            let rgb = self.frame.pixel(i).to_rgb();
            let end = address.offset + address.order.stride();
            if let Some(bytes) = chain.color_data().get_mut(address.offset..end) {
                address.order.pack(rgb, bytes);
            }
        }

        for &index in &self.chains {
            if let Some(chain) = chains.get_mut(index) {
                chain.send_data();
            }
        }
    }

    /// Render, write and schedule the next frame
    ///
    /// Falling more than two frames behind drops the backlog instead of
    /// rendering a burst of catch-up frames.
    pub fn tick<C: LedChain>(&mut self, now: Instant, inputs: &ExternalInputs, chains: &mut [C]) {
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        self.render(inputs);
        self.write(chains);

        self.next_frame += self.frame_duration;
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn frame_duration(frame_rate: f32) -> Duration {
    Duration::from_micros(libm::roundf(1_000_000.0 / frame_rate) as u64)
}
