//! Random twinkles
//!
//! Every tick each pixel may ignite with probability `effect_rate / 255`
//! to a random palette color. A lit pixel is dimmed by the next sample of
//! the decay curve on every tick until the curve runs out.

use alloc::vec;
use alloc::vec::Vec;

use super::{Layer, LayerParams, TickContext};
use crate::color::Color;
use crate::decay::DecayTable;
use crate::pixel_buffer::PixelBuffer;

const SPAWN_SCALE: f32 = 255.0;

#[derive(Debug, Clone)]
pub struct TwinkleLayer {
    palette: Vec<Color>,
    probability: f32,
    decay: DecayTable,
    frame: PixelBuffer,
    /// Decay step per pixel, `None` while the pixel is dark
    age: Vec<Option<usize>>,
}

impl TwinkleLayer {
    pub fn new(params: &LayerParams) -> Self {
        Self {
            palette: params.palette.clone(),
            probability: params.effect_rate / SPAWN_SCALE,
            decay: DecayTable::new(params.frame_rate, 1.0 / params.cutoff_or_min(), 1.0),
            frame: PixelBuffer::off(params.led_count),
            age: vec![None; params.led_count],
        }
    }
}

impl Layer for TwinkleLayer {
    #[allow(clippy::cast_possible_truncation)]
    fn next_frame(&mut self, ctx: &mut TickContext<'_>) -> Option<&PixelBuffer> {
        let curve = self.decay.run();

        for (i, age) in self.age.iter_mut().enumerate() {
            if ctx.rng.unit() < self.probability {
                let pick = ctx.rng.below(self.palette.len() as u32) as usize;
                if let Some(&color) = self.palette.get(pick) {
                    self.frame.set(i, color);
                    *age = Some(0);
                }
            }

            let Some(step) = *age else {
                continue;
            };
            match curve.get(step) {
                Some(&level) => {
                    self.frame.set(i, self.frame.pixel(i) * level);
                    *age = Some(step + 1);
                }
                None => {
                    self.frame.set(i, Color::OFF);
                    *age = None;
                }
            }
        }

        Some(&self.frame)
    }

    fn reset(&mut self) {
        self.frame.fill(Color::OFF);
        self.age.fill(None);
    }
}
