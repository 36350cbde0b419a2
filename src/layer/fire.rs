//! Fire simulation (after `Fire2012` from the `FastLED` examples)
//!
//! Each cell holds a heat value in `0..=100`. Every tick all cells cool by
//! a random amount up to `effect_cutoff`, heat drifts away from the source
//! end as a three cell trailing average, and a spark may land near the
//! source. Heat picks a color from a 102 step palette gradient.
//!
//! The spark chance comes from `effect_rate` for a plain fire, or from the
//! heater's progress towards its target for a heater fire.

use alloc::vec;
use alloc::vec::Vec;

use super::heater::TARGET_MARGIN;
use super::{Layer, LayerParams, TickContext};
use crate::color::{Color, gradient};
use crate::input::HeaterSnapshot;
use crate::pixel_buffer::PixelBuffer;

const GRADIENT_STEPS: usize = 102;
const MAX_HEAT: f32 = 100.0;
const SPARK_MIN: u32 = 90;
const SPARK_MAX: u32 = 100;
/// Highest spark chance, in percent, a heater fire reaches
const HEATER_SPARK_CEILING: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparkSource {
    /// Spark chance fixed by `effect_rate`
    Random,
    /// Spark chance and intensity follow the heater
    Heater,
}

/// Spark chance in percent and intensity scale for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spark {
    chance: f32,
    intensity: f32,
}

#[derive(Debug, Clone)]
pub struct FireLayer {
    source: SparkSource,
    rate: f32,
    cooling: u32,
    heat_source: usize,
    heat: Vec<f32>,
    ramp: PixelBuffer,
    frame: PixelBuffer,
}

impl FireLayer {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(params: &LayerParams, source: SparkSource) -> Self {
        let n = params.led_count;
        Self {
            source,
            rate: params.effect_rate,
            cooling: libm::floorf(params.effect_cutoff.max(0.0)) as u32,
            heat_source: (n / 10).max(1),
            heat: vec![0.0; n],
            ramp: gradient(&params.palette, GRADIENT_STEPS, false),
            frame: PixelBuffer::off(n),
        }
    }

    pub fn heat(&self) -> &[f32] {
        &self.heat
    }

    fn spark(&self, heater: &HeaterSnapshot) -> Spark {
        match self.source {
            SparkSource::Random => Spark {
                chance: self.rate,
                intensity: 1.0,
            },
            SparkSource::Heater => {
                let ratio = heater_ratio(heater, self.rate);
                Spark {
                    chance: ratio * HEATER_SPARK_CEILING,
                    intensity: ratio,
                }
            }
        }
    }
}

/// How far the heater is towards its goal, `0.0` once the target is reached
/// or while nothing is heating
fn heater_ratio(heater: &HeaterSnapshot, trigger: f32) -> f32 {
    if heater.target > 0.0 && heater.current > 0.0 {
        if heater.current <= heater.target - TARGET_MARGIN {
            return (heater.current / heater.target).clamp(0.0, 1.0);
        }
        return 0.0;
    }
    if heater.target <= 0.0
        && trigger > 0.0
        && heater.current >= trigger
        && heater.last_target > 0.0
    {
        return ((heater.current - trigger) / heater.last_target).clamp(0.0, 1.0);
    }
    0.0
}

impl Layer for FireLayer {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn next_frame(&mut self, ctx: &mut TickContext<'_>) -> Option<&PixelBuffer> {
        let n = self.heat.len();
        if n == 0 {
            return Some(&self.frame);
        }

        for cell in &mut self.heat {
            let cool = ctx.rng.range_inclusive(0, self.cooling) as f32;
            if *cell - cool >= 0.0 {
                *cell -= cool;
            }
        }

        for i in (3..n).rev() {
            let drift = (self.heat[i - 1] + self.heat[i - 2] + self.heat[i - 3]) / 3.0;
            self.heat[i] = drift.max(0.0);
        }

        let spark = self.spark(&ctx.inputs.heater);
        if spark.chance > 0.0 && ctx.rng.range_inclusive(0, 100) as f32 > 100.0 - spark.chance {
            let cell = (ctx.rng.range_inclusive(0, self.heat_source as u32) as usize).min(n - 1);
            let added = ctx.rng.range_inclusive(SPARK_MIN, SPARK_MAX) as f32 * spark.intensity;
            self.heat[cell] = (self.heat[cell] + added).min(MAX_HEAT);
        }

        let last = self.ramp.len().saturating_sub(1);
        for (i, &heat) in self.heat.iter().enumerate() {
            let color = self
                .ramp
                .get((heat as usize).min(last))
                .unwrap_or(Color::OFF);
            self.frame.set(i, color);
        }

        Some(&self.frame)
    }

    fn reset(&mut self) {
        self.heat.fill(0.0);
        self.frame.fill(Color::OFF);
    }
}
