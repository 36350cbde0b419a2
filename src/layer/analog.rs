//! Analog input display
//!
//! The analog reading, scaled by `effect_rate`, picks one of 101 gradient
//! colors. Readings at or below `effect_cutoff` fade the last lit color out
//! along a decay curve and then show the first palette color.

use alloc::vec::Vec;

use super::{FrameTable, Layer, LayerParams, TickContext};
use crate::color::{Color, gradient};
use crate::decay::DecayTable;
use crate::input::INPUT_MAX;
use crate::pixel_buffer::PixelBuffer;

const FADE_FACTOR: f32 = 8.0;

#[derive(Debug, Clone)]
pub struct AnalogPinLayer {
    scale: f32,
    threshold: f32,
    frames: FrameTable,
    fade: Vec<f32>,
    /// Fade step and the index it fades from
    fading: Option<(usize, usize)>,
}

impl AnalogPinLayer {
    pub fn new(params: &LayerParams) -> Self {
        let mut palette = params.palette.clone();
        if palette.len() == 1 {
            palette.insert(0, Color::OFF);
        }

        let steps = usize::from(INPUT_MAX) + 1;
        let ramp = gradient(&palette, usize::from(INPUT_MAX), false);
        let frames = ramp
            .iter()
            .take(steps)
            .map(|color| PixelBuffer::filled(color, params.led_count))
            .collect();

        let fade = DecayTable::new(params.frame_rate, FADE_FACTOR, 1.0)
            .run()
            .to_vec();

        Self {
            scale: params.effect_rate,
            threshold: params.effect_cutoff,
            frames: FrameTable::new(frames),
            fade,
            fading: None,
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn step(&mut self, analog: f32) -> usize {
        let max = f32::from(INPUT_MAX);
        let value = libm::floorf(analog * self.scale).clamp(0.0, max);
        let index = value as usize;

        if value > self.threshold {
            self.fading = Some((0, index));
            return index;
        }

        if let Some((step, from)) = self.fading {
            if let Some(&level) = self.fade.get(step) {
                self.fading = Some((step + 1, from));
                return libm::floorf(level * from as f32) as usize;
            }
            self.fading = None;
        }

        0
    }
}

impl Layer for AnalogPinLayer {
    fn next_frame(&mut self, ctx: &mut TickContext<'_>) -> Option<&PixelBuffer> {
        let step = self.step(ctx.inputs.analog);
        let last = self.frames.len().checked_sub(1)?;
        self.frames.get(step.min(last))
    }

    fn reset(&mut self) {
        self.fading = None;
    }
}
