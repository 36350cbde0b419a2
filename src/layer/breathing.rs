//! Breathing effect
//!
//! Each palette color fades in and out following a smoothed cosine
//! envelope, then the next color takes over.

use alloc::vec::Vec;
use core::f32::consts::PI;

use super::{FrameTable, Layer, LayerParams, TickContext};
use crate::pixel_buffer::PixelBuffer;

/// `exp(-1)`, the envelope minimum before normalization
const ENVELOPE_FLOOR: f32 = 0.367_879;
/// `exp(1) - exp(-1)`, the envelope span before normalization
const ENVELOPE_SPAN: f32 = 2.350_402;

#[derive(Debug, Clone)]
pub struct BreathingLayer {
    frames: FrameTable,
}

impl BreathingLayer {
    pub fn new(params: &LayerParams) -> Self {
        let brightness = envelope(params.frame_rate * params.effect_rate * 0.5);

        let mut frames = Vec::with_capacity(params.palette.len() * brightness.len());
        for &color in &params.palette {
            for &level in &brightness {
                frames.push(PixelBuffer::filled(color * level, params.led_count));
            }
        }

        Self {
            frames: FrameTable::new(frames),
        }
    }
}

/// One breath of `period` samples, starting dark
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn envelope(period: f32) -> Vec<f32> {
    let period = period.max(1.0);
    let samples = libm::floorf(period) as usize;
    let offset = libm::floorf(period);

    (0..samples)
        .map(|x| {
            let phase = (2.0 * PI / period) * (x as f32 + offset);
            let v = (libm::expf(-libm::cosf(phase)) - ENVELOPE_FLOOR) / ENVELOPE_SPAN;
            v.clamp(0.0, 1.0)
        })
        .collect()
}

impl Layer for BreathingLayer {
    fn next_frame(&mut self, ctx: &mut TickContext<'_>) -> Option<&PixelBuffer> {
        self.frames.frame_at(ctx.tick)
    }
}
