//! Moving gradient
//!
//! The palette, closed back onto its first color, is spread over the
//! strip and rotated by `effect_rate` pixels per frame.

use super::{FrameTable, Layer, LayerParams, TickContext, shifting_frames};
use crate::color::gradient;
use crate::pixel_buffer::PixelBuffer;

#[derive(Debug, Clone)]
pub struct GradientLayer {
    frames: FrameTable,
}

impl GradientLayer {
    pub fn new(params: &LayerParams) -> Self {
        let mut palette = params.palette.clone();
        if let Some(&first) = palette.first() {
            palette.push(first);
        }
        let ramp = gradient(&palette, params.led_count, false);

        Self {
            frames: shifting_frames(ramp, params.effect_rate, params.direction, params.led_count),
        }
    }
}

impl Layer for GradientLayer {
    fn next_frame(&mut self, ctx: &mut TickContext<'_>) -> Option<&PixelBuffer> {
        self.frames.frame_at(ctx.tick)
    }
}
