//! Turns the whole strip on and off, one palette color per cycle

use alloc::vec::Vec;

use super::{FrameTable, Layer, LayerParams, TickContext};
use crate::pixel_buffer::PixelBuffer;

#[derive(Debug, Clone)]
pub struct BlinkLayer {
    frames: FrameTable,
}

impl BlinkLayer {
    /// `effect_rate` is the on (and off) duration in seconds
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(params: &LayerParams) -> Self {
        let ticks = libm::floorf(params.frame_rate * params.effect_rate) as u64;
        let off = PixelBuffer::off(params.led_count);

        let mut frames = Vec::with_capacity(params.palette.len() * 2);
        for &color in &params.palette {
            frames.push(PixelBuffer::filled(color, params.led_count));
            frames.push(off.clone());
        }

        Self {
            frames: FrameTable::with_hold(frames, ticks),
        }
    }
}

impl Layer for BlinkLayer {
    fn next_frame(&mut self, ctx: &mut TickContext<'_>) -> Option<&PixelBuffer> {
        self.frames.frame_at(ctx.tick)
    }
}
