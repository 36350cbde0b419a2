//! Strobe flashes
//!
//! Every flash jumps to full brightness and decays. A cycle lasts one
//! second and holds `ceil(effect_rate)` flashes; `effect_cutoff` sets how
//! fast each flash fades.

use alloc::vec::Vec;

use super::{FrameTable, Layer, LayerParams, TickContext};
use crate::decay::DecayTable;
use crate::pixel_buffer::PixelBuffer;

#[derive(Debug, Clone)]
pub struct StrobeLayer {
    frames: FrameTable,
}

impl StrobeLayer {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(params: &LayerParams) -> Self {
        let decay = DecayTable::new(
            params.frame_rate,
            1.0 / params.cutoff_or_min(),
            params.effect_rate,
        );
        let cycle = (libm::roundf(params.frame_rate) as usize).max(1);

        let mut frames = Vec::with_capacity(params.palette.len() * cycle);
        for &color in &params.palette {
            for level in decay.padded_samples(cycle) {
                frames.push(PixelBuffer::filled(color * level, params.led_count));
            }
        }

        Self {
            frames: FrameTable::new(frames),
        }
    }
}

impl Layer for StrobeLayer {
    fn next_frame(&mut self, ctx: &mut TickContext<'_>) -> Option<&PixelBuffer> {
        self.frames.frame_at(ctx.tick)
    }
}
