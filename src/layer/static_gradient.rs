//! Static gradient
//!
//! Spreads the palette across the strip once and shows it forever.

use alloc::vec;

use super::{FrameTable, Layer, LayerParams, TickContext};
use crate::color::gradient;
use crate::pixel_buffer::PixelBuffer;

#[derive(Debug, Clone)]
pub struct StaticLayer {
    frames: FrameTable,
}

impl StaticLayer {
    pub fn new(params: &LayerParams) -> Self {
        let n = params.led_count;
        let frame = gradient(&params.palette, n, false).slice(0..n);
        Self {
            frames: FrameTable::new(vec![frame]),
        }
    }
}

impl Layer for StaticLayer {
    fn next_frame(&mut self, ctx: &mut TickContext<'_>) -> Option<&PixelBuffer> {
        self.frames.frame_at(ctx.tick)
    }
}
