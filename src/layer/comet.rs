//! Comet and chase
//!
//! A trail is built from the palette: the first color is the head, the
//! remaining colors form a gradient behind it, and the whole trail is
//! dimmed by a decay curve whose length follows `effect_cutoff`.
//! A comet runs a single trail around the strip, a chase tiles the trail
//! over the full length. Both move by `effect_rate` pixels per frame.

use alloc::vec;

use super::{FrameTable, Layer, LayerParams, TickContext, shifting_frames};
use crate::color::{Color, gradient};
use crate::decay::DecayTable;
use crate::pixel_buffer::{PixelBuffer, ShiftDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailShape {
    /// One trail followed by a full strip of dark pixels
    Single,
    /// Trail repeated along the whole strip
    Tiled,
}

#[derive(Debug, Clone)]
pub struct CometLayer {
    frames: FrameTable,
}

impl CometLayer {
    #[allow(clippy::cast_precision_loss)]
    pub fn new(params: &LayerParams, shape: TrailShape) -> Self {
        let n = params.led_count;
        let trail = trail(params);

        let mut strip = match shape {
            TrailShape::Single => {
                let mut comet = trail;
                comet.pad_right(Color::OFF, n);
                comet
            }
            TrailShape::Tiled => {
                let mut chase = trail.clone();
                if !trail.is_empty() {
                    for _ in 0..n / trail.len() {
                        chase.extend_from(&trail);
                    }
                }
                chase
            }
        };

        if params.direction == ShiftDirection::Right {
            strip.reverse();
        }

        Self {
            frames: shifting_frames(strip, params.effect_rate, params.direction, n),
        }
    }
}

/// Decayed head-plus-gradient trail
#[allow(clippy::cast_precision_loss)]
fn trail(params: &LayerParams) -> PixelBuffer {
    let Some((&head, rest)) = params.palette.split_first() else {
        return PixelBuffer::new();
    };
    let factor = params.palette.len() as f32 * params.cutoff_or_min();
    let decay = DecayTable::new(params.frame_rate, factor, 1.0);
    let curve = decay.run();

    let tail_palette = if rest.is_empty() { vec![head] } else { rest.to_vec() };
    let mut colors = PixelBuffer::filled(head, 1);
    colors.extend_from(&gradient(&tail_palette, curve.len() + 1, false));

    colors
        .iter()
        .zip(curve)
        .map(|(color, &level)| color * level)
        .collect()
}

impl Layer for CometLayer {
    fn next_frame(&mut self, ctx: &mut TickContext<'_>) -> Option<&PixelBuffer> {
        self.frames.frame_at(ctx.tick)
    }
}
