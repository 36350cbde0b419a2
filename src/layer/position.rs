//! Position display for stepper axes and print progress
//!
//! A bright spot sits at the current position with a leading trail of
//! `effect_rate` pixels and a trailing trail of `effect_cutoff` pixels.
//! 101 frames, one per percent, are built at construction.

use alloc::vec::Vec;

use super::{FrameTable, Layer, LayerParams, TickContext};
use crate::color::{Color, gradient};
use crate::input::INPUT_MAX;
use crate::pixel_buffer::{PixelBuffer, ShiftDirection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSource {
    Stepper,
    Progress,
}

#[derive(Debug, Clone)]
pub struct PositionLayer {
    source: PositionSource,
    frames: FrameTable,
}

impl PositionLayer {
    pub fn new(params: &LayerParams, source: PositionSource) -> Self {
        let n = params.led_count;
        let leading_len = trail_len(params.effect_rate, n);
        let trailing_len = trail_len(params.effect_cutoff, n);
        let palette = params.palette_pair();

        let mut trailing = gradient(&palette, trailing_len, true).slice(0..trailing_len);
        let leading = gradient(&palette, leading_len, false).slice(0..leading_len);
        trailing.pad_left(Color::OFF, n);

        let anchor = trailing.len() - 1;
        let mut strip = trailing;
        strip.extend_from(&leading.slice(1..leading.len()));
        strip.pad_right(Color::OFF, n);
        strip.shift(anchor, ShiftDirection::Left);

        let mut positions = Vec::with_capacity(n + 1);
        positions.push(strip.slice(0..n));
        for _ in 0..n {
            strip.shift(1, ShiftDirection::Right);
            positions.push(strip.slice(0..n));
        }

        let steps = usize::from(INPUT_MAX);
        let frames = (0..=steps)
            .map(|percent| positions[percent * n / steps].clone())
            .collect();

        Self {
            source,
            frames: FrameTable::new(frames),
        }
    }
}

/// Trail length in pixels, never longer than the strip
///
/// A zero length covers the whole strip.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn trail_len(value: f32, led_count: usize) -> usize {
    let longest = led_count.max(1);
    if value <= 0.0 {
        return longest;
    }
    (libm::floorf(value) as usize).clamp(1, longest)
}

impl Layer for PositionLayer {
    fn next_frame(&mut self, ctx: &mut TickContext<'_>) -> Option<&PixelBuffer> {
        let position = match self.source {
            PositionSource::Stepper => ctx.inputs.stepper_position,
            PositionSource::Progress => ctx.inputs.progress,
        };
        self.frames.get(usize::from(position.min(INPUT_MAX)))
    }
}
