//! Heater temperature display
//!
//! Maps the heater's progress towards its target onto a 200 step palette
//! gradient. Without a target, a heater that is still above the trigger
//! temperature in `effect_rate` shows its cool-down relative to the last
//! target it had.

use alloc::vec::Vec;

use super::{FrameTable, Layer, LayerParams, TickContext};
use crate::color::gradient;
use crate::input::HeaterSnapshot;
use crate::pixel_buffer::PixelBuffer;

/// Gradient steps between cold and target temperature
pub(crate) const HEATER_STEPS: usize = 200;

/// Degrees below target that count as having reached it
pub(crate) const TARGET_MARGIN: f32 = 5.0;

#[derive(Debug, Clone)]
pub struct HeaterLayer {
    trigger: f32,
    hold_plateau: bool,
    frames: FrameTable,
}

impl HeaterLayer {
    pub fn new(params: &LayerParams) -> Self {
        let palette = params.palette_pair();
        let (last, rest) = palette
            .split_last()
            .map_or((None, &[][..]), |(last, rest)| (Some(*last), rest));

        let mut ramp = gradient(rest, HEATER_STEPS, false);
        if let Some(last) = last {
            ramp.push(last);
        }

        let frames: Vec<PixelBuffer> = ramp
            .iter()
            .map(|color| PixelBuffer::filled(color, params.led_count))
            .collect();

        Self {
            trigger: params.effect_rate,
            hold_plateau: params.effect_cutoff <= 0.0,
            frames: FrameTable::new(frames),
        }
    }

    /// Frame index for the heater state, `None` when the layer is idle
    fn step(&self, heater: &HeaterSnapshot) -> Option<usize> {
        let last_index = self.frames.len().checked_sub(1)?;

        if heater.target > 0.0 {
            if heater.current <= heater.target - TARGET_MARGIN {
                return Some(scaled_step(heater.current / heater.target, last_index));
            }
            return self.hold_plateau.then_some(last_index);
        }

        if self.trigger > 0.0 && heater.current >= self.trigger && heater.last_target > 0.0 {
            let ratio = (heater.current - self.trigger) / heater.last_target;
            return Some(scaled_step(ratio, last_index));
        }

        None
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn scaled_step(ratio: f32, last_index: usize) -> usize {
    let step = libm::floorf(ratio * HEATER_STEPS as f32).max(0.0) as usize;
    step.min(last_index)
}

impl Layer for HeaterLayer {
    fn next_frame(&mut self, ctx: &mut TickContext<'_>) -> Option<&PixelBuffer> {
        let step = self.step(&ctx.inputs.heater)?;
        self.frames.get(step)
    }
}
