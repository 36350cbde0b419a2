//! Layer compositing
//!
//! Layer frames are combined channel by channel, from the bottom of the
//! stack to the top, with each layer's [`BlendMode`]. Results are not
//! clamped here; additive stacks may leave `0.0..=1.0` until quantization.

use crate::pixel_buffer::PixelBuffer;

const BLEND_NAME_TOP: &str = "top";
const BLEND_NAME_BOTTOM: &str = "bottom";
const BLEND_NAME_ADD: &str = "add";
const BLEND_NAME_SUBTRACT: &str = "subtract";
const BLEND_NAME_DIFFERENCE: &str = "difference";
const BLEND_NAME_AVERAGE: &str = "average";
const BLEND_NAME_MULTIPLY: &str = "multiply";
const BLEND_NAME_DIVIDE: &str = "divide";
const BLEND_NAME_SCREEN: &str = "screen";
const BLEND_NAME_LIGHTEN: &str = "lighten";
const BLEND_NAME_DARKEN: &str = "darken";
const BLEND_NAME_OVERLAY: &str = "overlay";

/// Per-channel rule for merging a layer (`t`) onto the accumulated frame (`b`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Top,
    Bottom,
    Add,
    Subtract,
    Difference,
    Average,
    Multiply,
    Divide,
    Screen,
    Lighten,
    Darken,
    Overlay,
}

impl BlendMode {
    pub const ALL: [Self; 12] = [
        Self::Top,
        Self::Bottom,
        Self::Add,
        Self::Subtract,
        Self::Difference,
        Self::Average,
        Self::Multiply,
        Self::Divide,
        Self::Screen,
        Self::Lighten,
        Self::Darken,
        Self::Overlay,
    ];

    /// Blend one channel
    #[inline]
    pub fn apply(self, t: f32, b: f32) -> f32 {
        match self {
            Self::Top => t,
            Self::Bottom => b,
            Self::Add => t + b,
            Self::Subtract => (t - b).max(0.0),
            Self::Difference => libm::fabsf(t - b),
            Self::Average => 0.5 * (t + b),
            Self::Multiply => t * b,
            Self::Divide => {
                if b > 0.0 {
                    t / b
                } else {
                    0.0
                }
            }
            Self::Screen => 1.0 - (1.0 - t) * (1.0 - b),
            Self::Lighten => t.max(b),
            Self::Darken => t.min(b),
            Self::Overlay => {
                if t <= 0.5 {
                    2.0 * t * b
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - b)
                }
            }
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => BLEND_NAME_TOP,
            Self::Bottom => BLEND_NAME_BOTTOM,
            Self::Add => BLEND_NAME_ADD,
            Self::Subtract => BLEND_NAME_SUBTRACT,
            Self::Difference => BLEND_NAME_DIFFERENCE,
            Self::Average => BLEND_NAME_AVERAGE,
            Self::Multiply => BLEND_NAME_MULTIPLY,
            Self::Divide => BLEND_NAME_DIVIDE,
            Self::Screen => BLEND_NAME_SCREEN,
            Self::Lighten => BLEND_NAME_LIGHTEN,
            Self::Darken => BLEND_NAME_DARKEN,
            Self::Overlay => BLEND_NAME_OVERLAY,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        Some(match s {
            BLEND_NAME_TOP => Self::Top,
            BLEND_NAME_BOTTOM => Self::Bottom,
            BLEND_NAME_ADD => Self::Add,
            BLEND_NAME_SUBTRACT => Self::Subtract,
            BLEND_NAME_DIFFERENCE => Self::Difference,
            BLEND_NAME_AVERAGE => Self::Average,
            BLEND_NAME_MULTIPLY => Self::Multiply,
            BLEND_NAME_DIVIDE => Self::Divide,
            BLEND_NAME_SCREEN => Self::Screen,
            BLEND_NAME_LIGHTEN => Self::Lighten,
            BLEND_NAME_DARKEN => Self::Darken,
            BLEND_NAME_OVERLAY => Self::Overlay,
            _ => return None,
        })
    }
}

/// Blend `layer` onto `accumulated` in place
///
/// Only the overlapping pixel range is touched.
pub fn blend_into(accumulated: &mut PixelBuffer, layer: &PixelBuffer, mode: BlendMode) {
    for (b, &t) in accumulated.channels_mut().iter_mut().zip(layer.channels()) {
        *b = mode.apply(t, *b);
    }
}
