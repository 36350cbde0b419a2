use crate::color::Color;
use crate::pixel_buffer::PixelBuffer;

/// Evenly interpolate a palette into a color ramp
///
/// Each pair of consecutive palette colors gets
/// `steps / (palette.len() - 1) + 1` samples, so the ramp holds
/// `(palette.len() - 1) * divisions` pixels, which is always more than
/// `steps`. Callers slice it to the length they need. The first pixel is the
/// first palette color (the last one when `reverse` is set).
///
/// A single color palette yields `steps` copies of that color.
#[allow(clippy::cast_precision_loss)]
pub fn gradient(palette: &[Color], steps: usize, reverse: bool) -> PixelBuffer {
    match palette {
        [] => PixelBuffer::new(),
        [color] => PixelBuffer::filled(*color, steps),
        _ => {
            let divisions = steps / (palette.len() - 1) + 1;
            let mut ramp = PixelBuffer::new();
            let mut push_segment = |from: Color, to: Color| {
                for t in 0..divisions {
                    ramp.push(from.lerp(to, t as f32 / divisions as f32));
                }
            };

            if reverse {
                for pair in palette.windows(2).rev() {
                    push_segment(pair[1], pair[0]);
                }
            } else {
                for pair in palette.windows(2) {
                    push_segment(pair[0], pair[1]);
                }
            }
            ramp
        }
    }
}
