mod gradient;
mod order;

pub use gradient::gradient;
pub use order::ColorOrder;

use core::ops::Mul;

use smart_leds::RGB8;

/// Quantized 8-bit pixel as written to LED chains
pub type Rgb = RGB8;

/// Highest value a quantized channel may take
pub const CHANNEL_MAX: u8 = 254;

/// Color with floating point channels, nominally in `0.0..=1.0`
///
/// Layer math never clamps; values outside the nominal range are legal
/// until [`quantize`] is applied at the output boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const OFF: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Linear interpolation towards `other`, `t = 0` gives `self`
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            r: self.r + t * (other.r - self.r),
            g: self.g + t * (other.g - self.g),
            b: self.b + t * (other.b - self.b),
        }
    }

    /// Quantize all channels to the output byte range
    pub fn to_rgb(self) -> Rgb {
        Rgb {
            r: quantize(self.r),
            g: quantize(self.g),
            b: quantize(self.b),
        }
    }
}

impl Mul<f32> for Color {
    type Output = Self;

    fn mul(self, scale: f32) -> Self {
        Self {
            r: self.r * scale,
            g: self.g * scale,
            b: self.b * scale,
        }
    }
}

/// Convert one channel to a byte: `round(clamp(value, 0, 1) * 254)`
///
/// NaN maps to 0.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn quantize(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    let clamped = value.clamp(0.0, 1.0);
    libm::roundf(clamped * f32::from(CHANNEL_MAX)) as u8
}
