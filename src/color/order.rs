use crate::color::Rgb;

/// Byte layout of a single pixel on an LED chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorOrder {
    #[default]
    Rgb,
    Grb,
    /// RGB followed by a white channel that is always written as 0
    Rgbw,
    /// GRB followed by a white channel that is always written as 0
    Grbw,
}

impl ColorOrder {
    /// Number of bytes one pixel occupies
    pub const fn stride(self) -> usize {
        match self {
            Self::Rgb | Self::Grb => 3,
            Self::Rgbw | Self::Grbw => 4,
        }
    }

    /// Write a quantized pixel into `out`, which must hold at least `stride()` bytes
    pub fn pack(self, rgb: Rgb, out: &mut [u8]) {
        match self {
            Self::Rgb => out[..3].copy_from_slice(&[rgb.r, rgb.g, rgb.b]),
            Self::Grb => out[..3].copy_from_slice(&[rgb.g, rgb.r, rgb.b]),
            Self::Rgbw => out[..4].copy_from_slice(&[rgb.r, rgb.g, rgb.b, 0]),
            Self::Grbw => out[..4].copy_from_slice(&[rgb.g, rgb.r, rgb.b, 0]),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rgb => "RGB",
            Self::Grb => "GRB",
            Self::Rgbw => "RGBW",
            Self::Grbw => "GRBW",
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            "RGB" | "rgb" => Some(Self::Rgb),
            "GRB" | "grb" => Some(Self::Grb),
            "RGBW" | "rgbw" => Some(Self::Rgbw),
            "GRBW" | "grbw" => Some(Self::Grbw),
            _ => None,
        }
    }
}
