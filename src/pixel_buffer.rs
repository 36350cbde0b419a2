//! Fixed-stride color container
//!
//! Stores pixels as a flat sequence of `f32` channels, three per pixel.
//! Every operation works on whole pixels, so the flat length is always a
//! multiple of [`CHANNELS`].

use alloc::vec::Vec;
use core::ops::Range;

use crate::color::Color;

/// Channels per pixel
pub const CHANNELS: usize = 3;

/// Direction of a circular shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    /// Pixels move towards higher indices, the tail wraps to the front
    Right,
    /// Pixels move towards lower indices, the head wraps to the back
    Left,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PixelBuffer {
    data: Vec<f32>,
}

impl PixelBuffer {
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Buffer of `len` pixels, all off
    pub fn off(len: usize) -> Self {
        Self::filled(Color::OFF, len)
    }

    /// Buffer of `len` copies of `color`
    pub fn filled(color: Color, len: usize) -> Self {
        let mut data = Vec::with_capacity(len * CHANNELS);
        for _ in 0..len {
            data.extend_from_slice(&color.to_array());
        }
        Self { data }
    }

    /// Build from flat channel values
    ///
    /// Returns `None` when the length is not a multiple of [`CHANNELS`].
    pub fn from_channels(data: Vec<f32>) -> Option<Self> {
        if data.len().is_multiple_of(CHANNELS) {
            Some(Self { data })
        } else {
            None
        }
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.data.len() / CHANNELS
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat channel view
    pub fn channels(&self) -> &[f32] {
        &self.data
    }

    pub fn channels_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        let start = index.checked_mul(CHANNELS)?;
        let px = self.data.get(start..start + CHANNELS)?;
        Some(Color::new(px[0], px[1], px[2]))
    }

    /// Read pixel `index`, panics when out of bounds
    pub fn pixel(&self, index: usize) -> Color {
        let start = index * CHANNELS;
        let px = &self.data[start..start + CHANNELS];
        Color::new(px[0], px[1], px[2])
    }

    /// Write pixel `index`, panics when out of bounds
    pub fn set(&mut self, index: usize, color: Color) {
        let start = index * CHANNELS;
        self.data[start..start + CHANNELS].copy_from_slice(&color.to_array());
    }

    pub fn push(&mut self, color: Color) {
        self.data.extend_from_slice(&color.to_array());
    }

    pub fn extend_from(&mut self, other: &Self) {
        self.data.extend_from_slice(&other.data);
    }

    pub fn fill(&mut self, color: Color) {
        for px in self.data.chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&color.to_array());
        }
    }

    /// Copy of the pixels in `range`, clipped to the buffer length
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        Self {
            data: self.data[start * CHANNELS..end * CHANNELS].to_vec(),
        }
    }

    /// Reverse pixel order, channels inside a pixel keep their order
    pub fn reverse(&mut self) {
        let len = self.len();
        for i in 0..len / 2 {
            let j = len - 1 - i;
            for c in 0..CHANNELS {
                self.data.swap(i * CHANNELS + c, j * CHANNELS + c);
            }
        }
    }

    /// Circular shift by `count` pixels
    pub fn shift(&mut self, count: usize, direction: ShiftDirection) {
        let len = self.len();
        if len == 0 {
            return;
        }
        let amount = (count % len) * CHANNELS;
        match direction {
            ShiftDirection::Right => self.data.rotate_right(amount),
            ShiftDirection::Left => self.data.rotate_left(amount),
        }
    }

    /// Prepend `count` copies of `color`
    pub fn pad_left(&mut self, color: Color, count: usize) {
        let mut padded = Self::filled(color, count);
        padded.data.extend_from_slice(&self.data);
        self.data = padded.data;
    }

    /// Append `count` copies of `color`
    pub fn pad_right(&mut self, color: Color, count: usize) {
        for _ in 0..count {
            self.push(color);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|px| Color::new(px[0], px[1], px[2]))
    }
}

impl FromIterator<Color> for PixelBuffer {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut buffer = Self::new();
        for color in iter {
            buffer.push(color);
        }
        buffer
    }
}
