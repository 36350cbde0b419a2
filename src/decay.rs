//! Exponential decay curves
//!
//! A decay run starts at `1.0` and falls off as `e^(-x / r)` with
//! `r = frame_rate / 15 * factor`. Samples at or below [`NOISE_FLOOR`]
//! end the run. The same table serves as a brightness envelope over time
//! (breathing, strobe, twinkle) and as a trail length along the strip
//! (comet, chase).

use alloc::vec::Vec;
use core::iter;

/// Samples at or below this value terminate a run
pub const NOISE_FLOOR: f32 = 0.01;

/// Index of the first falloff sample after the leading `1.0`
const FIRST_FALLOFF_X: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct DecayTable {
    run: Vec<f32>,
    runs: usize,
    span: usize,
}

impl DecayTable {
    /// Build a decay table
    ///
    /// * `frame_rate` - frames per second of the owning effect
    /// * `factor` - steepness, bigger values give longer runs
    /// * `rate` - runs per second; `ceil(rate)` runs (at least one) are produced,
    ///   each spanning at most `frame_rate / rate` frames
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn new(frame_rate: f32, factor: f32, rate: f32) -> Self {
        let rate = if rate > 0.0 { rate } else { 1.0 };
        let runs = (libm::ceilf(rate) as usize).max(1);
        let span = libm::floorf(frame_rate / rate) as usize + FIRST_FALLOFF_X;
        let r = (frame_rate / 15.0) * factor;

        let mut run = alloc::vec![1.0];
        if r > 0.0 {
            for x in FIRST_FALLOFF_X..span + FIRST_FALLOFF_X {
                let value = libm::expf(-(x as f32 / r));
                if value <= NOISE_FLOOR || run.len() >= span {
                    break;
                }
                run.push(value);
            }
        }

        Self { run, runs, span }
    }

    /// One decay run, starting at `1.0`
    pub fn run(&self) -> &[f32] {
        &self.run
    }

    /// Number of runs in the table
    pub const fn runs(&self) -> usize {
        self.runs
    }

    /// Frames reserved for one run before the next one starts
    pub const fn span(&self) -> usize {
        self.span
    }

    /// Total number of samples across all runs
    pub fn len(&self) -> usize {
        self.run.len() * self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.run.is_empty()
    }

    /// All runs back to back
    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        iter::repeat_n(self.run.as_slice(), self.runs).flatten().copied()
    }

    /// All runs, each padded with zeros to `span`, clipped or zero padded to
    /// exactly `total` samples
    pub fn padded_samples(&self, total: usize) -> impl Iterator<Item = f32> + '_ {
        let padded_run = self
            .run
            .iter()
            .copied()
            .chain(iter::repeat(0.0))
            .take(self.span.max(self.run.len()));
        iter::repeat_n(padded_run, self.runs)
            .flatten()
            .chain(iter::repeat(0.0))
            .take(total)
    }
}
