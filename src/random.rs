//! Pseudo-random sources for stateful layers
//!
//! Layers never own a generator. The effect lends its source through the
//! tick context, so a test can swap in a scripted sequence.

/// Source of uniformly distributed random numbers
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `0..bound`, 0 when `bound` is 0
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.next_u32() % bound
    }

    /// Uniform value in `low..=high`
    fn range_inclusive(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        match (high - low).checked_add(1) {
            Some(span) => low + self.below(span),
            None => self.next_u32(),
        }
    }

    /// Uniform value in `0.0..1.0`
    #[allow(clippy::cast_precision_loss)]
    fn unit(&mut self) -> f32 {
        // 24 bits fit the f32 mantissa exactly
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

/// `SplitMix64` generator
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub const fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl Default for SplitMix64 {
    fn default() -> Self {
        Self::new(0x853c_49e6_748f_ea9b)
    }
}

impl RandomSource for SplitMix64 {
    #[allow(clippy::cast_possible_truncation)]
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        (z ^ (z >> 31)) as u32
    }
}
