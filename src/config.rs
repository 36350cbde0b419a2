//! Effect and layer configuration
//!
//! Layers can be built directly or parsed from the textual form
//! `<type> <rate> <cutoff> <blend> (r,g,b),(r,g,b),...`, one layer per line,
//! listed top-down. Unknown layer types and blend modes are rejected here so
//! that a broken effect never reaches the scheduler.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::ops::RangeInclusive;

use heapless::String as FixedString;

use crate::color::Color;
use crate::compositor::BlendMode;
use crate::error::{ConfigError, Result};
use crate::layer::LayerKind;

/// Maximum effect name length in bytes
pub const EFFECT_NAME_CAPACITY: usize = 32;

pub const DEFAULT_FRAME_RATE: f32 = 24.0;
pub const MIN_FRAME_RATE: f32 = 1.0;
pub const MAX_FRAME_RATE: f32 = 60.0;

/// Largest magnitude accepted for a layer rate or cutoff
pub const MAX_LAYER_PARAMETER: f32 = 1000.0;

const DEFAULT_SEED: u64 = 0x2545_f491_4f6c_dd1d;

pub type EffectName = FixedString<EFFECT_NAME_CAPACITY>;

/// Build an effect name, failing when it does not fit
pub fn effect_name(name: &str) -> Result<EffectName> {
    let mut fixed = EffectName::new();
    fixed
        .push_str(name)
        .map_err(|()| ConfigError::NameTooLong(name.to_string()))?;
    Ok(fixed)
}

/// What happens to the animation phase when a stopped effect starts again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestartPolicy {
    /// Start over from the first frame
    #[default]
    Restart,
    /// Continue from the frame shown when it was stopped
    Resume,
}

/// What an effect does when the host shuts down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShutdownPolicy {
    /// Push all-zero data once and stop
    #[default]
    Blackout,
    /// Keep (or start) ticking so error animations can play
    Continue,
    /// Stop ticking and leave the last frame on the strip
    HoldLastFrame,
}

/// One layer of an effect
#[derive(Debug, Clone, PartialEq)]
pub struct LayerConfig {
    pub kind: LayerKind,
    pub effect_rate: f32,
    pub effect_cutoff: f32,
    pub blend: BlendMode,
    pub palette: Vec<Color>,
}

impl LayerConfig {
    pub fn new(
        kind: LayerKind,
        effect_rate: f32,
        effect_cutoff: f32,
        blend: BlendMode,
        palette: Vec<Color>,
    ) -> Self {
        Self {
            kind,
            effect_rate,
            effect_cutoff,
            blend,
            palette,
        }
    }

    /// Parse `<type> <rate> <cutoff> <blend> <palette>`
    ///
    /// The palette is a list of comma separated channel values, grouped in
    /// threes; parentheses and spaces around the groups are ignored.
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line
            .split_whitespace()
            .map(strip_parens)
            .filter(|part| !part.is_empty());

        let kind_name = parts.next().ok_or(ConfigError::MissingField("type"))?;
        let kind = LayerKind::parse_from_str(kind_name)
            .ok_or_else(|| ConfigError::UnknownLayer(kind_name.to_string()))?;
        let effect_rate = parse_number(parts.next().ok_or(ConfigError::MissingField("rate"))?)?;
        let effect_cutoff =
            parse_number(parts.next().ok_or(ConfigError::MissingField("cutoff"))?)?;
        let blend_name = parts.next().ok_or(ConfigError::MissingField("blend mode"))?;
        let blend = BlendMode::parse_from_str(blend_name)
            .ok_or_else(|| ConfigError::UnknownBlendMode(blend_name.to_string()))?;

        let mut channels = Vec::new();
        for part in parts {
            for value in part.split(',').map(strip_parens).filter(|v| !v.is_empty()) {
                channels.push(parse_number(value)?);
            }
        }
        let palette = parse_palette(&channels)?;

        Ok(Self::new(kind, effect_rate, effect_cutoff, blend, palette))
    }

    /// Reject layers whose frames cannot be built
    ///
    /// Rates and cutoffs size the precomputed frame tables, so they must be
    /// finite and within [`MAX_LAYER_PARAMETER`].
    pub fn validate(&self) -> Result<()> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        check_parameter("rate", self.effect_rate)?;
        check_parameter("cutoff", self.effect_cutoff)
    }
}

/// Parse one layer per non-empty line, in declaration (top-down) order
pub fn parse_layers(text: &str) -> Result<Vec<LayerConfig>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(LayerConfig::parse)
        .collect()
}

fn strip_parens(s: &str) -> &str {
    s.trim_matches(|c: char| c == '(' || c == ')' || c.is_whitespace())
}

fn parse_number(s: &str) -> Result<f32> {
    s.parse::<f32>()
        .map_err(|_| ConfigError::InvalidNumber(s.to_string()))
}

fn check_parameter(field: &'static str, value: f32) -> Result<()> {
    // NaN fails `contains` as well
    if (-MAX_LAYER_PARAMETER..=MAX_LAYER_PARAMETER).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ParameterOutOfRange(field, value))
    }
}

fn parse_palette(channels: &[f32]) -> Result<Vec<Color>> {
    if channels.is_empty() {
        return Err(ConfigError::EmptyPalette);
    }
    if !channels.len().is_multiple_of(3) {
        return Err(ConfigError::MalformedPalette(channels.len()));
    }
    Ok(channels
        .chunks_exact(3)
        .map(|c| Color::new(c[0], c[1], c[2]))
        .collect())
}

/// Pixels of one chain an effect draws on
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LedSelection {
    /// Every pixel of the chain, in order
    #[default]
    All,
    /// Zero-based inclusive index ranges, in the listed order
    Ranges(Vec<RangeInclusive<usize>>),
}

impl LedSelection {
    /// Parse a 1-based list such as `1-5,7,9`; an empty list selects the whole chain
    pub fn parse(list: &str) -> Result<Self> {
        let mut ranges = Vec::new();
        for part in strip_parens(list).split(',').map(strip_parens) {
            if part.is_empty() {
                continue;
            }
            let invalid = || ConfigError::InvalidLedIndex(part.to_string());
            let range = match part.split_once('-') {
                Some((start, end)) => {
                    let start = parse_index(start.trim()).ok_or_else(invalid)?;
                    let end = parse_index(end.trim()).ok_or_else(invalid)?;
                    if end < start {
                        return Err(invalid());
                    }
                    start..=end
                }
                None => {
                    let index = parse_index(part).ok_or_else(invalid)?;
                    index..=index
                }
            };
            ranges.push(range);
        }

        if ranges.is_empty() {
            Ok(Self::All)
        } else {
            Ok(Self::Ranges(ranges))
        }
    }

    /// Zero-based pixel indices on a chain of `chain_len` pixels
    pub fn indices(&self, chain_len: usize) -> Result<Vec<usize>> {
        match self {
            Self::All => Ok((0..chain_len).collect()),
            Self::Ranges(ranges) => {
                let mut indices = Vec::new();
                for range in ranges {
                    if *range.end() >= chain_len {
                        return Err(ConfigError::InvalidLedIndex((range.end() + 1).to_string()));
                    }
                    indices.extend(range.clone());
                }
                Ok(indices)
            }
        }
    }
}

/// 1-based index to 0-based
fn parse_index(s: &str) -> Option<usize> {
    s.parse::<usize>().ok()?.checked_sub(1)
}

/// A chain, by its position in the scheduler, and the pixels used on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedTarget {
    pub chain: usize,
    pub selection: LedSelection,
}

impl LedTarget {
    pub const fn whole(chain: usize) -> Self {
        Self {
            chain,
            selection: LedSelection::All,
        }
    }

    pub fn parse(chain: usize, list: &str) -> Result<Self> {
        Ok(Self {
            chain,
            selection: LedSelection::parse(list)?,
        })
    }
}

/// Configuration for one effect
#[derive(Debug, Clone, PartialEq)]
pub struct EffectConfig {
    pub name: EffectName,
    /// Frames per second, `1.0..=60.0`
    pub frame_rate: f32,
    pub autostart: bool,
    pub run_on_error: bool,
    pub restart: RestartPolicy,
    /// Explicit shutdown behavior, derived from `run_on_error` when unset
    pub shutdown: Option<ShutdownPolicy>,
    /// Layers in declaration order, the first one is drawn last
    pub layers: Vec<LayerConfig>,
    pub targets: Vec<LedTarget>,
    /// Seed for the effect's random source
    pub seed: u64,
}

impl EffectConfig {
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self {
            name: effect_name(name)?,
            frame_rate: DEFAULT_FRAME_RATE,
            autostart: false,
            run_on_error: false,
            restart: RestartPolicy::default(),
            shutdown: None,
            layers: Vec::new(),
            targets: Vec::new(),
            seed: DEFAULT_SEED,
        })
    }

    #[must_use]
    pub fn with_frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    #[must_use]
    pub fn with_autostart(mut self, autostart: bool) -> Self {
        self.autostart = autostart;
        self
    }

    #[must_use]
    pub fn with_run_on_error(mut self, run_on_error: bool) -> Self {
        self.run_on_error = run_on_error;
        self
    }

    #[must_use]
    pub fn with_restart(mut self, restart: RestartPolicy) -> Self {
        self.restart = restart;
        self
    }

    #[must_use]
    pub fn with_shutdown(mut self, shutdown: ShutdownPolicy) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    #[must_use]
    pub fn with_layer(mut self, layer: LayerConfig) -> Self {
        self.layers.push(layer);
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: LedTarget) -> Self {
        self.targets.push(target);
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Append layers parsed from text
    pub fn with_layer_text(mut self, text: &str) -> Result<Self> {
        self.layers.extend(parse_layers(text)?);
        Ok(self)
    }

    pub fn shutdown_policy(&self) -> ShutdownPolicy {
        match self.shutdown {
            Some(policy) => policy,
            None if self.run_on_error => ShutdownPolicy::Continue,
            None => ShutdownPolicy::Blackout,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_FRAME_RATE..=MAX_FRAME_RATE).contains(&self.frame_rate) {
            return Err(ConfigError::FrameRateOutOfRange(self.frame_rate));
        }
        if self.targets.is_empty() {
            return Err(ConfigError::NoLeds(String::from(self.name.as_str())));
        }
        self.layers.iter().try_for_each(LayerConfig::validate)
    }
}
