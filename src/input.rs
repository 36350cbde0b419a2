//! External scalar inputs
//!
//! Polling collaborators (heater, stepper, ADC, print progress) write
//! through the adapters below into an [`InputState`]. The scheduler copies
//! the state into an [`ExternalInputs`] snapshot once per tick and layers only
//! ever see that snapshot.

/// Heater target assumed before any non-zero target was reported
pub const DEFAULT_LAST_TARGET: f32 = 100.0;

/// Upper bound of every normalized input
pub const INPUT_MAX: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaterSnapshot {
    pub current: f32,
    pub target: f32,
    /// Most recent non-zero target, used to scale the cool-down display
    pub last_target: f32,
}

impl Default for HeaterSnapshot {
    fn default() -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            last_target: DEFAULT_LAST_TARGET,
        }
    }
}

/// Read-only view of every external input for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExternalInputs {
    pub heater: HeaterSnapshot,
    /// Axis position normalized to `0..=100`
    pub stepper_position: u8,
    /// Analog reading normalized to `0.0..=100.0`
    pub analog: f32,
    /// Print progress in percent, `0..=100`
    pub progress: u8,
}

/// Heater temperature adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaterAdapter;

impl HeaterAdapter {
    pub fn apply(snapshot: &mut HeaterSnapshot, current: f32, target: f32) {
        snapshot.current = current;
        snapshot.target = target;
        if target > 0.0 {
            snapshot.last_target = target;
        }
    }
}

/// Maps an axis position inside `min..=max` to `0..=100`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepperAdapter {
    min: f32,
    max: f32,
}

impl StepperAdapter {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Normalized position, `None` for samples outside the axis range
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn normalize(&self, position: f32) -> Option<u8> {
        if !(self.min..=self.max).contains(&position) {
            return None;
        }
        let span = self.max - self.min;
        if span <= 0.0 {
            return Some(0);
        }
        let ratio = ((position - self.min) / span).clamp(0.0, 1.0);
        Some(libm::floorf(ratio * f32::from(INPUT_MAX)) as u8)
    }
}

/// Maps a raw ADC reading in `0.0..=1.0` to `0.0..=100.0` with 0.1 resolution
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalogAdapter;

impl AnalogAdapter {
    pub fn normalize(read_value: f32) -> f32 {
        let clamped = read_value.clamp(0.0, 1.0);
        libm::floorf(clamped * 1000.0) / 10.0
    }
}

/// Clamps print progress to `0..=100`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressAdapter;

impl ProgressAdapter {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn normalize(percent: f32) -> u8 {
        if percent.is_nan() {
            return 0;
        }
        libm::floorf(percent.clamp(0.0, f32::from(INPUT_MAX))) as u8
    }
}

/// Latest values written by the polling collaborators
#[derive(Debug, Clone, Default)]
pub struct InputState {
    inputs: ExternalInputs,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_heater(&mut self, current: f32, target: f32) {
        HeaterAdapter::apply(&mut self.inputs.heater, current, target);
    }

    /// Out of range samples keep the previous position
    pub fn update_stepper(&mut self, adapter: &StepperAdapter, position: f32) {
        if let Some(normalized) = adapter.normalize(position) {
            self.inputs.stepper_position = normalized;
        }
    }

    pub fn update_analog(&mut self, read_value: f32) {
        self.inputs.analog = AnalogAdapter::normalize(read_value);
    }

    pub fn update_progress(&mut self, percent: f32) {
        self.inputs.progress = ProgressAdapter::normalize(percent);
    }

    pub const fn snapshot(&self) -> ExternalInputs {
        self.inputs
    }
}
