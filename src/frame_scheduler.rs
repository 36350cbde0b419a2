//! Frame scheduling for all registered effects.
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! Each effect keeps its own deadline based on its frame rate; the scheduler
//! ticks whichever effects are due and reports when the next one will be.
//! The caller is responsible for sleeping/waiting between ticks.

use alloc::vec::Vec;

use embassy_time::{Duration, Instant};
#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::LedChain;
use crate::config::EffectConfig;
use crate::control::ControlReceiver;
use crate::effect::Effect;
use crate::error::{ConfigError, Result};
use crate::input::InputState;

/// Result of a scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameResult {
    /// The earliest deadline among running effects, `None` when all are idle.
    pub next_deadline: Option<Instant>,
    /// How long to wait until that deadline (zero if behind schedule).
    pub sleep_duration: Option<Duration>,
}

/// Portable scheduler that owns the chains, the effects and the input state.
///
/// # Usage
///
/// ```ignore
/// static CONTROL: ControlChannel<8> = ControlChannel::new();
///
/// let mut scheduler = FrameScheduler::new(chains, CONTROL.receiver());
/// scheduler.register(&config)?;
///
/// loop {
///     scheduler.inputs_mut().update_heater(current, target);
///     let result = scheduler.tick(Instant::now());
///
///     // Platform-specific sleep
///     sleep(result.sleep_duration.unwrap_or(IDLE_POLL));
/// }
/// ```
pub struct FrameScheduler<'a, C: LedChain, const CONTROL_SIZE: usize> {
    chains: Vec<C>,
    effects: Vec<Effect>,
    inputs: InputState,
    control: ControlReceiver<'a, CONTROL_SIZE>,
}

impl<'a, C: LedChain, const CONTROL_SIZE: usize> FrameScheduler<'a, C, CONTROL_SIZE> {
    pub fn new(chains: Vec<C>, control: ControlReceiver<'a, CONTROL_SIZE>) -> Self {
        Self {
            chains,
            effects: Vec::new(),
            inputs: InputState::new(),
            control,
        }
    }

    /// Build an effect and add it to the schedule.
    ///
    /// Effects with `autostart` start ticking immediately.
    pub fn register(&mut self, config: &EffectConfig) -> Result<()> {
        self.register_effect(Effect::new(config, &self.chains)?, config.autostart)
    }

    /// Add an already built effect, e.g. one with a custom random source.
    pub fn register_effect(&mut self, mut effect: Effect, autostart: bool) -> Result<()> {
        if self.effect(effect.name()).is_some() {
            return Err(ConfigError::DuplicateEffect(effect.name().into()));
        }
        if autostart {
            effect.enable(Instant::from_ticks(0));
        }

        #[cfg(feature = "esp32-log")]
        println!(
            "[FrameScheduler.register] '{}' (autostart: {})",
            effect.name(),
            autostart
        );

        self.effects.push(effect);
        Ok(())
    }

    /// Start or stop an effect by name, returns `false` for unknown names.
    pub fn set_enabled(&mut self, name: &str, enabled: bool, now: Instant) -> bool {
        let Some(effect) = self.effects.iter_mut().find(|e| e.name() == name) else {
            #[cfg(feature = "esp32-log")]
            println!("[FrameScheduler.set_enabled] unknown effect '{}'", name);
            return false;
        };
        if enabled {
            effect.enable(now);
        } else {
            effect.disable(&mut self.chains);
        }
        true
    }

    /// Process pending commands, render every due effect and return timing info.
    ///
    /// This method:
    /// 1. Applies queued start/stop commands
    /// 2. Takes one snapshot of the external inputs
    /// 3. Ticks every running effect whose deadline has passed
    /// 4. Returns the earliest upcoming deadline
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        while let Some(command) = self.control.try_receive() {
            self.set_enabled(command.effect.as_str(), command.enables(), now);
        }

        let inputs = self.inputs.snapshot();
        for effect in &mut self.effects {
            if effect.is_due(now) {
                effect.tick(now, &inputs, &mut self.chains);
            }
        }

        let next_deadline = self.effects.iter().filter_map(Effect::next_deadline).min();
        let sleep_duration = next_deadline.map(|deadline| {
            if deadline > now {
                deadline - now
            } else {
                Duration::from_ticks(0)
            }
        });

        FrameResult {
            next_deadline,
            sleep_duration,
        }
    }

    /// Host shutdown: apply each effect's shutdown policy.
    pub fn shutdown(&mut self, now: Instant) {
        for effect in &mut self.effects {
            effect.shutdown(now, &mut self.chains);
        }
    }

    pub fn effect(&self, name: &str) -> Option<&Effect> {
        self.effects.iter().find(|e| e.name() == name)
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn inputs_mut(&mut self) -> &mut InputState {
        &mut self.inputs
    }

    pub fn chains(&self) -> &[C] {
        &self.chains
    }

    pub fn chains_mut(&mut self) -> &mut [C] {
        &mut self.chains
    }
}
