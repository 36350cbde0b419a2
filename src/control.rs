//! Start/stop control surface
//!
//! Command handlers (g-code, buttons, network) push [`ControlCommand`]s into
//! a bounded [`ControlChannel`]; the frame scheduler drains it at the start
//! of every tick. The queue is guarded by a critical section, so senders may
//! live in interrupt handlers or other threads.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::config::{EffectName, effect_name};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Start,
    Stop,
}

/// Start or stop an effect by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlCommand {
    pub effect: EffectName,
    pub action: ControlAction,
}

impl ControlCommand {
    pub fn start(effect: &str) -> Result<Self> {
        Ok(Self {
            effect: effect_name(effect)?,
            action: ControlAction::Start,
        })
    }

    pub fn stop(effect: &str) -> Result<Self> {
        Ok(Self {
            effect: effect_name(effect)?,
            action: ControlAction::Stop,
        })
    }

    pub const fn enables(&self) -> bool {
        matches!(self.action, ControlAction::Start)
    }
}

/// Returned with the rejected command when the queue is full
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrySendError(pub ControlCommand);

/// Bounded multi-sender queue of control commands
pub struct ControlChannel<const SIZE: usize> {
    queue: Mutex<RefCell<Deque<ControlCommand, SIZE>>>,
}

impl<const SIZE: usize> ControlChannel<SIZE> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub const fn sender(&self) -> ControlSender<'_, SIZE> {
        ControlSender { channel: self }
    }

    pub const fn receiver(&self) -> ControlReceiver<'_, SIZE> {
        ControlReceiver { channel: self }
    }

    fn push(&self, command: ControlCommand) -> core::result::Result<(), TrySendError> {
        critical_section::with(|cs| {
            self.queue
                .borrow(cs)
                .borrow_mut()
                .push_back(command)
                .map_err(TrySendError)
        })
    }

    fn pop(&self) -> Option<ControlCommand> {
        critical_section::with(|cs| self.queue.borrow(cs).borrow_mut().pop_front())
    }
}

impl<const SIZE: usize> Default for ControlChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub struct ControlSender<'a, const SIZE: usize> {
    channel: &'a ControlChannel<SIZE>,
}

impl<const SIZE: usize> ControlSender<'_, SIZE> {
    pub fn try_send(&self, command: ControlCommand) -> core::result::Result<(), TrySendError> {
        self.channel.push(command)
    }
}

#[derive(Clone, Copy)]
pub struct ControlReceiver<'a, const SIZE: usize> {
    channel: &'a ControlChannel<SIZE>,
}

impl<const SIZE: usize> ControlReceiver<'_, SIZE> {
    /// Next queued command, if any
    pub fn try_receive(&self) -> Option<ControlCommand> {
        self.channel.pop()
    }
}
