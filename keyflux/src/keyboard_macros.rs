use embassy_time::{Duration, Instant};
use heapless::Vec;
use keyflux_types::keycode::KeyCode;

use crate::error::{ConfigError, MacroFault, MacroUnderrun};
use crate::event::KeyPos;
use crate::hid::HidOutput;

/// Maximum number of macros playing at the same time
pub const MACRO_MAX_RUNNING: usize = 4;
/// Maximum number of keys a macro may hold at once
pub const MACRO_MAX_HELD_KEYS: usize = 8;

/// A single step of a macro sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacroOperation {
    Press(KeyCode),
    Release(KeyCode),
    /// Press and release, over two steps
    Tap(KeyCode),
    /// Wait the given number of milliseconds before the next step
    Delay(u16),
}

/// A fixed sequence of synthetic key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacroSequence<'a> {
    pub operations: &'a [MacroOperation],
    /// Pause after every press or release step, in milliseconds
    pub interval_ms: u16,
    /// Stop playing and release held keys when the trigger key is released early
    pub abort_on_release: bool,
}

impl<'a> MacroSequence<'a> {
    pub const fn new(operations: &'a [MacroOperation]) -> Self {
        Self {
            operations,
            interval_ms: 0,
            abort_on_release: false,
        }
    }

    pub const fn with_interval(self, interval_ms: u16) -> Self {
        Self { interval_ms, ..self }
    }

    pub const fn abort_on_release(self) -> Self {
        Self {
            abort_on_release: true,
            ..self
        }
    }

    /// Check that playing the sequence never releases a key it has not pressed
    /// and leaves nothing pressed at the end.
    pub fn validate(&self, id: u8) -> Result<(), ConfigError> {
        let malformed = |fault| ConfigError::MalformedMacro { id, fault };
        if self.operations.is_empty() {
            return Err(malformed(MacroFault::Empty));
        }
        let mut held: Vec<KeyCode, MACRO_MAX_HELD_KEYS> = Vec::new();
        for op in self.operations {
            match *op {
                MacroOperation::Press(k) => {
                    if !held.contains(&k) {
                        held.push(k).map_err(|_| malformed(MacroFault::TooManyHeldKeys))?;
                    }
                }
                MacroOperation::Release(k) => match held.iter().position(|h| *h == k) {
                    Some(i) => {
                        held.swap_remove(i);
                    }
                    None => return Err(malformed(MacroFault::ReleaseWithoutPress(k))),
                },
                MacroOperation::Tap(_) | MacroOperation::Delay(_) => (),
            }
        }
        match held.first() {
            Some(k) => Err(malformed(MacroFault::KeyLeftPressed(*k))),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone)]
struct MacroInstance {
    id: u8,
    owner: KeyPos,
    /// Index of the next operation
    cursor: usize,
    /// Second half of a `Tap` that is still due
    tap_release: Option<KeyCode>,
    next_due: Instant,
    /// Trigger order, breaks ties between instances due at the same time
    serial: u32,
    held: Vec<KeyCode, MACRO_MAX_HELD_KEYS>,
}

impl MacroInstance {
    fn is_finished(&self, len: usize) -> bool {
        self.cursor >= len && self.tap_release.is_none()
    }
}

/// Plays macro sequences without blocking the event loop.
///
/// Every running instance performs at most one step per tick. Instances due in
/// the same tick are stepped in deadline order, ties broken by trigger order.
pub struct MacroPlayer<'a> {
    macros: &'a [MacroSequence<'a>],
    running: Vec<MacroInstance, MACRO_MAX_RUNNING>,
    serial: u32,
}

impl<'a> MacroPlayer<'a> {
    pub fn new(macros: &'a [MacroSequence<'a>]) -> Result<Self, ConfigError> {
        for (id, sequence) in macros.iter().enumerate() {
            sequence.validate(id as u8)?;
        }
        Ok(Self {
            macros,
            running: Vec::new(),
            serial: 0,
        })
    }

    pub fn is_running(&self) -> bool {
        !self.running.is_empty()
    }

    /// Start macro `id` for the key at `owner`. The first step is played right away.
    pub(crate) fn trigger(
        &mut self,
        id: u8,
        owner: KeyPos,
        now: Instant,
        hid: &mut HidOutput,
    ) -> Result<(), MacroUnderrun> {
        let Some(sequence) = self.macros.get(id as usize) else {
            return Err(MacroUnderrun(id));
        };
        let mut instance = MacroInstance {
            id,
            owner,
            cursor: 0,
            tap_release: None,
            next_due: now,
            serial: self.serial,
            held: Vec::new(),
        };
        self.serial = self.serial.wrapping_add(1);
        debug!("Trigger macro {} from {:?}", id, owner);

        step(&mut instance, sequence, now, hid);
        if instance.is_finished(sequence.operations.len()) {
            return Ok(());
        }
        if let Err(instance) = self.running.push(instance) {
            warn!("Too many running macros, stopping macro {}", id);
            for key in instance.held {
                hid.release(key);
            }
        }
        Ok(())
    }

    /// Step every instance that is due at `now`.
    pub(crate) fn advance(&mut self, now: Instant, hid: &mut HidOutput) {
        let mut due: Vec<(Instant, u32), MACRO_MAX_RUNNING> = self
            .running
            .iter()
            .filter(|m| m.next_due <= now)
            .map(|m| (m.next_due, m.serial))
            .collect();
        due.sort_unstable();

        for (_, serial) in due {
            let Some(instance) = self.running.iter_mut().find(|m| m.serial == serial) else {
                continue;
            };
            let sequence = &self.macros[instance.id as usize];
            step(instance, sequence, now, hid);
        }

        let macros = self.macros;
        self.running
            .retain(|m| !m.is_finished(macros[m.id as usize].operations.len()));
    }

    /// The trigger key at `owner` was released.
    ///
    /// Macros marked `abort_on_release` stop here and release what they hold,
    /// all others keep playing.
    pub(crate) fn release_owner(&mut self, owner: KeyPos, hid: &mut HidOutput) {
        let macros = self.macros;
        self.running.retain(|m| {
            if m.owner != owner || !macros[m.id as usize].abort_on_release {
                return true;
            }
            debug!("Abort macro {}", m.id);
            for key in m.held.iter().chain(m.tap_release.iter()) {
                hid.release(*key);
            }
            false
        });
    }

    /// Drop every running macro. Held keys are left to the caller.
    pub(crate) fn clear(&mut self) {
        self.running.clear();
    }
}

/// Perform one step of a macro instance.
fn step(instance: &mut MacroInstance, sequence: &MacroSequence, now: Instant, hid: &mut HidOutput) {
    let interval = Duration::from_millis(sequence.interval_ms as u64);
    if let Some(key) = instance.tap_release.take() {
        hid.release(key);
        instance.next_due = now + interval;
        return;
    }
    let Some(op) = sequence.operations.get(instance.cursor) else {
        return;
    };
    instance.cursor += 1;
    match *op {
        MacroOperation::Press(key) => {
            hid.press_again(key);
            if !instance.held.contains(&key) && instance.held.push(key).is_err() {
                warn!("Macro {} holds too many keys", instance.id);
            }
            instance.next_due = now + interval;
        }
        MacroOperation::Release(key) => {
            hid.release(key);
            instance.held.retain(|k| *k != key);
            instance.next_due = now + interval;
        }
        MacroOperation::Tap(key) => {
            hid.press_again(key);
            instance.tap_release = Some(key);
            instance.next_due = now + interval;
        }
        MacroOperation::Delay(ms) => {
            instance.next_due = now + Duration::from_millis(ms as u64);
        }
    }
}
