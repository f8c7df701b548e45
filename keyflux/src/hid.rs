//! HID output of the resolver.
//!
//! The resolver emits a stream of [`HidEvent`]s. Several sources may hold the
//! same keycode at once, e.g. a key and a macro both holding shift, so
//! [`HidOutput`] counts holders and only emits edges. [`ReportBuilder`] turns the
//! stream into the reports a host expects.

use heapless::{Deque, Vec};
use keyflux_types::keycode::{HidKeyCode, KeyCode};

/// Number of distinct keycodes that can be held at once
pub const HID_MAX_HELD_KEYS: usize = 32;
/// Number of events buffered between two drains
pub const HID_EVENT_QUEUE_SIZE: usize = 64;

/// A keycode press or release sent to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HidEvent {
    pub key: KeyCode,
    pub pressed: bool,
}

impl HidEvent {
    pub const fn new(key: KeyCode, pressed: bool) -> Self {
        Self { key, pressed }
    }
}

/// Reference counted keycode state and the queue of edges it produced.
#[derive(Debug, Default)]
pub(crate) struct HidOutput {
    counts: Vec<(KeyCode, u8), HID_MAX_HELD_KEYS>,
    queue: Deque<HidEvent, HID_EVENT_QUEUE_SIZE>,
}

impl HidOutput {
    pub(crate) fn new() -> Self {
        Self {
            counts: Vec::new(),
            queue: Deque::new(),
        }
    }

    pub(crate) fn press(&mut self, key: KeyCode) {
        if key.is_no() {
            return;
        }
        if let Some((_, count)) = self.counts.iter_mut().find(|(k, _)| *k == key) {
            *count = count.saturating_add(1);
            return;
        }
        if self.counts.push((key, 1)).is_err() {
            warn!("Too many held keys, dropping {:?}", key);
            return;
        }
        self.enqueue(HidEvent::new(key, true));
    }

    /// Press `key` as a new keystroke.
    ///
    /// A non-modifier key already held by another source is released and
    /// pressed again, so the host still sees the keystroke.
    pub(crate) fn press_again(&mut self, key: KeyCode) {
        let held = self.counts.iter().any(|(k, _)| *k == key);
        if held && !key.is_modifier() {
            self.enqueue(HidEvent::new(key, false));
            self.enqueue(HidEvent::new(key, true));
        }
        self.press(key);
    }

    pub(crate) fn release(&mut self, key: KeyCode) {
        let Some(i) = self.counts.iter().position(|(k, _)| *k == key) else {
            return;
        };
        self.counts[i].1 -= 1;
        if self.counts[i].1 == 0 {
            self.counts.swap_remove(i);
            self.enqueue(HidEvent::new(key, false));
        }
    }

    /// Release every held keycode, whoever holds it.
    pub(crate) fn release_all(&mut self) {
        let counts = core::mem::take(&mut self.counts);
        for (key, _) in counts {
            self.enqueue(HidEvent::new(key, false));
        }
    }

    pub(crate) fn is_pressed(&self, key: KeyCode) -> bool {
        self.counts.iter().any(|(k, _)| *k == key)
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = HidEvent> + '_ {
        core::iter::from_fn(move || self.queue.pop_front())
    }

    fn enqueue(&mut self, event: HidEvent) {
        if self.queue.push_back(event).is_err() {
            warn!("HID event queue is full, dropping {:?}", event);
        }
    }
}

/// Boot protocol keyboard report.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    pub modifier: u8, // ModifierCombination
    pub reserved: u8,
    pub leds: u8,
    pub keycodes: [u8; 6],
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MediaKeyboardReport {
    pub usage_id: u16,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemControlReport {
    pub usage_id: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    /// Normal keyboard hid report
    KeyboardReport(KeyboardReport),
    /// Media keyboard report
    MediaKeyboardReport(MediaKeyboardReport),
    /// System control report
    SystemControlReport(SystemControlReport),
}

/// Builds host reports from drained [`HidEvent`]s.
///
/// Events of one drain are merged into as few keyboard reports as possible. A
/// frame is cut whenever an event touches a keycode already changed in it, so
/// a tap produces a press report followed by a release report. Reports equal
/// to the last one sent are skipped.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    current: KeyboardReport,
    last_sent: KeyboardReport,
    touched: Vec<HidKeyCode, HID_MAX_HELD_KEYS>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The keyboard report describing the current key state.
    pub fn report(&self) -> KeyboardReport {
        self.current
    }

    pub fn build(&mut self, events: impl IntoIterator<Item = HidEvent>, mut emit: impl FnMut(Report)) {
        for event in events {
            match event.key {
                KeyCode::Hid(key) => {
                    if self.touched.contains(&key) || self.touched.is_full() {
                        self.flush(&mut emit);
                    }
                    self.apply(key, event.pressed);
                    // Cannot fail, the frame was flushed when full
                    let _ = self.touched.push(key);
                }
                KeyCode::Consumer(key) => {
                    self.flush(&mut emit);
                    let usage_id = if event.pressed { key as u16 } else { 0 };
                    emit(Report::MediaKeyboardReport(MediaKeyboardReport { usage_id }));
                }
                KeyCode::SystemControl(key) => {
                    self.flush(&mut emit);
                    let usage_id = if event.pressed { key as u8 } else { 0 };
                    emit(Report::SystemControlReport(SystemControlReport { usage_id }));
                }
            }
        }
        self.flush(&mut emit);
    }

    fn apply(&mut self, key: HidKeyCode, pressed: bool) {
        if key.is_modifier() {
            let bits = key.to_hid_modifiers().into_bits();
            if pressed {
                self.current.modifier |= bits;
            } else {
                self.current.modifier &= !bits;
            }
            return;
        }
        let code = key as u8;
        if pressed {
            if self.current.keycodes.contains(&code) {
                return;
            }
            match self.current.keycodes.iter().position(|&k| k == 0) {
                Some(i) => self.current.keycodes[i] = code,
                None => warn!("Keyboard report is full, dropping {:?}", key),
            }
        } else if let Some(i) = self.current.keycodes.iter().position(|&k| k == code) {
            self.current.keycodes[i] = 0;
        }
    }

    fn flush(&mut self, emit: &mut impl FnMut(Report)) {
        self.touched.clear();
        if self.current != self.last_sent {
            self.last_sent = self.current;
            emit(Report::KeyboardReport(self.current));
        }
    }
}
