use embassy_time::{Duration, Instant};
use heapless::Vec;
use keyflux_types::action::{Action, TapHoldMode, TapHoldProfile};

use crate::config::TapHoldConfig;
use crate::error::ProtocolViolation;
use crate::event::{KeyEvent, KeyPos};

/// Number of events that can wait behind a pending tap-hold key.
pub const TAP_HOLD_BUFFER_SIZE: usize = 16;

/// A tap-hold key that is pressed but not yet decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingTapHold {
    pub pos: KeyPos,
    pub tap: Action,
    pub hold: Action,
    pub mode: TapHoldMode,
    /// The press time for the key
    pub pressed_at: Instant,
    /// The key is held once this is reached
    pub deadline: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapHoldState {
    /// Not pressed, or resolved as tap
    Idle,
    /// Pressed, waiting for a decision
    Pending,
    /// Resolved as hold, the hold action is active until release
    Holding,
}

/// What the resolver should do with an event that arrived while a key is pending.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapHoldDecision {
    /// The pending key was released in time. The event is consumed.
    Tap(PendingTapHold),
    /// The pending key is a hold. Activate it, replay the buffer, then process the event.
    Hold(PendingTapHold),
    /// The event was buffered until the decision is made
    Buffer,
    /// The event does not affect the decision, process it now
    Ignore,
}

/// Disambiguates tap from hold for the one tap-hold key pending at a time.
///
/// Any other key press while a key is pending either decides it or is buffered,
/// so a second key never becomes pending before the first one is decided.
#[derive(Debug, Default)]
pub struct TapHoldEngine {
    pending: Option<PendingTapHold>,
    buffer: Vec<KeyEvent, TAP_HOLD_BUFFER_SIZE>,
}

impl TapHoldEngine {
    pub fn new() -> Self {
        Self {
            pending: None,
            buffer: Vec::new(),
        }
    }

    pub fn pending(&self) -> Option<&PendingTapHold> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self, pos: KeyPos) -> bool {
        self.pending.is_some_and(|p| p.pos == pos)
    }

    /// Start the decision for a tap-hold key.
    ///
    /// A key still pending at another position is taken out and returned, the
    /// caller must resolve it as hold. Its buffered events stay queued behind
    /// the new key.
    pub fn press(
        &mut self,
        event: KeyEvent,
        tap: Action,
        hold: Action,
        profile: TapHoldProfile,
        config: &TapHoldConfig,
    ) -> Result<Option<PendingTapHold>, ProtocolViolation> {
        let displaced = match self.pending {
            Some(pending) if pending.pos == event.pos => {
                return Err(ProtocolViolation::DuplicatePress(event.pos));
            }
            Some(pending) => {
                warn!("Tap-hold key {:?} is still pending, forcing HOLD", pending.pos);
                Some(pending)
            }
            None => None,
        };
        let hold_timeout = profile
            .hold_timeout_ms
            .map(|t| Duration::from_millis(t as u64))
            .unwrap_or(config.hold_timeout);
        let pending = PendingTapHold {
            pos: event.pos,
            tap,
            hold,
            mode: profile.mode.unwrap_or(config.default_mode),
            pressed_at: event.at,
            deadline: event.at + hold_timeout,
        };
        debug!("Tap-hold pending: {:?}", pending);
        self.pending = Some(pending);
        Ok(displaced)
    }

    /// Decide what an incoming event means for the pending key.
    ///
    /// Must only be called while a key is pending.
    pub fn decide(&mut self, event: KeyEvent) -> Result<TapHoldDecision, ProtocolViolation> {
        let Some(pending) = self.pending else {
            return Ok(TapHoldDecision::Ignore);
        };

        if event.pos == pending.pos {
            if event.pressed {
                return Err(ProtocolViolation::DuplicatePress(event.pos));
            }
            debug!(
                "Tap-hold {:?} released after {}ms, TAP",
                pending.pos,
                (event.at - pending.pressed_at).as_millis()
            );
            self.pending = None;
            return Ok(TapHoldDecision::Tap(pending));
        }

        if event.pressed {
            match pending.mode {
                TapHoldMode::HoldOnOtherPress => {
                    debug!("Other key pressed, HOLD: {:?}", pending.pos);
                    self.pending = None;
                    Ok(TapHoldDecision::Hold(pending))
                }
                TapHoldMode::PermissiveHold | TapHoldMode::Timeout => Ok(self.buffer_or_hold(event, pending)),
            }
        } else {
            let pressed_while_pending = self.buffer.iter().any(|e| e.pos == event.pos && e.pressed);
            if !pressed_while_pending {
                // Releasing a key that is pressed before the tap-hold key never decides it,
                // but it must not overtake events already waiting in the buffer
                if self.buffer.is_empty() {
                    return Ok(TapHoldDecision::Ignore);
                }
                return Ok(self.buffer_or_hold(event, pending));
            }
            match pending.mode {
                TapHoldMode::PermissiveHold => {
                    debug!("Other key tapped, permissive HOLD: {:?}", pending.pos);
                    self.pending = None;
                    Ok(TapHoldDecision::Hold(pending))
                }
                _ => Ok(self.buffer_or_hold(event, pending)),
            }
        }
    }

    fn buffer_or_hold(&mut self, event: KeyEvent, pending: PendingTapHold) -> TapHoldDecision {
        match self.buffer.push(event) {
            Ok(()) => TapHoldDecision::Buffer,
            Err(_) => {
                warn!("Tap-hold buffer is full, forcing HOLD: {:?}", pending.pos);
                self.pending = None;
                TapHoldDecision::Hold(pending)
            }
        }
    }

    /// Resolve the pending key as hold if its timeout has elapsed at `now`.
    pub fn expire(&mut self, now: Instant) -> Option<PendingTapHold> {
        let pending = self.pending?;
        if now < pending.deadline {
            return None;
        }
        debug!("Hold timeout, HOLD: {:?}", pending.pos);
        self.pending = None;
        Some(pending)
    }

    /// Take the events buffered while the last key was pending, in arrival order.
    pub fn take_buffer(&mut self) -> Vec<KeyEvent, TAP_HOLD_BUFFER_SIZE> {
        core::mem::take(&mut self.buffer)
    }

    pub fn clear(&mut self) {
        self.pending = None;
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use keyflux_types::keycode::{HidKeyCode, KeyCode};
    use keyflux_types::modifier::ModifierCombination;

    use super::*;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn start(engine: &mut TapHoldEngine, mode: Option<TapHoldMode>) {
        let profile = TapHoldProfile {
            mode,
            hold_timeout_ms: None,
        };
        engine
            .press(
                KeyEvent::press(0, 0, at(0)),
                Action::Key(KeyCode::Hid(HidKeyCode::A)),
                Action::Modifier(ModifierCombination::LSHIFT),
                profile,
                &TapHoldConfig::default(),
            )
            .unwrap();
    }

    #[test]
    fn test_release_before_timeout_is_tap() {
        let mut engine = TapHoldEngine::new();
        start(&mut engine, None);
        assert_eq!(engine.expire(at(199)), None);
        let decision = engine.decide(KeyEvent::release(0, 0, at(150))).unwrap();
        assert!(matches!(decision, TapHoldDecision::Tap(p) if p.pos == KeyPos::new(0, 0)));
        assert!(engine.pending().is_none());
    }

    #[test]
    fn test_timeout_is_hold() {
        let mut engine = TapHoldEngine::new();
        start(&mut engine, None);
        let pending = engine.expire(at(200)).unwrap();
        assert_eq!(pending.deadline, at(200));
        assert!(engine.pending().is_none());
    }

    #[test]
    fn test_profile_timeout_overrides_config() {
        let mut engine = TapHoldEngine::new();
        engine
            .press(
                KeyEvent::press(0, 0, at(10)),
                Action::Key(KeyCode::Hid(HidKeyCode::A)),
                Action::LayerOn(1),
                TapHoldProfile::const_default().with_hold_timeout_ms(50),
                &TapHoldConfig::default(),
            )
            .unwrap();
        assert_eq!(engine.pending().map(|p| p.deadline), Some(at(60)));
    }

    #[test]
    fn test_hold_on_other_press() {
        let mut engine = TapHoldEngine::new();
        start(&mut engine, None);
        let decision = engine.decide(KeyEvent::press(0, 1, at(20))).unwrap();
        assert!(matches!(decision, TapHoldDecision::Hold(_)));
        assert!(engine.take_buffer().is_empty());
    }

    #[test]
    fn test_permissive_hold() {
        let mut engine = TapHoldEngine::new();
        start(&mut engine, Some(TapHoldMode::PermissiveHold));
        assert_eq!(engine.decide(KeyEvent::press(0, 1, at(20))).unwrap(), TapHoldDecision::Buffer);
        let decision = engine.decide(KeyEvent::release(0, 1, at(40))).unwrap();
        assert!(matches!(decision, TapHoldDecision::Hold(_)));
        let buffered = engine.take_buffer();
        assert_eq!(buffered.len(), 1);
        assert!(buffered[0].pressed);
    }

    #[test]
    fn test_permissive_hold_own_release_first_is_tap() {
        let mut engine = TapHoldEngine::new();
        start(&mut engine, Some(TapHoldMode::PermissiveHold));
        assert_eq!(engine.decide(KeyEvent::press(0, 1, at(20))).unwrap(), TapHoldDecision::Buffer);
        let decision = engine.decide(KeyEvent::release(0, 0, at(40))).unwrap();
        assert!(matches!(decision, TapHoldDecision::Tap(_)));
        assert_eq!(engine.take_buffer().len(), 1);
    }

    #[test]
    fn test_timeout_mode_buffers_everything() {
        let mut engine = TapHoldEngine::new();
        start(&mut engine, Some(TapHoldMode::Timeout));
        assert_eq!(engine.decide(KeyEvent::press(0, 1, at(20))).unwrap(), TapHoldDecision::Buffer);
        assert_eq!(engine.decide(KeyEvent::release(0, 1, at(30))).unwrap(), TapHoldDecision::Buffer);
        assert!(engine.expire(at(200)).is_some());
        assert_eq!(engine.take_buffer().len(), 2);
    }

    #[test]
    fn test_release_of_earlier_key_is_ignored() {
        let mut engine = TapHoldEngine::new();
        start(&mut engine, Some(TapHoldMode::PermissiveHold));
        assert_eq!(engine.decide(KeyEvent::release(0, 1, at(30))).unwrap(), TapHoldDecision::Ignore);
        assert!(engine.pending().is_some());
    }

    #[test]
    fn test_release_of_earlier_key_waits_behind_buffer() {
        let mut engine = TapHoldEngine::new();
        start(&mut engine, Some(TapHoldMode::PermissiveHold));
        assert_eq!(engine.decide(KeyEvent::press(0, 2, at(20))).unwrap(), TapHoldDecision::Buffer);
        assert_eq!(engine.decide(KeyEvent::release(0, 1, at(30))).unwrap(), TapHoldDecision::Buffer);
        assert!(engine.pending().is_some());
        let decision = engine.decide(KeyEvent::release(0, 0, at(40))).unwrap();
        assert!(matches!(decision, TapHoldDecision::Tap(_)));
        let buffered = engine.take_buffer();
        assert_eq!(
            buffered.as_slice(),
            &[KeyEvent::press(0, 2, at(20)), KeyEvent::release(0, 1, at(30))]
        );
    }

    #[test]
    fn test_second_key_displaces_pending_as_hold() {
        let mut engine = TapHoldEngine::new();
        start(&mut engine, Some(TapHoldMode::Timeout));
        let displaced = engine
            .press(
                KeyEvent::press(0, 1, at(30)),
                Action::Key(KeyCode::Hid(HidKeyCode::B)),
                Action::LayerOn(1),
                TapHoldProfile::const_default(),
                &TapHoldConfig::default(),
            )
            .unwrap();
        assert_eq!(displaced.map(|p| p.pos), Some(KeyPos::new(0, 0)));
        assert_eq!(engine.pending().map(|p| p.pos), Some(KeyPos::new(0, 1)));
    }

    #[test]
    fn test_duplicate_press_keeps_single_record() {
        let mut engine = TapHoldEngine::new();
        start(&mut engine, None);
        let before = *engine.pending().unwrap();
        assert_eq!(
            engine.decide(KeyEvent::press(0, 0, at(50))),
            Err(ProtocolViolation::DuplicatePress(KeyPos::new(0, 0)))
        );
        assert_eq!(engine.pending(), Some(&before));
    }

    #[test]
    fn test_full_buffer_forces_hold() {
        let mut engine = TapHoldEngine::new();
        start(&mut engine, Some(TapHoldMode::Timeout));
        for col in 1..=TAP_HOLD_BUFFER_SIZE as u8 {
            assert_eq!(
                engine.decide(KeyEvent::press(1, col, at(col as u64))).unwrap(),
                TapHoldDecision::Buffer
            );
        }
        let decision = engine.decide(KeyEvent::press(2, 0, at(100))).unwrap();
        assert!(matches!(decision, TapHoldDecision::Hold(_)));
    }
}
