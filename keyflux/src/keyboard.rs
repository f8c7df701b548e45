pub(crate) mod oneshot;

use embassy_time::Instant;
use heapless::Vec;
use keyflux_types::action::{KeyAction, LayerOpKind, ResolvedAction};
use keyflux_types::keycode::KeyCode;
use keyflux_types::modifier::ModifierCombination;

use crate::config::{BehaviorConfig, KeyboardConfig};
use crate::error::{self, ProtocolViolation};
use crate::event::{KeyEvent, KeyPos};
use crate::function::{Function, FunctionRegistry};
use crate::hid::{HidEvent, HidOutput};
use crate::keyboard::oneshot::OneShotState;
use crate::keyboard_macros::MacroPlayer;
use crate::keymap::KeyMap;
use crate::layer_stack::LayerStack;
use crate::tap_hold::{PendingTapHold, TapHoldDecision, TapHoldEngine, TapHoldState};

/// Maximum number of keys pressed at the same time
pub const MAX_HELD_KEYS: usize = 32;

/// What a pressed key did, undone exactly on its release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum Activation {
    Key {
        key: KeyCode,
        modifiers: ModifierCombination,
    },
    Modifier(ModifierCombination),
    /// A momentary layer owned by the key
    Layer,
    Macro,
    OneShotModifier(ModifierCombination),
    OneShotLayer(u8),
    /// A tap-hold key waiting for its decision
    TapHold,
    Nothing,
}

#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct HeldKey {
    pos: KeyPos,
    activation: Activation,
    /// The key is a tap-hold key
    tap_hold: bool,
}

/// The key event resolver.
///
/// Events go in through [`Keyboard::process`], time goes in through
/// [`Keyboard::tick`] and HID events come out through
/// [`Keyboard::drain_hid_events`]. The resolver never reads a clock and never
/// blocks, waiting is state kept across ticks.
pub struct Keyboard<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> {
    pub(crate) keymap: KeyMap<'a, ROW, COL, NUM_LAYER>,

    /// Behavior config
    pub(crate) behavior: BehaviorConfig,

    pub(crate) layers: LayerStack<NUM_LAYER>,

    tap_hold: TapHoldEngine,

    macros: MacroPlayer<'a>,

    functions: FunctionRegistry<'a>,

    pub(crate) hid: HidOutput,

    /// Pressed keys and what they activated
    held: Vec<HeldKey, MAX_HELD_KEYS>,

    /// One shot modifier state
    pub(crate) osm_state: OneShotState<ModifierCombination>,
    pub(crate) osm_deadline: Option<Instant>,

    /// One shot layer state
    pub(crate) osl_state: OneShotState<u8>,
    pub(crate) osl_deadline: Option<Instant>,
    /// The key that consumed the one shot layer, the layer is dropped on its release
    pub(crate) osl_consumer: Option<KeyPos>,
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> Keyboard<'a, ROW, COL, NUM_LAYER> {
    /// Build a keyboard from a keymap table.
    ///
    /// Fails with [`Error::Config`](crate::error::Error::Config) when the
    /// keymap or a macro sequence is malformed.
    pub fn new(layers: &'a [[[KeyAction; COL]; ROW]; NUM_LAYER], config: KeyboardConfig<'a>) -> error::Result<Self> {
        Self::with_keymap(KeyMap::new(layers)?, config)
    }

    pub fn with_keymap(keymap: KeyMap<'a, ROW, COL, NUM_LAYER>, config: KeyboardConfig<'a>) -> error::Result<Self> {
        Ok(Keyboard {
            keymap,
            behavior: config.behavior_config,
            layers: LayerStack::new(),
            tap_hold: TapHoldEngine::new(),
            macros: MacroPlayer::new(config.macros)?,
            functions: FunctionRegistry::new(config.functions),
            hid: HidOutput::new(),
            held: Vec::new(),
            osm_state: OneShotState::default(),
            osm_deadline: None,
            osl_state: OneShotState::default(),
            osl_deadline: None,
            osl_consumer: None,
        })
    }

    /// Process one debounced key event.
    ///
    /// Timeouts that expired at or before the event are resolved first. An
    /// event that breaks the press/release protocol is dropped and reported.
    pub fn process(&mut self, event: KeyEvent) -> Result<(), ProtocolViolation> {
        if !self.keymap.contains(event.pos) {
            let e = ProtocolViolation::OutOfRange(event.pos);
            warn!("Dropping key event: {:?}", e);
            return Err(e);
        }
        self.advance_timers(event.at);
        let result = self.handle_event(event);
        if let Err(e) = result {
            warn!("Dropping key event: {:?}", e);
        }
        result
    }

    /// Advance time without a key event: resolve timeouts and step macros.
    pub fn tick(&mut self, now: Instant) {
        self.advance_timers(now);
        self.macros.advance(now, &mut self.hid);
    }

    /// HID events produced since the last drain, in order.
    pub fn drain_hid_events(&mut self) -> impl Iterator<Item = HidEvent> + '_ {
        self.hid.drain()
    }

    /// The action a press at `pos` would resolve to with the current layers.
    pub fn resolve(&self, pos: KeyPos) -> ResolvedAction {
        if !self.keymap.contains(pos) {
            return ResolvedAction::None;
        }
        self.keymap.resolve(pos, &self.layers).1.into()
    }

    pub fn layer_stack(&self) -> &LayerStack<NUM_LAYER> {
        &self.layers
    }

    pub fn tap_hold_state(&self, pos: KeyPos) -> TapHoldState {
        if self.tap_hold.is_pending(pos) {
            return TapHoldState::Pending;
        }
        match self.held.iter().find(|h| h.pos == pos) {
            Some(h) if h.tap_hold && h.activation != Activation::TapHold => TapHoldState::Holding,
            _ => TapHoldState::Idle,
        }
    }

    /// Release everything the keyboard holds.
    ///
    /// Keys, modifiers, momentary and one shot layers and running macros are
    /// dropped. Toggled layers stay.
    pub fn clear_keyboard(&mut self) {
        for held in self.held.iter() {
            if held.activation == Activation::Layer {
                self.layers.pop_momentary(held.pos);
            }
        }
        self.held.clear();
        self.tap_hold.clear();
        self.macros.clear();
        self.hid.release_all();
        if self.osl_state.value().is_some() {
            self.layers.pop_one_shot();
        }
        self.osm_state = OneShotState::None;
        self.osm_deadline = None;
        self.osl_state = OneShotState::None;
        self.osl_deadline = None;
        self.osl_consumer = None;
    }

    /// Resolve every timeout that expired at or before `now`.
    fn advance_timers(&mut self, now: Instant) {
        if let Some(pending) = self.tap_hold.expire(now) {
            self.resolve_hold(pending, now);
            self.replay_buffer();
        }
        self.expire_one_shot(now);
    }

    fn handle_event(&mut self, event: KeyEvent) -> Result<(), ProtocolViolation> {
        if self.tap_hold.pending().is_some() {
            match self.tap_hold.decide(event)? {
                TapHoldDecision::Tap(pending) => {
                    self.resolve_tap(pending, event.at);
                    self.replay_buffer();
                    return Ok(());
                }
                TapHoldDecision::Hold(pending) => {
                    self.resolve_hold(pending, event.at);
                    self.replay_buffer();
                }
                TapHoldDecision::Buffer => return Ok(()),
                TapHoldDecision::Ignore => (),
            }
        }

        if event.pressed {
            self.on_press(event)
        } else {
            self.on_release(event)
        }
    }

    /// Process the events that waited behind a decided tap-hold key.
    fn replay_buffer(&mut self) {
        for event in self.tap_hold.take_buffer() {
            self.advance_timers(event.at);
            if let Err(e) = self.handle_event(event) {
                warn!("Dropping buffered key event: {:?}", e);
            }
        }
    }

    fn on_press(&mut self, event: KeyEvent) -> Result<(), ProtocolViolation> {
        let pos = event.pos;
        if self.held.iter().any(|h| h.pos == pos) {
            return Err(ProtocolViolation::DuplicatePress(pos));
        }

        let (layer, key_action) = self.keymap.resolve(pos, &self.layers);
        debug!("Press {:?}: {:?} from layer {}", pos, key_action, layer);

        let resolved = ResolvedAction::from(key_action);
        if !matches!(
            resolved,
            ResolvedAction::OneShotModifier(_) | ResolvedAction::LayerOp(LayerOpKind::OneShot, _)
        ) {
            self.update_one_shot(pos);
        }

        match resolved {
            ResolvedAction::TapHold { tap, hold, profile } => {
                let displaced = self
                    .tap_hold
                    .press(event, tap, hold, profile, &self.behavior.tap_hold)?;
                self.record(pos, Activation::TapHold, true);
                if let Some(pending) = displaced {
                    self.resolve_hold(pending, event.at);
                }
            }
            _ => {
                let activation = self.activate(pos, resolved, event.at);
                self.record(pos, activation, false);
            }
        }
        Ok(())
    }

    fn on_release(&mut self, event: KeyEvent) -> Result<(), ProtocolViolation> {
        let pos = event.pos;
        let Some(i) = self.held.iter().position(|h| h.pos == pos) else {
            return Err(ProtocolViolation::UnmatchedRelease(pos));
        };
        let held = self.held.swap_remove(i);
        debug!("Release {:?}: {:?}", pos, held.activation);
        self.deactivate(pos, held.activation, event.at);
        self.finish_release(pos);
        Ok(())
    }

    fn record(&mut self, pos: KeyPos, activation: Activation, tap_hold: bool) {
        let held = HeldKey {
            pos,
            activation,
            tap_hold,
        };
        if self.held.push(held).is_err() {
            warn!("Too many held keys, {:?} will not be released", pos);
        }
    }

    /// Tap: the tap action is pressed and released right away.
    fn resolve_tap(&mut self, pending: PendingTapHold, at: Instant) {
        let pos = pending.pos;
        let activation = self.activate(pos, pending.tap.into(), at);
        self.deactivate(pos, activation, at);
        self.held.retain(|h| h.pos != pos);
        self.finish_release(pos);
    }

    /// Hold: the hold action stays active until the key is released.
    fn resolve_hold(&mut self, pending: PendingTapHold, at: Instant) {
        let activation = self.activate(pending.pos, pending.hold.into(), at);
        match self.held.iter_mut().find(|h| h.pos == pending.pos) {
            Some(held) => held.activation = activation,
            None => self.record(pending.pos, activation, true),
        }
    }

    /// Perform the press side of an action.
    fn activate(&mut self, pos: KeyPos, action: ResolvedAction, at: Instant) -> Activation {
        match action {
            ResolvedAction::None => Activation::Nothing,
            ResolvedAction::EmitKey { key, modifiers } => {
                self.register_modifiers(modifiers);
                match self.take_single_osm() {
                    Some(osm) => {
                        // One shot modifiers are sent with this key only
                        self.register_modifiers(osm);
                        self.hid.press(key);
                        self.unregister_modifiers(osm);
                    }
                    None => self.hid.press(key),
                }
                Activation::Key { key, modifiers }
            }
            ResolvedAction::Modifier(modifiers) => {
                self.register_modifiers(modifiers);
                Activation::Modifier(modifiers)
            }
            ResolvedAction::LayerOp(LayerOpKind::Momentary, layer) => {
                if self.layers.push_momentary(layer, pos) {
                    Activation::Layer
                } else {
                    Activation::Nothing
                }
            }
            ResolvedAction::LayerOp(LayerOpKind::Toggle, layer) => {
                self.layers.toggle(layer);
                Activation::Nothing
            }
            ResolvedAction::LayerOp(LayerOpKind::OneShot, layer) => {
                self.process_osl_press(layer);
                Activation::OneShotLayer(layer)
            }
            ResolvedAction::OneShotModifier(modifiers) => {
                self.process_osm_press(modifiers);
                Activation::OneShotModifier(modifiers)
            }
            ResolvedAction::RunMacro(id) => match self.macros.trigger(id, pos, at, &mut self.hid) {
                Ok(()) => Activation::Macro,
                Err(e) => {
                    warn!("{:?}", e);
                    Activation::Nothing
                }
            },
            ResolvedAction::RunFunction(id) => {
                self.run_function(id);
                Activation::Nothing
            }
            ResolvedAction::TapHold { .. } => {
                // Tap and hold actions are plain actions
                warn!("Nested tap-hold action at {:?}", pos);
                Activation::Nothing
            }
        }
    }

    /// Perform the release side of an activation.
    fn deactivate(&mut self, pos: KeyPos, activation: Activation, at: Instant) {
        match activation {
            Activation::Key { key, modifiers } => {
                self.hid.release(key);
                self.unregister_modifiers(modifiers);
            }
            Activation::Modifier(modifiers) => self.unregister_modifiers(modifiers),
            Activation::Layer => {
                self.layers.pop_momentary(pos);
            }
            Activation::Macro => self.macros.release_owner(pos, &mut self.hid),
            Activation::OneShotModifier(modifiers) => self.process_osm_release(modifiers, at),
            Activation::OneShotLayer(layer) => self.process_osl_release(layer, at),
            Activation::TapHold | Activation::Nothing => (),
        }
    }

    fn run_function(&mut self, id: u8) {
        match self.functions.get(id) {
            Some(Function::Handler(f)) => {
                debug!("Run function {}", id);
                f();
            }
            Some(Function::Terminal(f)) => {
                self.clear_keyboard();
                info!("Jump to bootloader");
                f()
            }
            None => warn!("Function {} is not defined", id),
        }
    }

    pub(crate) fn register_modifiers(&mut self, modifiers: ModifierCombination) {
        for key in modifiers.iter_keycodes() {
            self.hid.press(KeyCode::Hid(key));
        }
    }

    pub(crate) fn unregister_modifiers(&mut self, modifiers: ModifierCombination) {
        for key in modifiers.iter_keycodes() {
            self.hid.release(KeyCode::Hid(key));
        }
    }
}
