//! Keyboard actions and behaviors.
//!
//! Key types:
//! - [`Action`] - Single operations that a key performs
//! - [`KeyAction`] - What a keymap cell holds: nothing, a transparent marker,
//!   a single action or a tap-hold pair
//! - [`ResolvedAction`] - What the resolver decided to do for a key event

use serde::{Deserialize, Serialize};

use crate::keycode::KeyCode;
use crate::modifier::ModifierCombination;

/// How a pending tap-hold key reacts to other keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TapHoldMode {
    /// Trigger hold immediately if any other key is pressed while the tap-hold key is held
    HoldOnOtherPress,
    /// Same as QMK's permissive hold: https://docs.qmk.fm/tap_hold#tap-or-hold-decision-modes
    /// When another key is pressed and released while the tap-hold key is held,
    /// the hold action is triggered
    PermissiveHold,
    /// Only the hold timeout decides
    Timeout,
}

/// Per-key overrides of the tap-hold behavior.
///
/// Unset fields fall back to the keyboard's `TapHoldConfig`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapHoldProfile {
    pub mode: Option<TapHoldMode>,
    /// If the key is pressed longer than this, it is accepted as `hold` (in milliseconds)
    pub hold_timeout_ms: Option<u16>,
}

impl TapHoldProfile {
    pub const fn const_default() -> Self {
        Self {
            mode: None,
            hold_timeout_ms: None,
        }
    }

    pub const fn with_mode(self, mode: TapHoldMode) -> Self {
        Self {
            mode: Some(mode),
            ..self
        }
    }

    pub const fn with_hold_timeout_ms(self, t: u16) -> Self {
        // Zero is treated as unset
        Self {
            hold_timeout_ms: if t == 0 { None } else { Some(t) },
            ..self
        }
    }
}

/// A KeyAction is the action at a keyboard position, stored in keymap.
/// It can be a single action like triggering a key, or a composite keyboard action like tap/hold
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// No action.
    No,
    /// Transparent action, the next lower active layer is checked.
    Transparent,
    /// A single action, such as triggering a key, or activating a layer.
    Single(Action),
    /// Tap/hold action: the first is the tap action, the second is the hold action
    TapHold(Action, Action, TapHoldProfile),
}

/// The behavior class of a keymap entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyCategory {
    None,
    Transparent,
    PlainKey,
    Modifier,
    MomentaryLayer,
    ToggleLayer,
    OneShotLayer,
    OneShotModifier,
    TapHold,
    Macro,
    Function,
}

impl KeyAction {
    /// Every keymap entry belongs to exactly one category.
    pub fn category(&self) -> KeyCategory {
        match self {
            KeyAction::No => KeyCategory::None,
            KeyAction::Transparent => KeyCategory::Transparent,
            KeyAction::TapHold(..) => KeyCategory::TapHold,
            KeyAction::Single(action) => match action {
                Action::No => KeyCategory::None,
                Action::Key(_) | Action::KeyWithModifier(_, _) => KeyCategory::PlainKey,
                Action::Modifier(_) => KeyCategory::Modifier,
                Action::LayerOn(_) => KeyCategory::MomentaryLayer,
                Action::LayerToggle(_) => KeyCategory::ToggleLayer,
                Action::OneShotLayer(_) => KeyCategory::OneShotLayer,
                Action::OneShotModifier(_) => KeyCategory::OneShotModifier,
                Action::TriggerMacro(_) => KeyCategory::Macro,
                Action::Function(_) => KeyCategory::Function,
            },
        }
    }

    pub fn is_transparent(&self) -> bool {
        matches!(self, KeyAction::Transparent)
    }

    /// Target layers referenced by this entry, checked against the keymap size at load.
    pub fn layer_targets(&self) -> impl Iterator<Item = u8> {
        let (a, b) = match self {
            KeyAction::Single(a) => (a.layer_target(), None),
            KeyAction::TapHold(tap, hold, _) => (tap.layer_target(), hold.layer_target()),
            _ => (None, None),
        };
        a.into_iter().chain(b)
    }
}

/// A single basic action that a keyboard can execute.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Default action, no action.
    No,
    /// KeyCode action, can be a basic keycode, a consumer key or a system control key.
    Key(KeyCode),
    /// Key with modifiers held while it is held.
    KeyWithModifier(KeyCode, ModifierCombination),
    /// Modifier combination, used in mod-tap or as a plain modifier key.
    Modifier(ModifierCombination),
    /// Activate a layer while the key is held.
    LayerOn(u8),
    /// Toggle a layer on press.
    LayerToggle(u8),
    /// Activate a layer for the next key press.
    OneShotLayer(u8),
    /// Apply modifiers to the next key press.
    OneShotModifier(ModifierCombination),
    /// Play the macro with the given id.
    TriggerMacro(u8),
    /// Call the user function with the given id.
    Function(u8),
}

impl Action {
    pub fn layer_target(&self) -> Option<u8> {
        match self {
            Action::LayerOn(l) | Action::LayerToggle(l) | Action::OneShotLayer(l) => Some(*l),
            _ => None,
        }
    }
}

/// Kind of layer operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerOpKind {
    Momentary,
    Toggle,
    OneShot,
}

/// The semantic action a key event resolved to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResolvedAction {
    None,
    EmitKey {
        key: KeyCode,
        modifiers: ModifierCombination,
    },
    Modifier(ModifierCombination),
    LayerOp(LayerOpKind, u8),
    OneShotModifier(ModifierCombination),
    TapHold {
        tap: Action,
        hold: Action,
        profile: TapHoldProfile,
    },
    RunMacro(u8),
    RunFunction(u8),
}

impl From<Action> for ResolvedAction {
    fn from(action: Action) -> Self {
        match action {
            Action::No => ResolvedAction::None,
            Action::Key(key) => ResolvedAction::EmitKey {
                key,
                modifiers: ModifierCombination::new(),
            },
            Action::KeyWithModifier(key, modifiers) => ResolvedAction::EmitKey { key, modifiers },
            Action::Modifier(m) => ResolvedAction::Modifier(m),
            Action::LayerOn(l) => ResolvedAction::LayerOp(LayerOpKind::Momentary, l),
            Action::LayerToggle(l) => ResolvedAction::LayerOp(LayerOpKind::Toggle, l),
            Action::OneShotLayer(l) => ResolvedAction::LayerOp(LayerOpKind::OneShot, l),
            Action::OneShotModifier(m) => ResolvedAction::OneShotModifier(m),
            Action::TriggerMacro(id) => ResolvedAction::RunMacro(id),
            Action::Function(id) => ResolvedAction::RunFunction(id),
        }
    }
}

impl From<KeyAction> for ResolvedAction {
    fn from(key_action: KeyAction) -> Self {
        match key_action {
            KeyAction::No | KeyAction::Transparent => ResolvedAction::None,
            KeyAction::Single(action) => action.into(),
            KeyAction::TapHold(tap, hold, profile) => ResolvedAction::TapHold { tap, hold, profile },
        }
    }
}
