use embassy_time::Duration;
use keyflux_types::action::TapHoldMode;

use crate::function::Function;
use crate::keyboard_macros::MacroSequence;

/// The config struct for a keyflux keyboard.
///
/// Keymap layers are passed to [`Keyboard::new`](crate::keyboard::Keyboard::new) separately,
/// everything else the resolver reads at runtime lives here.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyboardConfig<'a> {
    pub behavior_config: BehaviorConfig,
    /// Macro sequences, indexed by macro id
    pub macros: &'a [MacroSequence<'a>],
    /// User functions, indexed by function id
    pub functions: &'a [Function],
}

/// Config for configurable action behavior
#[derive(Clone, Copy, Debug, Default)]
pub struct BehaviorConfig {
    pub tap_hold: TapHoldConfig,
    pub one_shot: OneShotConfig,
}

/// Configurations for tap hold behavior
#[derive(Clone, Copy, Debug)]
pub struct TapHoldConfig {
    /// Decision mode for tap-hold keys without a per-key mode
    pub default_mode: TapHoldMode,
    /// Holding a tap-hold key longer than this resolves it as hold
    pub hold_timeout: Duration,
}

impl Default for TapHoldConfig {
    fn default() -> Self {
        Self {
            default_mode: TapHoldMode::HoldOnOtherPress,
            hold_timeout: Duration::from_millis(200),
        }
    }
}

/// Config for one shot behavior
#[derive(Clone, Copy, Debug)]
pub struct OneShotConfig {
    pub timeout: Duration,
}

impl Default for OneShotConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(1),
        }
    }
}
