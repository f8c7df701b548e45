/// Create a layer in keymap
#[macro_export]
macro_rules! layer {
    ([$([$($x: expr), +]), +]) => {
        [$([$($x), +]),+]
    };
}

/// Create a normal key. For example, `k!(A)` represents `KeyAction::Single(Action::Key(KeyCode::Hid(HidKeyCode::A)))`.
///
/// Media and power keys of the keyboard page land on their own HID page.
#[macro_export]
macro_rules! k {
    ($k: ident) => {
        $crate::types::action::KeyAction::Single($crate::types::action::Action::Key(
            $crate::types::keycode::KeyCode::from_hid($crate::types::keycode::HidKeyCode::$k),
        ))
    };
}

/// Create a normal action: `KeyAction`
#[macro_export]
macro_rules! a {
    ($a: ident) => {
        $crate::types::action::KeyAction::$a
    };
}

/// Create a normal key with modifier action
#[macro_export]
macro_rules! wm {
    ($x: ident, $m: expr) => {
        $crate::types::action::KeyAction::Single($crate::types::action::Action::KeyWithModifier(
            $crate::types::keycode::KeyCode::from_hid($crate::types::keycode::HidKeyCode::$x),
            $m,
        ))
    };
}

/// Create a modifier key. For example, `m!(LCTRL)`.
#[macro_export]
macro_rules! m {
    ($m: ident) => {
        $crate::types::action::KeyAction::Single($crate::types::action::Action::Modifier(
            $crate::types::modifier::ModifierCombination::$m,
        ))
    };
}

/// Create a layer activate action. For example, `mo!(1)` activates layer 1.
#[macro_export]
macro_rules! mo {
    ($x: literal) => {
        $crate::types::action::KeyAction::Single($crate::types::action::Action::LayerOn($x))
    };
}

/// Create a layer toggle action
#[macro_export]
macro_rules! tg {
    ($x: literal) => {
        $crate::types::action::KeyAction::Single($crate::types::action::Action::LayerToggle($x))
    };
}

/// Create a layer activate action or tap key(tap/hold)
#[macro_export]
macro_rules! lt {
    ($x: literal, $k: ident) => {
        $crate::lt!($x, $k, $crate::types::action::TapHoldProfile::const_default())
    };
    ($x: literal, $k: ident, $p: expr) => {
        $crate::types::action::KeyAction::TapHold(
            $crate::types::action::Action::Key($crate::types::keycode::KeyCode::from_hid(
                $crate::types::keycode::HidKeyCode::$k,
            )),
            $crate::types::action::Action::LayerOn($x),
            $p,
        )
    };
}

/// Create a modifier-tap-hold action. For example, `mt!(Tab, LALT)`.
#[macro_export]
macro_rules! mt {
    ($k: ident, $m: ident) => {
        $crate::mt!($k, $m, $crate::types::action::TapHoldProfile::const_default())
    };
    ($k: ident, $m: ident, $p: expr) => {
        $crate::types::action::KeyAction::TapHold(
            $crate::types::action::Action::Key($crate::types::keycode::KeyCode::from_hid(
                $crate::types::keycode::HidKeyCode::$k,
            )),
            $crate::types::action::Action::Modifier($crate::types::modifier::ModifierCombination::$m),
            $p,
        )
    };
}

/// Create a tap-hold action, tapping and holding different keys
#[macro_export]
macro_rules! th {
    ($t: ident, $h: ident) => {
        $crate::th!($t, $h, $crate::types::action::TapHoldProfile::const_default())
    };
    ($t: ident, $h: ident, $p: expr) => {
        $crate::types::action::KeyAction::TapHold(
            $crate::types::action::Action::Key($crate::types::keycode::KeyCode::from_hid(
                $crate::types::keycode::HidKeyCode::$t,
            )),
            $crate::types::action::Action::Key($crate::types::keycode::KeyCode::from_hid(
                $crate::types::keycode::HidKeyCode::$h,
            )),
            $p,
        )
    };
}

/// Create an oneshot layer key in keymap
#[macro_export]
macro_rules! osl {
    ($x: literal) => {
        $crate::types::action::KeyAction::Single($crate::types::action::Action::OneShotLayer($x))
    };
}

/// Create an oneshot modifier key in keymap. For example, `osm!(LGUI)`.
#[macro_export]
macro_rules! osm {
    ($m: ident) => {
        $crate::types::action::KeyAction::Single($crate::types::action::Action::OneShotModifier(
            $crate::types::modifier::ModifierCombination::$m,
        ))
    };
}

/// Create a macro trigger key, `n` is the macro id
#[macro_export]
macro_rules! mac {
    ($x: literal) => {
        $crate::types::action::KeyAction::Single($crate::types::action::Action::TriggerMacro($x))
    };
}

/// Create a user function key, `n` is the function id
#[macro_export]
macro_rules! func {
    ($x: literal) => {
        $crate::types::action::KeyAction::Single($crate::types::action::Action::Function($x))
    };
}

/// Create a shifted key
#[macro_export]
macro_rules! shifted {
    ($x: ident) => {
        $crate::wm!($x, $crate::types::modifier::ModifierCombination::LSHIFT)
    };
}
