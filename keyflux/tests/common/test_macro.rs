//! Shorthands for writing key sequence tests.

/// Run a key sequence on a keyboard and compare the keyboard reports the host receives.
///
/// Sequence entries are `[row, col, pressed, delay_ms]`, reports are `[modifier, keycodes]`.
#[macro_export]
macro_rules! key_sequence_test {
    (keyboard: $keyboard:expr, sequence: [$($key:tt),* $(,)?], expected_reports: [$($report:tt),* $(,)?]) => {{
        let mut keyboard = $keyboard;
        $crate::common::run_key_sequence_test(
            &mut keyboard,
            &$crate::key_sequence![$($key),*],
            &$crate::key_report![$($report),*],
        );
    }};
}

/// Build an array of `TestKeyPress` from `[row, col, pressed, delay_ms]` entries
#[macro_export]
macro_rules! key_sequence {
    ($([$row:expr, $col:expr, $pressed:expr, $delay:expr]),* $(,)?) => {
        [$($crate::common::TestKeyPress::new($row, $col, $pressed, $delay)),*]
    };
}

/// Build an array of `KeyboardReport` from `[modifier, keycodes]` entries
#[macro_export]
macro_rules! key_report {
    ($([$modifier:expr, $keys:expr]),* $(,)?) => {
        [$($crate::common::report($modifier, $keys)),*]
    };
}

/// Report byte of a keyboard page key, e.g. `kc8!(A)`
#[macro_export]
macro_rules! kc8 {
    ($key:ident) => {
        keyflux::types::keycode::HidKeyCode::$key as u8
    };
}
