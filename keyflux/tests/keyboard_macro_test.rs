pub mod common;

use keyflux::boards::mot;
use keyflux::config::KeyboardConfig;
use keyflux::keyboard::Keyboard;
use keyflux::keyboard_macros::MacroOperation::{Delay, Press, Release, Tap};
use keyflux::keyboard_macros::{MacroOperation, MacroSequence};
use keyflux::types::action::KeyAction;
use keyflux::types::keycode::{HidKeyCode, KeyCode};
use keyflux::{k, layer, mac};

use crate::common::{KC_LSHIFT, leak};

const K: KeyCode = KeyCode::Hid(HidKeyCode::K);
const A: KeyCode = KeyCode::Hid(HidKeyCode::A);
const B: KeyCode = KeyCode::Hid(HidKeyCode::B);

const HOLD_K: [MacroOperation; 3] = [Press(K), Delay(10), Release(K)];
const HOLD_A: [MacroOperation; 3] = [Press(A), Delay(100), Release(A)];
const TAP_K_A: [MacroOperation; 2] = [Tap(K), Tap(A)];
const TAP_B: [MacroOperation; 1] = [Tap(B)];

const MACROS: [MacroSequence<'static>; 4] = [
    MacroSequence::new(&HOLD_K),
    MacroSequence::new(&HOLD_A).abort_on_release(),
    MacroSequence::new(&TAP_K_A).with_interval(5),
    MacroSequence::new(&TAP_B),
];

#[rustfmt::skip]
const MACRO_KEYMAP: [[[KeyAction; 6]; 1]; 1] = [
    layer!([[mac!(0), mac!(1), mac!(2), mac!(7), k!(B), mac!(3)]]),
];

fn create_macro_keyboard() -> Keyboard<'static, 1, 6, 1> {
    let config = KeyboardConfig {
        macros: &MACROS,
        ..Default::default()
    };
    Keyboard::new(leak(MACRO_KEYMAP), config).unwrap()
}

#[test]
fn test_macro_delay() {
    key_sequence_test!(
        keyboard: create_macro_keyboard(),
        sequence: [
            [0, 0, true, 10], // Trigger: K down now, up 10ms later
            [0, 0, false, 2],
        ],
        expected_reports: [
            [0, [kc8!(K), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}

#[test]
fn test_macro_keeps_playing_after_trigger_release() {
    key_sequence_test!(
        keyboard: create_macro_keyboard(),
        sequence: [
            [0, 2, true, 10], // Trigger taps of K and A
            [0, 2, false, 1],
        ],
        expected_reports: [
            [0, [kc8!(K), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
            [0, [kc8!(A), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}

#[test]
fn test_macro_abort_on_release() {
    key_sequence_test!(
        keyboard: create_macro_keyboard(),
        sequence: [
            [0, 1, true, 10],  // Trigger: A held for 100ms
            [0, 1, false, 30], // Early release stops the macro and releases A
        ],
        expected_reports: [
            [0, [kc8!(A), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}

#[test]
fn test_macro_with_other_keys() {
    key_sequence_test!(
        keyboard: create_macro_keyboard(),
        sequence: [
            [0, 4, true, 10],  // Press B
            [0, 0, true, 10],  // Trigger K
            [0, 0, false, 5],
            [0, 4, false, 20], // Release B
        ],
        expected_reports: [
            [0, [kc8!(B), 0, 0, 0, 0, 0]],
            [0, [kc8!(B), kc8!(K), 0, 0, 0, 0]],
            [0, [kc8!(B), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}

#[test]
fn test_macro_tap_of_held_key() {
    key_sequence_test!(
        keyboard: create_macro_keyboard(),
        sequence: [
            [0, 4, true, 10],  // Press B
            [0, 5, true, 10],  // Trigger a tap of B while B is held
            [0, 5, false, 5],
            [0, 4, false, 20], // Release B
        ],
        expected_reports: [
            [0, [kc8!(B), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
            [0, [kc8!(B), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}

#[test]
fn test_undefined_macro_does_nothing() {
    key_sequence_test!(
        keyboard: create_macro_keyboard(),
        sequence: [
            [0, 3, true, 10],
            [0, 3, false, 10],
        ],
        expected_reports: []
    );
}

#[test]
fn test_c_comment_macro() {
    let config = KeyboardConfig {
        macros: &mot::MACROS,
        ..Default::default()
    };
    let keymap = leak([layer!([[mac!(0), mac!(1), mac!(2)]])]);
    key_sequence_test!(
        keyboard: Keyboard::new(keymap, config).unwrap(),
        sequence: [
            [0, 2, true, 10],
            [0, 2, false, 20],
        ],
        expected_reports: [
            [0, [kc8!(Slash), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
            [KC_LSHIFT, [0, 0, 0, 0, 0, 0]],
            [KC_LSHIFT, [kc8!(Kc8), 0, 0, 0, 0, 0]],
            [KC_LSHIFT, [0, 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
            [0, [kc8!(Space), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
            [0, [kc8!(Space), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
            [KC_LSHIFT, [0, 0, 0, 0, 0, 0]],
            [KC_LSHIFT, [kc8!(Kc8), 0, 0, 0, 0, 0]],
            [KC_LSHIFT, [0, 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
            [0, [kc8!(Slash), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
            [0, [kc8!(Left), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
            [0, [kc8!(Left), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
            [0, [kc8!(Left), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}
