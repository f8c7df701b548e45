pub mod common;

use keyflux::config::KeyboardConfig;
use keyflux::keyboard::Keyboard;
use keyflux::types::action::KeyAction;
use keyflux::{a, k, layer, osl, osm};

use crate::common::{KC_LGUI, KC_LSHIFT, leak};

#[rustfmt::skip]
const ONE_SHOT_KEYMAP: [[[KeyAction; 4]; 1]; 2] = [
    layer!([[osm!(LGUI), k!(A), osl!(1), osm!(LSHIFT)]]),
    layer!([[a!(Transparent), k!(B), a!(Transparent), a!(Transparent)]]),
];

fn create_one_shot_keyboard() -> Keyboard<'static, 1, 4, 2> {
    Keyboard::new(leak(ONE_SHOT_KEYMAP), KeyboardConfig::default()).unwrap()
}

#[test]
fn test_osm_next_key_only() {
    key_sequence_test!(
        keyboard: create_one_shot_keyboard(),
        sequence: [
            [0, 0, true, 10],  // Tap OSM(LGUI)
            [0, 0, false, 20],
            [0, 1, true, 50],  // Press A with LGUI
            [0, 1, false, 50],
            [0, 1, true, 50],  // Press A again, no modifier
            [0, 1, false, 50],
        ],
        expected_reports: [
            [KC_LGUI, [kc8!(A), 0, 0, 0, 0, 0]],
            [0, [kc8!(A), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
            [0, [kc8!(A), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}

#[test]
fn test_osm_stacks() {
    key_sequence_test!(
        keyboard: create_one_shot_keyboard(),
        sequence: [
            [0, 0, true, 10],  // Tap OSM(LGUI)
            [0, 0, false, 20],
            [0, 3, true, 20],  // Tap OSM(LSHIFT)
            [0, 3, false, 20],
            [0, 1, true, 50],  // Press A with both
            [0, 1, false, 50],
        ],
        expected_reports: [
            [KC_LGUI | KC_LSHIFT, [kc8!(A), 0, 0, 0, 0, 0]],
            [0, [kc8!(A), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}

#[test]
fn test_osm_timeout() {
    key_sequence_test!(
        keyboard: create_one_shot_keyboard(),
        sequence: [
            [0, 0, true, 10],   // Tap OSM(LGUI)
            [0, 0, false, 20],
            [0, 1, true, 1100], // Press A after the one shot timeout
            [0, 1, false, 50],
        ],
        expected_reports: [
            [0, [kc8!(A), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}

#[test]
fn test_osm_held_is_a_modifier() {
    key_sequence_test!(
        keyboard: create_one_shot_keyboard(),
        sequence: [
            [0, 0, true, 10],  // Press OSM(LGUI)
            [0, 1, true, 20],  // Press A while it is held, LGUI goes out with it
            [0, 1, false, 20],
            [0, 0, false, 20], // Release OSM(LGUI)
        ],
        expected_reports: [
            [KC_LGUI, [kc8!(A), 0, 0, 0, 0, 0]],
            [KC_LGUI, [0, 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}

#[test]
fn test_osl_next_key_only() {
    key_sequence_test!(
        keyboard: create_one_shot_keyboard(),
        sequence: [
            [0, 2, true, 10],  // Tap OSL(1)
            [0, 2, false, 20],
            [0, 1, true, 50],  // B from layer 1
            [0, 1, false, 50],
            [0, 1, true, 50],  // A, the layer is gone
            [0, 1, false, 50],
        ],
        expected_reports: [
            [0, [kc8!(B), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
            [0, [kc8!(A), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}

#[test]
fn test_osl_timeout() {
    key_sequence_test!(
        keyboard: create_one_shot_keyboard(),
        sequence: [
            [0, 2, true, 10],   // Tap OSL(1)
            [0, 2, false, 20],
            [0, 1, true, 1100], // A, the layer timed out
            [0, 1, false, 50],
        ],
        expected_reports: [
            [0, [kc8!(A), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}
