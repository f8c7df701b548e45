pub mod common;

use embassy_time::Instant;
use keyflux::error::ProtocolViolation;
use keyflux::event::{KeyEvent, KeyPos};

use crate::common::{KC_LSHIFT, create_test_keyboard};

#[test]
fn test_key_press_release() {
    key_sequence_test!(
        keyboard: create_test_keyboard(),
        sequence: [
            [1, 1, true, 10],  // Press Q
            [1, 1, false, 90], // Release Q
        ],
        expected_reports: [
            [0, [kc8!(Q), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}

#[test]
fn test_multiple_keys_keep_their_slots() {
    key_sequence_test!(
        keyboard: create_test_keyboard(),
        sequence: [
            [1, 1, true, 10],  // Press Q
            [1, 2, true, 10],  // Press W
            [1, 1, false, 10], // Release Q
            [1, 3, true, 10],  // Press E
            [1, 2, false, 10], // Release W
            [1, 3, false, 10], // Release E
        ],
        expected_reports: [
            [0, [kc8!(Q), 0, 0, 0, 0, 0]],
            [0, [kc8!(Q), kc8!(W), 0, 0, 0, 0]],
            [0, [0, kc8!(W), 0, 0, 0, 0]],
            [0, [kc8!(E), kc8!(W), 0, 0, 0, 0]],
            [0, [kc8!(E), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}

#[test]
fn test_modifier_key() {
    key_sequence_test!(
        keyboard: create_test_keyboard(),
        sequence: [
            [3, 0, true, 10],  // Press LShift
            [3, 1, true, 10],  // Press Z
            [3, 1, false, 10], // Release Z
            [3, 0, false, 10], // Release LShift
        ],
        expected_reports: [
            [KC_LSHIFT, [0, 0, 0, 0, 0, 0]],
            [KC_LSHIFT, [kc8!(Z), 0, 0, 0, 0, 0]],
            [KC_LSHIFT, [0, 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}

#[test]
fn test_simultaneous_events_share_a_report() {
    key_sequence_test!(
        keyboard: create_test_keyboard(),
        sequence: [
            [3, 0, true, 10], // Press LShift
            [3, 1, true, 0],  // Press Z in the same tick
            [3, 1, false, 50],
            [3, 0, false, 0],
        ],
        expected_reports: [
            [KC_LSHIFT, [kc8!(Z), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}

#[test]
fn test_protocol_violations_are_dropped() {
    key_sequence_test!(
        keyboard: create_test_keyboard(),
        sequence: [
            [1, 1, false, 10], // Release without press
            [1, 1, true, 10],  // Press Q
            [1, 1, true, 10],  // Duplicate press
            [1, 1, false, 10], // Release Q
            [1, 1, false, 10], // Second release
        ],
        expected_reports: [
            [0, [kc8!(Q), 0, 0, 0, 0, 0]],
            [0, [0, 0, 0, 0, 0, 0]],
        ]
    );
}

#[test]
fn test_protocol_violation_errors() {
    let mut keyboard = create_test_keyboard();
    let at = Instant::from_millis(0);
    assert_eq!(
        keyboard.process(KeyEvent::press(5, 0, at)),
        Err(ProtocolViolation::OutOfRange(KeyPos::new(5, 0)))
    );
    assert_eq!(
        keyboard.process(KeyEvent::release(0, 0, at)),
        Err(ProtocolViolation::UnmatchedRelease(KeyPos::new(0, 0)))
    );
    assert!(keyboard.process(KeyEvent::press(0, 0, at)).is_ok());
    assert_eq!(
        keyboard.process(KeyEvent::press(0, 0, at)),
        Err(ProtocolViolation::DuplicatePress(KeyPos::new(0, 0)))
    );
}
