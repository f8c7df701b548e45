pub mod test_macro;

use embassy_time::Instant;
use keyflux::config::{BehaviorConfig, KeyboardConfig};
use keyflux::event::KeyEvent;
use keyflux::hid::{KeyboardReport, Report, ReportBuilder};
use keyflux::keyboard::Keyboard;
use keyflux::types::action::KeyAction;
use keyflux::{a, k, layer, mo, th};
use log::debug;

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub(crate) const KC_LSHIFT: u8 = 1 << 1;
pub(crate) const KC_LGUI: u8 = 1 << 3;

/// Ticks run after the last key event, long enough for every timeout to fire
const SETTLE_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct TestKeyPress {
    pub row: u8,
    pub col: u8,
    pub pressed: bool,
    pub delay: u64, // Delay before this key event in milliseconds
}

impl TestKeyPress {
    pub const fn new(row: u8, col: u8, pressed: bool, delay: u64) -> Self {
        Self {
            row,
            col,
            pressed,
            delay,
        }
    }
}

/// A keyboard report without LEDs
pub const fn report(modifier: u8, keycodes: [u8; 6]) -> KeyboardReport {
    KeyboardReport {
        modifier,
        reserved: 0,
        leds: 0,
        keycodes,
    }
}

/// Feed a key sequence to the keyboard on a simulated 1ms tick clock and
/// collect every report the host would receive.
pub fn run_key_sequence<const ROW: usize, const COL: usize, const NUM_LAYER: usize>(
    keyboard: &mut Keyboard<'_, ROW, COL, NUM_LAYER>,
    key_sequence: &[TestKeyPress],
) -> Vec<Report> {
    let mut at = 0;
    let times: Vec<u64> = key_sequence
        .iter()
        .map(|key| {
            at += key.delay;
            at
        })
        .collect();
    let end = times.last().copied().unwrap_or(0) + SETTLE_MS;

    let mut builder = ReportBuilder::new();
    let mut reports = Vec::new();
    let mut next = 0;
    for ms in 0..=end {
        let now = Instant::from_millis(ms);
        while next < key_sequence.len() && times[next] == ms {
            let key = &key_sequence[next];
            let event = if key.pressed {
                KeyEvent::press(key.row, key.col, now)
            } else {
                KeyEvent::release(key.row, key.col, now)
            };
            if let Err(e) = keyboard.process(event) {
                debug!("Key event rejected: {}", e);
            }
            next += 1;
        }
        keyboard.tick(now);
        builder.build(keyboard.drain_hid_events(), |report| reports.push(report));
    }
    reports
}

/// Run a key sequence and compare the keyboard reports with the expected ones
pub fn run_key_sequence_test<const ROW: usize, const COL: usize, const NUM_LAYER: usize>(
    keyboard: &mut Keyboard<'_, ROW, COL, NUM_LAYER>,
    key_sequence: &[TestKeyPress],
    expected_reports: &[KeyboardReport],
) {
    let reports: Vec<KeyboardReport> = run_key_sequence(keyboard, key_sequence)
        .into_iter()
        .filter_map(|report| match report {
            Report::KeyboardReport(r) => Some(r),
            other => {
                debug!("other reports {:?}", other);
                None
            }
        })
        .collect();

    for (i, (expected, report)) in expected_reports.iter().zip(reports.iter()).enumerate() {
        assert_eq!(
            expected, report,
            "on #{} reports, expected left but actually right",
            i
        );
    }
    assert_eq!(
        expected_reports.len(),
        reports.len(),
        "expected {} reports, got {:?}",
        expected_reports.len(),
        reports
    );
}

#[rustfmt::skip]
pub const fn get_keymap() -> [[[KeyAction; 14]; 5]; 2] {
    [
        layer!([
            [k!(Grave), k!(Kc1), k!(Kc2), k!(Kc3), k!(Kc4), k!(Kc5), k!(Kc6), k!(Kc7), k!(Kc8), k!(Kc9), k!(Kc0), k!(Minus), k!(Equal), k!(Backspace)],
            [k!(Tab), k!(Q), k!(W), k!(E), k!(R), k!(T), k!(Y), k!(U), k!(I), k!(O), k!(P), k!(LeftBracket), k!(RightBracket), k!(Backslash)],
            [k!(Escape), th!(A, LShift), th!(S, LGui), k!(D), k!(F), k!(G), k!(H), k!(J), k!(K), k!(L), k!(Semicolon), k!(Quote), a!(No), k!(Enter)],
            [k!(LShift), k!(Z), k!(X), k!(C), k!(V), k!(B), k!(N), k!(M), k!(Comma), k!(Dot), k!(Slash), a!(No), a!(No), k!(RShift)],
            [k!(LCtrl), k!(LGui), k!(LAlt), a!(No), a!(No), k!(Space), a!(No), a!(No), a!(No), mo!(1), k!(RAlt), a!(No), k!(RGui), k!(RCtrl)]
        ]),
        layer!([
            [k!(Grave), k!(F1), k!(F2), k!(F3), k!(F4), k!(F5), k!(F6), k!(F7), k!(F8), k!(F9), k!(F10), k!(F11), k!(F12), k!(Delete)],
            [a!(No), a!(Transparent), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No)],
            [k!(CapsLock), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No)],
            [a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), k!(Up)],
            [a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), a!(No), k!(Left), a!(No), k!(Down), k!(Right)]
        ]),
    ]
}

/// Leak a keymap so the keyboard can borrow it for the rest of the test
pub fn leak<const ROW: usize, const COL: usize, const NUM_LAYER: usize>(
    keymap: [[[KeyAction; COL]; ROW]; NUM_LAYER],
) -> &'static [[[KeyAction; COL]; ROW]; NUM_LAYER] {
    Box::leak(Box::new(keymap))
}

pub fn create_test_keyboard_with_config(config: BehaviorConfig) -> Keyboard<'static, 5, 14, 2> {
    let config = KeyboardConfig {
        behavior_config: config,
        ..Default::default()
    };
    Keyboard::new(leak(get_keymap()), config).unwrap()
}

pub fn create_test_keyboard() -> Keyboard<'static, 5, 14, 2> {
    create_test_keyboard_with_config(BehaviorConfig::default())
}
