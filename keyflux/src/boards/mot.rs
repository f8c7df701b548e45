//! MOT: split keyboard with a 12x7 matrix and 82 keys.

use keyflux_types::action::KeyAction;
use keyflux_types::keycode::{HidKeyCode, KeyCode};

use crate::boards::BoardLayout;
use crate::error::ConfigError;
use crate::event::KeyPos;
use crate::function::Function;
use crate::keyboard_macros::MacroOperation::{self, Press, Release, Tap};
use crate::keyboard_macros::MacroSequence;
use crate::{a, func, k, lt, m, mt, osm, tg};

pub struct Mot;

impl BoardLayout<12, 7> for Mot {
    const NAME: &'static str = "MOT";

    #[rustfmt::skip]
    const KEY_POSITIONS: &'static [KeyPos] = &[
        KeyPos::new(6, 0), KeyPos::new(7, 0), KeyPos::new(8, 0), KeyPos::new(9, 0), KeyPos::new(10, 0), KeyPos::new(11, 0),
        KeyPos::new(5, 0), KeyPos::new(4, 0), KeyPos::new(3, 0), KeyPos::new(2, 0), KeyPos::new(1, 0), KeyPos::new(0, 0),
        KeyPos::new(6, 1), KeyPos::new(7, 1), KeyPos::new(8, 1), KeyPos::new(9, 1), KeyPos::new(10, 1), KeyPos::new(11, 1),
        KeyPos::new(5, 1), KeyPos::new(4, 1), KeyPos::new(3, 1), KeyPos::new(2, 1), KeyPos::new(1, 1), KeyPos::new(0, 1),
        KeyPos::new(6, 2), KeyPos::new(7, 2), KeyPos::new(8, 2), KeyPos::new(9, 2), KeyPos::new(10, 2), KeyPos::new(11, 2),
        KeyPos::new(5, 2), KeyPos::new(4, 2), KeyPos::new(3, 2), KeyPos::new(2, 2), KeyPos::new(1, 2), KeyPos::new(0, 2),
        KeyPos::new(6, 3), KeyPos::new(7, 3), KeyPos::new(8, 3), KeyPos::new(9, 3), KeyPos::new(10, 3), KeyPos::new(11, 3),
        KeyPos::new(5, 3), KeyPos::new(4, 3), KeyPos::new(3, 3), KeyPos::new(2, 3), KeyPos::new(1, 3), KeyPos::new(0, 3),
        KeyPos::new(6, 4), KeyPos::new(7, 4), KeyPos::new(8, 4), KeyPos::new(9, 4), KeyPos::new(10, 4), KeyPos::new(11, 4),
        KeyPos::new(11, 5), KeyPos::new(9, 6), KeyPos::new(6, 5), KeyPos::new(4, 6), KeyPos::new(3, 6), KeyPos::new(1, 6),
        KeyPos::new(5, 4), KeyPos::new(4, 4), KeyPos::new(3, 4), KeyPos::new(2, 4), KeyPos::new(1, 4), KeyPos::new(0, 4),
        KeyPos::new(7, 5), KeyPos::new(8, 5), KeyPos::new(9, 5), KeyPos::new(10, 5), KeyPos::new(6, 6), KeyPos::new(7, 6),
        KeyPos::new(10, 6), KeyPos::new(5, 6), KeyPos::new(2, 6), KeyPos::new(0, 5), KeyPos::new(4, 5), KeyPos::new(3, 5),
        KeyPos::new(2, 5), KeyPos::new(1, 5),
        KeyPos::new(8, 6), KeyPos::new(5, 5),
    ];
}

impl Mot {
    pub const ROW: usize = 12;
    pub const COL: usize = 7;
    pub const NUM_LAYER: usize = 4;

    /// The stock keymap in matrix order.
    pub fn keymap() -> Result<[[[KeyAction; Self::COL]; Self::ROW]; Self::NUM_LAYER], ConfigError> {
        Ok([
            Self::layer(&LAYER0)?,
            Self::layer(&LAYER1)?,
            Self::layer(&LAYER2)?,
            Self::layer(&LAYER3)?,
        ])
    }

    /// Function table of the stock keymap. Function 0 enters the bootloader.
    pub fn functions(jump_to_bootloader: fn() -> !) -> [Function; 1] {
        [Function::Terminal(jump_to_bootloader)]
    }
}

/// Macro ids
pub const JIRA_NOFORMAT: u8 = 0;
pub const JIRA_QUOTE: u8 = 1;
pub const C_COMMENT: u8 = 2;

const fn kc(key: HidKeyCode) -> KeyCode {
    KeyCode::Hid(key)
}

const SHIFT: KeyCode = kc(HidKeyCode::LShift);

/// `{noformat}` and enter
const JIRA_NOFORMAT_OPS: [MacroOperation; 15] = [
    Press(SHIFT),
    Tap(kc(HidKeyCode::LeftBracket)),
    Release(SHIFT),
    Tap(kc(HidKeyCode::N)),
    Tap(kc(HidKeyCode::O)),
    Tap(kc(HidKeyCode::F)),
    Tap(kc(HidKeyCode::O)),
    Tap(kc(HidKeyCode::R)),
    Tap(kc(HidKeyCode::M)),
    Tap(kc(HidKeyCode::A)),
    Tap(kc(HidKeyCode::T)),
    Press(SHIFT),
    Tap(kc(HidKeyCode::RightBracket)),
    Release(SHIFT),
    Tap(kc(HidKeyCode::Enter)),
];

/// `{quote}` and enter
const JIRA_QUOTE_OPS: [MacroOperation; 12] = [
    Press(SHIFT),
    Tap(kc(HidKeyCode::LeftBracket)),
    Release(SHIFT),
    Tap(kc(HidKeyCode::Q)),
    Tap(kc(HidKeyCode::U)),
    Tap(kc(HidKeyCode::O)),
    Tap(kc(HidKeyCode::T)),
    Tap(kc(HidKeyCode::E)),
    Press(SHIFT),
    Tap(kc(HidKeyCode::RightBracket)),
    Release(SHIFT),
    Tap(kc(HidKeyCode::Enter)),
];

/// `/*  */` with the cursor moved into the comment
const C_COMMENT_OPS: [MacroOperation; 13] = [
    Tap(kc(HidKeyCode::Slash)),
    Press(SHIFT),
    Tap(kc(HidKeyCode::Kc8)),
    Release(SHIFT),
    Tap(kc(HidKeyCode::Space)),
    Tap(kc(HidKeyCode::Space)),
    Press(SHIFT),
    Tap(kc(HidKeyCode::Kc8)),
    Release(SHIFT),
    Tap(kc(HidKeyCode::Slash)),
    Tap(kc(HidKeyCode::Left)),
    Tap(kc(HidKeyCode::Left)),
    Tap(kc(HidKeyCode::Left)),
];

/// Macros of the stock keymap, indexed by macro id
pub const MACROS: [MacroSequence<'static>; 3] = [
    MacroSequence::new(&JIRA_NOFORMAT_OPS).with_interval(15),
    MacroSequence::new(&JIRA_QUOTE_OPS).with_interval(15),
    MacroSequence::new(&C_COMMENT_OPS).with_interval(15),
];

#[rustfmt::skip]
pub const LAYER0: [KeyAction; 82] = [
    a!(No), a!(No), a!(No), a!(No), a!(No), a!(No),
    a!(No), a!(No), a!(No), a!(No), a!(No), a!(No),
    k!(Escape), k!(Delete), k!(KpSlash), k!(Application), k!(KpMinus), k!(KpEqual),
    k!(LeftBracket), k!(RightBracket), m!(RALT), m!(RCTRL), k!(Backslash), k!(AudioVolUp),
    k!(KpDot), k!(Backspace), k!(D), k!(R), k!(W), k!(B),
    k!(J), k!(F), k!(U), k!(P), k!(Equal), k!(AudioVolDown),
    k!(Q), k!(A), k!(S), k!(H), k!(T), k!(G),
    k!(Y), k!(N), k!(E), k!(O), k!(I), k!(Quote),
    k!(Backslash), k!(Z), k!(X), k!(M), k!(C), k!(V), a!(No), k!(Space), k!(F15),
    k!(F18), k!(F19), a!(No), k!(K), k!(L), k!(Comma), k!(Dot), k!(Slash), k!(Minus),
    mt!(Grave, RSHIFT), mt!(Escape, LCTRL), mt!(Tab, LALT), osm!(LGUI), mt!(Insert, LSHIFT), mt!(Enter, LCTRL), k!(F14),
    k!(F17), mt!(KpAsterisk, RGUI), lt!(1, Space), k!(Left), k!(Up), k!(Down), k!(Right),
    mt!(F13, RALT), k!(F16),
];

#[rustfmt::skip]
pub const LAYER1: [KeyAction; 82] = [
    a!(No), a!(No), a!(No), a!(No), a!(No), a!(No),
    a!(No), a!(No), a!(No), a!(No), a!(No), a!(No),
    k!(Kp1), k!(Kp2), k!(Kp3), k!(Kp4), k!(Kp5), k!(Kp6),
    k!(Kp7), k!(Kp8), a!(Transparent), a!(Transparent), k!(Kp9), k!(Kp0),
    k!(MediaEject), k!(Delete), k!(F11), k!(F12), a!(Transparent), a!(Transparent),
    a!(Transparent), k!(F1), k!(LeftBracket), k!(RightBracket), k!(KpPlus), k!(AudioMute),
    a!(Transparent), k!(Kc8), k!(Kc6), k!(Kc9), k!(Kc5), k!(Kc7),
    k!(Kc3), k!(Kc1), k!(Kc0), k!(Kc2), k!(Kc4), k!(Enter),
    k!(KpPlus), k!(F8), k!(F6), k!(F9), k!(F5), k!(F7), a!(No), a!(Transparent), a!(Transparent),
    a!(Transparent), func!(0), a!(No), k!(F3), k!(Semicolon), k!(F10), k!(F2), k!(F4), k!(Backslash),
    a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), k!(CapsLock),
    func!(0), a!(Transparent), a!(Transparent), k!(Home), k!(PageUp), k!(PageDown), k!(End),
    a!(Transparent), a!(Transparent),
];

#[rustfmt::skip]
pub const LAYER2: [KeyAction; 82] = [
    a!(No), a!(No), a!(No), a!(No), a!(No), a!(No),
    a!(No), a!(No), a!(No), a!(No), a!(No), a!(No),
    k!(NumLock), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent),
    a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent),
    k!(SystemPower), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent),
    a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent),
    a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent),
    a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent),
    a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(No), k!(MediaPrevTrack), k!(MediaNextTrack),
    a!(Transparent), a!(Transparent), a!(No), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent),
    a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), k!(MediaPlayPause),
    k!(Application), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent),
    a!(Transparent), a!(Transparent),
];

#[rustfmt::skip]
pub const LAYER3: [KeyAction; 82] = [
    a!(No), a!(No), a!(No), a!(No), a!(No), a!(No),
    a!(No), a!(No), a!(No), a!(No), a!(No), a!(No),
    k!(Equal), k!(Kc1), k!(Kc2), k!(Kc3), k!(Kc4), k!(Kc5),
    k!(Kc6), k!(Kc7), k!(Kc8), k!(Kc9), k!(Kc0), k!(Minus),
    k!(Tab), k!(Q), k!(W), k!(E), k!(R), k!(T),
    k!(Y), k!(U), k!(I), k!(O), k!(P), k!(Backslash),
    tg!(3), k!(A), k!(S), k!(D), k!(F), k!(G),
    k!(H), k!(J), k!(K), k!(L), k!(Semicolon), k!(Quote),
    m!(LSHIFT), k!(Z), k!(X), k!(C), k!(V), k!(B), a!(No), m!(LCTRL), m!(LALT),
    m!(RGUI), m!(RCTRL), a!(No), k!(N), k!(M), k!(Comma), k!(Dot), k!(Slash), m!(RSHIFT),
    k!(Grave), k!(Insert), k!(Left), k!(Right), k!(Backspace), k!(Delete), k!(Home),
    k!(PageUp), k!(Enter), k!(Space), k!(Up), k!(Down), k!(LeftBracket), k!(RightBracket),
    k!(End), k!(PageDown),
];
