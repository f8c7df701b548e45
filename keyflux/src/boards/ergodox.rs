//! ErgoDox: split keyboard with a 14x6 matrix and 76 keys.
//!
//! Layer 0 is a custom layout, layers 1 and 2 hold numbers and function keys,
//! layer 3 is a Kinesis Advantage style layout.

use keyflux_types::action::KeyAction;

use crate::boards::BoardLayout;
use crate::error::ConfigError;
use crate::event::KeyPos;
use crate::function::Function;
use crate::{a, func, k, lt, m, mt, osm, tg};

pub struct ErgoDox;

impl BoardLayout<14, 6> for ErgoDox {
    const NAME: &'static str = "ErgoDox";

    #[rustfmt::skip]
    const KEY_POSITIONS: &'static [KeyPos] = &[
        KeyPos::new(0, 0), KeyPos::new(1, 0), KeyPos::new(2, 0), KeyPos::new(3, 0), KeyPos::new(4, 0), KeyPos::new(5, 0),
        KeyPos::new(6, 0), KeyPos::new(7, 0), KeyPos::new(8, 0), KeyPos::new(9, 0), KeyPos::new(10, 0), KeyPos::new(11, 0),
        KeyPos::new(12, 0), KeyPos::new(13, 0),
        KeyPos::new(0, 1), KeyPos::new(1, 1), KeyPos::new(2, 1), KeyPos::new(3, 1), KeyPos::new(4, 1), KeyPos::new(5, 1),
        KeyPos::new(6, 1), KeyPos::new(7, 1), KeyPos::new(8, 1), KeyPos::new(9, 1), KeyPos::new(10, 1), KeyPos::new(11, 1),
        KeyPos::new(12, 1), KeyPos::new(13, 1),
        KeyPos::new(0, 2), KeyPos::new(1, 2), KeyPos::new(2, 2), KeyPos::new(3, 2), KeyPos::new(4, 2), KeyPos::new(5, 2),
        KeyPos::new(8, 2), KeyPos::new(9, 2), KeyPos::new(10, 2), KeyPos::new(11, 2), KeyPos::new(12, 2), KeyPos::new(13, 2),
        KeyPos::new(0, 3), KeyPos::new(1, 3), KeyPos::new(2, 3), KeyPos::new(3, 3), KeyPos::new(4, 3), KeyPos::new(5, 3),
        KeyPos::new(6, 3), KeyPos::new(5, 5), KeyPos::new(6, 5), KeyPos::new(7, 5), KeyPos::new(8, 5), KeyPos::new(7, 3),
        KeyPos::new(8, 3), KeyPos::new(9, 3), KeyPos::new(10, 3), KeyPos::new(11, 3), KeyPos::new(12, 3), KeyPos::new(13, 3),
        KeyPos::new(0, 4), KeyPos::new(1, 4), KeyPos::new(2, 4), KeyPos::new(3, 4), KeyPos::new(4, 4), KeyPos::new(3, 5),
        KeyPos::new(2, 5), KeyPos::new(4, 5), KeyPos::new(9, 5), KeyPos::new(11, 5), KeyPos::new(10, 5), KeyPos::new(9, 4),
        KeyPos::new(10, 4), KeyPos::new(11, 4), KeyPos::new(12, 4), KeyPos::new(13, 4),
        KeyPos::new(1, 5), KeyPos::new(12, 5),
    ];
}

impl ErgoDox {
    pub const ROW: usize = 14;
    pub const COL: usize = 6;
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

#[rustfmt::skip]
pub const LAYER0: [KeyAction; 76] = [
    k!(Minus), k!(Kc1), k!(Kc2), a!(No), a!(No), a!(No), a!(No),
    a!(No), a!(No), a!(No), a!(No), k!(AudioVolDown), k!(AudioVolUp), k!(AudioMute),
    k!(Escape), k!(Backspace), k!(D), k!(R), k!(W), k!(B), a!(No),
    a!(No), k!(J), k!(F), k!(U), k!(P), k!(Equal), k!(KpAsterisk),
    k!(Q), k!(A), k!(S), k!(H), k!(T), k!(G),
    k!(Y), k!(N), k!(E), k!(O), k!(I), k!(Quote),
    k!(F19), k!(Z), k!(X), k!(M), k!(C), k!(V), a!(No), a!(No), a!(No),
    a!(No), a!(No), a!(No), k!(K), k!(L), k!(Comma), k!(Dot), k!(Slash), k!(Minus),
    a!(No), k!(Grave), mt!(Insert, LCTRL), mt!(Tab, LALT), osm!(LGUI), mt!(Enter, LSHIFT), lt!(2, Delete), a!(No),
    a!(No), mt!(Backslash, RSHIFT), lt!(1, Space), mt!(Left, RGUI), mt!(Up, RALT), mt!(Down, RCTRL), k!(Right), a!(No),
    k!(PrintScreen), k!(F18),
];

#[rustfmt::skip]
pub const LAYER1: [KeyAction; 76] = [
    a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(No),
    a!(No), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent),
    a!(Transparent), k!(Delete), k!(Kc7), k!(Kc4), k!(F17), k!(F16), a!(No),
    a!(No), k!(F14), k!(F15), k!(F4), k!(F8), a!(Transparent), a!(Transparent),
    a!(Transparent), k!(Kc3), k!(Kc9), k!(Kc0), k!(Space), k!(LeftBracket),
    k!(F12), k!(F7), k!(F10), k!(F9), k!(F3), a!(Transparent),
    a!(Transparent), k!(Kc6), k!(Kc1), k!(Kc5), k!(Kc2), k!(RightBracket), a!(No), a!(Transparent), a!(Transparent),
    a!(Transparent), a!(Transparent), a!(No), k!(Semicolon), k!(F2), k!(F5), k!(F11), k!(F6), a!(Transparent),
    a!(No), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), mt!(Kc8, LSHIFT), a!(Transparent), a!(Transparent),
    func!(0), a!(Transparent), a!(Transparent), mt!(Home, RGUI), mt!(PageUp, RALT), mt!(PageDown, RCTRL), k!(End), a!(No),
    a!(Transparent), a!(Transparent),
];

#[rustfmt::skip]
pub const LAYER2: [KeyAction; 76] = [
    a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(No),
    a!(No), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent),
    a!(Transparent), a!(Transparent), k!(F7), k!(F4), k!(F15), k!(F14), a!(No),
    a!(No), k!(F16), k!(F17), k!(Kc4), k!(Kc7), a!(Transparent), a!(Transparent),
    k!(Space), k!(F3), k!(F9), k!(F10), k!(F7), k!(F12),
    a!(Transparent), k!(Kc8), k!(Kc0), k!(Kc9), k!(Kc3), a!(Transparent),
    a!(Transparent), k!(F6), k!(F11), k!(F5), k!(F2), k!(PrintScreen), a!(No), a!(Transparent), a!(Transparent),
    a!(Transparent), a!(Transparent), a!(No), a!(Transparent), k!(Kc2), k!(Kc5), k!(Kc1), k!(Kc6), a!(Transparent),
    a!(No), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent),
    a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(Transparent), a!(No),
    a!(Transparent), a!(Transparent),
];

#[rustfmt::skip]
pub const LAYER3: [KeyAction; 76] = [
    k!(Equal), k!(Kc1), k!(Kc2), k!(Kc3), k!(Kc4), k!(Kc5), a!(No),
    a!(No), k!(Kc6), k!(Kc7), k!(Kc8), k!(Kc9), k!(Kc0), k!(Minus),
    k!(Tab), k!(Q), k!(W), k!(E), k!(R), k!(T), a!(No),
    a!(No), k!(Y), k!(U), k!(I), k!(O), k!(P), k!(Backslash),
    tg!(3), k!(A), k!(S), k!(D), k!(F), k!(G),
    k!(H), k!(J), k!(K), k!(L), k!(Semicolon), k!(Quote),
    m!(LSHIFT), k!(Z), k!(X), k!(C), k!(V), k!(B), a!(No), m!(LCTRL), m!(LALT),
    m!(RGUI), m!(RCTRL), a!(No), k!(N), k!(M), k!(Comma), k!(Dot), k!(Slash), m!(RSHIFT),
    a!(No), k!(Grave), k!(Insert), k!(Left), k!(Right), k!(Backspace), k!(Delete), k!(Home),
    k!(PageUp), k!(Enter), k!(Space), k!(Up), k!(Down), k!(LeftBracket), k!(RightBracket), a!(No),
    k!(End), k!(PageDown),
];
