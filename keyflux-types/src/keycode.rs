//! Keycodes emitted by the resolver.
//!
//! [`HidKeyCode`] covers the keyboard usage page. Media and power usages are
//! listed there as well so that keymaps can name them uniformly; they are
//! moved to the consumer or generic desktop page by [`KeyCode::from`].

use serde::{Deserialize, Serialize};
use strum::FromRepr;

use crate::modifier::ModifierCombination;

/// Usages of the HID keyboard page.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, FromRepr)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidKeyCode {
    // Reserved and error codes
    No = 0x00,
    ErrorRollover = 0x01,
    PostFail = 0x02,
    ErrorUndefined = 0x03,
    // Letters
    A = 0x04,
    B = 0x05,
    C = 0x06,
    D = 0x07,
    E = 0x08,
    F = 0x09,
    G = 0x0A,
    H = 0x0B,
    I = 0x0C,
    J = 0x0D,
    K = 0x0E,
    L = 0x0F,
    M = 0x10,
    N = 0x11,
    O = 0x12,
    P = 0x13,
    Q = 0x14,
    R = 0x15,
    S = 0x16,
    T = 0x17,
    U = 0x18,
    V = 0x19,
    W = 0x1A,
    X = 0x1B,
    Y = 0x1C,
    Z = 0x1D,
    // Digit row
    Kc1 = 0x1E,
    Kc2 = 0x1F,
    Kc3 = 0x20,
    Kc4 = 0x21,
    Kc5 = 0x22,
    Kc6 = 0x23,
    Kc7 = 0x24,
    Kc8 = 0x25,
    Kc9 = 0x26,
    Kc0 = 0x27,
    // Control and punctuation
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equal = 0x2E,
    LeftBracket = 0x2F,
    RightBracket = 0x30,
    Backslash = 0x31,
    NonusHash = 0x32,
    Semicolon = 0x33,
    Quote = 0x34,
    Grave = 0x35,
    Comma = 0x36,
    Dot = 0x37,
    Slash = 0x38,
    // Locks and function keys
    CapsLock = 0x39,
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,
    // Navigation cluster
    PrintScreen = 0x46,
    ScrollLock = 0x47,
    Pause = 0x48,
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    Right = 0x4F,
    Left = 0x50,
    Down = 0x51,
    Up = 0x52,
    // Keypad
    NumLock = 0x53,
    KpSlash = 0x54,
    KpAsterisk = 0x55,
    KpMinus = 0x56,
    KpPlus = 0x57,
    KpEnter = 0x58,
    Kp1 = 0x59,
    Kp2 = 0x5A,
    Kp3 = 0x5B,
    Kp4 = 0x5C,
    Kp5 = 0x5D,
    Kp6 = 0x5E,
    Kp7 = 0x5F,
    Kp8 = 0x60,
    Kp9 = 0x61,
    Kp0 = 0x62,
    KpDot = 0x63,
    // Extended keyboard page
    NonusBackslash = 0x64,
    Application = 0x65,
    KbPower = 0x66,
    KpEqual = 0x67,
    F13 = 0x68,
    F14 = 0x69,
    F15 = 0x6A,
    F16 = 0x6B,
    F17 = 0x6C,
    F18 = 0x6D,
    F19 = 0x6E,
    F20 = 0x6F,
    F21 = 0x70,
    F22 = 0x71,
    F23 = 0x72,
    F24 = 0x73,
    // Editing and application keys
    Execute = 0x74,
    Help = 0x75,
    Menu = 0x76,
    Select = 0x77,
    Stop = 0x78,
    Again = 0x79,
    Undo = 0x7A,
    Cut = 0x7B,
    Copy = 0x7C,
    Paste = 0x7D,
    Find = 0x7E,
    KbMute = 0x7F,
    KbVolumeUp = 0x80,
    KbVolumeDown = 0x81,
    LockingCapsLock = 0x82,
    LockingNumLock = 0x83,
    LockingScrollLock = 0x84,
    KpComma = 0x85,
    KpEqualAs400 = 0x86,
    // International and language keys
    International1 = 0x87,
    International2 = 0x88,
    International3 = 0x89,
    International4 = 0x8A,
    International5 = 0x8B,
    International6 = 0x8C,
    International7 = 0x8D,
    International8 = 0x8E,
    International9 = 0x8F,
    Language1 = 0x90,
    Language2 = 0x91,
    Language3 = 0x92,
    Language4 = 0x93,
    Language5 = 0x94,
    Language6 = 0x95,
    Language7 = 0x96,
    Language8 = 0x97,
    Language9 = 0x98,
    // Legacy system keys
    AlternateErase = 0x99,
    SystemRequest = 0x9A,
    Cancel = 0x9B,
    Clear = 0x9C,
    Prior = 0x9D,
    Return = 0x9E,
    Separator = 0x9F,
    Out = 0xA0,
    Oper = 0xA1,
    ClearAgain = 0xA2,
    Crsel = 0xA3,
    Exsel = 0xA4,
    // System and media usages, remapped to their own pages on output
    SystemPower = 0xA5,
    SystemSleep = 0xA6,
    SystemWake = 0xA7,
    AudioMute = 0xA8,
    AudioVolUp = 0xA9,
    AudioVolDown = 0xAA,
    MediaNextTrack = 0xAB,
    MediaPrevTrack = 0xAC,
    MediaStop = 0xAD,
    MediaPlayPause = 0xAE,
    MediaSelect = 0xAF,
    MediaEject = 0xB0,
    Mail = 0xB1,
    Calculator = 0xB2,
    MyComputer = 0xB3,
    WwwSearch = 0xB4,
    WwwHome = 0xB5,
    WwwBack = 0xB6,
    WwwForward = 0xB7,
    WwwStop = 0xB8,
    WwwRefresh = 0xB9,
    WwwFavorites = 0xBA,
    MediaFastForward = 0xBB,
    MediaRewind = 0xBC,
    BrightnessUp = 0xBD,
    BrightnessDown = 0xBE,
    ControlPanel = 0xBF,
    Assistant = 0xC0,
    MissionControl = 0xC1,
    Launchpad = 0xC2,
    // Modifiers
    LCtrl = 0xE0,
    LShift = 0xE1,
    LAlt = 0xE2,
    LGui = 0xE3,
    RCtrl = 0xE4,
    RShift = 0xE5,
    RAlt = 0xE6,
    RGui = 0xE7,
}

impl HidKeyCode {
    pub fn is_modifier(self) -> bool {
        HidKeyCode::LCtrl <= self && self <= HidKeyCode::RGui
    }

    /// The modifier bit of a modifier key, empty for every other key.
    pub fn to_hid_modifiers(self) -> ModifierCombination {
        match self {
            HidKeyCode::LCtrl => ModifierCombination::LCTRL,
            HidKeyCode::LShift => ModifierCombination::LSHIFT,
            HidKeyCode::LAlt => ModifierCombination::LALT,
            HidKeyCode::LGui => ModifierCombination::LGUI,
            HidKeyCode::RCtrl => ModifierCombination::RCTRL,
            HidKeyCode::RShift => ModifierCombination::RSHIFT,
            HidKeyCode::RAlt => ModifierCombination::RALT,
            HidKeyCode::RGui => ModifierCombination::RGUI,
            _ => ModifierCombination::new(),
        }
    }

    pub const fn process_as_consumer(self) -> Option<ConsumerKey> {
        match self {
            HidKeyCode::AudioMute => Some(ConsumerKey::Mute),
            HidKeyCode::AudioVolUp => Some(ConsumerKey::VolumeIncrement),
            HidKeyCode::AudioVolDown => Some(ConsumerKey::VolumeDecrement),
            HidKeyCode::MediaNextTrack => Some(ConsumerKey::NextTrack),
            HidKeyCode::MediaPrevTrack => Some(ConsumerKey::PrevTrack),
            HidKeyCode::MediaStop => Some(ConsumerKey::StopPlay),
            HidKeyCode::MediaPlayPause => Some(ConsumerKey::PlayPause),
            HidKeyCode::MediaSelect => Some(ConsumerKey::Record),
            HidKeyCode::MediaEject => Some(ConsumerKey::Eject),
            HidKeyCode::Mail => Some(ConsumerKey::Email),
            HidKeyCode::Calculator => Some(ConsumerKey::Calculator),
            HidKeyCode::MyComputer => Some(ConsumerKey::LocalBrowser),
            HidKeyCode::WwwSearch => Some(ConsumerKey::Search),
            HidKeyCode::WwwHome => Some(ConsumerKey::Home),
            HidKeyCode::WwwBack => Some(ConsumerKey::Back),
            HidKeyCode::WwwForward => Some(ConsumerKey::Forward),
            HidKeyCode::WwwStop => Some(ConsumerKey::Stop),
            HidKeyCode::WwwRefresh => Some(ConsumerKey::Refresh),
            HidKeyCode::WwwFavorites => Some(ConsumerKey::Bookmarks),
            HidKeyCode::MediaFastForward => Some(ConsumerKey::FastForward),
            HidKeyCode::MediaRewind => Some(ConsumerKey::Rewind),
            HidKeyCode::BrightnessUp => Some(ConsumerKey::BrightnessUp),
            HidKeyCode::BrightnessDown => Some(ConsumerKey::BrightnessDown),
            _ => None,
        }
    }

    pub const fn process_as_system_control(self) -> Option<SystemControlKey> {
        match self {
            HidKeyCode::SystemPower => Some(SystemControlKey::PowerDown),
            HidKeyCode::SystemSleep => Some(SystemControlKey::Sleep),
            HidKeyCode::SystemWake => Some(SystemControlKey::WakeUp),
            _ => None,
        }
    }
}

impl From<u8> for HidKeyCode {
    fn from(value: u8) -> Self {
        Self::from_repr(value).unwrap_or(HidKeyCode::No)
    }
}

/// A keycode on one of the three HID pages a keyboard reports on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyCode {
    Hid(HidKeyCode),
    Consumer(ConsumerKey),
    SystemControl(SystemControlKey),
}

impl KeyCode {
    pub fn is_modifier(self) -> bool {
        matches!(self, KeyCode::Hid(k) if k.is_modifier())
    }

    pub fn is_no(self) -> bool {
        matches!(self, KeyCode::Hid(HidKeyCode::No))
    }

    /// Media and power usages of the keyboard page are moved to their own page.
    pub const fn from_hid(key: HidKeyCode) -> Self {
        if let Some(consumer) = key.process_as_consumer() {
            KeyCode::Consumer(consumer)
        } else if let Some(system) = key.process_as_system_control() {
            KeyCode::SystemControl(system)
        } else {
            KeyCode::Hid(key)
        }
    }
}

impl From<HidKeyCode> for KeyCode {
    fn from(key: HidKeyCode) -> Self {
        KeyCode::from_hid(key)
    }
}

/// Keys in consumer page
/// Ref: <https://www.usb.org/sites/default/files/documents/hut1_12v2.pdf#page=75>
#[repr(u16)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsumerKey {
    No = 0x00,
    BrightnessUp = 0x6F,
    BrightnessDown = 0x70,
    Record = 0xB2,
    FastForward = 0xB3,
    Rewind = 0xB4,
    NextTrack = 0xB5,
    PrevTrack = 0xB6,
    StopPlay = 0xB7,
    Eject = 0xB8,
    PlayPause = 0xCD,
    Mute = 0xE2,
    VolumeIncrement = 0xE9,
    VolumeDecrement = 0xEA,
    Email = 0x18A,
    Calculator = 0x192,
    LocalBrowser = 0x194,
    Search = 0x221,
    Home = 0x223,
    Back = 0x224,
    Forward = 0x225,
    Stop = 0x226,
    Refresh = 0x227,
    Bookmarks = 0x22A,
}

/// Keys in `Generic Desktop Page`, generally used for system control
/// Ref: <https://www.usb.org/sites/default/files/documents/hut1_12v2.pdf#page=26>
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SystemControlKey {
    No = 0x00,
    PowerDown = 0x81,
    Sleep = 0x82,
    WakeUp = 0x83,
}
