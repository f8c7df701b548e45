use core::fmt;

use keyflux_types::keycode::KeyCode;

use crate::event::KeyPos;

/// Errors found while loading a keymap, a board layout or a macro table.
///
/// Every variant is fatal to construction: nothing is built from a bad table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The keymap has no layers at all
    NoLayers,
    /// The keymap has a different number of layers than the keyboard
    LayerCount { layers: usize, expected: usize },
    /// A layer has a different number of rows than the keyboard
    RaggedLayer { layer: u8, rows: usize, expected: usize },
    /// A row has a different number of columns than the keyboard
    RaggedRow {
        layer: u8,
        row: u8,
        cols: usize,
        expected: usize,
    },
    /// The base layer must map every position to something concrete
    TransparentInBaseLayer { row: u8, col: u8 },
    /// A layer action targets a layer the keymap does not have
    InvalidLayer { layer: u8, pos: KeyPos, target: u8 },
    /// A spatial layout got a different number of keys than the board has
    SpatialKeyCount { expected: usize, actual: usize },
    /// A board maps a key outside its matrix
    PositionOutOfRange(KeyPos),
    /// A macro sequence cannot be played safely
    MalformedMacro { id: u8, fault: MacroFault },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacroFault {
    Empty,
    ReleaseWithoutPress(KeyCode),
    KeyLeftPressed(KeyCode),
    TooManyHeldKeys,
}

/// Key events the debouncer should never produce.
///
/// The offending event is dropped and the resolver keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolViolation {
    DuplicatePress(KeyPos),
    UnmatchedRelease(KeyPos),
    OutOfRange(KeyPos),
}

/// A lookup asked for a layer the keymap does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnresolvedKeycode {
    pub layer: u8,
    pub pos: KeyPos,
}

/// A macro id with no sequence behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacroUnderrun(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    Config(ConfigError),
    Protocol(ProtocolViolation),
    Unresolved(UnresolvedKeycode),
    MacroUnderrun(MacroUnderrun),
}

pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoLayers => write!(f, "keymap has no layers"),
            ConfigError::LayerCount { layers, expected } => {
                write!(f, "keymap has {} layers, expected {}", layers, expected)
            }
            ConfigError::RaggedLayer { layer, rows, expected } => {
                write!(f, "layer {} has {} rows, expected {}", layer, rows, expected)
            }
            ConfigError::RaggedRow {
                layer,
                row,
                cols,
                expected,
            } => write!(
                f,
                "layer {} row {} has {} columns, expected {}",
                layer, row, cols, expected
            ),
            ConfigError::TransparentInBaseLayer { row, col } => {
                write!(f, "transparent key in base layer at ({}, {})", row, col)
            }
            ConfigError::InvalidLayer { layer, pos, target } => write!(
                f,
                "layer {} key ({}, {}) targets missing layer {}",
                layer, pos.row, pos.col, target
            ),
            ConfigError::SpatialKeyCount { expected, actual } => {
                write!(f, "layout has {} keys, board has {}", actual, expected)
            }
            ConfigError::PositionOutOfRange(pos) => {
                write!(f, "position ({}, {}) is outside the matrix", pos.row, pos.col)
            }
            ConfigError::MalformedMacro { id, fault } => write!(f, "macro {} is malformed: {}", id, fault),
        }
    }
}

impl fmt::Display for MacroFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroFault::Empty => write!(f, "empty sequence"),
            MacroFault::ReleaseWithoutPress(k) => write!(f, "{:?} released before it was pressed", k),
            MacroFault::KeyLeftPressed(k) => write!(f, "{:?} is still pressed at the end", k),
            MacroFault::TooManyHeldKeys => write!(f, "too many keys held at once"),
        }
    }
}

impl fmt::Display for ProtocolViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolViolation::DuplicatePress(pos) => {
                write!(f, "duplicate press at ({}, {})", pos.row, pos.col)
            }
            ProtocolViolation::UnmatchedRelease(pos) => {
                write!(f, "release without press at ({}, {})", pos.row, pos.col)
            }
            ProtocolViolation::OutOfRange(pos) => {
                write!(f, "event at ({}, {}) is outside the matrix", pos.row, pos.col)
            }
        }
    }
}

impl fmt::Display for UnresolvedKeycode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no layer {} for ({}, {}), falling back to layer 0",
            self.layer, self.pos.row, self.pos.col
        )
    }
}

impl fmt::Display for MacroUnderrun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "macro {} is not defined", self.0)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => fmt::Display::fmt(e, f),
            Error::Protocol(e) => fmt::Display::fmt(e, f),
            Error::Unresolved(e) => fmt::Display::fmt(e, f),
            Error::MacroUnderrun(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl core::error::Error for ConfigError {}
impl core::error::Error for ProtocolViolation {}
impl core::error::Error for UnresolvedKeycode {}
impl core::error::Error for MacroUnderrun {}
impl core::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<ProtocolViolation> for Error {
    fn from(e: ProtocolViolation) -> Self {
        Error::Protocol(e)
    }
}

impl From<UnresolvedKeycode> for Error {
    fn from(e: UnresolvedKeycode) -> Self {
        Error::Unresolved(e)
    }
}

impl From<MacroUnderrun> for Error {
    fn from(e: MacroUnderrun) -> Self {
        Error::MacroUnderrun(e)
    }
}
