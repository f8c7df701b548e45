use embassy_time::Instant;

/// Physical position of a switch in the key matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPos {
    pub row: u8,
    pub col: u8,
}

impl KeyPos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// A debounced key transition.
///
/// `at` is stamped by the debouncer. Events must arrive in timestamp order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub pos: KeyPos,
    pub pressed: bool,
    pub at: Instant,
}

impl KeyEvent {
    pub const fn press(row: u8, col: u8, at: Instant) -> Self {
        Self {
            pos: KeyPos::new(row, col),
            pressed: true,
            at,
        }
    }

    pub const fn release(row: u8, col: u8, at: Instant) -> Self {
        Self {
            pos: KeyPos::new(row, col),
            pressed: false,
            at,
        }
    }
}
