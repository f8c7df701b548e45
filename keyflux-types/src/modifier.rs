//! Modifier combinations.
//!
//! The bit layout matches the modifier byte of a boot keyboard report, so a
//! combination can be copied into a report without translation.

use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

use bitfield_struct::bitfield;
use serde::{Deserialize, Serialize};

use crate::keycode::HidKeyCode;

#[bitfield(u8, order = Lsb)]
#[derive(Eq, PartialEq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModifierCombination {
    #[bits(1)]
    pub left_ctrl: bool,
    #[bits(1)]
    pub left_shift: bool,
    #[bits(1)]
    pub left_alt: bool,
    #[bits(1)]
    pub left_gui: bool,
    #[bits(1)]
    pub right_ctrl: bool,
    #[bits(1)]
    pub right_shift: bool,
    #[bits(1)]
    pub right_alt: bool,
    #[bits(1)]
    pub right_gui: bool,
}

impl ModifierCombination {
    pub const LCTRL: Self = Self::new().with_left_ctrl(true);
    pub const LSHIFT: Self = Self::new().with_left_shift(true);
    pub const LALT: Self = Self::new().with_left_alt(true);
    pub const LGUI: Self = Self::new().with_left_gui(true);
    pub const RCTRL: Self = Self::new().with_right_ctrl(true);
    pub const RSHIFT: Self = Self::new().with_right_shift(true);
    pub const RALT: Self = Self::new().with_right_alt(true);
    pub const RGUI: Self = Self::new().with_right_gui(true);

    pub const fn union(self, other: Self) -> Self {
        Self::from_bits(self.into_bits() | other.into_bits())
    }

    pub const fn is_empty(self) -> bool {
        self.into_bits() == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.into_bits() & other.into_bits() == other.into_bits()
    }

    /// Modifier keycodes of this combination in report bit order.
    pub fn iter_keycodes(self) -> impl Iterator<Item = HidKeyCode> {
        const KEYS: [HidKeyCode; 8] = [
            HidKeyCode::LCtrl,
            HidKeyCode::LShift,
            HidKeyCode::LAlt,
            HidKeyCode::LGui,
            HidKeyCode::RCtrl,
            HidKeyCode::RShift,
            HidKeyCode::RAlt,
            HidKeyCode::RGui,
        ];
        let bits = self.into_bits();
        KEYS.into_iter()
            .enumerate()
            .filter(move |(i, _)| bits & (1 << i) != 0)
            .map(|(_, k)| k)
    }
}

impl BitOr for ModifierCombination {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitAnd for ModifierCombination {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.into_bits() & rhs.into_bits())
    }
}

impl Not for ModifierCombination {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::from_bits(!self.into_bits())
    }
}

impl BitAndAssign for ModifierCombination {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = *self & rhs;
    }
}

impl BitOrAssign for ModifierCombination {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}
