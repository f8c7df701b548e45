//! Stock keyboards.
//!
//! Keymaps are written in spatial order, the way the keys sit on the board,
//! and mapped onto the electrical matrix through [`BoardLayout`].

pub mod ergodox;
pub mod mot;

use keyflux_types::action::KeyAction;

use crate::error::ConfigError;
use crate::event::KeyPos;

pub use ergodox::ErgoDox;
pub use mot::Mot;

/// The physical layout of a board.
pub trait BoardLayout<const ROW: usize, const COL: usize> {
    const NAME: &'static str;

    /// Matrix position of every physical key, in spatial order
    const KEY_POSITIONS: &'static [KeyPos];

    /// Build a matrix layer from actions in spatial order.
    ///
    /// Matrix cells without a physical key are `KeyAction::No`.
    fn layer(keys: &[KeyAction]) -> Result<[[KeyAction; COL]; ROW], ConfigError> {
        if keys.len() != Self::KEY_POSITIONS.len() {
            return Err(ConfigError::SpatialKeyCount {
                expected: Self::KEY_POSITIONS.len(),
                actual: keys.len(),
            });
        }
        let mut layer = [[KeyAction::No; COL]; ROW];
        for (pos, action) in Self::KEY_POSITIONS.iter().zip(keys) {
            let (row, col) = (pos.row as usize, pos.col as usize);
            if row >= ROW || col >= COL {
                return Err(ConfigError::PositionOutOfRange(*pos));
            }
            layer[row][col] = *action;
        }
        Ok(layer)
    }
}
