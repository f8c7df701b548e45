use keyflux_types::action::KeyAction;

use crate::error::{ConfigError, UnresolvedKeycode};
use crate::event::KeyPos;
use crate::layer_stack::LayerStack;

/// Keymap represents the stack of layers.
///
/// The conception of Keymap is borrowed from qmk: <https://docs.qmk.fm/#/keymap>.
///
/// Keymap should be binded to the actual pcb matrix definition.
/// The resolver uses `(layer, row, col)` to retrieve the action from Keymap.
/// The table is validated once on construction and read-only afterwards.
pub struct KeyMap<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> {
    layers: &'a [[[KeyAction; COL]; ROW]; NUM_LAYER],
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> KeyMap<'a, ROW, COL, NUM_LAYER> {
    pub fn new(layers: &'a [[[KeyAction; COL]; ROW]; NUM_LAYER]) -> Result<Self, ConfigError> {
        validate(layers)?;
        Ok(Self { layers })
    }

    /// Copy a keymap given as nested slices into `storage`, checking its shape first.
    pub fn from_slices(
        layers: &[&[&[KeyAction]]],
        storage: &'a mut [[[KeyAction; COL]; ROW]; NUM_LAYER],
    ) -> Result<Self, ConfigError> {
        if layers.is_empty() {
            return Err(ConfigError::NoLayers);
        }
        if layers.len() != NUM_LAYER {
            return Err(ConfigError::LayerCount {
                layers: layers.len(),
                expected: NUM_LAYER,
            });
        }
        for (layer_idx, layer) in layers.iter().enumerate() {
            if layer.len() != ROW {
                return Err(ConfigError::RaggedLayer {
                    layer: layer_idx as u8,
                    rows: layer.len(),
                    expected: ROW,
                });
            }
            for (row_idx, row) in layer.iter().enumerate() {
                if row.len() != COL {
                    return Err(ConfigError::RaggedRow {
                        layer: layer_idx as u8,
                        row: row_idx as u8,
                        cols: row.len(),
                        expected: COL,
                    });
                }
                storage[layer_idx][row_idx].copy_from_slice(row);
            }
        }
        Self::new(storage)
    }

    pub fn contains(&self, pos: KeyPos) -> bool {
        (pos.row as usize) < ROW && (pos.col as usize) < COL
    }

    /// Fetch the action in keymap.
    ///
    /// A layer outside the table falls back to the base layer's entry.
    pub fn action_at(&self, layer: u8, pos: KeyPos) -> KeyAction {
        let (row, col) = (pos.row as usize, pos.col as usize);
        match self.layers.get(layer as usize) {
            Some(l) => l[row][col],
            None => {
                let e = UnresolvedKeycode { layer, pos };
                warn!("{:?}", e);
                self.layers[0][row][col]
            }
        }
    }

    /// Resolve a position against the active layers.
    ///
    /// Iterate from higher layer to lower layer, skipping transparent entries.
    /// Returns the layer the action was found on.
    pub fn resolve(&self, pos: KeyPos, layers: &LayerStack<NUM_LAYER>) -> (u8, KeyAction) {
        for layer in layers.active_layers() {
            let action = self.action_at(layer, pos);
            if action.is_transparent() {
                continue;
            }
            return (layer, action);
        }
        // Unreachable for a validated keymap, layer 0 has no transparent key
        (0, KeyAction::No)
    }
}

fn validate<const ROW: usize, const COL: usize, const NUM_LAYER: usize>(
    layers: &[[[KeyAction; COL]; ROW]; NUM_LAYER],
) -> Result<(), ConfigError> {
    if NUM_LAYER == 0 || ROW == 0 || COL == 0 {
        return Err(ConfigError::NoLayers);
    }
    for (row, keys) in layers[0].iter().enumerate() {
        if let Some(col) = keys.iter().position(|k| k.is_transparent()) {
            return Err(ConfigError::TransparentInBaseLayer {
                row: row as u8,
                col: col as u8,
            });
        }
    }
    for (layer, rows) in layers.iter().enumerate() {
        for (row, keys) in rows.iter().enumerate() {
            for (col, key) in keys.iter().enumerate() {
                if let Some(target) = key.layer_targets().find(|t| *t as usize >= NUM_LAYER) {
                    return Err(ConfigError::InvalidLayer {
                        layer: layer as u8,
                        pos: KeyPos::new(row as u8, col as u8),
                        target,
                    });
                }
            }
        }
    }
    Ok(())
}
