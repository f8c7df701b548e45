use heapless::Vec;

use crate::event::KeyPos;

/// Maximum number of simultaneous layer activations.
pub const MAX_LAYER_RECORDS: usize = 16;

/// What keeps a layer active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerOwner {
    /// Held by the key at this position
    Momentary(KeyPos),
    /// Latched until toggled or deactivated
    Toggle,
    /// Waiting for the next key press
    OneShot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LayerRecord {
    pub layer: u8,
    pub owner: LayerOwner,
}

/// Active layers and the activations that produced them.
///
/// Layer 0 is the base layer. It is always active and never stored. Lookup
/// priority follows the layer index, the order of records only matters for
/// removing the right activation.
#[derive(Clone, Debug, Default)]
pub struct LayerStack<const NUM_LAYER: usize> {
    records: Vec<LayerRecord, MAX_LAYER_RECORDS>,
}

impl<const NUM_LAYER: usize> LayerStack<NUM_LAYER> {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    fn push(&mut self, layer: u8, owner: LayerOwner) -> bool {
        if layer as usize >= NUM_LAYER {
            warn!(
                "Not a valid layer {}, keyboard supports only {} layers",
                layer, NUM_LAYER
            );
            return false;
        }
        if layer == 0 {
            return true;
        }
        if self.records.push(LayerRecord { layer, owner }).is_err() {
            warn!("Layer stack is full, dropping activation of layer {}", layer);
            return false;
        }
        true
    }

    /// Latch a layer on. Activating a latched layer again does nothing.
    pub fn activate(&mut self, layer: u8) -> bool {
        if self.records.iter().any(|r| r.layer == layer && r.owner == LayerOwner::Toggle) {
            return true;
        }
        self.push(layer, LayerOwner::Toggle)
    }

    /// Turn a layer off regardless of what activated it.
    pub fn deactivate(&mut self, layer: u8) -> bool {
        if layer as usize >= NUM_LAYER {
            warn!(
                "Not a valid layer {}, keyboard supports only {} layers",
                layer, NUM_LAYER
            );
            return false;
        }
        let before = self.records.len();
        self.records.retain(|r| r.layer != layer);
        before != self.records.len()
    }

    /// Flip the latch of a layer. Momentary activations of it are not affected.
    pub fn toggle(&mut self, layer: u8) -> bool {
        if let Some(i) = self
            .records
            .iter()
            .position(|r| r.layer == layer && r.owner == LayerOwner::Toggle)
        {
            self.records.remove(i);
            true
        } else {
            self.push(layer, LayerOwner::Toggle)
        }
    }

    /// Activate a layer for as long as the key at `pos` is held.
    pub fn push_momentary(&mut self, layer: u8, pos: KeyPos) -> bool {
        self.push(layer, LayerOwner::Momentary(pos))
    }

    /// Remove the activation owned by the key at `pos`, returning its layer.
    pub fn pop_momentary(&mut self, pos: KeyPos) -> Option<u8> {
        let i = self
            .records
            .iter()
            .rposition(|r| r.owner == LayerOwner::Momentary(pos))?;
        Some(self.records.remove(i).layer)
    }

    pub fn push_one_shot(&mut self, layer: u8) -> bool {
        self.push(layer, LayerOwner::OneShot)
    }

    pub fn pop_one_shot(&mut self) -> Option<u8> {
        let i = self.records.iter().rposition(|r| r.owner == LayerOwner::OneShot)?;
        Some(self.records.remove(i).layer)
    }

    pub fn is_active(&self, layer: u8) -> bool {
        layer == 0 || self.records.iter().any(|r| r.layer == layer)
    }

    /// Highest active layer.
    pub fn top(&self) -> u8 {
        self.records.iter().map(|r| r.layer).max().unwrap_or(0)
    }

    /// Active layers from the highest index down to layer 0.
    pub fn active_layers(&self) -> impl Iterator<Item = u8> + '_ {
        (0..NUM_LAYER as u8).rev().filter(move |l| self.is_active(*l))
    }

    pub fn records(&self) -> &[LayerRecord] {
        &self.records
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
