use embassy_time::Instant;
use keyflux_types::modifier::ModifierCombination;

use crate::event::KeyPos;
use crate::keyboard::Keyboard;

/// State machine for one shot keys
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OneShotState<T> {
    /// First one shot key press
    Initial(T),
    /// One shot key was released before any other key, normal one shot behavior
    Single(T),
    /// Another key was pressed before one shot key was released, treat as a normal modifier/layer
    Held(T),
    /// One shot inactive
    #[default]
    None,
}

impl<T> OneShotState<T> {
    /// Get the current one shot value if any
    pub fn value(&self) -> Option<&T> {
        match self {
            OneShotState::Initial(v) | OneShotState::Single(v) | OneShotState::Held(v) => Some(v),
            OneShotState::None => None,
        }
    }
}

impl<'a, const ROW: usize, const COL: usize, const NUM_LAYER: usize> Keyboard<'a, ROW, COL, NUM_LAYER> {
    pub(crate) fn process_osm_press(&mut self, new_modifiers: ModifierCombination) {
        // Add new modifier combination to existing one shot or init if none
        self.osm_state = match self.osm_state {
            OneShotState::None => OneShotState::Initial(new_modifiers),
            OneShotState::Initial(cur_modifiers) => OneShotState::Initial(cur_modifiers | new_modifiers),
            OneShotState::Single(cur_modifiers) => OneShotState::Single(cur_modifiers | new_modifiers),
            OneShotState::Held(cur_modifiers) => {
                self.register_modifiers(new_modifiers);
                OneShotState::Held(cur_modifiers | new_modifiers)
            }
        };
        self.osm_deadline = None;
    }

    pub(crate) fn process_osm_release(&mut self, modifiers: ModifierCombination, at: Instant) {
        match self.osm_state {
            OneShotState::Initial(cur_modifiers) | OneShotState::Single(cur_modifiers) => {
                self.osm_state = OneShotState::Single(cur_modifiers);
                self.osm_deadline = Some(at + self.behavior.one_shot.timeout);
            }
            OneShotState::Held(cur_modifiers) => {
                if cur_modifiers & modifiers != modifiers {
                    return;
                }
                // Held one shot modifiers are released like normal modifiers
                self.unregister_modifiers(cur_modifiers);
                self.osm_state = OneShotState::None;
            }
            OneShotState::None => (),
        }
    }

    pub(crate) fn process_osl_press(&mut self, layer_num: u8) {
        // Deactivate old layer if any
        if self.osl_state.value().is_some() {
            self.layers.pop_one_shot();
        }

        self.osl_state = match self.osl_state {
            OneShotState::None | OneShotState::Initial(_) => OneShotState::Initial(layer_num),
            OneShotState::Single(_) => OneShotState::Single(layer_num),
            OneShotState::Held(_) => OneShotState::Held(layer_num),
        };
        self.osl_deadline = None;
        self.osl_consumer = None;

        self.layers.push_one_shot(layer_num);
    }

    pub(crate) fn process_osl_release(&mut self, layer_num: u8, at: Instant) {
        match self.osl_state {
            OneShotState::Initial(l) | OneShotState::Single(l) => {
                self.osl_state = OneShotState::Single(l);
                self.osl_deadline = Some(at + self.behavior.one_shot.timeout);
            }
            OneShotState::Held(_) => {
                debug!("One shot layer {} released as held", layer_num);
                self.layers.pop_one_shot();
                self.osl_state = OneShotState::None;
            }
            OneShotState::None => (),
        }
    }

    /// A key other than a one shot key was pressed at `pos`.
    pub(crate) fn update_one_shot(&mut self, pos: KeyPos) {
        if let OneShotState::Initial(m) = self.osm_state {
            self.register_modifiers(m);
            self.osm_state = OneShotState::Held(m);
        }
        match self.osl_state {
            OneShotState::Initial(l) => self.osl_state = OneShotState::Held(l),
            OneShotState::Single(_) if self.osl_consumer.is_none() => {
                // The layer stays until this key is released
                self.osl_consumer = Some(pos);
                self.osl_deadline = None;
            }
            _ => (),
        }
    }

    /// Take the pending one shot modifiers for a plain key press.
    pub(crate) fn take_single_osm(&mut self) -> Option<ModifierCombination> {
        match self.osm_state {
            OneShotState::Single(m) => {
                self.osm_state = OneShotState::None;
                self.osm_deadline = None;
                Some(m)
            }
            _ => None,
        }
    }

    /// Bookkeeping after the key at `pos` was released.
    pub(crate) fn finish_release(&mut self, pos: KeyPos) {
        if self.osl_consumer != Some(pos) {
            return;
        }
        self.osl_consumer = None;
        if let OneShotState::Single(l) = self.osl_state {
            debug!("One shot layer {} consumed", l);
            self.layers.pop_one_shot();
            self.osl_state = OneShotState::None;
        }
    }

    pub(crate) fn expire_one_shot(&mut self, now: Instant) {
        if let Some(deadline) = self.osm_deadline {
            if now >= deadline {
                if let OneShotState::Single(m) = self.osm_state {
                    debug!("One shot modifier {:?} timeout", m);
                    self.osm_state = OneShotState::None;
                }
                self.osm_deadline = None;
            }
        }
        if let Some(deadline) = self.osl_deadline {
            if now >= deadline {
                if let OneShotState::Single(l) = self.osl_state {
                    debug!("One shot layer {} timeout", l);
                    self.layers.pop_one_shot();
                    self.osl_state = OneShotState::None;
                }
                self.osl_deadline = None;
            }
        }
    }
}
