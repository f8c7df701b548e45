//! Key-event action resolver for keyboard firmware.
//!
//! keyflux sits between the debounced key matrix and the HID transport. It
//! resolves every key event against a stack of keymap layers and turns it
//! into HID events: plain keys, modifiers, layer switches, tap-hold keys,
//! one shot keys, macros and user functions.
//!
//! The resolver is tick driven. [`Keyboard::process`](keyboard::Keyboard::process)
//! takes one event, [`Keyboard::tick`](keyboard::Keyboard::tick) advances timeouts
//! and macros, and the caller drains HID events after every tick. All state lives
//! in fixed capacity `heapless` containers, nothing allocates.
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

pub use keyflux_types as types;

pub mod boards;
pub mod config;
pub mod error;
pub mod event;
pub mod function;
pub mod hid;
pub mod keyboard;
pub mod keyboard_macros;
pub mod keymap;
pub mod layer_stack;
pub mod layout_macro;
pub mod tap_hold;

pub use config::KeyboardConfig;
pub use error::{ConfigError, Error, MacroUnderrun, ProtocolViolation, UnresolvedKeycode};
pub use event::{KeyEvent, KeyPos};
pub use keyboard::Keyboard;
