//! # keyflux types
//!
//! Plain data types shared by the keyflux resolver and the keymaps written
//! against it.
//!
//! ## Modules
//!
//! - [`action`] - Keymap entries, tap-hold profiles and resolved actions
//! - [`keycode`] - HID keycodes, media keys and system control keys
//! - [`modifier`] - Modifier key combinations

#![cfg_attr(not(test), no_std)]

pub mod action;
pub mod keycode;
pub mod modifier;
