//! Feature slices of the TUI: each owns its state, update helpers and rendering.

pub mod input;
pub mod keyboard;
pub mod transcript;
