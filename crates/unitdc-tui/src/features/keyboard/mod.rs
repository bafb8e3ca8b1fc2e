//! On-screen calculator keyboard.

mod render;
mod state;

pub use render::{keyboard_height, render_keyboard};
pub use state::{Direction, KeyboardState};
