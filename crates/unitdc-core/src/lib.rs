//! Core UnitDC console library (session, keyboard, config, logging).

pub mod config;
pub mod keyboard;
pub mod logging;
pub mod session;

pub use keyboard::{Key, KeyAction, KeyboardLayout, TokenType, UiAction, UnitModifier};
pub use session::{Cell, EngineStatus, Session, SessionError, SubmitOutcome};
