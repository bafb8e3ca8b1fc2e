//! Shared types for UnitDC.
//!
//! This crate holds the data model that crosses crate boundaries:
//! - `Quantity` / `UnitPower` - one engine result and its unit powers
//! - `EngineEvent` - typed events an engine reports during a submission
//! - `Engine` / `EngineLoader` - the engine contract the console drives
//!
//! It deliberately has no knowledge of cells or transcripts; those live in
//! `unitdc-core`.

pub mod engine;
pub mod event;
#[cfg(any(test, feature = "test-support"))]
pub mod mock;
pub mod quantity;

pub use engine::{BootstrapError, Engine, EngineLoader, OutputCallback, SubmitError};
pub use event::EngineEvent;
pub use quantity::{Quantity, UnitPower, format_unit};
