//! UI event types.
//!
//! Everything the reducer reacts to arrives as a `UiEvent`: terminal input,
//! frame ticks and results of effects the runtime executed.

use crossterm::event::Event;
use unitdc_types::{BootstrapError, Engine};

pub enum UiEvent {
    /// Animation / render cadence.
    Tick,
    /// Current terminal size, sent before every batch of events.
    Frame { width: u16, height: u16 },
    /// Raw terminal input.
    Terminal(Event),
    /// The engine loader finished.
    EngineLoaded(Result<Box<dyn Engine>, BootstrapError>),
}
