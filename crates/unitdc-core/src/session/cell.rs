//! Transcript cells.

use serde::Serialize;
use unitdc_types::{EngineEvent, Quantity};

/// A transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    /// User-editable source text.
    Input { text: String },
    /// Engine results rendered together, newest first.
    Output { results: Vec<Quantity> },
    /// Informational text from the engine.
    Message { text: String },
    /// A failure description.
    Error { text: String },
}

impl Cell {
    pub fn input(text: impl Into<String>) -> Self {
        Cell::Input { text: text.into() }
    }

    pub fn blank_input() -> Self {
        Cell::Input {
            text: String::new(),
        }
    }

    pub fn output(results: Vec<Quantity>) -> Self {
        Cell::Output { results }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Cell::Message { text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Cell::Error { text: text.into() }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, Cell::Input { .. })
    }

    /// Text of input, message and error cells.
    pub fn text(&self) -> Option<&str> {
        match self {
            Cell::Input { text } | Cell::Message { text } | Cell::Error { text } => Some(text),
            Cell::Output { .. } => None,
        }
    }

    /// Converts an engine event into the cell that displays it.
    pub fn from_event(event: EngineEvent) -> Self {
        match event {
            EngineEvent::Quantity(q) => Cell::Output { results: vec![q] },
            EngineEvent::QuantityList(results) => Cell::Output { results },
            EngineEvent::Message(text) => Cell::Message { text },
        }
    }
}

/// Formats output results newest first as `[k]: display`.
///
/// The last result is labelled `[0]`, matching stack depth.
pub fn output_lines(results: &[Quantity]) -> Vec<String> {
    results
        .iter()
        .rev()
        .enumerate()
        .map(|(depth, q)| format!("[{depth}]: {}", q.display))
        .collect()
}
