//! Result events reported by an engine.

use serde::{Deserialize, Serialize};

use crate::quantity::Quantity;

/// A typed event emitted by the engine while it evaluates a submission.
///
/// Serializes as `{"kind": "...", "payload": ...}` so the wire shape matches
/// the `(kind, payload)` callback signature front-ends expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A single result.
    Quantity(Quantity),
    /// An ordered list of results (e.g. the whole stack), oldest first.
    QuantityList(Vec<Quantity>),
    /// Informational text.
    Message(String),
}

impl EngineEvent {
    /// Returns the event kind tag.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineEvent::Quantity(_) => "quantity",
            EngineEvent::QuantityList(_) => "quantity_list",
            EngineEvent::Message(_) => "message",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_tags() {
        let q = Quantity::new("1 (1)", 1.0, Vec::new());
        assert_eq!(EngineEvent::Quantity(q.clone()).kind(), "quantity");
        assert_eq!(EngineEvent::QuantityList(vec![q]).kind(), "quantity_list");
        assert_eq!(EngineEvent::Message("hi".into()).kind(), "message");
    }

    #[test]
    fn test_event_wire_shape() {
        let json = serde_json::to_value(EngineEvent::Message("hello".into())).unwrap();
        assert_eq!(json["kind"], "message");
        assert_eq!(json["payload"], "hello");
    }
}
