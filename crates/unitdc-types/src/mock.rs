//! Scripted engine for tests.
//!
//! Lets front-end tests drive the submission protocol without a real
//! interpreter: each input text maps to a fixed list of events and an
//! optional failure.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::engine::{BootstrapError, Engine, EngineLoader, OutputCallback, SubmitError};
use crate::event::EngineEvent;
use crate::quantity::Quantity;

#[derive(Debug, Clone, Default)]
struct Script {
    events: Vec<EngineEvent>,
    failure: Option<String>,
}

/// An engine that replays canned responses keyed by the submitted text.
///
/// Unknown texts succeed without emitting anything.
#[derive(Default)]
pub struct ScriptedEngine {
    scripts: HashMap<String, Script>,
    output: Option<OutputCallback>,
    submissions: Arc<Mutex<Vec<String>>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `events` and succeeds when `text` is submitted.
    #[must_use]
    pub fn on(mut self, text: &str, events: Vec<EngineEvent>) -> Self {
        self.scripts.insert(
            text.to_string(),
            Script {
                events,
                failure: None,
            },
        );
        self
    }

    /// Fails with `description` when `text` is submitted.
    #[must_use]
    pub fn fail_on(self, text: &str, description: &str) -> Self {
        self.fail_after(text, Vec::new(), description)
    }

    /// Emits `events`, then fails with `description`.
    #[must_use]
    pub fn fail_after(mut self, text: &str, events: Vec<EngineEvent>, description: &str) -> Self {
        self.scripts.insert(
            text.to_string(),
            Script {
                events,
                failure: Some(description.to_string()),
            },
        );
        self
    }

    /// Shared log of every submitted text, in order.
    pub fn submissions(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.submissions)
    }
}

impl Engine for ScriptedEngine {
    fn register_output(&mut self, output: OutputCallback) {
        self.output = Some(output);
    }

    fn submit(&mut self, text: &str) -> Result<(), SubmitError> {
        if let Ok(mut log) = self.submissions.lock() {
            log.push(text.to_string());
        }
        let script = self.scripts.get(text).cloned().unwrap_or_default();
        if let Some(output) = self.output.as_mut() {
            for event in script.events {
                output(event);
            }
        }
        match script.failure {
            Some(description) => Err(SubmitError::new(description)),
            None => Ok(()),
        }
    }
}

/// Loader that resolves immediately to a scripted engine or a failure.
pub struct ScriptedLoader {
    result: Result<ScriptedEngine, BootstrapError>,
}

impl ScriptedLoader {
    pub fn ok(engine: ScriptedEngine) -> Self {
        Self { result: Ok(engine) }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(BootstrapError::new(reason)),
        }
    }
}

impl EngineLoader for ScriptedLoader {
    fn load(
        self: Box<Self>,
    ) -> futures_util::future::BoxFuture<'static, Result<Box<dyn Engine>, BootstrapError>> {
        Box::pin(async move { self.result.map(|engine| Box::new(engine) as Box<dyn Engine>) })
    }
}

/// Builds a unitless quantity whose display is `display`.
pub fn quantity(display: &str, value: f64) -> Quantity {
    Quantity::new(display, value, Vec::new())
}
