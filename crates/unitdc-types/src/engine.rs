//! The engine contract.
//!
//! A front-end drives an engine in three steps:
//! 1. `EngineLoader::load` - asynchronous, called exactly once, may fail
//! 2. `Engine::register_output` - called exactly once, before any submit
//! 3. `Engine::submit` - synchronous; events go to the registered callback
//!    before the call returns

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::event::EngineEvent;

/// Callback receiving engine events in emission order.
pub type OutputCallback = Box<dyn FnMut(EngineEvent) + Send>;

/// A loaded calculation engine.
pub trait Engine: Send {
    /// Installs the callback that receives result events.
    fn register_output(&mut self, output: OutputCallback);

    /// Evaluates `text`.
    ///
    /// May invoke the output callback any number of times before returning.
    ///
    /// # Errors
    /// Returns a `SubmitError` describing why `text` could not be evaluated.
    fn submit(&mut self, text: &str) -> Result<(), SubmitError>;
}

/// Produces an engine asynchronously.
pub trait EngineLoader: Send {
    /// Loads the engine. Consumes the loader so it can only run once.
    fn load(self: Box<Self>) -> BoxFuture<'static, Result<Box<dyn Engine>, BootstrapError>>;
}

/// The engine rejected a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{description}")]
pub struct SubmitError {
    description: String,
}

impl SubmitError {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }

    /// Human-readable failure description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// The engine could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to load engine: {reason}")]
pub struct BootstrapError {
    reason: String,
}

impl BootstrapError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}
