//! Engine adapter: one-time bootstrap and per-submission event buffering.
//!
//! The engine reports results through a callback. The adapter registers a
//! callback that forwards events into a channel, and drains that channel
//! after each `submit` call returns. A submission therefore yields a bounded,
//! ordered batch of events that the session applies in one step, without
//! depending on when the callback happens to fire.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use unitdc_types::{BootstrapError, Engine, EngineEvent, SubmitError};

use super::SessionError;

/// Observable engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    /// Bootstrap has not started.
    Unloaded,
    /// Load in progress.
    Loading,
    /// Engine loaded and callback registered.
    Ready,
    /// Load failed; the session cannot accept input.
    Failed,
}

enum AdapterState {
    Unloaded,
    Loading,
    Ready {
        engine: Box<dyn Engine>,
        events: mpsc::UnboundedReceiver<EngineEvent>,
    },
    Failed,
}

/// Result of completing a bootstrap.
#[derive(Debug, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Ready,
    Failed(BootstrapError),
    /// Completion arrived while no load was in progress.
    Ignored,
}

/// Outcome of a single engine call plus the events it emitted.
pub struct EngineReply {
    pub result: Result<(), SubmitError>,
    pub events: Vec<EngineEvent>,
}

pub struct EngineAdapter {
    state: AdapterState,
}

impl Default for EngineAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineAdapter {
    pub fn new() -> Self {
        Self {
            state: AdapterState::Unloaded,
        }
    }

    pub fn status(&self) -> EngineStatus {
        match self.state {
            AdapterState::Unloaded => EngineStatus::Unloaded,
            AdapterState::Loading => EngineStatus::Loading,
            AdapterState::Ready { .. } => EngineStatus::Ready,
            AdapterState::Failed => EngineStatus::Failed,
        }
    }

    /// Marks the load as started.
    ///
    /// Returns true only on the first call; later calls return false so the
    /// caller never starts a second load.
    pub fn begin(&mut self) -> bool {
        if matches!(self.state, AdapterState::Unloaded) {
            self.state = AdapterState::Loading;
            info!("Engine bootstrap started");
            true
        } else {
            debug!(status = ?self.status(), "Engine bootstrap already requested");
            false
        }
    }

    /// Finishes the load started by `begin`.
    pub fn complete(
        &mut self,
        result: Result<Box<dyn Engine>, BootstrapError>,
    ) -> BootstrapOutcome {
        if !matches!(self.state, AdapterState::Loading) {
            warn!(status = ?self.status(), "Ignoring engine bootstrap completion");
            return BootstrapOutcome::Ignored;
        }

        match result {
            Ok(mut engine) => {
                let (tx, rx) = mpsc::unbounded_channel();
                engine.register_output(Box::new(move |event| {
                    let _ = tx.send(event);
                }));
                self.state = AdapterState::Ready { engine, events: rx };
                info!("Engine ready");
                BootstrapOutcome::Ready
            }
            Err(err) => {
                self.state = AdapterState::Failed;
                warn!(error = %err, "Engine bootstrap failed");
                BootstrapOutcome::Failed(err)
            }
        }
    }

    /// Submits `text` and collects the events emitted during the call.
    ///
    /// # Errors
    /// Returns `SessionError::EngineNotReady` if bootstrap has not succeeded.
    pub fn submit(&mut self, text: &str) -> Result<EngineReply, SessionError> {
        let AdapterState::Ready { engine, events } = &mut self.state else {
            return Err(SessionError::EngineNotReady);
        };

        let result = engine.submit(text);

        let mut batch = Vec::new();
        while let Ok(event) = events.try_recv() {
            batch.push(event);
        }

        debug!(
            ok = result.is_ok(),
            events = batch.len(),
            "Engine submission returned"
        );
        Ok(EngineReply {
            result,
            events: batch,
        })
    }
}

#[cfg(test)]
mod tests {
    use unitdc_types::EngineLoader;
    use unitdc_types::mock::{ScriptedEngine, ScriptedLoader, quantity};

    use super::*;

    async fn load(loader: ScriptedLoader) -> Result<Box<dyn Engine>, BootstrapError> {
        Box::new(loader).load().await
    }

    #[tokio::test]
    async fn test_begin_is_idempotent() {
        let mut adapter = EngineAdapter::new();
        assert!(adapter.begin());
        assert!(!adapter.begin());
        assert_eq!(adapter.status(), EngineStatus::Loading);

        let outcome = adapter.complete(load(ScriptedLoader::ok(ScriptedEngine::new())).await);
        assert_eq!(outcome, BootstrapOutcome::Ready);
        assert!(!adapter.begin());
        assert_eq!(adapter.status(), EngineStatus::Ready);
    }

    #[tokio::test]
    async fn test_complete_without_begin_is_ignored() {
        let mut adapter = EngineAdapter::new();
        let outcome = adapter.complete(load(ScriptedLoader::ok(ScriptedEngine::new())).await);
        assert_eq!(outcome, BootstrapOutcome::Ignored);
        assert_eq!(adapter.status(), EngineStatus::Unloaded);
    }

    #[tokio::test]
    async fn test_failed_bootstrap() {
        let mut adapter = EngineAdapter::new();
        adapter.begin();
        let outcome = adapter.complete(load(ScriptedLoader::failing("no wasm")).await);
        assert_eq!(
            outcome,
            BootstrapOutcome::Failed(BootstrapError::new("no wasm"))
        );
        assert_eq!(adapter.status(), EngineStatus::Failed);
        assert!(matches!(
            adapter.submit("1"),
            Err(SessionError::EngineNotReady)
        ));
    }

    #[tokio::test]
    async fn test_submit_collects_events_in_order() {
        let engine = ScriptedEngine::new().on(
            "1 2 f",
            vec![
                EngineEvent::QuantityList(vec![quantity("1", 1.0), quantity("2", 2.0)]),
                EngineEvent::Message("done".into()),
            ],
        );
        let mut adapter = EngineAdapter::new();
        adapter.begin();
        adapter.complete(load(ScriptedLoader::ok(engine)).await);

        let reply = adapter.submit("1 2 f").unwrap();
        assert!(reply.result.is_ok());
        assert_eq!(reply.events.len(), 2);
        assert_eq!(reply.events[0].kind(), "quantity_list");
        assert_eq!(reply.events[1].kind(), "message");

        // Nothing leaks into the next submission.
        let reply = adapter.submit("other").unwrap();
        assert!(reply.events.is_empty());
    }
}
