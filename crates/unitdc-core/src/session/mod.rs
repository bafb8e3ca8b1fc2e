//! Console session: transcript, keyboard composition and the submit protocol.
//!
//! A `Session` is the single owner of all console state:
//! - `CellStore` holds the transcript and the active-cell index
//! - `Composer` turns key presses into token text
//! - `EngineAdapter` bootstraps the engine and buffers its events
//!
//! Every mutation goes through `Session` methods, so callers (TUI reducer,
//! REPL loop, one-shot eval) never touch the store directly.

mod adapter;
mod cell;
mod composer;
mod store;

pub use adapter::{BootstrapOutcome, EngineStatus};
pub use cell::{Cell, output_lines};
pub use composer::Composer;
pub use store::CellStore;
use thiserror::Error;
use tracing::{debug, info, warn};
use unitdc_types::{BootstrapError, Engine, EngineLoader};

use self::adapter::EngineAdapter;
use crate::keyboard::{Key, KeyAction, TokenType, UiAction, UnitModifier};

/// Precondition failures returned by session operations.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No active input cell")]
    NoActiveInput,
    #[error("Engine is not ready")]
    EngineNotReady,
}

/// How a submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Engine accepted the text; `appended` cells were added for its events.
    Succeeded { appended: usize },
    /// Engine rejected the text; an error cell and a seeded input were added.
    ///
    /// `discarded` holds cells for events emitted before the failure. They
    /// are kept out of the transcript.
    Failed {
        description: String,
        discarded: Vec<Cell>,
    },
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded { .. })
    }
}

#[derive(Default)]
pub struct Session {
    store: CellStore,
    composer: Composer,
    adapter: EngineAdapter,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Cell] {
        self.store.cells()
    }

    pub fn store(&self) -> &CellStore {
        &self.store
    }

    pub fn engine_status(&self) -> EngineStatus {
        self.adapter.status()
    }

    /// True once the engine is loaded and an input cell is active.
    pub fn is_ready(&self) -> bool {
        self.adapter.status() == EngineStatus::Ready && self.store.active_index().is_some()
    }

    pub fn active_text(&self) -> Option<&str> {
        self.store.active_text()
    }

    pub fn modifier(&self) -> Option<UnitModifier> {
        self.composer.modifier()
    }

    pub fn last_token_type(&self) -> Option<TokenType> {
        self.composer.last_token()
    }

    // ========================================================================
    // Bootstrap
    // ========================================================================

    /// Starts the engine load. Returns false if a load was already started.
    pub fn begin_bootstrap(&mut self) -> bool {
        self.adapter.begin()
    }

    /// Applies the result of the load started with `begin_bootstrap`.
    pub fn complete_bootstrap(
        &mut self,
        result: Result<Box<dyn Engine>, BootstrapError>,
    ) -> BootstrapOutcome {
        let outcome = self.adapter.complete(result);
        match &outcome {
            BootstrapOutcome::Ready => self.push_input(Cell::blank_input()),
            BootstrapOutcome::Failed(err) => self.store.append(Cell::error(err.to_string())),
            BootstrapOutcome::Ignored => {}
        }
        outcome
    }

    /// Runs the whole bootstrap in place. Does nothing on a second call.
    pub async fn bootstrap(&mut self, loader: Box<dyn EngineLoader>) -> Option<BootstrapOutcome> {
        if !self.begin_bootstrap() {
            return None;
        }
        let result = loader.load().await;
        Some(self.complete_bootstrap(result))
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Replaces the active input's text.
    ///
    /// # Errors
    /// Returns `SessionError::NoActiveInput` if no input cell is active.
    pub fn update_active_text(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.store.update_active_text(text).inspect_err(|err| {
            warn!(error = %err, "Rejected text update");
        })
    }

    /// Inserts a token into the active input, applying spacing and modifier rules.
    ///
    /// # Errors
    /// Returns `SessionError::NoActiveInput` if no input cell is active.
    pub fn insert_token(&mut self, token: &str, kind: TokenType) -> Result<(), SessionError> {
        let current = self.require_active("insert_token")?.to_string();
        let fragment = self.composer.compose(&current, token, kind);
        self.store.update_active_text(current + &fragment)
    }

    /// Toggles the unit modifier for the next unit token.
    ///
    /// # Errors
    /// Returns `SessionError::NoActiveInput` if no input cell is active.
    pub fn toggle_modifier(&mut self, modifier: UnitModifier) -> Result<(), SessionError> {
        self.require_active("toggle_modifier")?;
        self.composer.toggle_modifier(modifier);
        debug!(modifier = ?self.composer.modifier(), "Unit modifier toggled");
        Ok(())
    }

    /// Performs a UI action. Returns the outcome when the action submitted.
    ///
    /// # Errors
    /// Returns `SessionError::NoActiveInput` if no input cell is active.
    pub fn apply(&mut self, action: UiAction) -> Result<Option<SubmitOutcome>, SessionError> {
        let mut text = self.require_active("ui_action")?.to_string();
        match action {
            UiAction::AppendSpace => text.push(' '),
            UiAction::AppendNewline => text.push('\n'),
            UiAction::Backspace => {
                text.pop();
            }
            UiAction::Clear => text.clear(),
            UiAction::Submit => return self.submit().map(Some),
        }
        self.store.update_active_text(text)?;
        Ok(None)
    }

    /// Dispatches a keyboard key.
    ///
    /// # Errors
    /// Returns `SessionError::NoActiveInput` if no input cell is active.
    pub fn press(&mut self, key: &Key) -> Result<Option<SubmitOutcome>, SessionError> {
        match &key.action {
            KeyAction::Token { text, kind } => self.insert_token(text, *kind).map(|()| None),
            KeyAction::Modifier(modifier) => self.toggle_modifier(*modifier).map(|()| None),
            KeyAction::Ui(action) => self.apply(*action),
        }
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Submits the active input to the engine.
    ///
    /// The active cell keeps its text and becomes read-only. On success one
    /// cell per engine event is appended, followed by a blank input. On
    /// failure an error cell is appended, followed by an input seeded with
    /// the submitted text.
    ///
    /// # Errors
    /// Returns `SessionError::NoActiveInput` if no input cell is active, or
    /// `SessionError::EngineNotReady` if the engine is not loaded.
    pub fn submit(&mut self) -> Result<SubmitOutcome, SessionError> {
        let text = self.require_active("submit")?.to_string();
        let reply = self.adapter.submit(&text)?;

        match reply.result {
            Ok(()) => {
                let appended = reply.events.len();
                for event in reply.events {
                    self.store.append(Cell::from_event(event));
                }
                self.push_input(Cell::blank_input());
                info!(appended, "Submission succeeded");
                Ok(SubmitOutcome::Succeeded { appended })
            }
            Err(err) => {
                if !reply.events.is_empty() {
                    debug!(
                        discarded = reply.events.len(),
                        "Dropping events from failed submission"
                    );
                }
                let discarded = reply.events.into_iter().map(Cell::from_event).collect();
                let description = err.description().to_string();
                self.store.append(Cell::error(description.clone()));
                self.push_input(Cell::input(text));
                info!(error = %description, "Submission failed");
                Ok(SubmitOutcome::Failed {
                    description,
                    discarded,
                })
            }
        }
    }

    fn push_input(&mut self, cell: Cell) {
        self.store.append(cell);
        self.composer.reset_tracking();
    }

    fn require_active(&self, operation: &'static str) -> Result<&str, SessionError> {
        self.store.active_text().ok_or_else(|| {
            warn!(operation, "No active input cell");
            SessionError::NoActiveInput
        })
    }
}

#[cfg(test)]
mod tests {
    use unitdc_types::mock::{ScriptedEngine, ScriptedLoader, quantity};
    use unitdc_types::{EngineEvent, Quantity};

    use super::*;
    use crate::keyboard::KeyboardLayout;

    async fn ready_session(engine: ScriptedEngine) -> Session {
        let mut session = Session::new();
        let outcome = session.bootstrap(Box::new(ScriptedLoader::ok(engine))).await;
        assert_eq!(outcome, Some(BootstrapOutcome::Ready));
        session
    }

    fn assert_last_is_active_input(session: &Session) {
        let cells = session.cells();
        assert!(cells.last().is_some_and(Cell::is_input));
        assert_eq!(session.store().active_index(), Some(cells.len() - 1));
    }

    #[tokio::test]
    async fn test_bootstrap_appends_blank_input() {
        let session = ready_session(ScriptedEngine::new()).await;
        assert_eq!(session.cells(), &[Cell::blank_input()]);
        assert!(session.is_ready());
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let mut session = ready_session(ScriptedEngine::new()).await;
        let second = session
            .bootstrap(Box::new(ScriptedLoader::ok(ScriptedEngine::new())))
            .await;
        assert_eq!(second, None);
        assert_eq!(session.cells().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_bootstrap_leaves_no_input() {
        let mut session = Session::new();
        let outcome = session
            .bootstrap(Box::new(ScriptedLoader::failing("missing module")))
            .await;
        assert!(matches!(outcome, Some(BootstrapOutcome::Failed(_))));
        assert_eq!(
            session.cells(),
            &[Cell::error("Failed to load engine: missing module")]
        );
        assert_eq!(session.engine_status(), EngineStatus::Failed);
        assert!(!session.is_ready());
        assert_eq!(session.submit(), Err(SessionError::NoActiveInput));
    }

    #[test]
    fn test_actions_before_bootstrap_are_rejected() {
        let mut session = Session::new();

        assert_eq!(
            session.insert_token("1", TokenType::LiteralNum),
            Err(SessionError::NoActiveInput)
        );
        assert_eq!(
            session.toggle_modifier(UnitModifier::Kilo),
            Err(SessionError::NoActiveInput)
        );
        assert_eq!(
            session.apply(UiAction::Clear),
            Err(SessionError::NoActiveInput)
        );
        assert_eq!(
            session.update_active_text("x"),
            Err(SessionError::NoActiveInput)
        );
        assert_eq!(session.submit(), Err(SessionError::NoActiveInput));
        assert!(session.cells().is_empty());
        assert_eq!(session.modifier(), None);
    }

    #[tokio::test]
    async fn test_successful_submission_seeds_blank_input() {
        let engine =
            ScriptedEngine::new().on("1 2 +", vec![EngineEvent::Quantity(quantity("3", 3.0))]);
        let mut session = ready_session(engine).await;
        session.update_active_text("1 2 +").unwrap();

        let outcome = session.submit().unwrap();
        assert_eq!(outcome, SubmitOutcome::Succeeded { appended: 1 });
        assert_eq!(
            session.cells(),
            &[
                Cell::input("1 2 +"),
                Cell::output(vec![quantity("3", 3.0)]),
                Cell::blank_input(),
            ]
        );
        assert_last_is_active_input(&session);
    }

    #[tokio::test]
    async fn test_success_without_events_appends_only_input() {
        let mut session = ready_session(ScriptedEngine::new()).await;
        session.update_active_text("1 >x").unwrap();
        let outcome = session.submit().unwrap();
        assert_eq!(outcome, SubmitOutcome::Succeeded { appended: 0 });
        assert_eq!(session.cells(), &[Cell::input("1 >x"), Cell::blank_input()]);
    }

    #[tokio::test]
    async fn test_failed_submission_preserves_text() {
        let engine = ScriptedEngine::new().fail_on("1 +", "Stack underflow");
        let mut session = ready_session(engine).await;
        session.update_active_text("1 +").unwrap();
        let before = session.cells().len();

        let outcome = session.submit().unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                description: "Stack underflow".into(),
                discarded: Vec::new(),
            }
        );
        assert_eq!(session.cells().len(), before + 2);
        assert_eq!(
            &session.cells()[before..],
            &[Cell::error("Stack underflow"), Cell::input("1 +")]
        );
        assert_eq!(session.active_text(), Some("1 +"));
    }

    #[tokio::test]
    async fn test_failed_submission_drops_partial_events() {
        let engine = ScriptedEngine::new().fail_after(
            "1 p (m) (g)",
            vec![EngineEvent::Quantity(quantity("1", 1.0))],
            "Incompatible units",
        );
        let mut session = ready_session(engine).await;
        session.update_active_text("1 p (m) (g)").unwrap();
        let outcome = session.submit().unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                description: "Incompatible units".into(),
                discarded: vec![Cell::output(vec![quantity("1", 1.0)])],
            }
        );
        assert_eq!(
            session.cells(),
            &[
                Cell::input("1 p (m) (g)"),
                Cell::error("Incompatible units"),
                Cell::input("1 p (m) (g)"),
            ]
        );
    }

    #[tokio::test]
    async fn test_engine_events_keep_order() {
        let a: Vec<Quantity> = vec![quantity("1", 1.0), quantity("2", 2.0)];
        let engine = ScriptedEngine::new().on(
            "1 2 f",
            vec![
                EngineEvent::QuantityList(a.clone()),
                EngineEvent::Message("B".into()),
            ],
        );
        let mut session = ready_session(engine).await;
        session.update_active_text("1 2 f").unwrap();
        session.submit().unwrap();

        assert_eq!(
            &session.cells()[1..],
            &[Cell::output(a), Cell::message("B"), Cell::blank_input()]
        );
    }

    #[tokio::test]
    async fn test_submitted_cell_is_read_only() {
        let mut session = ready_session(ScriptedEngine::new()).await;
        session.update_active_text("first").unwrap();
        session.submit().unwrap();
        session.update_active_text("second").unwrap();

        assert_eq!(session.cells()[0], Cell::input("first"));
        assert_eq!(session.cells()[1], Cell::input("second"));
    }

    #[tokio::test]
    async fn test_transcript_invariants_over_sequence() {
        let engine = ScriptedEngine::new()
            .on("a", vec![EngineEvent::Message("m".into())])
            .fail_on("b", "bad");
        let mut session = ready_session(engine).await;

        for text in ["a", "b", "c", "b", "a"] {
            let before = session.cells().len();
            session.update_active_text(text).unwrap();
            let outcome = session.submit().unwrap();
            let grown = session.cells().len() - before;
            if outcome.is_success() {
                assert!(grown >= 1);
            } else {
                assert_eq!(grown, 2);
            }
            assert_last_is_active_input(&session);
        }
    }

    #[tokio::test]
    async fn test_token_separation() {
        let mut session = ready_session(ScriptedEngine::new()).await;
        session.insert_token("3", TokenType::LiteralNum).unwrap();
        session.insert_token("+", TokenType::Operator).unwrap();
        assert_eq!(session.active_text(), Some("3 +"));
        session.insert_token("4", TokenType::LiteralNum).unwrap();
        assert_eq!(session.active_text(), Some("3 + 4"));
    }

    #[tokio::test]
    async fn test_unit_wrapping_with_modifier() {
        let mut session = ready_session(ScriptedEngine::new()).await;
        session.toggle_modifier(UnitModifier::Kilo).unwrap();
        session.insert_token("m", TokenType::Unit).unwrap();
        assert_eq!(session.active_text(), Some("(km)"));
        assert_eq!(session.modifier(), None);

        session.insert_token("m", TokenType::Unit).unwrap();
        assert_eq!(session.active_text(), Some("(km)(m)"));
    }

    #[tokio::test]
    async fn test_backspace_on_empty_is_noop() {
        let mut session = ready_session(ScriptedEngine::new()).await;
        assert_eq!(session.apply(UiAction::Backspace), Ok(None));
        assert_eq!(session.active_text(), Some(""));
        assert_eq!(session.cells().len(), 1);
    }

    #[tokio::test]
    async fn test_ui_actions_edit_active_text() {
        let mut session = ready_session(ScriptedEngine::new()).await;
        session.insert_token("12", TokenType::LiteralNum).unwrap();
        session.apply(UiAction::AppendSpace).unwrap();
        session.apply(UiAction::AppendNewline).unwrap();
        assert_eq!(session.active_text(), Some("12 \n"));
        session.apply(UiAction::Backspace).unwrap();
        assert_eq!(session.active_text(), Some("12 "));
        session.apply(UiAction::Clear).unwrap();
        assert_eq!(session.active_text(), Some(""));
    }

    #[tokio::test]
    async fn test_tracking_resets_for_new_input() {
        let mut session = ready_session(ScriptedEngine::new()).await;
        session.insert_token("1", TokenType::LiteralNum).unwrap();
        session.submit().unwrap();
        assert_eq!(session.last_token_type(), None);
    }

    #[tokio::test]
    async fn test_press_keys_from_layout() {
        let engine = ScriptedEngine::new().on(
            "2 (km) p",
            vec![EngineEvent::Quantity(quantity("2 (km)", 2000.0))],
        );
        let submissions = engine.submissions();
        let mut session = ready_session(engine).await;
        let layout = KeyboardLayout::standard();

        let find = |action: KeyAction| {
            let (c, r) = layout.position_of(&action).unwrap();
            layout.key(c, r).unwrap().clone()
        };

        let token = |text: &str, kind| KeyAction::Token {
            text: text.into(),
            kind,
        };

        for action in [
            token("2", TokenType::LiteralNum),
            KeyAction::Modifier(UnitModifier::Kilo),
            token("m", TokenType::Unit),
            token("p", TokenType::Operator),
        ] {
            assert_eq!(session.press(&find(action)), Ok(None));
        }
        let outcome = session
            .press(&find(KeyAction::Ui(UiAction::Submit)))
            .unwrap();

        assert_eq!(outcome, Some(SubmitOutcome::Succeeded { appended: 1 }));
        assert_eq!(submissions.lock().unwrap().as_slice(), &["2 (km) p".to_string()]);
    }
}
