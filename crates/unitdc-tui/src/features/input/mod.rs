//! Direct text entry into the active input cell.
//!
//! Typed characters bypass the token composer: they replace the active text
//! through `Session::update_active_text`, like editing a text box.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unitdc_core::{Session, SessionError, SubmitOutcome, UiAction};

/// Applies a key press while the input has focus.
///
/// Returns `Ok(None)` for keys that are not editing keys.
///
/// # Errors
/// Propagates `SessionError` when no input cell is active.
pub fn handle_key(
    session: &mut Session,
    key: KeyEvent,
) -> Result<Option<SubmitOutcome>, SessionError> {
    match key.code {
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            session.apply(UiAction::AppendNewline)
        }
        KeyCode::Enter => session.apply(UiAction::Submit),
        KeyCode::Backspace => session.apply(UiAction::Backspace),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            insert_text(session, ch.encode_utf8(&mut [0; 4]))?;
            Ok(None)
        }
        _ => Ok(None),
    }
}

/// Appends `text` to the active input. Carriage returns become newlines.
///
/// # Errors
/// Returns `SessionError::NoActiveInput` if no input cell is active.
pub fn insert_text(session: &mut Session, text: &str) -> Result<(), SessionError> {
    let Some(current) = session.active_text() else {
        return Err(SessionError::NoActiveInput);
    };
    let mut updated = current.to_string();
    updated.push_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
    session.update_active_text(updated)
}
