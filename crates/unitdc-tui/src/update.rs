//! TUI reducer.
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info, warn};
use unitdc_core::session::BootstrapOutcome;
use unitdc_core::{SessionError, SubmitOutcome};

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::keyboard::Direction;
use crate::state::{AppState, Focus};
use crate::{input, render};

/// Effects to run once, before the first event.
pub fn init(app: &mut AppState) -> Vec<UiEffect> {
    if app.session.begin_bootstrap() {
        vec![UiEffect::BootstrapEngine]
    } else {
        vec![]
    }
}

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.status.spinner_frame = app.status.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Frame { width, height } => {
            app.viewport = (width, height);
            let max = render::max_scroll(app);
            app.transcript.clamp(max);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::EngineLoaded(result) => {
            match app.session.complete_bootstrap(result) {
                BootstrapOutcome::Ready => info!("Engine ready"),
                BootstrapOutcome::Failed(err) => warn!(error = %err, "Engine failed to load"),
                BootstrapOutcome::Ignored => debug!("Ignored duplicate engine load"),
            }
            app.transcript.scroll_to_bottom();
            vec![]
        }
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Paste(text) if app.focus == Focus::Input && app.session.is_ready() => {
            let result = input::insert_text(&mut app.session, &text).map(|()| None);
            record(app, result);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c' | 'd') if ctrl => return vec![UiEffect::Quit],
        KeyCode::F(2) => {
            app.keyboard.visible = !app.keyboard.visible;
            if !app.keyboard.visible {
                app.focus = Focus::Input;
            }
            return vec![];
        }
        KeyCode::Tab => {
            app.toggle_focus();
            return vec![];
        }
        KeyCode::PageUp => {
            let max = render::max_scroll(app);
            app.transcript.scroll_up(page_size(app), max);
            return vec![];
        }
        KeyCode::PageDown => {
            app.transcript.scroll_down(page_size(app));
            return vec![];
        }
        _ => {}
    }

    match app.focus {
        Focus::Input => {
            if ensure_ready(app) {
                let result = input::handle_key(&mut app.session, key);
                record(app, result);
            }
        }
        Focus::Keyboard => handle_keyboard_key(app, key),
    }
    vec![]
}

fn handle_keyboard_key(app: &mut AppState, key: KeyEvent) {
    let direction = match key.code {
        KeyCode::Up => Direction::Up,
        KeyCode::Down => Direction::Down,
        KeyCode::Left => Direction::Left,
        KeyCode::Right => Direction::Right,
        KeyCode::Enter | KeyCode::Char(' ') => {
            if !ensure_ready(app) {
                return;
            }
            if let Some(selected) = app.keyboard.selected().cloned() {
                let result = app.session.press(&selected);
                record(app, result);
            }
            return;
        }
        KeyCode::Esc => {
            app.focus = Focus::Input;
            return;
        }
        _ => return,
    };
    app.keyboard.move_cursor(direction);
}

/// Session dispatch is disabled until the engine is loaded.
fn ensure_ready(app: &mut AppState) -> bool {
    let ready = app.session.is_ready();
    if !ready {
        app.status.notice = Some(SessionError::EngineNotReady.to_string());
    }
    ready
}

/// Records the result of a session action in the status line.
fn record(app: &mut AppState, result: Result<Option<SubmitOutcome>, SessionError>) {
    match result {
        Ok(outcome) => {
            app.status.notice = None;
            if outcome.is_some() {
                app.transcript.scroll_to_bottom();
            }
        }
        Err(err) => app.status.notice = Some(err.to_string()),
    }
}

fn page_size(app: &AppState) -> usize {
    let pane = render::transcript_height(app, app.viewport.1);
    usize::from(pane / 2).max(1)
}
