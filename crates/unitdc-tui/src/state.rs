//! Application state composition.
//!
//! ```text
//! AppState
//! ├── session: Session          (cells, composer, engine adapter)
//! ├── transcript: TranscriptState (scroll position)
//! ├── keyboard: KeyboardState   (layout, key cursor, visibility)
//! ├── focus: Focus              (where key presses go)
//! └── status: StatusState       (notice, spinner)
//! ```

use unitdc_core::Session;
use unitdc_core::config::Config;

use crate::keyboard::KeyboardState;
use crate::transcript::TranscriptState;

/// Which pane receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Typed characters edit the active input.
    #[default]
    Input,
    /// Arrow keys move the key cursor; Enter presses the selected key.
    Keyboard,
}

/// Transient status line content.
#[derive(Debug, Default)]
pub struct StatusState {
    /// Last rejected action, cleared by the next successful one.
    pub notice: Option<String>,
    pub spinner_frame: usize,
}

pub struct AppState {
    pub session: Session,
    pub transcript: TranscriptState,
    pub keyboard: KeyboardState,
    pub focus: Focus,
    pub status: StatusState,
    /// Terminal size from the last `Frame` event.
    pub viewport: (u16, u16),
    pub should_quit: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            session: Session::new(),
            transcript: TranscriptState::default(),
            keyboard: KeyboardState::new(config.show_keyboard),
            focus: Focus::Input,
            status: StatusState::default(),
            viewport: (0, 0),
            should_quit: false,
        }
    }

    /// Moves focus to the other pane. The keyboard can only take focus while shown.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input if self.keyboard.visible => Focus::Keyboard,
            Focus::Input | Focus::Keyboard => Focus::Input,
        };
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
