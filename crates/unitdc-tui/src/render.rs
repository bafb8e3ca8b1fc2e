//! Pure view functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! mutate state or return effects.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unitdc_core::EngineStatus;

use crate::keyboard::{keyboard_height, render_keyboard};
use crate::state::{AppState, Focus};
use crate::transcript::{TranscriptState, transcript_lines};

/// Height of the status line below the keyboard.
const STATUS_HEIGHT: u16 = 1;

/// Transcript horizontal margin (padding on each side).
const TRANSCRIPT_MARGIN: u16 = 1;

const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

const HINTS: &str = "Enter submit · Tab keys · F2 keyboard · Ctrl+C quit";

/// Rows left for the transcript in a terminal `total_height` rows tall.
pub fn transcript_height(app: &AppState, total_height: u16) -> u16 {
    total_height.saturating_sub(keyboard_height(&app.keyboard) + STATUS_HEIGHT)
}

/// Largest transcript scroll offset for the last known viewport.
pub fn max_scroll(app: &AppState) -> usize {
    let (width, height) = app.viewport;
    let width = width.saturating_sub(TRANSCRIPT_MARGIN * 2);
    let total = transcript_lines(
        &app.session,
        usize::from(width),
        app.focus == Focus::Input,
    )
    .len();
    TranscriptState::max_offset(total, usize::from(transcript_height(app, height)))
}

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let [transcript_area, keyboard_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(keyboard_height(&app.keyboard)),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .areas(area);

    render_transcript(app, frame, transcript_area);
    if app.keyboard.visible {
        render_keyboard(
            &app.keyboard,
            app.focus == Focus::Keyboard,
            app.session.modifier(),
            frame,
            keyboard_area,
        );
    }
    render_status_line(app, frame, status_area);
}

fn render_transcript(app: &AppState, frame: &mut Frame, area: Rect) {
    let inner = Rect {
        x: area.x + TRANSCRIPT_MARGIN.min(area.width),
        width: area.width.saturating_sub(TRANSCRIPT_MARGIN * 2),
        ..area
    };
    let height = usize::from(inner.height);
    let lines = transcript_lines(
        &app.session,
        usize::from(inner.width),
        app.focus == Focus::Input,
    );

    let first = app.transcript.first_visible(lines.len(), height);
    let visible: Vec<Line<'static>> = lines.into_iter().skip(first).take(height).collect();

    // Bottom-align: pad the top when content doesn't fill the pane.
    let mut padded = vec![Line::default(); height.saturating_sub(visible.len())];
    padded.extend(visible);

    frame.render_widget(Paragraph::new(padded), inner);
}

fn render_status_line(app: &AppState, frame: &mut Frame, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![engine_indicator(app), Span::styled(" │ ", dim)];

    spans.push(match app.focus {
        Focus::Input => Span::styled("INPUT", Style::default().fg(Color::Green)),
        Focus::Keyboard => Span::styled("KEYS", Style::default().fg(Color::Cyan)),
    });
    if let Some(modifier) = app.session.modifier() {
        spans.push(Span::styled(" │ ", dim));
        spans.push(Span::styled(
            format!("({modifier}*)"),
            Style::default().fg(Color::Yellow),
        ));
    }
    if !app.transcript.is_following() {
        spans.push(Span::styled(" │ ", dim));
        spans.push(Span::styled(
            format!("↑{}", app.transcript.offset),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(notice) = &app.status.notice {
        spans.push(Span::styled(" │ ", dim));
        spans.push(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Red),
        ));
    }

    let [left, right] =
        Layout::horizontal([Constraint::Min(1), Constraint::Length(HINTS.chars().count() as u16)])
            .areas(area);
    frame.render_widget(Paragraph::new(Line::from(spans)), left);
    frame.render_widget(Paragraph::new(Line::from(Span::styled(HINTS, dim))), right);
}

fn engine_indicator(app: &AppState) -> Span<'static> {
    match app.session.engine_status() {
        EngineStatus::Unloaded => Span::styled("○ Starting", Style::default().fg(Color::DarkGray)),
        EngineStatus::Loading => {
            let frame = SPINNER_FRAMES[app.status.spinner_frame % SPINNER_FRAMES.len()];
            Span::styled(
                format!("{frame} Loading engine"),
                Style::default().fg(Color::Yellow),
            )
        }
        EngineStatus::Ready => Span::styled(
            "● Ready",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        EngineStatus::Failed => Span::styled("✗ Engine failed", Style::default().fg(Color::Red)),
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use unitdc_types::Engine;
    use unitdc_types::mock::ScriptedEngine;

    use super::*;
    use crate::events::UiEvent;
    use crate::update;

    fn screen(app: &AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_transcript_height_accounts_for_keyboard() {
        let mut app = AppState::default();
        assert_eq!(transcript_height(&app, 30), 30 - 8 - 1);
        app.keyboard.visible = false;
        assert_eq!(transcript_height(&app, 30), 29);
    }

    #[test]
    fn test_render_ready_session() {
        let mut app = AppState::default();
        update::init(&mut app);
        let engine: Box<dyn Engine> = Box::new(ScriptedEngine::new());
        update::update(&mut app, UiEvent::EngineLoaded(Ok(engine)));

        let text = screen(&app, 80, 20);
        assert!(text.contains("In [1]:"));
        assert!(text.contains("● Ready"));
        assert!(text.contains("CLR"));
    }

    #[test]
    fn test_render_loading_without_keyboard() {
        let mut app = AppState::default();
        app.keyboard.visible = false;
        update::init(&mut app);

        let text = screen(&app, 80, 10);
        assert!(text.contains("Loading engine"));
        assert!(!text.contains("CLR"));
    }
}
