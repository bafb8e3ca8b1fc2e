use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unitdc_core::{KeyAction, UnitModifier};

use super::KeyboardState;

/// Rows plus the surrounding border.
pub fn keyboard_height(keyboard: &KeyboardState) -> u16 {
    if keyboard.visible {
        keyboard.layout.height() as u16 + 2
    } else {
        0
    }
}

/// Draws the key grid. The selected key is highlighted while `focused`;
/// the armed unit modifier is always highlighted.
pub fn render_keyboard(
    keyboard: &KeyboardState,
    focused: bool,
    armed: Option<UnitModifier>,
    frame: &mut Frame,
    area: Rect,
) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Keyboard ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = keyboard.layout.columns();
    if columns.is_empty() {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, columns.len() as u32); columns.len()];
    let cells = Layout::horizontal(constraints).split(inner);

    for (col, (keys, cell_area)) in columns.iter().zip(cells.iter()).enumerate() {
        let lines: Vec<Line> = keys
            .iter()
            .enumerate()
            .map(|(row, key)| {
                let selected = focused && keyboard.cursor == (col, row);
                let is_armed = matches!(key.action, KeyAction::Modifier(m) if Some(m) == armed);
                let style = if selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else if is_armed {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(format!(" {} ", key.label), style)).centered()
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), *cell_area);
    }
}
