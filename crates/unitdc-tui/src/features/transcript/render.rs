use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;
use unitdc_core::Session;
use unitdc_core::session::{Cell, output_lines};

use super::wrap_line;

const CURSOR: &str = "▏";
const OUTPUT_INDENT: &str = "  ";

/// Renders every cell of the session into wrapped lines.
///
/// `editing` draws a cursor at the end of the active input.
pub fn transcript_lines(session: &Session, width: usize, editing: bool) -> Vec<Line<'static>> {
    let active = session.store().active_index();
    let mut lines = Vec::new();
    let mut input_number = 0;

    for (index, cell) in session.cells().iter().enumerate() {
        match cell {
            Cell::Input { text } => {
                input_number += 1;
                if !lines.is_empty() {
                    lines.push(Line::default());
                }
                let is_active = active == Some(index);
                push_input(
                    &mut lines,
                    input_number,
                    text,
                    width,
                    is_active,
                    is_active && editing,
                );
            }
            Cell::Output { results } => {
                lines.push(Line::from(Span::styled(
                    "Out:",
                    Style::default().fg(Color::Magenta),
                )));
                for line in output_lines(results) {
                    push_wrapped(
                        &mut lines,
                        &line,
                        width,
                        OUTPUT_INDENT,
                        Style::default(),
                    );
                }
            }
            Cell::Message { text } => {
                let style = Style::default().fg(Color::DarkGray);
                for line in text.lines() {
                    push_wrapped(&mut lines, line, width, "", style);
                }
            }
            Cell::Error { text } => {
                let style = Style::default().fg(Color::Red);
                push_wrapped(&mut lines, &format!("Error: {text}"), width, "", style);
            }
        }
    }
    lines
}

fn push_input(
    lines: &mut Vec<Line<'static>>,
    number: usize,
    text: &str,
    width: usize,
    active: bool,
    cursor: bool,
) {
    let prompt = format!("In [{number}]: ");
    let indent = " ".repeat(prompt.width());
    let prompt_style = if active {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    let text_style = if active {
        Style::default()
    } else {
        Style::default().fg(Color::Gray)
    };

    let body_width = width.saturating_sub(indent.len()).max(1);
    let mut first = true;
    for source_line in text.split('\n') {
        for row in wrap_line(source_line, body_width) {
            let lead = if first {
                Span::styled(prompt.clone(), prompt_style)
            } else {
                Span::raw(indent.clone())
            };
            first = false;
            lines.push(Line::from(vec![lead, Span::styled(row, text_style)]));
        }
    }

    if cursor && let Some(last) = lines.last_mut() {
        last.push_span(Span::styled(CURSOR, Style::default().fg(Color::Yellow)));
    }
}

fn push_wrapped(
    lines: &mut Vec<Line<'static>>,
    text: &str,
    width: usize,
    indent: &'static str,
    style: Style,
) {
    let body_width = width.saturating_sub(indent.len()).max(1);
    for row in wrap_line(text, body_width) {
        lines.push(Line::from(vec![
            Span::raw(indent),
            Span::styled(row, style),
        ]));
    }
}

#[cfg(test)]
mod tests {
    use unitdc_types::EngineEvent;
    use unitdc_types::mock::{ScriptedEngine, ScriptedLoader, quantity};

    use super::*;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    async fn session_with(engine: ScriptedEngine) -> Session {
        let mut session = Session::new();
        session
            .bootstrap(Box::new(ScriptedLoader::ok(engine)))
            .await;
        session
    }

    #[tokio::test]
    async fn test_blank_session_shows_prompt_and_cursor() {
        let session = session_with(ScriptedEngine::new()).await;
        assert_eq!(plain(&transcript_lines(&session, 40, true)), vec!["In [1]: ▏"]);
        assert_eq!(plain(&transcript_lines(&session, 40, false)), vec!["In [1]: "]);
    }

    #[tokio::test]
    async fn test_output_newest_first_and_errors() {
        let engine = ScriptedEngine::new()
            .on(
                "1 2 f",
                vec![EngineEvent::QuantityList(vec![
                    quantity("1 (1)", 1.0),
                    quantity("2 (1)", 2.0),
                ])],
            )
            .fail_on("oops", "Stack underflow");
        let mut session = session_with(engine).await;

        session.update_active_text("1 2 f").unwrap();
        session.submit().unwrap();
        session.update_active_text("oops").unwrap();
        session.submit().unwrap();

        assert_eq!(
            plain(&transcript_lines(&session, 40, false)),
            vec![
                "In [1]: 1 2 f",
                "Out:",
                "  [0]: 2 (1)",
                "  [1]: 1 (1)",
                "",
                "In [2]: oops",
                "Error: Stack underflow",
                "",
                "In [3]: oops",
            ]
        );
    }

    #[tokio::test]
    async fn test_multiline_input_is_indented() {
        let mut session = session_with(ScriptedEngine::new()).await;
        session.update_active_text("1\n2").unwrap();
        assert_eq!(
            plain(&transcript_lines(&session, 40, false)),
            vec!["In [1]: 1", "        2"]
        );
    }

    #[tokio::test]
    async fn test_messages_keep_line_breaks() {
        let engine = ScriptedEngine::new().on("U", vec![EngineEvent::Message("a\nb".into())]);
        let mut session = session_with(engine).await;
        session.update_active_text("U").unwrap();
        session.submit().unwrap();

        let text = plain(&transcript_lines(&session, 40, false));
        assert_eq!(&text[1..3], &["a", "b"]);
    }
}
