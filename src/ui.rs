use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use crate::agent::QUICK_ACTIONS;
use crate::app::{App, InputMode, AGENT_LABEL, USER_LABEL};

/// Convert `**bold**` markers in one line of agent text to styled spans.
/// The canned responses use bold headings and inline emphasis; anything
/// unmatched renders literally.
fn parse_markdown_line(text: &str) -> Line<'static> {
    if !text.contains("**") {
        return Line::from(text.to_string());
    }

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut rest = text;
    let mut bold = false;

    while let Some((before, after)) = rest.split_once("**") {
        if !before.is_empty() {
            let span = if bold {
                Span::styled(before.to_string(), bold_style)
            } else {
                Span::raw(before.to_string())
            };
            spans.push(span);
        }
        bold = !bold;
        rest = after;
    }

    // A dangling opener has no closing marker; keep it literal.
    if bold {
        spans.push(Span::raw(format!("**{rest}")));
    } else if !rest.is_empty() {
        spans.push(Span::raw(rest.to_string()));
    }

    Line::from(spans)
}

/// Find the cursor's line and column (in chars) within the input buffer.
fn cursor_position(input: &str, cursor: usize) -> (usize, usize) {
    let mut line = 0;
    let mut col = 0;
    for c in input.chars().take(cursor) {
        if c == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (line, col)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Input box grows with the draft, up to 5 lines
    let input_lines = app.input.split('\n').count().clamp(1, 5) as u16;

    let [header_area, body_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(input_lines + 2),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);

    if app.welcome_active() {
        render_welcome(app, frame, body_area);
    } else {
        render_chat(app, frame, body_area);
    }

    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Персональный коуч ", Style::default().fg(Color::Cyan).bold()),
        Span::styled("Развитие и самопрезентация", Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_welcome(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_height = QUICK_ACTIONS.len() as u16 * 3 + 2;
    let [_, title_area, list_area, _] = Layout::vertical([
        Constraint::Percentage(15),
        Constraint::Length(4),
        Constraint::Length(list_height),
        Constraint::Min(0),
    ])
    .areas(area);

    let greeting = Text::from(vec![
        Line::styled(
            "С чем работаем сегодня?",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::default(),
        Line::styled(
            "Опиши задачу своими словами или выбери направление ниже",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(greeting).alignment(Alignment::Center),
        title_area,
    );

    // Center the action list horizontally
    let width = 52.min(list_area.width);
    let [_, list_area, _] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(width),
        Constraint::Min(0),
    ])
    .areas(list_area);

    let items: Vec<ListItem> = QUICK_ACTIONS
        .iter()
        .map(|action| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    action.title,
                    Style::default().fg(Color::Cyan).bold(),
                )),
                Line::from(Span::styled(
                    format!("  {}", action.description),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::default(),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("› ");

    frame.render_stateful_widget(list, list_area, &mut app.action_state);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Record inner dimensions for wrap-aware scroll math
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Диалог ");

    let mut lines: Vec<Line> = Vec::new();
    for msg in app.conversation.messages() {
        if msg.is_agent {
            lines.push(Line::from(Span::styled(
                AGENT_LABEL,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            for line in msg.content.lines() {
                lines.push(parse_markdown_line(line));
            }
        } else {
            lines.push(Line::from(Span::styled(
                USER_LABEL,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
            for line in msg.content.lines() {
                lines.push(Line::from(line.to_string()));
            }
        }
        lines.push(Line::default());
    }

    if app.conversation.is_composing() {
        lines.push(Line::from(Span::styled(
            AGENT_LABEL,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: ".", "..", "..."
        let dots = ".".repeat(app.animation_frame as usize + 1);
        lines.push(Line::from(Span::styled(
            format!("Думаю{dots}"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &mut App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };

    let title = if app.conversation.is_composing() {
        " Сообщение (коуч отвечает...) "
    } else {
        " Сообщение "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;

    // Scroll the whole draft so the cursor stays visible
    let (cursor_line, cursor_col) = cursor_position(&app.input, app.input_cursor);
    let v_scroll = cursor_line.saturating_sub(inner_height.saturating_sub(1));
    let h_scroll = if inner_width == 0 {
        0
    } else {
        cursor_col.saturating_sub(inner_width - 1)
    };

    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::Cyan))
        .block(block)
        .scroll((v_scroll as u16, h_scroll as u16));

    frame.render_widget(input, area);

    if editing {
        frame.set_cursor_position((
            area.x + 1 + (cursor_col - h_scroll) as u16,
            area.y + 1 + (cursor_line - v_scroll) as u16,
        ));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let hints: &[(&str, &str)] = match app.input_mode {
        InputMode::Editing => &[
            ("Enter", "отправить"),
            ("Alt+Enter", "новая строка"),
            ("Esc", "просмотр"),
            ("Ctrl+C", "выход"),
        ],
        InputMode::Normal if app.welcome_active() => &[
            ("j/k", "выбор"),
            ("Enter", "отправить"),
            ("i", "ввод"),
            ("q", "выход"),
        ],
        InputMode::Normal => &[
            ("j/k", "прокрутка"),
            ("g/G", "в начало/конец"),
            ("i", "ввод"),
            ("q", "выход"),
        ],
    };

    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().fg(Color::DarkGray);

    let mut spans: Vec<Span> = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {key} "), key_style));
        spans.push(Span::styled(format!(" {label}  "), label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_markdown_plain_line_passes_through() {
        let line = parse_markdown_line("Что за идея?");
        assert_eq!(line_text(&line), "Что за идея?");
    }

    #[test]
    fn test_markdown_bold_heading() {
        let line = parse_markdown_line("**Начнём с базы:**");
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line_text(&line), "Начнём с базы:");
        assert!(line.spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_markdown_inline_bold() {
        let line = parse_markdown_line("1. **Расскажи о себе** — это всегда первый вопрос");
        assert_eq!(line_text(&line), "1. Расскажи о себе — это всегда первый вопрос");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(!line.spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_markdown_unmatched_marker_stays_literal() {
        let line = parse_markdown_line("просто ** звёздочки");
        assert_eq!(line_text(&line), "просто ** звёздочки");
    }

    #[test]
    fn test_cursor_position_single_line() {
        assert_eq!(cursor_position("привет", 0), (0, 0));
        assert_eq!(cursor_position("привет", 4), (0, 4));
    }

    #[test]
    fn test_cursor_position_multi_line() {
        let input = "первая\nвторая строка";
        assert_eq!(cursor_position(input, 6), (0, 6)); // end of line one
        assert_eq!(cursor_position(input, 7), (1, 0)); // just past the newline
        assert_eq!(cursor_position(input, 10), (1, 3));
    }
}
