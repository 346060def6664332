use super::{centered, ACCENT_GREEN, ACCENT_RED, BUTTON_GRAY};
use crate::app::{App, Phase};
use crate::pipeline::Analysis;
use crate::sentiment::SentimentLabel;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const WIDTH: u16 = 64;
const HEIGHT: u16 = 24;

pub fn render(frame: &mut Frame, app: &App) {
    let area = centered(WIDTH, HEIGHT, frame.area());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray))
        .title(" sentiview ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(7), // input
            Constraint::Length(2), // buttons
            Constraint::Length(4), // result
            Constraint::Min(4),    // help button
            Constraint::Length(1), // status
        ])
        .split(inner);

    render_title(frame, chunks[0]);
    render_input(frame, chunks[1], app);
    render_buttons(frame, chunks[2], app.clear_visible());
    render_result(frame, chunks[3], app.result());
    render_help_button(frame, chunks[4], app);
    render_status(frame, chunks[5], app);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        "Emotional Analysis with NLP",
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Text ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = wrap_input(app.input(), inner.width);
    let skip = lines.len().saturating_sub(inner.height as usize);
    let visible: Vec<Line> = lines[skip..].iter().map(|l| Line::from(l.as_str())).collect();

    if app.dialog().is_none() && inner.width > 0 && inner.height > 0 {
        let last = visible.len().saturating_sub(1) as u16;
        let column = lines.last().map(|l| l.chars().count()).unwrap_or(0) as u16;
        frame.set_cursor_position(Position::new(inner.x + column, inner.y + last));
    }

    frame.render_widget(Paragraph::new(visible), inner);
}

fn render_buttons(frame: &mut Frame, area: Rect, clear_visible: bool) {
    let mut spans = vec![Span::styled(
        " Analyze (Enter) ",
        Style::default()
            .fg(Color::White)
            .bg(ACCENT_GREEN)
            .add_modifier(Modifier::BOLD),
    )];

    if clear_visible {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            " Clear (Ctrl+L) ",
            Style::default()
                .fg(Color::White)
                .bg(ACCENT_RED)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let buttons = Paragraph::new(vec![Line::from(""), Line::from(spans)]).alignment(Alignment::Center);
    frame.render_widget(buttons, area);
}

fn label_color(label: SentimentLabel) -> Color {
    match label {
        SentimentLabel::Positive => Color::Green,
        SentimentLabel::Negative => Color::Red,
        SentimentLabel::Neutral => Color::Yellow,
    }
}

fn render_result(frame: &mut Frame, area: Rect, result: Option<&Analysis>) {
    let Some(result) = result else {
        return;
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Sentiment: {}", result.label),
            Style::default()
                .fg(label_color(result.label))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(
                "compound {:+.3}  pos {:.2}  neg {:.2}  neu {:.2}",
                result.scores.compound,
                result.scores.positive,
                result.scores.negative,
                result.scores.neutral
            ),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    if result.translation.text != result.input {
        let source = result
            .translation
            .detected_language
            .as_deref()
            .unwrap_or("auto");
        let max = area.width.saturating_sub(12) as usize;
        lines.push(Line::from(Span::styled(
            format!("[{}] \"{}\"", source, truncate(&result.translation.text, max)),
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_help_button(frame: &mut Frame, area: Rect, app: &App) {
    let (icon_lines, icon_width) = match app.help_icon() {
        Some(icon) => (icon.lines(), icon.cell_width()),
        None => (
            vec![Line::from(Span::styled(
                "[?]",
                Style::default().fg(Color::Black).bg(BUTTON_GRAY),
            ))],
            3,
        ),
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(icon_width),
            Constraint::Length(2),
            Constraint::Min(10),
        ])
        .split(area);

    frame.render_widget(Paragraph::new(icon_lines), columns[1]);

    let hint = vec![
        Line::from(vec![
            Span::styled(
                " F1 ",
                Style::default()
                    .fg(Color::Black)
                    .bg(BUTTON_GRAY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Help"),
        ]),
        Line::from(Span::styled(
            "Alt+Enter new line",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(hint), columns[3]);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let status = match (app.phase(), app.latest_translation()) {
        (Phase::Pending, Some(translation)) => Span::styled(
            format!(
                "Analyzing... translated from {} ({} in flight)",
                translation.detected_language.as_deref().unwrap_or("auto"),
                app.pending_count()
            ),
            Style::default().fg(Color::Yellow),
        ),
        (Phase::Pending, None) => Span::styled(
            format!("Analyzing... ({} in flight)", app.pending_count()),
            Style::default().fg(Color::Yellow),
        ),
        _ => Span::styled("Ready", Style::default().fg(Color::DarkGray)),
    };

    let line = Line::from(vec![
        status,
        Span::styled(
            format!("  |  translator: {}  |  Ctrl+Q quit", app.translator_name()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Split input into display rows: hard breaks on `\n`, soft breaks at
/// `width` characters. A full last row gets an empty row after it so the
/// cursor has somewhere to go.
pub(crate) fn wrap_input(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    let mut lines = Vec::new();

    for segment in text.split('\n') {
        let chars: Vec<char> = segment.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
    }

    if lines.last().is_some_and(|l| l.chars().count() == width) {
        lines.push(String::new());
    }
    lines
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
