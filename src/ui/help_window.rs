use super::{centered, ACCENT_GREEN};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const WIDTH: u16 = 56;
const HEIGHT: u16 = 18;

pub const ABOUT: &str = "NLP-based analysis system using parallel programming and a layered \
architecture for evaluating user texts";

const KEY_BINDINGS: &[(&str, &str)] = &[
    ("Enter", "Translate and analyze the text"),
    ("Alt+Enter", "Insert a new line"),
    ("Ctrl+L", "Clear text and result"),
    ("F1", "Show this help"),
    ("Ctrl+Q", "Quit"),
];

pub fn render(frame: &mut Frame) {
    let area = centered(WIDTH, HEIGHT, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT_GREEN))
        .title(" Help ")
        .style(Style::default().bg(ACCENT_GREEN).fg(Color::Black));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let wrap_width = inner.width.saturating_sub(4).max(10) as usize;
    let mut lines: Vec<Line> = vec![Line::from("")];
    lines.extend(textwrap::wrap(ABOUT, wrap_width).into_iter().map(|row| {
        Line::from(Span::styled(
            row.into_owned(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
    }));
    lines.push(Line::from(""));

    for (key, action) in KEY_BINDINGS {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>10}", key),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {:<32}", action)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Back to main (Esc) ",
        Style::default()
            .fg(ACCENT_GREEN)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD),
    )));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}
