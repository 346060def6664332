pub mod dialog;
pub mod help_window;
pub mod main_window;
pub mod widgets;

use crate::app::{App, Screen};
use ratatui::{layout::Rect, style::Color, Frame};

pub const ACCENT_GREEN: Color = Color::Rgb(92, 184, 92);
pub const ACCENT_RED: Color = Color::Rgb(255, 99, 71);
pub const BUTTON_GRAY: Color = Color::Rgb(211, 211, 211);

pub fn draw(frame: &mut Frame, app: &App) {
    match app.screen() {
        Screen::Main => main_window::render(frame, app),
        Screen::Help => help_window::render(frame),
    }

    if let Some(dialog) = app.dialog() {
        dialog::render(frame, dialog);
    }
}

/// A `width` x `height` rect centred in `area`, shrunk to fit if needed.
pub fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
