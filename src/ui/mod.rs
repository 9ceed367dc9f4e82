//! User interface rendering.

mod bars;
mod formatters;
mod layers;
mod panels;
mod sidebar;
mod theme;

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

pub use formatters::{format_bound, truncate_path, truncate_to_width};
pub use theme::ThemeColors;

/// Draw the UI.
pub fn draw(f: &mut Frame<'_>, app: &mut App) {
    let colors = ThemeColors::from_theme(&app.theme);

    // Main layout with status bar and key map bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)])
        .split(f.area());

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(app.config.layout.sidebar_width),
            Constraint::Min(10),
        ])
        .split(chunks[0]);

    sidebar::draw_sidebar(f, app, content[0], &colors);
    layers::draw_layers(f, app, content[1], &colors);

    bars::draw_status(f, app, chunks[1], &colors);
    bars::draw_keymap(f, app, chunks[2], &colors);

    // Overlays
    if app.show_summary {
        panels::draw_summary(f, app, &colors);
    } else if app.show_selected {
        panels::draw_selected(f, app, &colors);
    }
    if app.prompt.is_some() {
        panels::draw_prompt(f, app, &colors);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
