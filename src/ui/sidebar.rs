//! Sidebar with the session's display options.

use super::{format_bound, truncate_path, truncate_to_width, ThemeColors};
use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub(super) fn draw_sidebar(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let width = area.width.saturating_sub(4) as usize;
    let session = &app.session;
    let mut lines = Vec::new();

    lines.push(heading("File", colors));
    let file = session.active_file().unwrap_or("(none)");
    lines.push(Line::from(Span::styled(
        format!(" {}", truncate_path(file, width)),
        Style::default().fg(colors.value),
    )));
    if let Some(err) = session.error() {
        lines.push(Line::from(Span::styled(
            format!(" {}", truncate_to_width(err.message(), width)),
            Style::default().fg(colors.error),
        )));
    }
    lines.push(Line::from(""));

    lines.push(heading("Bands", colors));
    for band in session.bands() {
        let active = session.band() == Some(band.as_str());
        let style = if active {
            colors.active_item()
        } else {
            Style::default().fg(colors.text)
        };
        lines.push(Line::from(Span::styled(
            format!(" {}", truncate_to_width(band, width)),
            style,
        )));
    }
    lines.push(Line::from(""));

    let range = session.value_range();
    lines.push(field(
        "Range",
        format!("{} .. {}", format_bound(range.min()), format_bound(range.max())),
        colors,
    ));
    lines.push(field("View", session.display_mode().name().to_string(), colors));
    lines.push(field(
        "Palette",
        app.store.palette().name().to_string(),
        colors,
    ));
    lines.push(field(
        "Selected",
        format!(
            "{}/{}",
            session.selected_indices().len(),
            app.layer_count()
        ),
        colors,
    ));
    lines.push(field(
        "Overwrite",
        if app.overwrite { "ON" } else { "OFF" }.to_string(),
        colors,
    ));
    lines.push(Line::from(""));

    lines.push(heading("Output", colors));
    let output = app
        .output_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not set)".to_string());
    lines.push(Line::from(Span::styled(
        format!(" {}", truncate_path(&output, width)),
        Style::default().fg(colors.value),
    )));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Cubeview ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border))
            .style(Style::default().bg(colors.bg)),
    );

    f.render_widget(paragraph, area);
}

fn heading<'a>(text: &'a str, colors: &ThemeColors) -> Line<'a> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(colors.heading)
            .add_modifier(Modifier::BOLD),
    ))
}

fn field(label: &str, value: String, colors: &ThemeColors) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<10}", label), Style::default().fg(colors.label)),
        Span::styled(value, Style::default().fg(colors.value)),
    ])
}
