//! Overlay panels: cube summary, selected layers and text prompts.

use super::layers::{draw_grid, LayerView};
use super::{centered_rect, ThemeColors};
use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub(super) fn draw_summary(f: &mut Frame<'_>, app: &mut App, colors: &ThemeColors) {
    let area = centered_rect(80, 80, f.area());
    let text = app.summary_text();
    let loaded = app.session.is_loaded();

    let lines: Vec<Line<'_>> = text
        .lines()
        .map(|line| {
            let style = if !loaded {
                Style::default().fg(colors.error)
            } else if line.ends_with(':') {
                Style::default()
                    .fg(colors.heading)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.text)
            };
            Line::from(Span::styled(line.replace('\t', "    "), style))
        })
        .collect();

    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(lines)
        .block(panel_block(" Summary ", colors))
        .scroll((app.summary_scroll, 0));
    f.render_widget(paragraph, area);
}

/// Tile columns used under the selected-layer listing.
const SELECTED_COLUMNS: usize = 3;

pub(super) fn draw_selected(f: &mut Frame<'_>, app: &mut App, colors: &ThemeColors) {
    let area = centered_rect(70, 80, f.area());

    let lines: Vec<Line<'_>> = if app.session.is_loaded() {
        app.session
            .selection_labels()
            .into_iter()
            .map(|(label, on)| {
                Line::from(vec![
                    Span::styled(format!("{:<24}", label), Style::default().fg(colors.label)),
                    Span::styled(on.to_string(), colors.selection(on)),
                ])
            })
            .collect()
    } else {
        vec![Line::from(Span::styled(
            "No file loaded",
            Style::default().fg(colors.text),
        ))]
    };

    f.render_widget(Clear, area);
    let block = panel_block(" Selected ", colors);
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Selected layers go through the render cache like the main grid.
    let selected = app.session.selected_indices();
    let listing_cap = if selected.is_empty() {
        inner.height
    } else {
        inner.height / 3
    };
    let listing_height = (lines.len() as u16).min(listing_cap);
    let listing = Rect {
        height: listing_height,
        ..inner
    };
    f.render_widget(Paragraph::new(lines), listing);

    let Some(view) = LayerView::from_app(app) else {
        return;
    };
    if selected.is_empty() {
        return;
    }
    let tiles = Rect {
        y: inner.y + listing_height,
        height: inner.height - listing_height,
        ..inner
    };
    draw_grid(f, app, tiles, &view, &selected, SELECTED_COLUMNS, None, colors);
}

pub(super) fn draw_prompt(f: &mut Frame<'_>, app: &App, colors: &ThemeColors) {
    let Some(prompt) = &app.prompt else {
        return;
    };
    let outer = centered_rect(60, 20, f.area());
    let area = Rect {
        height: outer.height.min(3),
        ..outer
    };

    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled(prompt.buffer.as_str(), Style::default().fg(colors.value)),
        Span::styled(
            "_",
            Style::default()
                .fg(colors.cursor_bg)
                .add_modifier(Modifier::SLOW_BLINK),
        ),
    ]))
    .block(panel_block(&format!(" {} ", prompt.kind.label()), colors))
    .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn panel_block<'a>(title: &str, colors: &ThemeColors) -> Block<'a> {
    Block::default()
        .title(Span::styled(
            title.to_string(),
            Style::default()
                .fg(colors.heading)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .style(Style::default().bg(colors.bg))
}

#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::config::ViewerConfig;
    use crate::cube::CountingOpener;
    use crate::ui::{centered_rect, draw};
    use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};
    use std::path::PathBuf;

    fn panel_text(buffer: &Buffer, area: Rect) -> String {
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                text.push_str(buffer.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn selected_panel_draws_tiles_for_selected_layers() {
        let mut app = App::with_opener(
            ViewerConfig::default(),
            Box::new(CountingOpener::default()),
            Some(PathBuf::from("a.nc")),
        );
        app.session.toggle_select(1, true).unwrap();
        app.show_selected = true;

        let mut terminal = Terminal::new(TestBackend::new(120, 50)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();

        let panel = centered_rect(70, 80, Rect::new(0, 0, 120, 50));
        let text = panel_text(terminal.backend().buffer(), panel);
        assert!(text.contains("[x]"), "{}", text);
        assert!(text.contains('█'), "{}", text);
    }

    #[test]
    fn selected_panel_without_selection_only_lists() {
        let mut app = App::with_opener(
            ViewerConfig::default(),
            Box::new(CountingOpener::default()),
            Some(PathBuf::from("a.nc")),
        );
        app.show_selected = true;

        let mut terminal = Terminal::new(TestBackend::new(120, 50)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();

        let panel = centered_rect(70, 80, Rect::new(0, 0, 120, 50));
        let text = panel_text(terminal.backend().buffer(), panel);
        assert!(text.contains("false"));
        assert!(!text.contains('█'));
    }
}
