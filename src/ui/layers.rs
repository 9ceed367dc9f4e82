//! Layer pane: heatmap tiles in grid mode, one large layer in slider mode.

use super::{format_bound, truncate_to_width, ThemeColors};
use crate::app::App;
use crate::render::{ColorPalette, SliceImage, ValueRange};
use crate::session::DisplayMode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// What every tile needs, copied out of the session before rendering.
pub(super) struct LayerView {
    file_id: String,
    band: String,
    range: ValueRange,
    labels: Vec<String>,
    selected: Vec<bool>,
}

impl LayerView {
    /// Snapshot of the loaded band, or `None` when nothing is loaded.
    pub(super) fn from_app(app: &App) -> Option<Self> {
        let (file_id, band) = (app.session.active_file()?, app.session.band()?);
        Some(Self {
            file_id: file_id.to_string(),
            band: band.to_string(),
            range: app.session.value_range(),
            labels: app.session.times().to_vec(),
            selected: (0..app.layer_count()).map(|i| app.session.is_selected(i)).collect(),
        })
    }
}

pub(super) fn draw_layers(f: &mut Frame<'_>, app: &mut App, area: Rect, colors: &ThemeColors) {
    let mode = app.session.display_mode();
    let block = Block::default()
        .title(format!(" Layers - {} ", mode.name()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .style(Style::default().bg(colors.bg));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(view) = LayerView::from_app(app) else {
        draw_welcome(f, app, inner, colors);
        return;
    };

    if inner.height < 3 || inner.width < 8 {
        return;
    }

    draw_colorbar(f, inner, &view, app.store.palette(), app.config.layout.heatmap.colorbar_width, colors);
    let body = Rect {
        y: inner.y + 1,
        height: inner.height - 1,
        ..inner
    };

    match mode {
        DisplayMode::Grid => {
            let indices: Vec<usize> = (0..view.labels.len()).collect();
            let columns = app.config.layout.grid.columns;
            let focus = app.focus;
            draw_grid(f, app, body, &view, &indices, columns, Some(focus), colors)
        },
        DisplayMode::Slider => draw_slider(f, app, body, &view, colors),
    }
}

fn draw_welcome(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let mut lines = vec![
        Line::from(Span::styled(
            "No cube loaded",
            Style::default()
                .fg(colors.heading)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if let Some(err) = app.session.error() {
        lines.push(Line::from(Span::styled(
            err.message().to_string(),
            Style::default().fg(colors.error),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Press o to open a NetCDF file",
        Style::default().fg(colors.text),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_colorbar(
    f: &mut Frame<'_>,
    area: Rect,
    view: &LayerView,
    palette: ColorPalette,
    colorbar_width: usize,
    colors: &ThemeColors,
) {
    let min_label = format_bound(view.range.min());
    let max_label = format_bound(view.range.max());
    let labels = min_label.len() + max_label.len() + 2;
    let width = colorbar_width.min((area.width as usize).saturating_sub(labels));
    if width == 0 {
        return;
    }

    let start = area.x + ((area.width as usize).saturating_sub(width + labels) / 2) as u16;
    let y = area.y;
    let end = area.x + area.width;
    let buf = f.buffer_mut();

    let mut x = start;
    for ch in min_label.chars().chain(std::iter::once(' ')) {
        if x < end {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(ch).set_fg(colors.label);
            }
        }
        x += 1;
    }
    for i in 0..width {
        let [r, g, b] = palette.rgb(i as f64 / width.saturating_sub(1).max(1) as f64);
        if x < end {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char('█').set_fg(Color::Rgb(r, g, b));
            }
        }
        x += 1;
    }
    for ch in std::iter::once(' ').chain(max_label.chars()) {
        if x < end {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(ch).set_fg(colors.label);
            }
        }
        x += 1;
    }
}

/// Draw the layers in `indices` as tiles, scrolled so `focus` stays visible.
#[allow(clippy::too_many_arguments)]
pub(super) fn draw_grid(
    f: &mut Frame<'_>,
    app: &mut App,
    area: Rect,
    view: &LayerView,
    indices: &[usize],
    columns: usize,
    focus: Option<usize>,
    colors: &ThemeColors,
) {
    let columns = columns.max(1);
    let tile_height = app.config.layout.grid.tile_height.max(3).min(area.height);
    let tile_width = area.width / columns as u16;
    if tile_width < 4 || area.height < 3 {
        return;
    }

    let visible_rows = ((area.height / tile_height) as usize).max(1);
    let focus_slot = focus
        .and_then(|focus| indices.iter().position(|&i| i == focus))
        .unwrap_or(0);
    let first_row = (focus_slot / columns).saturating_sub(visible_rows - 1);
    let first = first_row * columns;
    let last = ((first_row + visible_rows) * columns).min(indices.len());

    for (slot, &index) in indices[first.min(last)..last].iter().enumerate() {
        if index >= view.labels.len() {
            continue;
        }
        let tile = Rect {
            x: area.x + (slot % columns) as u16 * tile_width,
            y: area.y + (slot / columns) as u16 * tile_height,
            width: tile_width,
            height: tile_height.min(area.height - (slot / columns) as u16 * tile_height),
        };

        let checkbox = if view.selected[index] { "[x]" } else { "[ ]" };
        let title = truncate_to_width(
            &format!(" {} {} ", checkbox, view.labels[index]),
            tile_width.saturating_sub(2) as usize,
        );
        let focused = focus == Some(index);
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(colors.tile_border(focused))
            .title_style(colors.selection(view.selected[index]));
        let inner = block.inner(tile);
        f.render_widget(block, tile);

        draw_layer(f, app, inner, view, index, colors);
    }
}

fn draw_slider(f: &mut Frame<'_>, app: &mut App, area: Rect, view: &LayerView, colors: &ThemeColors) {
    let count = view.labels.len();
    if count == 0 || area.height < 3 {
        return;
    }
    let index = app.focus.min(count - 1);

    let image_area = Rect {
        height: area.height - 2,
        ..area
    };
    draw_layer(f, app, image_area, view, index, colors);

    let checkbox = if view.selected[index] { "[x]" } else { "[ ]" };
    let caption = format!(
        "{} {}  {}/{}",
        checkbox,
        view.labels[index],
        index + 1,
        count
    );
    let track_width = (area.width as usize).saturating_sub(4).max(1);
    let knob = if count > 1 {
        index * (track_width - 1) / (count - 1)
    } else {
        0
    };
    let track: String = (0..track_width)
        .map(|i| if i == knob { '●' } else { '━' })
        .collect();

    let lines = vec![
        Line::from(Span::styled(caption, Style::default().fg(colors.heading))),
        Line::from(vec![
            Span::styled("◀ ", Style::default().fg(colors.label)),
            Span::styled(track, Style::default().fg(colors.value)),
            Span::styled(" ▶", Style::default().fg(colors.label)),
        ]),
    ];
    let slider_area = Rect {
        y: area.y + area.height - 2,
        height: 2,
        ..area
    };
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), slider_area);
}

/// Render one layer through the cache and draw it into `area`.
fn draw_layer(f: &mut Frame<'_>, app: &mut App, area: Rect, view: &LayerView, index: usize, colors: &ThemeColors) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    match app
        .store
        .render(&view.file_id, &view.band, index, view.range)
    {
        Ok(image) => draw_image(f, area, &image, app.config.layout.heatmap.pixel_width, colors),
        Err(e) => {
            let paragraph = Paragraph::new(e.to_string())
                .style(Style::default().fg(colors.error))
                .wrap(Wrap { trim: true });
            f.render_widget(paragraph, area);
        },
    }
}

/// Draw an image scaled to fit `area`, keeping its aspect ratio.
fn draw_image(f: &mut Frame<'_>, area: Rect, image: &SliceImage, pixel_width: usize, colors: &ThemeColors) {
    if image.is_empty() {
        return;
    }
    let pixel_width = pixel_width.max(1);
    let fit_cols = (area.width as usize / pixel_width).max(1);
    let fit_rows = area.height as usize;
    let scale = (fit_cols as f64 / image.width as f64).min(fit_rows as f64 / image.height as f64);
    let cols = ((image.width as f64 * scale) as usize).clamp(1, fit_cols);
    let rows = ((image.height as f64 * scale) as usize).clamp(1, fit_rows);

    let x0 = area.x + ((area.width as usize).saturating_sub(cols * pixel_width) / 2) as u16;
    let y0 = area.y + ((fit_rows - rows) / 2) as u16;
    let buf = f.buffer_mut();

    for row in 0..rows {
        let src_row = row * image.height / rows;
        for col in 0..cols {
            let src_col = col * image.width / cols;
            let (ch, fg) = match image.pixel(src_row, src_col) {
                Some([r, g, b]) => ('█', Color::Rgb(r, g, b)),
                None => ('·', colors.nodata),
            };
            for dx in 0..pixel_width {
                let x = x0 + (col * pixel_width + dx) as u16;
                if let Some(cell) = buf.cell_mut((x, y0 + row as u16)) {
                    cell.set_char(ch).set_fg(fg);
                }
            }
        }
    }
}
