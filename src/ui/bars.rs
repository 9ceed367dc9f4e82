//! Status and keymap bars.

use super::ThemeColors;
use crate::app::App;
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};

/// Draw the status bar.
pub(super) fn draw_status(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let paragraph = Paragraph::new(app.status.as_str()).style(colors.status(&app.status));

    f.render_widget(paragraph, area);
}

/// Draw the keymap help bar.
pub(super) fn draw_keymap(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let keymap_text = if app.prompt.is_some() {
        "Enter:apply | Esc:cancel | Type to edit"
    } else if app.show_summary {
        "jk:scroll | y:copy | i/Esc:close"
    } else if app.show_selected {
        "s/Esc:close"
    } else {
        "q:quit | o:open | hjkl:focus | space:select | b/B:band | r:range | v:view | w:overwrite | e:export | i:info | s:selected | c:copy paths | T:theme"
    };

    let paragraph =
        Paragraph::new(keymap_text).style(Style::default().fg(colors.text).bg(colors.bg));

    f.render_widget(paragraph, area);
}
