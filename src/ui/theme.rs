//! Color themes and the styles derived from them.

use crate::app::Theme;
use ratatui::style::{Color, Modifier, Style};

/// Gruvbox swatches shared by both themes.
mod gruvbox {
    use ratatui::style::Color;

    pub(super) const DARK0: Color = Color::Rgb(40, 40, 40);
    pub(super) const DARK1: Color = Color::Rgb(60, 56, 54);
    pub(super) const DARK3: Color = Color::Rgb(102, 92, 84);
    pub(super) const GRAY: Color = Color::Rgb(146, 131, 116);
    pub(super) const LIGHT0: Color = Color::Rgb(251, 245, 234);
    pub(super) const LIGHT1: Color = Color::Rgb(235, 219, 178);
    pub(super) const LIGHT3: Color = Color::Rgb(213, 196, 161);
    pub(super) const ORANGE: Color = Color::Rgb(251, 184, 108);
    pub(super) const ORANGE_DIM: Color = Color::Rgb(175, 58, 3);
    pub(super) const GREEN: Color = Color::Rgb(184, 187, 38);
    pub(super) const GREEN_DIM: Color = Color::Rgb(121, 116, 14);
    pub(super) const AQUA: Color = Color::Rgb(142, 192, 124);
    pub(super) const AQUA_DIM: Color = Color::Rgb(102, 123, 3);
    pub(super) const RED: Color = Color::Rgb(251, 73, 52);
    pub(super) const RED_DIM: Color = Color::Rgb(157, 0, 6);
}

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Background color.
    pub bg: Color,
    /// Primary text color.
    pub text: Color,
    /// Heading text color.
    pub heading: Color,
    /// Label text color.
    pub label: Color,
    /// Value text color.
    pub value: Color,
    /// Border color.
    pub border: Color,
    /// Cursor foreground color.
    pub cursor_fg: Color,
    /// Cursor background color; also the focused tile border.
    pub cursor_bg: Color,
    /// Status bar foreground color.
    pub status_fg: Color,
    /// Status bar background color.
    pub status_bg: Color,
    /// Cells without data.
    pub nodata: Color,
    /// Selected layers and success messages.
    pub success: Color,
    /// Error messages.
    pub error: Color,
}

impl ThemeColors {
    /// Create color palette from theme.
    pub fn from_theme(theme: &Theme) -> Self {
        use gruvbox::*;

        // Light swaps foreground and background and uses the dim accents.
        let (bg, fg, panel, border) = match theme {
            Theme::GruvboxDark => (DARK0, LIGHT1, DARK1, DARK3),
            Theme::GruvboxLight => (LIGHT0, DARK1, LIGHT1, LIGHT3),
        };
        let (accent, good, calm, bad) = match theme {
            Theme::GruvboxDark => (ORANGE, GREEN, AQUA, RED),
            Theme::GruvboxLight => (ORANGE_DIM, GREEN_DIM, AQUA_DIM, RED_DIM),
        };

        Self {
            bg,
            text: fg,
            heading: accent,
            label: good,
            value: calm,
            border,
            cursor_fg: bg,
            cursor_bg: accent,
            status_fg: fg,
            status_bg: panel,
            nodata: GRAY,
            success: good,
            error: bad,
        }
    }

    /// Border of a layer tile.
    pub fn tile_border(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.cursor_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Title of a layer tile or a selection row.
    pub fn selection(&self, selected: bool) -> Style {
        if selected {
            Style::default().fg(self.success)
        } else {
            Style::default().fg(self.text)
        }
    }

    /// Highlight for the active entry of a list, such as the current band.
    pub fn active_item(&self) -> Style {
        Style::default()
            .fg(self.cursor_fg)
            .bg(self.cursor_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Status bar style, coloured by the outcome the message reports.
    pub fn status(&self, message: &str) -> Style {
        let fg = if message.starts_with("Success!") {
            self.success
        } else if message.starts_with("Error") || message.starts_with("Write failed") {
            self.error
        } else {
            self.status_fg
        };
        Style::default().fg(fg).bg(self.status_bg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_theme_inverts_the_dark_one() {
        let dark = ThemeColors::from_theme(&Theme::GruvboxDark);
        let light = ThemeColors::from_theme(&Theme::GruvboxLight);
        assert_eq!(dark.text, light.status_bg);
        assert_eq!(light.text, dark.status_bg);
        assert_eq!(dark.cursor_fg, dark.bg);
        assert_eq!(light.cursor_fg, light.bg);
        assert_eq!(dark.nodata, light.nodata);
    }

    #[test]
    fn status_colour_follows_the_outcome() {
        let colors = ThemeColors::from_theme(&Theme::GruvboxDark);
        assert_eq!(colors.status("Success! out.nc").fg, Some(colors.success));
        assert_eq!(colors.status("Write failed: disk full").fg, Some(colors.error));
        assert_eq!(colors.status("Error loading file").fg, Some(colors.error));
        assert_eq!(colors.status("Loaded a.nc").fg, Some(colors.status_fg));
        assert_eq!(colors.status("anything").bg, Some(colors.status_bg));
    }

    #[test]
    fn focused_and_selected_tiles_stand_out() {
        let colors = ThemeColors::from_theme(&Theme::GruvboxLight);
        assert_eq!(colors.tile_border(true).fg, Some(colors.cursor_bg));
        assert_eq!(colors.tile_border(false).fg, Some(colors.border));
        assert_eq!(colors.selection(true).fg, Some(colors.success));
        assert_eq!(colors.selection(false).fg, Some(colors.text));
    }
}
