//! Shared formatting utilities for UI components.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Format a colorbar bound with smart precision.
pub fn format_bound(val: f64) -> String {
    if !val.is_finite() {
        return if val.is_nan() {
            "NaN".to_string()
        } else if val.is_sign_positive() {
            "+Inf".to_string()
        } else {
            "-Inf".to_string()
        };
    }
    let abs_val = val.abs();
    if abs_val == 0.0 {
        "0".to_string()
    } else if !(1e-3..1e6).contains(&abs_val) {
        format!("{:.2e}", val)
    } else if abs_val >= 100.0 {
        format!("{:.1}", val)
    } else {
        format!("{:.3}", val)
    }
}

/// Cut `text` to at most `max_width` terminal columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Keep the tail of a path so the file name stays visible.
pub fn truncate_path(path: &str, max_width: usize) -> String {
    if path.width() <= max_width {
        return path.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut tail: Vec<char> = Vec::new();
    let mut used = 1;
    for c in path.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width {
            break;
        }
        tail.push(c);
        used += w;
    }
    std::iter::once('…').chain(tail.into_iter().rev()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_pick_precision_by_magnitude() {
        assert_eq!(format_bound(0.0), "0");
        assert_eq!(format_bound(0.5), "0.500");
        assert_eq!(format_bound(250.0), "250.0");
        assert_eq!(format_bound(1.5e7), "1.50e7");
        assert_eq!(format_bound(f64::NAN), "NaN");
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("ndvi", 10), "ndvi");
        assert_eq!(truncate_to_width("surface_reflectance", 8), "surface…");
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
        assert_eq!(truncate_path("/data/cubes/scene.nc", 10), "…/scene.nc");
    }
}
