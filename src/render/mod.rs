//! Time-slice rendering.
//!
//! Turns one `(band, time)` plane of a cube into a colour image clipped to a
//! display value range, and memoizes the result.

mod cache;
mod colormaps;

pub use cache::{RenderCache, RenderKey};
pub use colormaps::{ColorPalette, Rgb};

use ndarray::ArrayView2;
use std::hash::{Hash, Hasher};

/// Display clipping range, `min <= max`.
///
/// Equality and hashing use the bit patterns of both bounds, so two ranges
/// built from the same numbers are always the same cache key.
#[derive(Debug, Clone, Copy)]
pub struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    /// Create a range, rejecting `min > max` and NaN bounds.
    pub fn new(min: f64, max: f64) -> Option<Self> {
        if min.is_nan() || max.is_nan() || min > max {
            return None;
        }
        // `+ 0.0` folds -0.0 into 0.0 so both hash alike.
        Some(Self {
            min: min + 0.0,
            max: max + 0.0,
        })
    }

    /// Create a range, raising `max` to `min` when it is lower.
    ///
    /// NaN bounds fall back to the default range.
    pub fn clamped(min: f64, max: f64) -> Self {
        if min.is_nan() || max.is_nan() {
            return Self::default();
        }
        Self {
            min: min + 0.0,
            max: max.max(min) + 0.0,
        }
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Position of `value` within the range, clamped to `[0, 1]`.
    ///
    /// A zero-width range maps everything to 0.
    pub fn normalize(&self, value: f64) -> f64 {
        let width = self.max - self.min;
        if width <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / width).clamp(0.0, 1.0)
    }

    /// Parse `"min max"` (comma or whitespace separated), clamping max to min.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty());
        let min = parts.next()?.parse::<f64>().ok()?;
        let max = parts.next()?.parse::<f64>().ok()?;
        if parts.next().is_some() || min.is_nan() || max.is_nan() {
            return None;
        }
        Some(Self::clamped(min, max))
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl PartialEq for ValueRange {
    fn eq(&self, other: &Self) -> bool {
        self.min.to_bits() == other.min.to_bits() && self.max.to_bits() == other.max.to_bits()
    }
}

impl Eq for ValueRange {}

impl Hash for ValueRange {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.min.to_bits().hash(state);
        self.max.to_bits().hash(state);
    }
}

impl std::fmt::Display for ValueRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.min, self.max)
    }
}

/// A rendered layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceImage {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
    /// Row-major colours; `None` marks cells without data.
    pub pixels: Vec<Option<Rgb>>,
}

impl SliceImage {
    /// Colour of one cell.
    pub fn pixel(&self, row: usize, col: usize) -> Option<Rgb> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.pixels[row * self.width + col]
    }

    /// Whether the image has no cells.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Colour a plane with `palette`, clipping values to `range`.
pub fn render_plane(plane: ArrayView2<'_, f64>, range: ValueRange, palette: ColorPalette) -> SliceImage {
    let (height, width) = plane.dim();
    let pixels = plane
        .iter()
        .map(|&v| v.is_finite().then(|| palette.rgb(range.normalize(v))))
        .collect();
    SliceImage {
        width,
        height,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(range: &ValueRange) -> u64 {
        let mut hasher = DefaultHasher::new();
        range.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn new_rejects_inverted_and_nan() {
        assert!(ValueRange::new(2.0, 1.0).is_none());
        assert!(ValueRange::new(f64::NAN, 1.0).is_none());
        assert!(ValueRange::new(1.0, 1.0).is_some());
    }

    #[test]
    fn clamped_raises_max_to_min() {
        let range = ValueRange::clamped(0.8, 0.2);
        assert_eq!(range.min(), 0.8);
        assert_eq!(range.max(), 0.8);
    }

    #[test]
    fn equal_ranges_hash_alike() {
        let a = ValueRange::new(-0.0, 0.5).unwrap();
        let b = ValueRange::new(0.0, 0.5).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn parse_accepts_commas_and_spaces() {
        assert_eq!(ValueRange::parse("0.1, 0.9"), ValueRange::new(0.1, 0.9));
        assert_eq!(ValueRange::parse("-1 1"), ValueRange::new(-1.0, 1.0));
        assert_eq!(ValueRange::parse("3 1"), ValueRange::new(3.0, 3.0));
        assert!(ValueRange::parse("1").is_none());
        assert!(ValueRange::parse("a b").is_none());
        assert!(ValueRange::parse("1 2 3").is_none());
    }

    #[test]
    fn normalize_clips_and_handles_zero_width() {
        let range = ValueRange::new(10.0, 20.0).unwrap();
        assert_eq!(range.normalize(15.0), 0.5);
        assert_eq!(range.normalize(-5.0), 0.0);
        assert_eq!(range.normalize(50.0), 1.0);
        assert_eq!(ValueRange::new(3.0, 3.0).unwrap().normalize(9.0), 0.0);
    }

    #[test]
    fn render_marks_missing_cells() {
        let plane = array![[0.0, f64::NAN], [1.0, 0.5]];
        let image = render_plane(plane.view(), ValueRange::default(), ColorPalette::BlueRed);
        assert_eq!((image.height, image.width), (2, 2));
        assert_eq!(image.pixel(0, 0), Some([0, 0, 255]));
        assert_eq!(image.pixel(0, 1), None);
        assert_eq!(image.pixel(1, 0), Some([255, 0, 0]));
        assert_eq!(image.pixel(1, 1), Some([255, 255, 255]));
        assert_eq!(image.pixel(2, 0), None);
    }
}
