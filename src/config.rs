//! Viewer configuration.
//!
//! Built from command-line arguments in `main.rs`; everything has a default
//! so library users and tests can start from `ViewerConfig::default()`.

use crate::cube::DEFAULT_CAPACITY;
use crate::render::ColorPalette;

/// Cache sizing and rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum entries per cache.
    pub capacity: usize,
    /// Palette used to render layers.
    pub palette: ColorPalette,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            palette: ColorPalette::default(),
        }
    }
}

/// Configuration for the layer grid.
#[derive(Debug, Clone)]
pub struct GridLayoutConfig {
    /// Number of tile columns.
    pub columns: usize,
    /// Height of each tile in terminal rows, borders included.
    pub tile_height: u16,
}

impl Default for GridLayoutConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            tile_height: 12,
        }
    }
}

/// Configuration for heatmap drawing.
#[derive(Debug, Clone)]
pub struct HeatmapLayoutConfig {
    /// Terminal characters per pixel horizontally (for aspect ratio correction).
    pub pixel_width: usize,
    /// Width of the colorbar in characters.
    pub colorbar_width: usize,
}

impl Default for HeatmapLayoutConfig {
    fn default() -> Self {
        Self {
            pixel_width: 2, // 2:1 aspect ratio correction
            colorbar_width: 40,
        }
    }
}

/// Combined layout configuration.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Grid display mode.
    pub grid: GridLayoutConfig,
    /// Heatmap drawing.
    pub heatmap: HeatmapLayoutConfig,
    /// Width of the sidebar in columns.
    pub sidebar_width: u16,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid: GridLayoutConfig::default(),
            heatmap: HeatmapLayoutConfig::default(),
            sidebar_width: 34,
        }
    }
}

/// Everything the viewer needs to start.
#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    /// Cache options.
    pub cache: CacheConfig,
    /// Layout options.
    pub layout: LayoutConfig,
}
