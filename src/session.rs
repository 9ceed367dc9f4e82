//! Per-session selection state.
//!
//! One `SelectionState` belongs to one viewer session and is passed by
//! reference into each interaction. It moves between two phases:
//!
//! - **Empty**: nothing loaded, or the last load failed (`error` is set).
//! - **Loaded**: a cube is active; band, value range, display mode and the
//!   per-layer selection can be changed.
//!
//! Loading a different file always starts from a fresh selection.

use crate::cube::ReaderCache;
use crate::error::{ReadError, SessionError};
use crate::render::ValueRange;
use std::collections::BTreeMap;

/// How layers are laid out in the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Every layer as a tile.
    #[default]
    Grid,
    /// One layer at a time.
    Slider,
}

impl DisplayMode {
    /// Get the other mode.
    pub fn toggle(self) -> Self {
        match self {
            DisplayMode::Grid => DisplayMode::Slider,
            DisplayMode::Slider => DisplayMode::Grid,
        }
    }

    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            DisplayMode::Grid => "Grid",
            DisplayMode::Slider => "Slider",
        }
    }
}

/// Facts about the loaded cube the session needs between reads.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LoadedCube {
    times: Vec<String>,
    bands: Vec<String>,
}

/// Selection state of one browsing session.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    active_file: Option<String>,
    error: Option<ReadError>,
    cube: Option<LoadedCube>,
    band: Option<String>,
    value_range: ValueRange,
    selected: BTreeMap<usize, bool>,
    display_mode: DisplayMode,
}

impl SelectionState {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `file_id`, resetting the session.
    ///
    /// Asking for the file that is already active changes nothing, whether
    /// its last load succeeded or failed.
    pub fn load_file(&mut self, reader: &mut ReaderCache, file_id: &str) -> Result<(), ReadError> {
        if self.active_file.as_deref() == Some(file_id) {
            return match &self.error {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            };
        }

        self.active_file = Some(file_id.to_string());
        self.selected.clear();
        self.value_range = ValueRange::default();
        self.display_mode = DisplayMode::Grid;

        match reader.read(file_id) {
            Ok(cube) => {
                let bands = cube.band_names();
                self.band = bands.first().cloned();
                self.cube = Some(LoadedCube {
                    times: cube.time_labels(),
                    bands,
                });
                self.error = None;
                tracing::info!("Session loaded {}", file_id);
                Ok(())
            },
            Err(err) => {
                self.cube = None;
                self.band = None;
                self.error = Some(err.clone());
                tracing::warn!("Session failed to load {}: {}", file_id, err);
                Err(err)
            },
        }
    }

    /// Change band, value range and display mode together.
    ///
    /// The layer selection is kept.
    pub fn set_display_options(
        &mut self,
        band: &str,
        value_range: ValueRange,
        display_mode: DisplayMode,
    ) -> Result<(), SessionError> {
        let cube = self.cube.as_ref().ok_or(SessionError::NotLoaded)?;
        if !cube.bands.iter().any(|b| b == band) {
            return Err(SessionError::UnknownBand {
                band: band.to_string(),
            });
        }
        self.band = Some(band.to_string());
        self.value_range = value_range;
        self.display_mode = display_mode;
        Ok(())
    }

    /// Mark or unmark one layer for export.
    pub fn toggle_select(&mut self, time_index: usize, value: bool) -> Result<(), SessionError> {
        let len = self.layer_count().ok_or(SessionError::NotLoaded)?;
        if time_index >= len {
            return Err(SessionError::LayerOutOfRange {
                index: time_index,
                len,
            });
        }
        self.selected.insert(time_index, value);
        Ok(())
    }

    /// Layers to export: the checked ones, or every layer when none is checked.
    pub fn effective_selection(&self) -> Vec<usize> {
        let selected = self.selected_indices();
        if selected.is_empty() {
            (0..self.layer_count().unwrap_or(0)).collect()
        } else {
            selected
        }
    }

    /// Strictly the checked layers, in index order.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected
            .iter()
            .filter(|&(_, &on)| on)
            .map(|(&index, _)| index)
            .collect()
    }

    /// Whether one layer is checked.
    pub fn is_selected(&self, time_index: usize) -> bool {
        self.selected.get(&time_index).copied().unwrap_or(false)
    }

    /// Every layer's time label paired with its checked flag.
    pub fn selection_labels(&self) -> Vec<(String, bool)> {
        self.times()
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), self.is_selected(i)))
            .collect()
    }

    /// Whether a cube is loaded.
    pub fn is_loaded(&self) -> bool {
        self.cube.is_some()
    }

    /// File of the last load attempt.
    pub fn active_file(&self) -> Option<&str> {
        self.active_file.as_deref()
    }

    /// Error of the last load attempt.
    pub fn error(&self) -> Option<&ReadError> {
        self.error.as_ref()
    }

    /// Active band.
    pub fn band(&self) -> Option<&str> {
        self.band.as_deref()
    }

    /// Bands of the loaded cube, sorted.
    pub fn bands(&self) -> &[String] {
        self.cube.as_ref().map(|c| c.bands.as_slice()).unwrap_or(&[])
    }

    /// Time labels of the loaded cube.
    pub fn times(&self) -> &[String] {
        self.cube.as_ref().map(|c| c.times.as_slice()).unwrap_or(&[])
    }

    /// Number of layers of the loaded cube.
    pub fn layer_count(&self) -> Option<usize> {
        self.cube.as_ref().map(|c| c.times.len())
    }

    /// Display clipping range.
    pub fn value_range(&self) -> ValueRange {
        self.value_range
    }

    /// Layer layout.
    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }
}
