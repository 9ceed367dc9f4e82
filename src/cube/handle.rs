//! In-memory raster cube.

use crate::error::{CubeviewError, Result};
use crate::geo;
use chrono::NaiveDateTime;
use ndarray::{Array3, ArrayView2, Axis};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Label format for layer timestamps.
pub const TIME_LABEL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Compact timestamp format used in exported file names.
pub const TIME_STAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// The cube's time coordinate, decoded and raw.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    /// Decoded timestamps in file order.
    pub instants: Vec<NaiveDateTime>,
    /// Raw coordinate values as stored.
    pub raw: Vec<f64>,
    /// CF `units` attribute, e.g. `days since 1970-01-01`.
    pub units: String,
    /// CF `calendar` attribute, if any.
    pub calendar: Option<String>,
}

impl TimeAxis {
    /// Number of layers.
    pub fn len(&self) -> usize {
        self.instants.len()
    }

    /// Whether the axis is empty.
    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }
}

/// A named spatial coordinate (`y` or `x`).
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialAxis {
    /// Dimension name in the source file.
    pub name: String,
    /// Coordinate values, or pixel indices when the file has none.
    pub values: Vec<f64>,
    /// Coordinate attributes.
    pub attributes: BTreeMap<String, String>,
}

impl SpatialAxis {
    /// Build an axis of pixel indices for a dimension without a coordinate variable.
    pub fn indices(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            values: (0..len).map(|i| i as f64).collect(),
            attributes: BTreeMap::new(),
        }
    }

    /// Spacing between the first two coordinates (1.0 for a single cell).
    pub fn step(&self) -> f64 {
        match self.values.as_slice() {
            [a, b, ..] => b - a,
            _ => 1.0,
        }
    }

    /// First and last coordinate.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        Some((*self.values.first()?, *self.values.last()?))
    }
}

/// One band of the cube.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    /// Values indexed `(time, y, x)`, fill values replaced by NaN.
    pub data: Array3<f64>,
    /// Variable attributes as text.
    pub attributes: BTreeMap<String, String>,
    /// Source data type.
    pub dtype: String,
}

/// A parsed raster cube.
///
/// Immutable once built; the reader cache hands it out behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeHandle {
    /// Source file.
    pub path: PathBuf,
    /// Time coordinate.
    pub time: TimeAxis,
    /// Row coordinate.
    pub y: SpatialAxis,
    /// Column coordinate.
    pub x: SpatialAxis,
    /// Bands keyed (and therefore sorted) by name.
    pub bands: BTreeMap<String, Band>,
    /// Global attributes as text.
    pub attributes: BTreeMap<String, String>,
    /// Coordinate reference system, when the file declares one.
    pub crs: Option<String>,
}

impl CubeHandle {
    /// Number of time layers.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the cube has no layers.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Formatted timestamp labels in cube order.
    pub fn time_labels(&self) -> Vec<String> {
        self.time
            .instants
            .iter()
            .map(|t| t.format(TIME_LABEL_FORMAT).to_string())
            .collect()
    }

    /// Band names in sorted order.
    pub fn band_names(&self) -> Vec<String> {
        self.bands.keys().cloned().collect()
    }

    /// Look up a band.
    pub fn band(&self, name: &str) -> Result<&Band> {
        self.bands
            .get(name)
            .ok_or_else(|| CubeviewError::unknown_band(name))
    }

    /// Grid shape as `(rows, cols)`.
    pub fn grid_shape(&self) -> (usize, usize) {
        (self.y.values.len(), self.x.values.len())
    }

    /// One `(y, x)` plane of a band.
    pub fn layer(&self, band: &str, index: usize) -> Result<ArrayView2<'_, f64>> {
        let band = self.band(band)?;
        if index >= self.len() {
            return Err(CubeviewError::LayerOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(band.data.index_axis(Axis(0), index))
    }

    /// Human readable description of the cube.
    pub fn summary(&self) -> String {
        let (rows, cols) = self.grid_shape();
        let mut out = String::new();

        let _ = writeln!(out, "cube {}", self.path.display());
        let _ = writeln!(out, "dimensions:");
        let _ = writeln!(out, "\ttime = {} ;", self.len());
        let _ = writeln!(out, "\t{} = {} ;", self.y.name, rows);
        let _ = writeln!(out, "\t{} = {} ;", self.x.name, cols);

        let _ = writeln!(out, "\ncoordinates:");
        let _ = writeln!(out, "\ttime(time) ;");
        let _ = writeln!(out, "\t\ttime:units = {} ;", self.time.units);
        if let Some(calendar) = &self.time.calendar {
            let _ = writeln!(out, "\t\ttime:calendar = {} ;", calendar);
        }
        if let (Some(first), Some(last)) = (self.time.instants.first(), self.time.instants.last()) {
            let _ = writeln!(
                out,
                "\t\t{} .. {}",
                first.format(TIME_LABEL_FORMAT),
                last.format(TIME_LABEL_FORMAT)
            );
        }
        for axis in [&self.y, &self.x] {
            let _ = writeln!(out, "\t{0}({0}) ;", axis.name);
            if let Some((first, last)) = axis.bounds() {
                let _ = writeln!(out, "\t\t{} .. {}", first, last);
            }
        }

        let _ = writeln!(out, "\ndata variables:");
        for (name, band) in &self.bands {
            let _ = writeln!(
                out,
                "\t{} {}(time, {}, {}) ;",
                band.dtype, name, self.y.name, self.x.name
            );
            for (key, value) in &band.attributes {
                let _ = writeln!(out, "\t\t{}:{} = {} ;", name, key, value);
            }
        }

        if !self.attributes.is_empty() {
            let _ = writeln!(out, "\n// global attributes:");
            for (key, value) in &self.attributes {
                let _ = writeln!(out, "\t:{} = {} ;", key, value);
            }
        }

        if let Some(crs) = &self.crs {
            let _ = writeln!(out, "\ncrs: {}", crs);
            if geo::is_geographic(crs) {
                if let (Some(lon), Some(lat)) = (self.x.bounds(), self.y.bounds()) {
                    let bounds = geo::LatLonBounds { lon, lat };
                    let (center_lat, center_lon) = bounds.center();
                    let _ = writeln!(out, "map centre: {:.4}, {:.4}", center_lat, center_lon);
                    let _ = writeln!(out, "map zoom hint: {}", bounds.zoom_level(-0.5, 0));
                }
            }
        }

        out
    }
}
