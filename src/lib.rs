//! Cubeview - a terminal viewer and exporter for time-series raster cubes.
//!
//! A cube is a NetCDF file whose bands share a `(time, y, x)` grid. Cubeview
//! reads cubes through a bounded memoizing cache, renders single time layers
//! with a fixed palette and exports a chosen subset of layers to NetCDF or
//! GeoTIFF.
//!
//! # Features
//!
//! - LRU-cached cube reads, failures included
//! - Cached layer rendering keyed by band, layer and value range
//! - Per-session layer selection with grid and slider layouts
//! - NetCDF subset and per-layer GeoTIFF export
//! - Gruvbox color themes
//! - Clipboard integration
//!
//! # Example
//!
//! ```ignore
//! use cubeview::cube::ReaderCache;
//! use cubeview::session::SelectionState;
//!
//! let mut reader = ReaderCache::new(128);
//! let mut session = SelectionState::new();
//! session.load_file(&mut reader, "scene.nc")?;
//! println!("{} layers", session.times().len());
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod app;
pub mod clipboard;
pub mod config;
pub mod cube;
pub mod error;
pub mod export;
pub mod geo;
pub mod render;
pub mod session;
pub mod ui;

pub use error::{CubeviewError, Result};
