//! Raster cube reading and caching.
//!
//! This module handles parsing NetCDF files into in-memory `(time, y, x)`
//! cubes and memoizing those reads.

mod cache;
mod handle;
mod reader;
mod store;
mod time;

pub use cache::{CacheStats, ReadResult, ReaderCache, DEFAULT_CAPACITY};
pub use handle::{Band, CubeHandle, SpatialAxis, TimeAxis, TIME_LABEL_FORMAT, TIME_STAMP_FORMAT};
pub use reader::{attr_value_to_string, read_cube, CubeOpener, NetcdfOpener, PACKING_ATTRIBUTES, TIME_DIM};
pub use store::CubeStore;
pub use time::{decode_times, TimeUnits};

#[cfg(test)]
pub(crate) use cache::tests::CountingOpener;
#[cfg(test)]
pub(crate) use handle::tests::sample_cube;
