//! Error types for Cubeview.
//!
//! This module provides a unified error handling approach using `thiserror`.
//! Reads, sessions and exports each get their own error type because the
//! viewer reports them in different places; `CubeviewError` covers the rest.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Cubeview operations.
pub type Result<T> = std::result::Result<T, CubeviewError>;

/// Errors that can occur in Cubeview.
#[derive(Debug, Error)]
pub enum CubeviewError {
    /// Failed to read or write NetCDF.
    #[error("NetCDF error: {0}")]
    NetCDF(String),

    /// The file has no usable time coordinate.
    #[error("No time coordinate found: {reason}")]
    TimeCoordinate { reason: String },

    /// The file has no variables shaped like a raster cube band.
    #[error("No (time, y, x) data variables found in {path}")]
    NoBands { path: PathBuf },

    /// Band is not part of the cube.
    #[error("Unknown band: {band}")]
    UnknownBand { band: String },

    /// Time index beyond the number of layers.
    #[error("Layer {index} is out of range for a cube with {len} layers")]
    LayerOutOfRange { index: usize, len: usize },

    /// A cached read failed.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// Failed to access clipboard.
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CubeviewError {
    /// Create a TimeCoordinate error.
    pub fn time_coordinate(reason: impl Into<String>) -> Self {
        Self::TimeCoordinate {
            reason: reason.into(),
        }
    }

    /// Create an UnknownBand error.
    pub fn unknown_band(band: impl Into<String>) -> Self {
        Self::UnknownBand { band: band.into() }
    }
}

impl From<netcdf::Error> for CubeviewError {
    fn from(err: netcdf::Error) -> Self {
        Self::NetCDF(err.to_string())
    }
}

/// A failed cube read, kept as the message of the original failure.
///
/// Cached by the reader cache and handed back on every later lookup, so it
/// must stay cheap to clone and comparable by value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ReadError {
    message: String,
}

impl ReadError {
    /// Create a read error from a failure description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The captured failure description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised by selection state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No cube is loaded in this session.
    #[error("No file loaded")]
    NotLoaded,

    /// Band is not part of the loaded cube.
    #[error("Unknown band: {band}")]
    UnknownBand { band: String },

    /// Time index beyond the number of layers.
    #[error("Layer {index} is out of range for a cube with {len} layers")]
    LayerOutOfRange { index: usize, len: usize },
}

/// Errors raised by layer export.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// Destination is neither `.nc` nor `.tif`.
    #[error("Choose a target file name ending with \".tif\" or \".nc\": {extension}")]
    InvalidExtension { extension: String },

    /// The source cube could not be read.
    #[error("{0}")]
    Read(#[from] ReadError),

    /// Destination exists and overwrite was not requested.
    #[error("File exists: {path}")]
    FileExists { path: PathBuf },

    /// The writer failed part way through.
    #[error("Write failed: {0}")]
    WriteFailure(String),
}

impl From<CubeviewError> for ExportError {
    fn from(err: CubeviewError) -> Self {
        Self::WriteFailure(err.to_string())
    }
}

impl From<tiff::TiffError> for ExportError {
    fn from(err: tiff::TiffError) -> Self {
        Self::WriteFailure(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::WriteFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_displays_message_unchanged() {
        let err = ReadError::new("NetCDF: Unknown file format");
        assert_eq!(err.to_string(), "NetCDF: Unknown file format");
        assert_eq!(err.message(), "NetCDF: Unknown file format");
    }

    #[test]
    fn export_error_wraps_read_error() {
        let err: ExportError = ReadError::new("missing").into();
        assert_eq!(err, ExportError::Read(ReadError::new("missing")));
        assert_eq!(err.to_string(), "missing");
    }
}
