//! Layer export.
//!
//! Writes a subset of a cube's time layers either to one NetCDF file or to
//! one GeoTIFF per layer. Checks run in a fixed order and the first failure
//! wins: extension, then the source read, then the destination.

mod geotiff_writer;
mod netcdf_writer;

pub use geotiff_writer::write_layer_geotiff;
pub use netcdf_writer::write_subset_netcdf;

use crate::cube::{ReaderCache, TIME_STAMP_FORMAT};
use crate::error::ExportError;
use std::path::{Path, PathBuf};

/// Reference time position used to stamp GeoTIFF file names.
///
/// Every file of one export carries this layer's timestamp, whichever layer
/// it holds.
pub const GEOTIFF_STAMP_INDEX: usize = 1;

/// Output format, chosen by the destination extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One multi-layer NetCDF file.
    Netcdf,
    /// One GeoTIFF per layer.
    GeoTiff,
}

impl ExportFormat {
    /// Pick the format for a destination path.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("nc") => Ok(Self::Netcdf),
            Some("tif") => Ok(Self::GeoTiff),
            other => Err(ExportError::InvalidExtension {
                extension: other.map(|e| format!(".{}", e)).unwrap_or_default(),
            }),
        }
    }
}

/// What to export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Source file identifier.
    pub file_id: String,
    /// Band to write (NetCDF only; GeoTIFFs carry every band).
    pub band: String,
    /// Time indices, in output order.
    pub time_indices: Vec<usize>,
    /// Destination file.
    pub dest: PathBuf,
    /// Replace existing files.
    pub overwrite: bool,
}

/// What an export wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportSummary {
    /// Path of the NetCDF file.
    Netcdf(PathBuf),
    /// Paths of the GeoTIFFs, in request order.
    GeoTiff(Vec<PathBuf>),
}

impl ExportSummary {
    /// Every path written.
    pub fn paths(&self) -> Vec<&Path> {
        match self {
            ExportSummary::Netcdf(path) => vec![path.as_path()],
            ExportSummary::GeoTiff(paths) => paths.iter().map(PathBuf::as_path).collect(),
        }
    }
}

impl std::fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let paths: Vec<String> = self.paths().iter().map(|p| p.display().to_string()).collect();
        write!(f, "{}", paths.join(", "))
    }
}

/// Export the requested layers.
///
/// GeoTIFFs already written stay on disk when a later layer fails.
pub fn export_layers(reader: &mut ReaderCache, request: &ExportRequest) -> Result<ExportSummary, ExportError> {
    let format = ExportFormat::from_path(&request.dest)?;
    let cube = reader.read(&request.file_id)?;

    match format {
        ExportFormat::Netcdf => {
            if request.dest.exists() && !request.overwrite {
                return Err(ExportError::FileExists {
                    path: request.dest.clone(),
                });
            }
            write_subset_netcdf(&cube, &request.band, &request.time_indices, &request.dest)?;
            tracing::info!(
                "Wrote {} layers of {} to {}",
                request.time_indices.len(),
                request.band,
                request.dest.display()
            );
            Ok(ExportSummary::Netcdf(request.dest.clone()))
        },
        ExportFormat::GeoTiff => {
            let stamp = cube
                .time
                .instants
                .get(GEOTIFF_STAMP_INDEX)
                .ok_or_else(|| {
                    ExportError::WriteFailure(format!(
                        "index {} is out of bounds for time axis with size {}",
                        GEOTIFF_STAMP_INDEX,
                        cube.len()
                    ))
                })?
                .format(TIME_STAMP_FORMAT)
                .to_string();
            let target = stamped_path(&request.dest, &stamp);

            let mut written = Vec::with_capacity(request.time_indices.len());
            for &index in &request.time_indices {
                write_layer_geotiff(&cube, index, &target, request.overwrite)?;
                tracing::info!("Wrote layer {} to {}", index, target.display());
                written.push(target.clone());
            }
            Ok(ExportSummary::GeoTiff(written))
        },
    }
}

/// `{dir}/{stem}-{stamp}.tif` for a destination `{dir}/{stem}.tif`.
pub fn stamped_path(dest: &Path, stamp: &str) -> PathBuf {
    let stem = dest
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    dest.with_file_name(format!("{}-{}.tif", stem, stamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("a/out.nc")), Ok(ExportFormat::Netcdf));
        assert_eq!(ExportFormat::from_path(Path::new("out.tif")), Ok(ExportFormat::GeoTiff));
        assert_eq!(
            ExportFormat::from_path(Path::new("out.xyz")),
            Err(ExportError::InvalidExtension {
                extension: ".xyz".to_string()
            })
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("out")),
            Err(ExportError::InvalidExtension {
                extension: String::new()
            })
        );
    }

    #[test]
    fn stamped_path_keeps_directory() {
        assert_eq!(
            stamped_path(Path::new("out.tif"), "20210302T103000"),
            PathBuf::from("out-20210302T103000.tif")
        );
        assert_eq!(
            stamped_path(Path::new("/tmp/x/scene.tif"), "T"),
            PathBuf::from("/tmp/x/scene-T.tif")
        );
    }
}
