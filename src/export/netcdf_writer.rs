//! NetCDF subset writer.

use crate::cube::{CubeHandle, SpatialAxis, PACKING_ATTRIBUTES, TIME_DIM};
use crate::error::{CubeviewError, Result};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Write one band and the given time layers to a new NetCDF file.
///
/// Layers keep the requested order. Values are written unpacked as `f64`,
/// so packing attributes of the source band are dropped. The file is built
/// next to `dest` and renamed over it, so a failed write leaves an existing
/// `dest` untouched.
pub fn write_subset_netcdf(cube: &CubeHandle, band: &str, time_indices: &[usize], dest: &Path) -> Result<()> {
    let source = cube.band(band)?;
    let (rows, cols) = cube.grid_shape();

    let mut values = Vec::with_capacity(time_indices.len() * rows * cols);
    let mut raw_times = Vec::with_capacity(time_indices.len());
    for &index in time_indices {
        let plane = cube.layer(band, index)?;
        values.extend(plane.iter().copied());
        raw_times.push(cube.time.raw[index]);
    }

    let partial = partial_path(dest);
    if let Err(e) = write_file(cube, band, &source.attributes, &values, &raw_times, &partial) {
        if let Err(cleanup) = std::fs::remove_file(&partial) {
            tracing::debug!("No partial export to remove at {}: {}", partial.display(), cleanup);
        }
        return Err(e);
    }
    std::fs::rename(&partial, dest)?;
    Ok(())
}

/// Sibling path the export is written to before it replaces `dest`.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(dest.file_name().unwrap_or_default());
    name.push(".partial");
    dest.with_file_name(name)
}

fn write_file(
    cube: &CubeHandle,
    band: &str,
    band_attributes: &BTreeMap<String, String>,
    values: &[f64],
    raw_times: &[f64],
    path: &Path,
) -> Result<()> {
    let (rows, cols) = cube.grid_shape();
    let mut file = netcdf::create(path)?;
    file.add_dimension(TIME_DIM, raw_times.len())?;
    file.add_dimension(&cube.y.name, rows)?;
    file.add_dimension(&cube.x.name, cols)?;

    for (key, value) in &cube.attributes {
        file.add_attribute(key, value.as_str())?;
    }

    {
        let mut time = file.add_variable::<f64>(TIME_DIM, &[TIME_DIM])?;
        time.put_attribute("units", cube.time.units.as_str())?;
        if let Some(calendar) = &cube.time.calendar {
            time.put_attribute("calendar", calendar.as_str())?;
        }
        time.put_values(raw_times, ..)?;
    }

    write_axis(&mut file, &cube.y)?;
    write_axis(&mut file, &cube.x)?;

    let mut var = file.add_variable::<f64>(band, &[TIME_DIM, cube.y.name.as_str(), cube.x.name.as_str()])?;
    for (key, value) in band_attributes {
        if PACKING_ATTRIBUTES.contains(&key.as_str()) {
            continue;
        }
        var.put_attribute(key, value.as_str())?;
    }
    var.put_values(values, ..)
        .map_err(|e| CubeviewError::NetCDF(format!("Failed to write '{}': {}", band, e)))?;

    Ok(())
}

fn write_axis(file: &mut netcdf::FileMut, axis: &SpatialAxis) -> Result<()> {
    let mut var = file.add_variable::<f64>(&axis.name, &[axis.name.as_str()])?;
    for (key, value) in &axis.attributes {
        if PACKING_ATTRIBUTES.contains(&key.as_str()) {
            continue;
        }
        var.put_attribute(key, value.as_str())?;
    }
    var.put_values(&axis.values, ..)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::sample_cube;

    #[test]
    fn partial_path_is_a_hidden_sibling() {
        assert_eq!(
            partial_path(Path::new("/data/out.nc")),
            PathBuf::from("/data/.out.nc.partial")
        );
    }

    #[test]
    fn failed_write_keeps_the_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.nc");
        std::fs::write(&dest, "old").unwrap();

        // Two axes with one name cannot both become dimensions.
        let mut cube = sample_cube(2);
        cube.x.name = cube.y.name.clone();

        assert!(write_subset_netcdf(&cube, "red", &[0, 1], &dest).is_err());
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "old");
        assert!(!partial_path(&dest).exists());
    }

    #[test]
    fn successful_write_replaces_the_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.nc");
        std::fs::write(&dest, "old").unwrap();

        write_subset_netcdf(&sample_cube(3), "red", &[2, 0], &dest).unwrap();
        assert_ne!(std::fs::read(&dest).unwrap(), b"old");
        assert!(!partial_path(&dest).exists());

        let file = netcdf::open(&dest).unwrap();
        let time = file.variable(TIME_DIM).unwrap();
        let raw: Vec<f64> = time.get_values(..).unwrap();
        assert_eq!(raw, vec![2.0, 0.0]);
    }
}
