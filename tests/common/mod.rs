//! NetCDF fixtures shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Rows of every fixture grid.
pub const ROWS: usize = 4;
/// Columns of every fixture grid.
pub const COLS: usize = 5;
/// Days between consecutive fixture layers.
pub const STEP_DAYS: f64 = 16.0;
/// `(row, col)` of the `ndvi` cell holding the fill value in every layer.
pub const FILL_CELL: (usize, usize) = (1, 2);
/// Fill value of the `ndvi` band.
pub const NDVI_FILL: f32 = -999.0;

/// Value of `red` at one cell.
pub fn red_value(t: usize, row: usize, col: usize) -> f64 {
    1000.0 * t as f64 + 10.0 * row as f64 + col as f64
}

/// Value of `ndvi` at one cell, before fill masking.
pub fn ndvi_value(t: usize, row: usize, col: usize) -> f32 {
    if (row, col) == FILL_CELL {
        NDVI_FILL
    } else {
        (t as f32 * 0.1) + (row * COLS + col) as f32 * 0.01
    }
}

/// Write a two-band `(time, y, x)` cube with `layers` time steps.
///
/// `time` is `days since 2020-01-01`, one layer every 16 days; `y` holds
/// descending latitudes and `x` ascending longitudes; the file declares
/// `crs = "EPSG:4326"`.
pub fn write_cube(dir: &Path, name: &str, layers: usize) -> PathBuf {
    let path = dir.join(name);
    let mut file = netcdf::create(&path).expect("create fixture");

    file.add_dimension("time", layers).unwrap();
    file.add_dimension("y", ROWS).unwrap();
    file.add_dimension("x", COLS).unwrap();
    file.add_attribute("crs", "EPSG:4326").unwrap();
    file.add_attribute("title", "fixture cube").unwrap();

    {
        let mut time = file.add_variable::<f64>("time", &["time"]).unwrap();
        time.put_attribute("units", "days since 2020-01-01").unwrap();
        time.put_attribute("calendar", "standard").unwrap();
        let values: Vec<f64> = (0..layers).map(|t| t as f64 * STEP_DAYS).collect();
        time.put_values(&values, ..).unwrap();
    }
    {
        let mut y = file.add_variable::<f64>("y", &["y"]).unwrap();
        y.put_attribute("units", "degrees_north").unwrap();
        let values: Vec<f64> = (0..ROWS).map(|r| -35.0 - 0.1 * r as f64).collect();
        y.put_values(&values, ..).unwrap();
    }
    {
        let mut x = file.add_variable::<f64>("x", &["x"]).unwrap();
        x.put_attribute("units", "degrees_east").unwrap();
        let values: Vec<f64> = (0..COLS).map(|c| 149.0 + 0.1 * c as f64).collect();
        x.put_values(&values, ..).unwrap();
    }
    {
        let mut red = file.add_variable::<f64>("red", &["time", "y", "x"]).unwrap();
        red.put_attribute("units", "reflectance").unwrap();
        let mut values = Vec::with_capacity(layers * ROWS * COLS);
        for t in 0..layers {
            for row in 0..ROWS {
                for col in 0..COLS {
                    values.push(red_value(t, row, col));
                }
            }
        }
        red.put_values(&values, ..).unwrap();
    }
    {
        let mut ndvi = file.add_variable::<f32>("ndvi", &["time", "y", "x"]).unwrap();
        ndvi.put_attribute("_FillValue", NDVI_FILL).unwrap();
        let mut values = Vec::with_capacity(layers * ROWS * COLS);
        for t in 0..layers {
            for row in 0..ROWS {
                for col in 0..COLS {
                    values.push(ndvi_value(t, row, col));
                }
            }
        }
        ndvi.put_values(&values, ..).unwrap();
    }

    path
}

/// Write a file that is not NetCDF at all.
pub fn write_garbage(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, "definitely not a cube").unwrap();
    path
}

/// File identifier of a path, as the viewer passes it around.
pub fn file_id(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
