mod common;

use common::{file_id, write_cube, write_garbage, COLS, FILL_CELL, ROWS};
use cubeview::cube::{CubeStore, ReaderCache};
use cubeview::config::CacheConfig;
use cubeview::render::ValueRange;
use std::sync::Arc;

#[test]
fn repeated_reads_return_the_first_result() {
    let dir = tempfile::tempdir().unwrap();
    let id = file_id(&write_cube(dir.path(), "scene.nc", 4));
    let mut cache = ReaderCache::new(8);

    let first = cache.read(&id).unwrap();
    let second = cache.read(&id).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let stats = cache.stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));
}

#[test]
fn cube_axes_and_bands_are_decoded() {
    let dir = tempfile::tempdir().unwrap();
    let id = file_id(&write_cube(dir.path(), "scene.nc", 3));
    let mut cache = ReaderCache::new(8);

    assert_eq!(
        cache.times(&id).unwrap(),
        vec!["2020-01-01T00:00:00", "2020-01-17T00:00:00", "2020-02-02T00:00:00"]
    );
    assert_eq!(cache.bands(&id).unwrap(), vec!["ndvi", "red"]);

    let cube = cache.read(&id).unwrap();
    assert_eq!(cube.grid_shape(), (ROWS, COLS));
    assert_eq!(cube.crs.as_deref(), Some("EPSG:4326"));
    assert_eq!(cube.time.calendar.as_deref(), Some("standard"));

    let red = cube.layer("red", 2).unwrap();
    assert_eq!(red[[3, 4]], common::red_value(2, 3, 4));
}

#[test]
fn fill_values_become_nan() {
    let dir = tempfile::tempdir().unwrap();
    let id = file_id(&write_cube(dir.path(), "scene.nc", 2));
    let mut cache = ReaderCache::new(8);

    let cube = cache.read(&id).unwrap();
    let ndvi = cube.layer("ndvi", 1).unwrap();
    assert!(ndvi[[FILL_CELL.0, FILL_CELL.1]].is_nan());
    let expected = common::ndvi_value(1, 0, 1) as f64;
    assert!((ndvi[[0, 1]] - expected).abs() < 1e-6);
}

#[test]
fn summary_describes_the_cube() {
    let dir = tempfile::tempdir().unwrap();
    let id = file_id(&write_cube(dir.path(), "scene.nc", 2));
    let mut cache = ReaderCache::new(8);

    let summary = cache.summary(&id).unwrap();
    assert!(summary.contains("time = 2"));
    assert!(summary.contains("ndvi(time, y, x)"));
    assert!(summary.contains(":title = fixture cube"));
    assert!(summary.contains("crs: EPSG:4326"));
    assert!(summary.contains("map zoom hint"));
}

#[test]
fn failures_are_cached_until_invalidated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("late.nc");
    let id = file_id(&path);
    let mut cache = ReaderCache::new(8);

    let first = cache.read(&id).unwrap_err();
    // The file appears, but the cached failure still answers.
    write_cube(dir.path(), "late.nc", 2);
    let second = cache.read(&id).unwrap_err();
    assert_eq!(first, second);
    assert_eq!(cache.times(&id).unwrap_err(), first);

    assert!(cache.invalidate(&id));
    assert_eq!(cache.read(&id).unwrap().len(), 2);
}

#[test]
fn non_netcdf_files_fail_to_read() {
    let dir = tempfile::tempdir().unwrap();
    let id = file_id(&write_garbage(dir.path(), "notes.nc"));
    let mut cache = ReaderCache::new(8);

    let err = cache.read(&id).unwrap_err();
    assert!(!err.message().is_empty());
    assert_eq!(cache.summary(&id).unwrap_err(), err);
}

#[test]
fn renders_are_cached_per_range() {
    let dir = tempfile::tempdir().unwrap();
    let id = file_id(&write_cube(dir.path(), "scene.nc", 2));
    let mut store = CubeStore::new(&CacheConfig::default());

    let range = ValueRange::new(0.0, 1.0).unwrap();
    let first = store.render(&id, "ndvi", 1, range).unwrap();
    let again = store
        .render(&id, "ndvi", 1, ValueRange::new(0.0, 1.0).unwrap())
        .unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!((first.height, first.width), (ROWS, COLS));
    assert_eq!(first.pixel(FILL_CELL.0, FILL_CELL.1), None);
    assert!(first.pixel(0, 0).is_some());

    let wider = store
        .render(&id, "ndvi", 1, ValueRange::new(-1.0, 1.0).unwrap())
        .unwrap();
    assert!(!Arc::ptr_eq(&first, &wider));

    assert!(store.render(&id, "blue", 0, range).is_err());
    assert!(store.render(&id, "ndvi", 9, range).is_err());
}
