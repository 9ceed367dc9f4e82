mod common;

use common::{file_id, write_cube, write_garbage};
use cubeview::cube::ReaderCache;
use cubeview::render::ValueRange;
use cubeview::session::{DisplayMode, SelectionState};

#[test]
fn empty_selection_means_every_layer() {
    let dir = tempfile::tempdir().unwrap();
    let id = file_id(&write_cube(dir.path(), "scene.nc", 5));
    let mut reader = ReaderCache::new(8);
    let mut session = SelectionState::new();

    session.load_file(&mut reader, &id).unwrap();
    assert_eq!(session.effective_selection(), vec![0, 1, 2, 3, 4]);
    assert!(session.selected_indices().is_empty());
}

#[test]
fn selecting_twice_keeps_the_layer_selected() {
    let dir = tempfile::tempdir().unwrap();
    let id = file_id(&write_cube(dir.path(), "scene.nc", 5));
    let mut reader = ReaderCache::new(8);
    let mut session = SelectionState::new();
    session.load_file(&mut reader, &id).unwrap();

    session.toggle_select(3, true).unwrap();
    session.toggle_select(3, true).unwrap();
    assert!(session.is_selected(3));
    assert_eq!(session.effective_selection(), vec![3]);
}

#[test]
fn loading_a_new_file_clears_the_selection() {
    let dir = tempfile::tempdir().unwrap();
    let first = file_id(&write_cube(dir.path(), "first.nc", 4));
    let second = file_id(&write_cube(dir.path(), "second.nc", 6));
    let mut reader = ReaderCache::new(8);
    let mut session = SelectionState::new();

    session.load_file(&mut reader, &first).unwrap();
    session.toggle_select(0, true).unwrap();
    session.toggle_select(2, true).unwrap();
    session
        .set_display_options("red", ValueRange::new(0.0, 5000.0).unwrap(), DisplayMode::Slider)
        .unwrap();

    session.load_file(&mut reader, &second).unwrap();
    assert!(session.selected_indices().is_empty());
    assert_eq!(session.effective_selection(), (0..6).collect::<Vec<_>>());
    assert_eq!(session.band(), Some("ndvi"));
    assert_eq!(session.display_mode(), DisplayMode::Grid);
    assert_eq!(session.active_file(), Some(second.as_str()));
}

#[test]
fn failed_load_leaves_an_empty_session() {
    let dir = tempfile::tempdir().unwrap();
    let good = file_id(&write_cube(dir.path(), "scene.nc", 3));
    let bad = file_id(&write_garbage(dir.path(), "broken.nc"));
    let mut reader = ReaderCache::new(8);
    let mut session = SelectionState::new();

    session.load_file(&mut reader, &good).unwrap();
    session.toggle_select(1, true).unwrap();

    let err = session.load_file(&mut reader, &bad).unwrap_err();
    assert!(!session.is_loaded());
    assert_eq!(session.error(), Some(&err));
    assert!(session.effective_selection().is_empty());
    assert!(session.toggle_select(0, true).is_err());

    session.load_file(&mut reader, &good).unwrap();
    assert!(session.is_loaded());
    assert!(session.selected_indices().is_empty());
}
