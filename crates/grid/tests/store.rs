//! Archive read tests over real temp-dir TIFF files.

use chrono::{NaiveDate, NaiveDateTime};
use piena_grid::{FrameOutcome, FrameSource, GridStore};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use tiff::encoder::{TiffEncoder, colortype};

fn hour(h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 7)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn write_frame(root: &Path, ts: NaiveDateTime, width: u32, height: u32, data: &[f32]) {
    let store = GridStore::new(root);
    let path = store.frame_path(ts);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = File::create(&path).unwrap();
    let mut encoder = TiffEncoder::new(file).unwrap();
    encoder
        .write_image::<colortype::Gray32Float>(width, height, data)
        .unwrap();
}

#[test]
fn reads_a_valid_frame() {
    let dir = TempDir::new().unwrap();
    let data: Vec<f32> = (0..9).map(|i| i as f32 * 0.5).collect();
    write_frame(dir.path(), hour(6), 3, 3, &data);

    let mut store = GridStore::new(dir.path());
    let outcome = store.read_frame(hour(6));
    let frame = outcome.frame().expect("frame should be read");
    assert_eq!(frame.grid_ref.rows, 3);
    assert_eq!(frame.grid_ref.cols, 3);
    assert_eq!(frame.values.len(), 9);
    assert!((frame.values[4] - 2.0).abs() < 1e-9);
}

#[test]
fn absent_slot_is_missing() {
    let dir = TempDir::new().unwrap();
    let mut store = GridStore::new(dir.path());
    assert!(store.read_frame(hour(6)).is_missing());
}

#[test]
fn zero_byte_file_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let store = GridStore::new(dir.path());
    let path = store.frame_path(hour(6));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    File::create(&path).unwrap();

    let mut store = GridStore::new(dir.path());
    match store.read_frame(hour(6)) {
        FrameOutcome::Corrupt { reason } => assert!(reason.contains("empty")),
        other => panic!("expected corrupt, got {other:?}"),
    }
}

#[test]
fn non_tiff_bytes_are_corrupt() {
    let dir = TempDir::new().unwrap();
    let store = GridStore::new(dir.path());
    let path = store.frame_path(hour(6));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(&path).unwrap();
    f.write_all(b"this is not a raster").unwrap();

    let mut store = GridStore::new(dir.path());
    assert!(store.read_frame(hour(6)).is_corrupt());
}

#[test]
fn all_nan_frame_is_corrupt() {
    let dir = TempDir::new().unwrap();
    write_frame(dir.path(), hour(6), 2, 2, &[f32::NAN; 4]);

    let mut store = GridStore::new(dir.path());
    match store.read_frame(hour(6)) {
        FrameOutcome::Corrupt { reason } => assert!(reason.contains("no finite values")),
        other => panic!("expected corrupt, got {other:?}"),
    }
}

#[test]
fn dimension_change_is_corrupt() {
    let dir = TempDir::new().unwrap();
    write_frame(dir.path(), hour(6), 3, 3, &[1.0; 9]);
    write_frame(dir.path(), hour(7), 2, 2, &[1.0; 4]);

    let mut store = GridStore::new(dir.path());
    assert!(store.read_frame(hour(6)).frame().is_some());
    match store.read_frame(hour(7)) {
        FrameOutcome::Corrupt { reason } => {
            assert!(reason.contains("spatial reference"));
        }
        other => panic!("expected corrupt, got {other:?}"),
    }
}

#[test]
fn corrupt_frame_does_not_poison_later_reads() {
    let dir = TempDir::new().unwrap();
    write_frame(dir.path(), hour(6), 3, 3, &[1.0; 9]);
    write_frame(dir.path(), hour(7), 2, 2, &[1.0; 4]);
    write_frame(dir.path(), hour(8), 3, 3, &[2.0; 9]);

    let mut store = GridStore::new(dir.path());
    assert!(store.read_frame(hour(6)).frame().is_some());
    assert!(store.read_frame(hour(7)).is_corrupt());
    assert!(store.read_frame(hour(8)).frame().is_some());
}

#[test]
fn latest_frame_time_finds_newest_hour() {
    let dir = TempDir::new().unwrap();
    write_frame(dir.path(), hour(3), 2, 2, &[0.0; 4]);
    write_frame(dir.path(), hour(17), 2, 2, &[0.0; 4]);
    write_frame(dir.path(), hour(11), 2, 2, &[0.0; 4]);

    let store = GridStore::new(dir.path());
    let day = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    assert_eq!(store.latest_frame_time(day), Some(hour(17)));
}

#[test]
fn latest_frame_time_ignores_foreign_files() {
    let dir = TempDir::new().unwrap();
    write_frame(dir.path(), hour(5), 2, 2, &[0.0; 4]);
    let store = GridStore::new(dir.path());
    let day = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    std::fs::write(store.day_dir(day).join("notes.txt"), b"x").unwrap();
    assert_eq!(store.latest_frame_time(day), Some(hour(5)));
}

#[test]
fn latest_frame_time_empty_day_is_none() {
    let dir = TempDir::new().unwrap();
    let store = GridStore::new(dir.path());
    let day = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    assert_eq!(store.latest_frame_time(day), None);
}
