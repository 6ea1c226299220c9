//! Accumulation over a real temp-dir TIFF archive.

use approx::assert_relative_eq;
use chrono::{NaiveDate, NaiveDateTime};
use piena_accumulate::accumulate;
use piena_grid::GridStore;
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;
use tiff::encoder::{TiffEncoder, colortype};

fn hour(h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 2)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn write_frame(root: &std::path::Path, ts: NaiveDateTime, data: &[f32]) {
    let store = GridStore::new(root);
    let path = store.frame_path(ts);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = File::create(&path).unwrap();
    let mut encoder = TiffEncoder::new(file).unwrap();
    encoder
        .write_image::<colortype::Gray32Float>(2, 2, data)
        .unwrap();
}

#[test]
fn store_backed_window_tolerates_archive_gaps() {
    let dir = TempDir::new().unwrap();
    let end = hour(20);

    // Hours 9..=20: hour 14 absent, hour 17 unreadable.
    for h in 9..=20u32 {
        if h == 14 {
            continue;
        }
        if h == 17 {
            let store = GridStore::new(dir.path());
            let path = store.frame_path(hour(h));
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            File::create(&path)
                .unwrap()
                .write_all(b"garbage")
                .unwrap();
            continue;
        }
        write_frame(dir.path(), hour(h), &[1.0, 2.0, 0.0, 0.5]);
    }

    let mut store = GridStore::new(dir.path());
    let grids = accumulate(&mut store, end, &[3, 12]).unwrap();

    let three = &grids[0];
    assert_eq!(three.duration_hours(), 3);
    assert_eq!(three.frames_summed(), 3);
    assert_eq!(three.frames_problematic(), 0);
    assert_relative_eq!(three.cell_value(0, 1).unwrap(), 6.0, epsilon = 1e-6);

    let twelve = &grids[1];
    assert_eq!(twelve.duration_hours(), 12);
    assert_eq!(twelve.frames_summed(), 10);
    assert_eq!(twelve.frames_problematic(), 2);
    assert_relative_eq!(twelve.cell_value(0, 0).unwrap(), 10.0, epsilon = 1e-6);
    assert_relative_eq!(twelve.cell_value(1, 1).unwrap(), 5.0, epsilon = 1e-6);

    let n_missing = twelve.problems().iter().filter(|p| p.is_missing()).count();
    assert_eq!(n_missing, 1);
}
