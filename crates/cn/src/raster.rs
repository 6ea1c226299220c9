//! Locating and averaging per-zone curve number rasters.

use std::path::{Path, PathBuf};

use tracing::debug;

use piena_grid::read_esri_ascii;
use piena_stats::finite_mean;

use crate::error::CnError;

/// Extracts the zone number encoded at the end of a raster file stem.
///
/// Rasters carry the zone as a trailing digit run, usually zero padded to
/// two digits (`CN_II_05.asc`), sometimes bare (`cn5.asc`). Returns `None`
/// when the stem does not end in digits.
pub fn zone_suffix(stem: &str) -> Option<u32> {
    let digits: String = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Finds the single `.asc` raster for `zone_id` under `dir`.
///
/// Matching is by trailing zone number, case-insensitive on the extension.
/// Zero or multiple matches are errors so a misnamed raster cannot silently
/// feed the wrong zone.
pub fn find_zone_raster(dir: &Path, zone_id: u32) -> Result<PathBuf, CnError> {
    let entries = std::fs::read_dir(dir).map_err(|source| CnError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut matches: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CnError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_asc = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("asc"));
        if !is_asc {
            continue;
        }
        let stem = path.file_stem().and_then(|s| s.to_str());
        if stem.and_then(zone_suffix) == Some(zone_id) {
            matches.push(path);
        }
    }
    matches.sort();

    match matches.len() {
        0 => Err(CnError::NoRasterForZone {
            zone_id,
            dir: dir.to_path_buf(),
        }),
        1 => {
            let path = matches.remove(0);
            debug!(zone_id, path = %path.display(), "matched curve number raster");
            Ok(path)
        }
        _ => Err(CnError::AmbiguousRaster {
            zone_id,
            first: matches.remove(0),
            second: matches.remove(0),
        }),
    }
}

/// Reads the raster at `path` and returns the mean curve number over its
/// data cells. The mean must land in (0, 100].
pub fn mean_cn(path: &Path, zone_id: u32) -> Result<f64, CnError> {
    let raster = read_esri_ascii(path)?;
    let cn = finite_mean(&raster.values).ok_or(CnError::NoCnData { zone_id })?;
    if cn <= 0.0 || cn > 100.0 {
        return Err(CnError::CnOutOfRange { zone_id, cn });
    }
    Ok(cn)
}
