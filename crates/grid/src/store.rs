//! Filesystem-backed archive of hourly precipitation TIFFs.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tracing::{debug, warn};

use crate::frame::{Frame, FrameOutcome, FrameSource};
use crate::grid_ref::GridRef;

/// Archive file name prefix.
const FILE_PREFIX: &str = "MCM_";
/// Minute field plus extension; the archive holds one grid per full hour.
const FILE_SUFFIX: &str = "0000.tif";

/// GeoTIFF ModelPixelScaleTag.
const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
/// GeoTIFF ModelTiepointTag.
const TAG_MODEL_TIEPOINT: u16 = 33922;
/// GDAL_NODATA ASCII tag.
const TAG_GDAL_NODATA: u16 = 42113;

/// Builds the archive file name for an hour, e.g. `MCM_2024030715` +
/// `0000.tif`.
pub fn frame_file_name(timestamp: NaiveDateTime) -> String {
    format!("{FILE_PREFIX}{}{FILE_SUFFIX}", timestamp.format("%Y%m%d%H"))
}

/// Parses the hour out of an archive file name.
///
/// Returns `None` for anything that is not a well-formed frame name.
pub fn parse_frame_time(file_name: &str) -> Option<NaiveDateTime> {
    let stamp = file_name
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_SUFFIX)?;
    if stamp.len() != 10 || !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let date = NaiveDate::parse_from_str(&stamp[..8], "%Y%m%d").ok()?;
    let hour: u32 = stamp[8..10].parse().ok()?;
    date.and_hms_opt(hour, 0, 0)
}

/// Read access to an `ARCHIVE_ROOT/YYYY/MM/DD/MCM_YYYYMMDDHH0000.tif`
/// archive.
///
/// The spatial reference of the first frame read successfully becomes the
/// archive's canonical reference; later frames that disagree with it are
/// reported as corrupt.
#[derive(Debug)]
pub struct GridStore {
    archive_root: PathBuf,
    canonical: Option<GridRef>,
}

impl GridStore {
    /// Creates a store over `archive_root`.
    pub fn new(archive_root: impl Into<PathBuf>) -> Self {
        Self {
            archive_root: archive_root.into(),
            canonical: None,
        }
    }

    /// The canonical spatial reference, once one frame has been read.
    pub fn canonical_ref(&self) -> Option<&GridRef> {
        self.canonical.as_ref()
    }

    /// Directory holding the frames of one day.
    pub fn day_dir(&self, day: NaiveDate) -> PathBuf {
        self.archive_root
            .join(day.format("%Y").to_string())
            .join(day.format("%m").to_string())
            .join(day.format("%d").to_string())
    }

    /// Full path of the frame for `timestamp`.
    pub fn frame_path(&self, timestamp: NaiveDateTime) -> PathBuf {
        self.day_dir(timestamp.date())
            .join(frame_file_name(timestamp))
    }

    /// Hour of the newest frame archived under `day`, if any.
    ///
    /// Runs are anchored at the last archived hour rather than the wall
    /// clock, so a stalled acquisition chain does not shift the windows
    /// onto hours that cannot exist yet.
    pub fn latest_frame_time(&self, day: NaiveDate) -> Option<NaiveDateTime> {
        let dir = self.day_dir(day);
        let entries = std::fs::read_dir(&dir).ok()?;
        entries
            .filter_map(|e| e.ok())
            .filter_map(|e| parse_frame_time(&e.file_name().to_string_lossy()))
            .max()
    }

    fn decode(&self, path: &Path) -> Result<(GridRef, Vec<f64>), String> {
        let file = File::open(path).map_err(|e| format!("open failed: {e}"))?;
        let mut decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| format!("not a readable TIFF: {e}"))?;

        let (width, height) = decoder
            .dimensions()
            .map_err(|e| format!("cannot read dimensions: {e}"))?;
        let expected = width as usize * height as usize;

        let pixel_scale = decoder
            .find_tag(Tag::Unknown(TAG_MODEL_PIXEL_SCALE))
            .ok()
            .flatten()
            .and_then(|v| v.into_f64_vec().ok());
        let tiepoint = decoder
            .find_tag(Tag::Unknown(TAG_MODEL_TIEPOINT))
            .ok()
            .flatten()
            .and_then(|v| v.into_f64_vec().ok());
        let nodata = decoder
            .get_tag_ascii_string(Tag::Unknown(TAG_GDAL_NODATA))
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok());

        let mut values: Vec<f64> = match decoder
            .read_image()
            .map_err(|e| format!("failed to decode image data: {e}"))?
        {
            DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
            DecodingResult::F64(v) => v,
            other => {
                return Err(format!("unsupported sample format {other:?}"));
            }
        };

        if values.len() != expected {
            return Err(format!(
                "expected {expected} samples, found {}",
                values.len()
            ));
        }

        if let Some(nd) = nodata {
            for v in &mut values {
                if *v == nd {
                    *v = f64::NAN;
                }
            }
        }

        // ModelTiepoint maps raster (i, j) onto model (x, y); without geo
        // tags the grid falls back to unit cells with the top edge at
        // y = rows.
        let (cell_size, origin_x, origin_y) = match (pixel_scale, tiepoint) {
            (Some(s), Some(t)) if s.len() >= 2 && t.len() >= 6 => {
                (s[0], t[3] - t[0] * s[0], t[4] + t[1] * s[1])
            }
            _ => (1.0, 0.0, height as f64),
        };

        Ok((
            GridRef {
                rows: height as usize,
                cols: width as usize,
                origin_x,
                origin_y,
                cell_size,
            },
            values,
        ))
    }
}

impl FrameSource for GridStore {
    fn read_frame(&mut self, timestamp: NaiveDateTime) -> FrameOutcome {
        let path = self.frame_path(timestamp);

        let meta = match std::fs::metadata(&path) {
            Ok(m) if m.is_file() => m,
            _ => {
                debug!(path = %path.display(), "frame missing");
                return FrameOutcome::Missing;
            }
        };
        if meta.len() == 0 {
            warn!(path = %path.display(), "empty frame file");
            return FrameOutcome::Corrupt {
                reason: "empty file".to_string(),
            };
        }

        let (grid_ref, values) = match self.decode(&path) {
            Ok(decoded) => decoded,
            Err(reason) => {
                warn!(path = %path.display(), %reason, "corrupt frame");
                return FrameOutcome::Corrupt { reason };
            }
        };

        match &self.canonical {
            Some(canonical) if !canonical.matches(&grid_ref) => {
                warn!(path = %path.display(), "frame disagrees with archive reference");
                return FrameOutcome::Corrupt {
                    reason: "spatial reference differs from the archive's".to_string(),
                };
            }
            None => self.canonical = Some(grid_ref.clone()),
            _ => {}
        }

        if !values.iter().any(|v| v.is_finite()) {
            warn!(path = %path.display(), "frame holds no finite values");
            return FrameOutcome::Corrupt {
                reason: "no finite values".to_string(),
            };
        }

        FrameOutcome::Read(Frame {
            timestamp,
            grid_ref,
            values,
        })
    }
}
