//! JSON-backed curve number cache.
//!
//! The cache file maps zone keys (`IM-05`) to the resolved curve number and
//! the modification time of the raster it was computed from. A stale or
//! unreadable cache is never fatal, it just forces recomputation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CnError;

/// One cached curve number with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveNumberEntry {
    /// Mean curve number over the zone raster.
    pub cn: f64,
    /// Modification time of the source raster, seconds since the epoch.
    pub source_mtime_secs: i64,
    /// Sub-second part of the modification time.
    pub source_mtime_nanos: u32,
    /// Raster the value was computed from.
    pub source_path: PathBuf,
}

impl CurveNumberEntry {
    /// Whether the entry still describes the raster at `path` with the
    /// given modification time.
    pub fn is_current(&self, path: &Path, mtime: (i64, u32)) -> bool {
        self.source_path == path
            && (self.source_mtime_secs, self.source_mtime_nanos) == mtime
    }
}

/// Persistent zone to curve number map.
#[derive(Debug)]
pub struct CnCache {
    path: PathBuf,
    entries: BTreeMap<String, CurveNumberEntry>,
    dirty: bool,
}

impl CnCache {
    /// Opens the cache at `path`.
    ///
    /// A missing file yields an empty cache. A file that fails to parse is
    /// logged and discarded, so a damaged cache degrades to recomputation
    /// instead of aborting the run.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(body) => match serde_json::from_str(&body) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), %err, "discarding unreadable curve number cache");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                warn!(path = %path.display(), %err, "cannot read curve number cache, starting empty");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), entries = entries.len(), "opened curve number cache");
        CnCache {
            path,
            entries,
            dirty: false,
        }
    }

    /// Key under which a zone is stored, matching the zone naming used in
    /// the published tables.
    pub fn cache_key(zone_id: u32) -> String {
        format!("IM-{zone_id:02}")
    }

    pub fn get(&self, zone_id: u32) -> Option<&CurveNumberEntry> {
        self.entries.get(&Self::cache_key(zone_id))
    }

    pub fn put(&mut self, zone_id: u32, entry: CurveNumberEntry) {
        self.entries.insert(Self::cache_key(zone_id), entry);
        self.dirty = true;
    }

    /// Whether entries changed since open or the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the cache back to disk.
    ///
    /// The file is written to a sibling `.tmp` and renamed over the target
    /// so a crash cannot leave a half-written cache behind.
    pub fn save(&mut self) -> Result<(), CnError> {
        let body = serde_json::to_string_pretty(&self.entries).map_err(|err| CnError::Io {
            path: self.path.clone(),
            source: std::io::Error::other(err),
        })?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, body).map_err(|source| CnError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| CnError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), entries = self.entries.len(), "saved curve number cache");
        self.dirty = false;
        Ok(())
    }
}

/// Modification time of `path` as (seconds, nanos) since the epoch.
pub(crate) fn file_mtime(path: &Path) -> Result<(i64, u32), CnError> {
    let meta = std::fs::metadata(path).map_err(|source| CnError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let modified = meta.modified().map_err(|source| CnError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match modified.duration_since(UNIX_EPOCH) {
        Ok(d) => Ok((d.as_secs() as i64, d.subsec_nanos())),
        // Pre-epoch mtimes only appear on badly restored archives.
        Err(_) => Ok(pre_epoch_mtime(modified)),
    }
}

fn pre_epoch_mtime(modified: SystemTime) -> (i64, u32) {
    match UNIX_EPOCH.duration_since(modified) {
        Ok(d) => (-(d.as_secs() as i64), d.subsec_nanos()),
        Err(_) => (0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_zero_padded() {
        assert_eq!(CnCache::cache_key(5), "IM-05");
        assert_eq!(CnCache::cache_key(12), "IM-12");
    }

    #[test]
    fn entry_currency_tracks_path_and_mtime() {
        let entry = CurveNumberEntry {
            cn: 70.0,
            source_mtime_secs: 100,
            source_mtime_nanos: 5,
            source_path: PathBuf::from("/data/cn_05.asc"),
        };
        assert!(entry.is_current(Path::new("/data/cn_05.asc"), (100, 5)));
        assert!(!entry.is_current(Path::new("/data/cn_05.asc"), (101, 5)));
        assert!(!entry.is_current(Path::new("/data/cn_06.asc"), (100, 5)));
    }
}
