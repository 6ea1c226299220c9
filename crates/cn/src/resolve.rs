//! Cached curve number lookup.

use std::path::Path;

use tracing::{debug, info};

use crate::cache::{CnCache, CurveNumberEntry, file_mtime};
use crate::error::CnError;
use crate::raster::{find_zone_raster, mean_cn};

/// Returns the curve number for `zone_id`, from the cache when the source
/// raster is unchanged and recomputed from the raster otherwise.
///
/// A recomputed value is recorded in the cache but not persisted; call
/// [`CnCache::save`] once after the batch.
pub fn resolve(cache: &mut CnCache, raster_dir: &Path, zone_id: u32) -> Result<f64, CnError> {
    let path = find_zone_raster(raster_dir, zone_id)?;
    let mtime = file_mtime(&path)?;

    if let Some(entry) = cache.get(zone_id) {
        if entry.is_current(&path, mtime) {
            debug!(zone_id, cn = entry.cn, "curve number cache hit");
            return Ok(entry.cn);
        }
        debug!(zone_id, "curve number cache entry is stale");
    }

    let cn = mean_cn(&path, zone_id)?;
    info!(zone_id, cn, path = %path.display(), "computed curve number");
    cache.put(
        zone_id,
        CurveNumberEntry {
            cn,
            source_mtime_secs: mtime.0,
            source_mtime_nanos: mtime.1,
            source_path: path,
        },
    );
    Ok(cn)
}
