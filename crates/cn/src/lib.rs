//! # piena-cn
//!
//! Resolves a mean SCS curve number for each alert zone from the ASCII
//! rasters published alongside the zone geometries. Because the rasters
//! change rarely and are slow to scan, resolved values are kept in a JSON
//! cache keyed by zone and invalidated by the raster's modification time.

mod cache;
mod error;
mod raster;
mod resolve;

pub use cache::{CnCache, CurveNumberEntry};
pub use error::CnError;
pub use raster::{find_zone_raster, mean_cn, zone_suffix};
pub use resolve::resolve;
