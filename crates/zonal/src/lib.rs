//! # piena-zonal
//!
//! Maps cumulative precipitation grids onto named polygonal zones and
//! computes the requested percentiles per zone. A zone with no valid cell
//! yields no-data, which stays distinguishable from a dry zone.

mod aggregate;
mod error;
mod zone;

pub use aggregate::{CellRule, ZonalStat, aggregate, validate_percentiles};
pub use error::ZonalError;
pub use zone::{Zone, load_zones};
