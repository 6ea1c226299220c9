//! Per-zone percentile aggregation.

use geo::{BoundingRect, Contains, Point};
use tracing::debug;

use piena_accumulate::CumulativeGrid;
use piena_grid::GridRef;

use crate::error::ZonalError;
use crate::zone::Zone;

/// Rule deciding which grid cells belong to a zone.
///
/// Only the cell-centre rule is implemented; boundary cells whose centre
/// falls outside the polygon are excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CellRule {
    /// A cell belongs to the zone iff its centre lies inside the polygon.
    #[default]
    Center,
}

/// Percentile values for one zone at one duration.
///
/// `values` runs parallel to the requested percentile list; `None` marks
/// no-data (a zone without a single valid cell), which is distinct from a
/// legitimate 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct ZonalStat {
    /// Zone identifier.
    pub zone_id: u32,
    /// Window length of the underlying cumulative grid.
    pub duration_hours: u32,
    /// One entry per requested percentile.
    pub values: Vec<Option<f64>>,
}

/// Checks a percentile request set: every value finite and in (0, 100],
/// no duplicates, at least one entry.
pub fn validate_percentiles(percentiles: &[f64]) -> Result<(), ZonalError> {
    if percentiles.is_empty() {
        return Err(ZonalError::NoPercentiles);
    }
    for (i, &p) in percentiles.iter().enumerate() {
        if !p.is_finite() || p <= 0.0 || p > 100.0 {
            return Err(ZonalError::InvalidPercentile { value: p });
        }
        if percentiles[..i].contains(&p) {
            return Err(ZonalError::DuplicatePercentile { value: p });
        }
    }
    Ok(())
}

/// Computes the requested percentiles for every zone over one cumulative
/// grid.
///
/// Cells are assigned to zones by `rule`, no-data cells are excluded, and
/// percentiles use linear interpolation between order statistics. The
/// result preserves the order of `zones`.
///
/// # Errors
///
/// Returns [`ZonalError`] only for an invalid percentile set; data gaps are
/// expressed as `None` values, never as errors.
pub fn aggregate(
    grid: &CumulativeGrid,
    zones: &[Zone],
    percentiles: &[f64],
    rule: CellRule,
) -> Result<Vec<ZonalStat>, ZonalError> {
    validate_percentiles(percentiles)?;

    let stats = zones
        .iter()
        .map(|zone| {
            let cells = match grid.grid_ref() {
                Some(grid_ref) => zone_cells(grid, grid_ref, zone, rule),
                None => Vec::new(),
            };
            let values = if cells.is_empty() {
                debug!(zone_id = zone.id, duration = grid.duration_hours(), "zone has no valid cells");
                vec![None; percentiles.len()]
            } else {
                piena_stats::percentiles(&cells, percentiles)
                    .into_iter()
                    .map(Some)
                    .collect()
            };
            ZonalStat {
                zone_id: zone.id,
                duration_hours: grid.duration_hours(),
                values,
            }
        })
        .collect();

    Ok(stats)
}

/// Finite values of the cells assigned to `zone`.
fn zone_cells(grid: &CumulativeGrid, grid_ref: &GridRef, zone: &Zone, rule: CellRule) -> Vec<f64> {
    let CellRule::Center = rule;

    let Some(rect) = zone.polygon.bounding_rect() else {
        return Vec::new();
    };

    // Candidate rows/cols are the cells whose centre falls inside the
    // polygon's bounding box; the exact test runs only on those.
    let col_lo = ((rect.min().x - grid_ref.origin_x) / grid_ref.cell_size - 0.5).ceil();
    let col_hi = ((rect.max().x - grid_ref.origin_x) / grid_ref.cell_size - 0.5).floor();
    let row_lo = ((grid_ref.origin_y - rect.max().y) / grid_ref.cell_size - 0.5).ceil();
    let row_hi = ((grid_ref.origin_y - rect.min().y) / grid_ref.cell_size - 0.5).floor();

    let col_lo = col_lo.max(0.0) as usize;
    let row_lo = row_lo.max(0.0) as usize;
    if col_hi < 0.0 || row_hi < 0.0 {
        return Vec::new();
    }
    let col_hi = (col_hi as usize).min(grid_ref.cols.saturating_sub(1));
    let row_hi = (row_hi as usize).min(grid_ref.rows.saturating_sub(1));

    let mut cells = Vec::new();
    for row in row_lo..=row_hi {
        for col in col_lo..=col_hi {
            let (x, y) = grid_ref.cell_center(row, col);
            if !zone.polygon.contains(&Point::new(x, y)) {
                continue;
            }
            if let Some(v) = grid.cell_value(row, col) {
                cells.push(v);
            }
        }
    }
    cells
}
