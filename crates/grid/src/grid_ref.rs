//! Spatial reference shared by every grid in an archive.

/// Geometry of a regular grid: top-left corner, square cell size, and shape.
///
/// Rows run north to south, so the y coordinate of a cell decreases as the
/// row index increases.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRef {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// x coordinate of the top-left grid corner.
    pub origin_x: f64,
    /// y coordinate of the top-left grid corner.
    pub origin_y: f64,
    /// Cell edge length (same unit as the origin coordinates).
    pub cell_size: f64,
}

/// Tolerance for comparing grid geometries; raster writers round-trip
/// transforms through ASCII tags, so exact float equality is too strict.
const GEOM_EPS: f64 = 1e-9;

impl GridRef {
    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Returns true if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinates of the centre of cell (`row`, `col`).
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.origin_x + (col as f64 + 0.5) * self.cell_size,
            self.origin_y - (row as f64 + 0.5) * self.cell_size,
        )
    }

    /// Compares two references with a small float tolerance.
    pub fn matches(&self, other: &GridRef) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && (self.origin_x - other.origin_x).abs() < GEOM_EPS
            && (self.origin_y - other.origin_y).abs() < GEOM_EPS
            && (self.cell_size - other.cell_size).abs() < GEOM_EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference() -> GridRef {
        GridRef {
            rows: 4,
            cols: 3,
            origin_x: 10.0,
            origin_y: 44.0,
            cell_size: 0.5,
        }
    }

    #[test]
    fn cell_center_top_left() {
        let (x, y) = reference().cell_center(0, 0);
        assert_relative_eq!(x, 10.25, epsilon = 1e-12);
        assert_relative_eq!(y, 43.75, epsilon = 1e-12);
    }

    #[test]
    fn cell_center_bottom_right() {
        let (x, y) = reference().cell_center(3, 2);
        assert_relative_eq!(x, 11.25, epsilon = 1e-12);
        assert_relative_eq!(y, 42.25, epsilon = 1e-12);
    }

    #[test]
    fn matches_within_tolerance() {
        let a = reference();
        let mut b = reference();
        b.origin_x += 1e-12;
        assert!(a.matches(&b));
    }

    #[test]
    fn matches_rejects_shape_change() {
        let a = reference();
        let mut b = reference();
        b.cols = 4;
        assert!(!a.matches(&b));
    }

    #[test]
    fn matches_rejects_shifted_origin() {
        let a = reference();
        let mut b = reference();
        b.origin_y += 0.5;
        assert!(!a.matches(&b));
    }
}
