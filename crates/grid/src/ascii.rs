//! ESRI ASCII grid reader for the static curve-number rasters.

use std::path::Path;

use crate::error::GridError;

/// A decoded ESRI ASCII grid. Nodata cells are stored as NaN.
#[derive(Debug, Clone)]
pub struct AsciiGrid {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// x coordinate of the lower-left grid corner.
    pub xllcorner: f64,
    /// y coordinate of the lower-left grid corner.
    pub yllcorner: f64,
    /// Cell edge length.
    pub cell_size: f64,
    /// Cell values, row-major from the north edge, NaN where nodata.
    pub values: Vec<f64>,
}

fn io_err(path: &Path, source: std::io::Error) -> GridError {
    GridError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn header_err(path: &Path, reason: impl Into<String>) -> GridError {
    GridError::InvalidHeader {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Reads an ESRI ASCII grid (`.asc`).
///
/// Header keys are matched case-insensitively; `nodata_value` is optional.
/// Both `xllcorner`/`yllcorner` and `xllcenter`/`yllcenter` anchors are
/// accepted, the latter shifted by half a cell.
pub fn read_esri_ascii(path: &Path) -> Result<AsciiGrid, GridError> {
    let text = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let mut lines = text.lines();

    let mut ncols: Option<usize> = None;
    let mut nrows: Option<usize> = None;
    let mut xll: Option<(f64, bool)> = None;
    let mut yll: Option<(f64, bool)> = None;
    let mut cell_size: Option<f64> = None;
    let mut nodata: Option<f64> = None;
    let mut first_data_line: Option<&str> = None;

    for line in lines.by_ref() {
        let mut parts = line.split_whitespace();
        let Some(key) = parts.next() else { continue };
        let key_lower = key.to_ascii_lowercase();
        let value = parts.next();

        let parse = |what: &str| -> Result<f64, GridError> {
            value
                .and_then(|v| v.parse::<f64>().ok())
                .ok_or_else(|| header_err(path, format!("unparseable {what}")))
        };

        match key_lower.as_str() {
            "ncols" => ncols = Some(parse("ncols")? as usize),
            "nrows" => nrows = Some(parse("nrows")? as usize),
            "xllcorner" => xll = Some((parse("xllcorner")?, false)),
            "yllcorner" => yll = Some((parse("yllcorner")?, false)),
            "xllcenter" => xll = Some((parse("xllcenter")?, true)),
            "yllcenter" => yll = Some((parse("yllcenter")?, true)),
            "cellsize" => cell_size = Some(parse("cellsize")?),
            "nodata_value" => nodata = Some(parse("nodata_value")?),
            _ => {
                // First non-header line starts the data section.
                first_data_line = Some(line);
                break;
            }
        }
    }

    let cols = ncols.ok_or_else(|| header_err(path, "missing ncols"))?;
    let rows = nrows.ok_or_else(|| header_err(path, "missing nrows"))?;
    let cell = cell_size.ok_or_else(|| header_err(path, "missing cellsize"))?;
    let (x, x_center) = xll.ok_or_else(|| header_err(path, "missing xllcorner"))?;
    let (y, y_center) = yll.ok_or_else(|| header_err(path, "missing yllcorner"))?;
    let xllcorner = if x_center { x - cell / 2.0 } else { x };
    let yllcorner = if y_center { y - cell / 2.0 } else { y };

    let expected = rows * cols;
    let mut values = Vec::with_capacity(expected);
    let data_lines = first_data_line.into_iter().chain(lines);
    for line in data_lines {
        for token in line.split_whitespace() {
            let v: f64 = token.parse().map_err(|_| GridError::InvalidCell {
                path: path.to_path_buf(),
                token: token.to_string(),
            })?;
            values.push(match nodata {
                Some(nd) if v == nd => f64::NAN,
                _ => v,
            });
        }
    }

    if values.len() != expected {
        return Err(GridError::CellCountMismatch {
            path: path.to_path_buf(),
            expected,
            found: values.len(),
        });
    }

    Ok(AsciiGrid {
        rows,
        cols,
        xllcorner,
        yllcorner,
        cell_size: cell,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    fn write_asc(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    const SMALL: &str = "\
ncols 3
nrows 2
xllcorner 10.0
yllcorner 44.0
cellsize 0.5
NODATA_value -9999
1.0 2.0 -9999
4.0 5.5 6.0
";

    #[test]
    fn reads_small_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_asc(&dir, "cn_05.asc", SMALL);
        let grid = read_esri_ascii(&path).unwrap();
        assert_eq!(grid.rows, 2);
        assert_eq!(grid.cols, 3);
        assert_relative_eq!(grid.xllcorner, 10.0, epsilon = 1e-12);
        assert_relative_eq!(grid.cell_size, 0.5, epsilon = 1e-12);
        assert!(grid.values[2].is_nan());
        assert_relative_eq!(grid.values[4], 5.5, epsilon = 1e-12);
    }

    #[test]
    fn accepts_center_anchors() {
        let dir = tempfile::tempdir().unwrap();
        let body = SMALL
            .replace("xllcorner 10.0", "xllcenter 10.25")
            .replace("yllcorner 44.0", "yllcenter 44.25");
        let path = write_asc(&dir, "cn_05.asc", &body);
        let grid = read_esri_ascii(&path).unwrap();
        assert_relative_eq!(grid.xllcorner, 10.0, epsilon = 1e-12);
        assert_relative_eq!(grid.yllcorner, 44.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_missing_header_field() {
        let dir = tempfile::tempdir().unwrap();
        let body = SMALL.replace("cellsize 0.5\n", "");
        let path = write_asc(&dir, "bad.asc", &body);
        let err = read_esri_ascii(&path).unwrap_err();
        assert!(err.to_string().contains("missing cellsize"));
    }

    #[test]
    fn rejects_short_data_section() {
        let dir = tempfile::tempdir().unwrap();
        let body = SMALL.replace("4.0 5.5 6.0\n", "4.0 5.5\n");
        let path = write_asc(&dir, "bad.asc", &body);
        let err = read_esri_ascii(&path).unwrap_err();
        assert!(err.to_string().contains("expected 6 cell values, found 5"));
    }

    #[test]
    fn rejects_garbage_cell() {
        let dir = tempfile::tempdir().unwrap();
        let body = SMALL.replace("5.5", "fiftyfive");
        let path = write_asc(&dir, "bad.asc", &body);
        let err = read_esri_ascii(&path).unwrap_err();
        assert!(err.to_string().contains("invalid cell value 'fiftyfive'"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_esri_ascii(&dir.path().join("absent.asc")).unwrap_err();
        assert!(matches!(err, GridError::Io { .. }));
    }
}
