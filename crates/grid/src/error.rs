//! Error types for the piena-grid crate.

use std::path::PathBuf;

/// Error type for static raster reads (ESRI ASCII grids).
///
/// Hourly frame reads never return this type; they report
/// [`FrameOutcome`](crate::FrameOutcome) instead.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Returned when the raster file cannot be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Returned when the ESRI ASCII header is malformed.
    #[error("{}: invalid ESRI ASCII header: {reason}", path.display())]
    InvalidHeader {
        /// Path of the offending file.
        path: PathBuf,
        /// What was wrong with the header.
        reason: String,
    },

    /// Returned when the data section holds the wrong number of cells.
    #[error("{}: expected {expected} cell values, found {found}", path.display())]
    CellCountMismatch {
        /// Path of the offending file.
        path: PathBuf,
        /// ncols * nrows from the header.
        expected: usize,
        /// Number of values actually present.
        found: usize,
    },

    /// Returned when a data token is not a number.
    #[error("{}: invalid cell value '{token}'", path.display())]
    InvalidCell {
        /// Path of the offending file.
        path: PathBuf,
        /// The unparseable token.
        token: String,
    },
}
