//! Hourly precipitation frames and their typed read outcomes.

use chrono::NaiveDateTime;

use crate::grid_ref::GridRef;

/// One hourly precipitation-intensity grid.
///
/// Values are mm, row-major; NaN marks cells outside coverage.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Hour this frame covers.
    pub timestamp: NaiveDateTime,
    /// Spatial reference, identical for all frames of an archive.
    pub grid_ref: GridRef,
    /// Cell values, `grid_ref.rows * grid_ref.cols` entries.
    pub values: Vec<f64>,
}

/// Outcome of reading one archive slot.
///
/// Missing and corrupt frames are ordinary data conditions for this
/// pipeline: they are counted and reported, never raised as errors.
#[derive(Debug, Clone)]
pub enum FrameOutcome {
    /// The frame was read and validated.
    Read(Frame),
    /// No file exists at the expected archive path.
    Missing,
    /// The file exists but could not be used.
    Corrupt {
        /// Why the frame was rejected.
        reason: String,
    },
}

impl FrameOutcome {
    /// Returns the frame if one was read.
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            FrameOutcome::Read(f) => Some(f),
            _ => None,
        }
    }

    /// Returns true for `Missing`.
    pub fn is_missing(&self) -> bool {
        matches!(self, FrameOutcome::Missing)
    }

    /// Returns true for `Corrupt`.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, FrameOutcome::Corrupt { .. })
    }
}

/// Source of hourly frames keyed by timestamp.
///
/// [`GridStore`](crate::GridStore) is the archive-backed implementation;
/// accumulation and quality control are written against this trait so they
/// can be exercised without touching the filesystem.
pub trait FrameSource {
    /// Reads the frame for `timestamp`, reporting absence or corruption as
    /// a typed outcome.
    fn read_frame(&mut self, timestamp: NaiveDateTime) -> FrameOutcome;
}
