//! The cumulative precipitation grid produced for one duration.

use chrono::NaiveDateTime;

use piena_grid::GridRef;

/// A frame that could not contribute to a window.
#[derive(Debug, Clone)]
pub enum FrameProblem {
    /// No file existed for this hour.
    Missing {
        /// The affected hour.
        timestamp: NaiveDateTime,
    },
    /// The file existed but was rejected.
    Corrupt {
        /// The affected hour.
        timestamp: NaiveDateTime,
        /// Why the frame was rejected.
        reason: String,
    },
}

impl FrameProblem {
    /// The hour this problem refers to.
    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            FrameProblem::Missing { timestamp } => *timestamp,
            FrameProblem::Corrupt { timestamp, .. } => *timestamp,
        }
    }

    /// Returns true for `Missing`.
    pub fn is_missing(&self) -> bool {
        matches!(self, FrameProblem::Missing { .. })
    }
}

/// Sum of hourly frames over the trailing `duration_hours` ending at
/// `end_time`.
///
/// A missing or corrupt hour contributes zero; a cell is no-data (NaN) only
/// where not a single hour of the window supplied a finite value.
#[derive(Debug, Clone)]
pub struct CumulativeGrid {
    duration_hours: u32,
    end_time: NaiveDateTime,
    grid_ref: Option<GridRef>,
    values: Vec<f64>,
    valid_hours: Vec<u32>,
    frames_summed: u32,
    problems: Vec<FrameProblem>,
}

impl CumulativeGrid {
    pub(crate) fn new(
        duration_hours: u32,
        end_time: NaiveDateTime,
        grid_ref: Option<GridRef>,
        values: Vec<f64>,
        valid_hours: Vec<u32>,
        frames_summed: u32,
        problems: Vec<FrameProblem>,
    ) -> Self {
        Self {
            duration_hours,
            end_time,
            grid_ref,
            values,
            valid_hours,
            frames_summed,
            problems,
        }
    }

    /// Window length in hours.
    pub fn duration_hours(&self) -> u32 {
        self.duration_hours
    }

    /// Last hour included in the window.
    pub fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }

    /// Spatial reference, `None` when not a single frame of the window was
    /// readable.
    pub fn grid_ref(&self) -> Option<&GridRef> {
        self.grid_ref.as_ref()
    }

    /// Row-major cumulative values; NaN where no hour contributed.
    /// Empty when no frame was readable.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of hours that contributed a finite value, per cell.
    pub fn valid_hours(&self) -> &[u32] {
        &self.valid_hours
    }

    /// Value of cell (`row`, `col`), `None` where no-data.
    pub fn cell_value(&self, row: usize, col: usize) -> Option<f64> {
        let grid_ref = self.grid_ref.as_ref()?;
        let v = self.values[row * grid_ref.cols + col];
        v.is_finite().then_some(v)
    }

    /// Number of frames actually summed.
    pub fn frames_summed(&self) -> u32 {
        self.frames_summed
    }

    /// Number of missing or corrupt frames in the window.
    pub fn frames_problematic(&self) -> u32 {
        self.problems.len() as u32
    }

    /// The missing/corrupt frames of this window, newest first.
    pub fn problems(&self) -> &[FrameProblem] {
        &self.problems
    }
}
