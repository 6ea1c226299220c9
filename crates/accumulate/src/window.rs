//! Multi-duration accumulation with prefix reuse.

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info};

use piena_grid::{FrameOutcome, FrameSource, GridRef};

use crate::cumulative::{CumulativeGrid, FrameProblem};
use crate::error::AccumulateError;

/// Produces one [`CumulativeGrid`] per configured duration, all ending at
/// `end_time`.
///
/// The window for duration `d` covers the hours `(end_time - d, end_time]`.
/// Hours are visited newest first, so the running sum at the moment the
/// smallest duration completes is exactly that duration's grid, and the
/// longer durations keep extending the same sum instead of re-reading the
/// overlapping hours.
///
/// Durations are sorted ascending internally; the returned grids follow the
/// sorted order.
///
/// # Errors
///
/// Returns [`AccumulateError`] when the duration set is empty, contains
/// zero, or contains duplicates. Missing and corrupt frames are not errors;
/// they contribute zero and are recorded on each affected grid.
pub fn accumulate(
    source: &mut dyn FrameSource,
    end_time: NaiveDateTime,
    durations: &[u32],
) -> Result<Vec<CumulativeGrid>, AccumulateError> {
    let sorted = validate_durations(durations)?;
    let longest = *sorted.last().expect("validated durations are non-empty");

    let mut grid_ref: Option<GridRef> = None;
    let mut sum: Vec<f64> = Vec::new();
    let mut valid: Vec<u32> = Vec::new();
    let mut frames_summed = 0u32;
    let mut problems: Vec<FrameProblem> = Vec::new();

    let mut grids = Vec::with_capacity(sorted.len());
    let mut next = sorted.iter().copied().peekable();

    for offset in 0..longest {
        let timestamp = end_time - Duration::hours(i64::from(offset));
        match source.read_frame(timestamp) {
            FrameOutcome::Read(frame) => {
                if grid_ref.is_none() {
                    sum = vec![0.0; frame.grid_ref.len()];
                    valid = vec![0; frame.grid_ref.len()];
                    grid_ref = Some(frame.grid_ref.clone());
                }
                for (i, &v) in frame.values.iter().enumerate() {
                    if v.is_finite() {
                        sum[i] += v;
                        valid[i] += 1;
                    }
                }
                frames_summed += 1;
            }
            FrameOutcome::Missing => {
                problems.push(FrameProblem::Missing { timestamp });
            }
            FrameOutcome::Corrupt { reason } => {
                problems.push(FrameProblem::Corrupt { timestamp, reason });
            }
        }

        if next.peek() == Some(&(offset + 1)) {
            let duration = next.next().expect("peeked duration");
            grids.push(snapshot(
                duration,
                end_time,
                &grid_ref,
                &sum,
                &valid,
                frames_summed,
                &problems,
            ));
            info!(
                duration,
                frames_summed,
                problematic = problems.len(),
                "cumulative window complete"
            );
        }
    }

    Ok(grids)
}

fn validate_durations(durations: &[u32]) -> Result<Vec<u32>, AccumulateError> {
    if durations.is_empty() {
        return Err(AccumulateError::NoDurations);
    }
    let mut sorted = durations.to_vec();
    sorted.sort_unstable();
    if sorted[0] == 0 {
        return Err(AccumulateError::InvalidDuration { hours: 0 });
    }
    for pair in sorted.windows(2) {
        if pair[0] == pair[1] {
            return Err(AccumulateError::DuplicateDuration { hours: pair[0] });
        }
    }
    if sorted != durations {
        debug!("cumulation durations sorted ascending before prefix reuse");
    }
    Ok(sorted)
}

fn snapshot(
    duration: u32,
    end_time: NaiveDateTime,
    grid_ref: &Option<GridRef>,
    sum: &[f64],
    valid: &[u32],
    frames_summed: u32,
    problems: &[FrameProblem],
) -> CumulativeGrid {
    let values: Vec<f64> = sum
        .iter()
        .zip(valid.iter())
        .map(|(&s, &n)| if n > 0 { s } else { f64::NAN })
        .collect();
    CumulativeGrid::new(
        duration,
        end_time,
        grid_ref.clone(),
        values,
        valid.to_vec(),
        frames_summed,
        problems.to_vec(),
    )
}
