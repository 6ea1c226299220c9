//! Walks the expected hourly slots of the archive and classifies each one.

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info};

use piena_grid::{FrameOutcome, FrameSource};

use crate::report::{QualityRecord, QualityReport, SlotStatus, build_report};

/// Returns the expected hourly slots, oldest first.
///
/// The newest `excluded_recent_hours` before `process_start` are skipped so
/// frames still in transit are not reported as problems. The window then
/// covers the `lookback_hours` hours ending at that limit, inclusive.
pub fn expected_slots(
    process_start: NaiveDateTime,
    lookback_hours: u32,
    excluded_recent_hours: u32,
) -> Vec<NaiveDateTime> {
    let limit = process_start - Duration::hours(i64::from(excluded_recent_hours));
    (0..i64::from(lookback_hours))
        .rev()
        .map(|back| limit - Duration::hours(back))
        .collect()
}

/// Checks every expected slot against the archive and folds the outcomes
/// into a [`QualityReport`].
pub fn run_check(
    source: &mut dyn FrameSource,
    process_start: NaiveDateTime,
    lookback_hours: u32,
    excluded_recent_hours: u32,
) -> QualityReport {
    let slots = expected_slots(process_start, lookback_hours, excluded_recent_hours);
    let limit = process_start - Duration::hours(i64::from(excluded_recent_hours));
    let checked_from = slots.first().copied().unwrap_or(limit);
    let checked_to = slots.last().copied().unwrap_or(limit);
    info!(
        from = %checked_from,
        to = %checked_to,
        slots = slots.len(),
        "checking archive quality"
    );

    let records: Vec<QualityRecord> = slots
        .into_iter()
        .map(|timestamp| {
            let status = match source.read_frame(timestamp) {
                FrameOutcome::Read(_) => SlotStatus::Present,
                FrameOutcome::Missing => SlotStatus::Missing,
                FrameOutcome::Corrupt { reason } => {
                    debug!(%timestamp, reason, "corrupt archive slot");
                    SlotStatus::Corrupt
                }
            };
            QualityRecord { timestamp, status }
        })
        .collect();

    build_report(checked_from, checked_to, &records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn slots_end_at_the_exclusion_limit() {
        let slots = expected_slots(at(7, 12), 6, 2);
        assert_eq!(slots.len(), 6);
        assert_eq!(slots[0], at(7, 5));
        assert_eq!(slots[5], at(7, 10));
    }

    #[test]
    fn slots_cross_day_boundaries() {
        let slots = expected_slots(at(7, 1), 4, 0);
        assert_eq!(slots[0], at(6, 22));
        assert_eq!(slots[3], at(7, 1));
    }

    #[test]
    fn zero_lookback_yields_no_slots() {
        assert!(expected_slots(at(7, 12), 0, 0).is_empty());
    }

    #[test]
    fn no_exclusion_checks_up_to_the_start_hour() {
        let slots = expected_slots(at(7, 12), 3, 0);
        assert_eq!(slots, vec![at(7, 10), at(7, 11), at(7, 12)]);
    }
}
