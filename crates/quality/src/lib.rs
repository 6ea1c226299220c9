//! # piena-quality
//!
//! Summarizes archive completeness over a trailing lookback window into a
//! pass/fail-with-detail report. Quality control observes the same frame
//! read outcomes the accumulator sees and never halts the pipeline.

mod check;
mod report;

pub use check::{expected_slots, run_check};
pub use report::{QualityRecord, QualityReport, SlotStatus, build_report};
