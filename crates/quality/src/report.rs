//! The archive quality report and its rendering.

use chrono::NaiveDateTime;

use piena_grid::frame_file_name;

/// How many offending file names the detail payload lists per category.
const MAX_LISTED: usize = 20;

/// State of one expected hourly archive slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    /// A valid frame exists for the slot.
    Present,
    /// No file exists for the slot.
    Missing,
    /// A file exists but could not be used.
    Corrupt,
}

/// One expected slot with its observed status.
#[derive(Debug, Clone, Copy)]
pub struct QualityRecord {
    /// The expected hour.
    pub timestamp: NaiveDateTime,
    /// Observed status.
    pub status: SlotStatus,
}

/// Aggregated archive quality over a checked window.
#[derive(Debug, Clone)]
pub struct QualityReport {
    /// First hour of the checked window.
    pub checked_from: NaiveDateTime,
    /// Last hour of the checked window.
    pub checked_to: NaiveDateTime,
    /// Number of slots checked.
    pub expected: usize,
    /// Number of slots with a valid frame.
    pub present: usize,
    /// Hours with no file, oldest first.
    pub missing: Vec<NaiveDateTime>,
    /// Hours with an unusable file, oldest first.
    pub corrupt: Vec<NaiveDateTime>,
}

impl QualityReport {
    /// Whether downstream notification should fire.
    pub fn notify(&self) -> bool {
        !self.missing.is_empty() || !self.corrupt.is_empty()
    }

    /// Total number of problematic slots.
    pub fn total_problems(&self) -> usize {
        self.missing.len() + self.corrupt.len()
    }

    /// Renders the human-readable report body handed to the notification
    /// channel.
    pub fn detail_payload(&self) -> String {
        let mut body = format!(
            "MCM ARCHIVE CONTROL REPORT\n\n\
             CHECKED PERIOD: {} - {}\n\n\
             SUMMARY:\n\
             - Expected files: {}\n\
             - Missing files: {}\n\
             - Corrupted files: {}\n\
             - Total problems: {}\n",
            self.checked_from.format("%Y-%m-%d %H:%M"),
            self.checked_to.format("%Y-%m-%d %H:%M"),
            self.expected,
            self.missing.len(),
            self.corrupt.len(),
            self.total_problems(),
        );
        append_file_list(&mut body, "MISSING FILES", &self.missing);
        append_file_list(&mut body, "CORRUPTED FILES", &self.corrupt);
        body
    }
}

fn append_file_list(body: &mut String, title: &str, times: &[NaiveDateTime]) {
    if times.is_empty() {
        return;
    }
    body.push_str(&format!("\n{title} ({}):\n", times.len()));
    for (i, &ts) in times.iter().take(MAX_LISTED).enumerate() {
        body.push_str(&format!("{:2}. {}\n", i + 1, frame_file_name(ts)));
    }
    if times.len() > MAX_LISTED {
        body.push_str(&format!("... and {} more files\n", times.len() - MAX_LISTED));
    }
}

/// Folds per-slot records into a report over the window
/// `[checked_from, checked_to]`.
pub fn build_report(
    checked_from: NaiveDateTime,
    checked_to: NaiveDateTime,
    records: &[QualityRecord],
) -> QualityReport {
    let mut report = QualityReport {
        checked_from,
        checked_to,
        expected: records.len(),
        present: 0,
        missing: Vec::new(),
        corrupt: Vec::new(),
    };
    for record in records {
        match record.status {
            SlotStatus::Present => report.present += 1,
            SlotStatus::Missing => report.missing.push(record.timestamp),
            SlotStatus::Corrupt => report.corrupt.push(record.timestamp),
        }
    }
    report
}
