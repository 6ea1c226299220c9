use std::path::Path;

use anyhow::{Context, Result};

use piena_quality::QualityReport;

/// Writes the notification hand-off file read by the mailer cron job.
///
/// The first line is `YES` when a notification should go out and `NO`
/// otherwise; the report body follows either way.
pub fn write_notice(path: &Path, report: &QualityReport) -> Result<()> {
    let flag = if report.notify() { "YES" } else { "NO" };
    let body = format!("{flag}\n\n{}", report.detail_payload());
    std::fs::write(path, body)
        .with_context(|| format!("cannot write notification file: {}", path.display()))?;
    Ok(())
}
