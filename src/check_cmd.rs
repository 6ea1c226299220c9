use anyhow::{Context, Result};
use chrono::{Local, Timelike};
use tracing::{info, warn};

use piena_grid::GridStore;
use piena_quality::run_check;

use crate::cli::CheckArgs;
use crate::config::PienaConfig;
use crate::notify;

/// Run the archive quality check on its own and write the notification
/// hand-off file.
pub fn run(args: CheckArgs) -> Result<()> {
    let config = PienaConfig::load(&args.config)?;
    let now = match args.now {
        Some(ts) => ts,
        None => Local::now()
            .naive_local()
            .with_minute(0)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))
            .context("cannot truncate current time to the hour")?,
    };

    let mut store = GridStore::new(&config.paths.archive_root);
    let report = run_check(
        &mut store,
        now,
        config.archive_check.lookback_hours,
        config.archive_check.excluded_recent_hours,
    );

    std::fs::create_dir_all(&config.paths.output_root).with_context(|| {
        format!(
            "cannot create output directory: {}",
            config.paths.output_root.display()
        )
    })?;
    let notice = config.paths.output_root.join("mail_output.txt");
    notify::write_notice(&notice, &report)?;

    if report.notify() {
        warn!(
            missing = report.missing.len(),
            corrupt = report.corrupt.len(),
            path = %notice.display(),
            "archive problems reported"
        );
    } else {
        info!(
            expected = report.expected,
            present = report.present,
            "archive complete over the checked window"
        );
    }
    Ok(())
}
