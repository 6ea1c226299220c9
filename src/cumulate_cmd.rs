use anyhow::{Context, Result, bail};
use chrono::{Duration, Local, NaiveDateTime};
use tracing::{info, warn};

use piena_accumulate::accumulate;
use piena_grid::GridStore;
use piena_quality::run_check;
use piena_zonal::{CellRule, aggregate, load_zones};

use crate::cli::CumulateArgs;
use crate::config::PienaConfig;
use crate::{notify, tables};

/// Run the accumulation pipeline: cumulate every configured window,
/// publish per-zone percentile tables and refresh the archive notice.
pub fn run(args: CumulateArgs) -> Result<()> {
    let config = PienaConfig::load(&args.config)?;
    let mut store = GridStore::new(&config.paths.archive_root);

    let end_time = match args.end_time {
        Some(ts) => ts,
        None => latest_end_time(&store)?,
    };
    info!(%end_time, "anchoring accumulation windows");

    let zones = load_zones(&config.paths.zones_geojson).with_context(|| {
        format!(
            "failed to load zones: {}",
            config.paths.zones_geojson.display()
        )
    })?;
    info!(zones = zones.len(), "zone geometries loaded");

    let grids = accumulate(&mut store, end_time, &config.cumulate.durations)
        .context("accumulation failed")?;

    std::fs::create_dir_all(&config.paths.output_root).with_context(|| {
        format!(
            "cannot create output directory: {}",
            config.paths.output_root.display()
        )
    })?;

    let labels = tables::percentile_labels(&config.cumulate.percentiles);
    for grid in &grids {
        let stats = aggregate(grid, &zones, &config.cumulate.percentiles, CellRule::Center)
            .with_context(|| {
                format!("zonal aggregation failed for {}h window", grid.duration_hours())
            })?;
        let rows: Vec<(u32, Vec<Option<f64>>)> =
            stats.into_iter().map(|s| (s.zone_id, s.values)).collect();

        let path = config
            .paths
            .output_root
            .join(tables::percentile_table_name(grid.duration_hours()));
        tables::write_table(&path, &labels, &rows, 1)?;

        if grid.frames_problematic() > 0 {
            warn!(
                duration = grid.duration_hours(),
                summed = grid.frames_summed(),
                problems = grid.frames_problematic(),
                "window cumulated with gaps"
            );
        }
        info!(
            duration = grid.duration_hours(),
            summed = grid.frames_summed(),
            path = %path.display(),
            "percentile table written"
        );
    }

    let report = run_check(
        &mut store,
        end_time,
        config.archive_check.lookback_hours,
        config.archive_check.excluded_recent_hours,
    );
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
        info!("archive complete over the checked window");
    }

    Ok(())
}

/// Newest frame hour in the archive, looking at today's directory and
/// falling back to yesterday's around midnight.
fn latest_end_time(store: &GridStore) -> Result<NaiveDateTime> {
    let today = Local::now().date_naive();
    for day in [today, today - Duration::days(1)] {
        if let Some(ts) = store.latest_frame_time(day) {
            return Ok(ts);
        }
    }
    bail!("no frames found for {today} or the day before; pass --end-time");
}
