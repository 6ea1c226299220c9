use anyhow::{Context, Result};
use chrono::Local;
use tracing::{error, info, warn};

use piena_cn::{CnCache, CnError, resolve};
use piena_peq::transform_row;

use crate::cli::PeqArgs;
use crate::config::PienaConfig;
use crate::tables;

/// Transform the configured percentile table into equivalent
/// precipitation, publishing `Peq0_current.csv` plus a dated archive copy.
pub fn run(args: PeqArgs) -> Result<()> {
    let config = PienaConfig::load(&args.config)?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    let input = config
        .paths
        .output_root
        .join(tables::percentile_table_name(config.peq.input_duration));
    let (labels, rows) = tables::read_table(&input)?;
    info!(
        path = %input.display(),
        zones = rows.len(),
        duration = config.peq.input_duration,
        "loaded percentile table"
    );

    let mut cache = CnCache::open(config.cn_cache_file());

    let mut out_rows: Vec<(u32, Vec<Option<f64>>)> = Vec::with_capacity(rows.len());
    for (zone_id, values) in rows {
        let cn = match resolve(&mut cache, &config.paths.cn_raster_dir, zone_id) {
            Ok(cn) => cn,
            Err(err @ CnError::CnOutOfRange { .. }) => {
                // A broken raster, not a gap. The zone is dropped loudly
                // so the rest of the table still goes out.
                error!(zone_id, %err, "unusable curve number, zone left empty");
                out_rows.push((zone_id, vec![None; values.len()]));
                continue;
            }
            Err(err) => {
                warn!(zone_id, %err, "no curve number, zone left empty");
                out_rows.push((zone_id, vec![None; values.len()]));
                continue;
            }
        };
        let transformed = transform_row(&values, cn, config.peq.lambda)
            .with_context(|| format!("transform failed for zone {zone_id}"))?;
        out_rows.push((zone_id, transformed));
    }

    if cache.is_dirty() {
        cache.save().context("cannot save curve number cache")?;
    }

    let current = config.paths.output_root.join("Peq0_current.csv");
    tables::write_table(&current, &labels, &out_rows, 2)?;
    info!(path = %current.display(), "equivalent precipitation table written");

    let dated_dir = config
        .paths
        .output_root
        .join(date.format("%Y").to_string())
        .join(date.format("%m").to_string());
    std::fs::create_dir_all(&dated_dir)
        .with_context(|| format!("cannot create archive directory: {}", dated_dir.display()))?;
    let dated = dated_dir.join(format!("Peq0_{}.csv", date.format("%Y%m%d")));
    std::fs::copy(&current, &dated)
        .with_context(|| format!("cannot archive table: {}", dated.display()))?;
    info!(path = %dated.display(), "dated copy archived");

    Ok(())
}
