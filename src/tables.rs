//! CSV tables published per run.
//!
//! Tables carry one row per zone (`IM-05` labels) and one column per
//! percentile. No-data cells are left empty so spreadsheet consumers do
//! not mistake them for dry zones.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use csv::{ReaderBuilder, WriterBuilder};

/// File name of the percentile table for one accumulation window.
pub fn percentile_table_name(duration_hours: u32) -> String {
    format!("percentiles_{duration_hours}.csv")
}

/// Column labels for the configured percentiles (`p50`, `p99.9`).
pub fn percentile_labels(percentiles: &[f64]) -> Vec<String> {
    percentiles
        .iter()
        .map(|&p| {
            if p.fract() == 0.0 {
                format!("p{}", p as u32)
            } else {
                format!("p{p}")
            }
        })
        .collect()
}

/// Zone label used in the published tables and the curve number cache.
pub fn zone_label(zone_id: u32) -> String {
    format!("IM-{zone_id:02}")
}

fn parse_zone_label(label: &str) -> Option<u32> {
    let digits: String = label
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok()
}

/// Writes a zone table with the given value columns.
///
/// Values are rounded to `decimals` places; `None` cells stay empty.
pub fn write_table(
    path: &Path,
    labels: &[String],
    rows: &[(u32, Vec<Option<f64>>)],
    decimals: usize,
) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("cannot create table: {}", path.display()))?;

    let mut header = vec!["zone".to_string()];
    header.extend_from_slice(labels);
    writer.write_record(&header)?;

    for (zone_id, values) in rows {
        let mut record = vec![zone_label(*zone_id)];
        for value in values {
            record.push(match value {
                Some(v) => format!("{v:.decimals$}"),
                None => String::new(),
            });
        }
        writer.write_record(&record)?;
    }
    writer
        .flush()
        .with_context(|| format!("cannot write table: {}", path.display()))?;
    Ok(())
}

/// Reads a zone table back, returning the value column labels and the
/// per-zone rows in file order.
pub fn read_table(path: &Path) -> Result<(Vec<String>, Vec<(u32, Vec<Option<f64>>)>)> {
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("cannot read table: {}", path.display()))?;

    let labels: Vec<String> = reader
        .headers()
        .with_context(|| format!("table has no header: {}", path.display()))?
        .iter()
        .skip(1)
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("bad row in {}", path.display()))?;
        let label = record
            .get(0)
            .ok_or_else(|| anyhow!("empty row in {}", path.display()))?;
        let zone_id = parse_zone_label(label)
            .ok_or_else(|| anyhow!("bad zone label '{label}' in {}", path.display()))?;
        let mut values = Vec::with_capacity(labels.len());
        for cell in record.iter().skip(1) {
            if cell.is_empty() {
                values.push(None);
            } else {
                let v: f64 = cell
                    .parse()
                    .with_context(|| format!("bad value '{cell}' in {}", path.display()))?;
                values.push(Some(v));
            }
        }
        rows.push((zone_id, values));
    }
    Ok((labels, rows))
}
