use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};

/// Piena flood-risk precipitation processor.
#[derive(Parser)]
#[command(
    name = "piena",
    version,
    about = "Cumulative precipitation and equivalent rainfall for flood-risk operations"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Cumulate archive frames and publish per-zone percentile tables.
    Cumulate(CumulateArgs),
    /// Transform a percentile table into equivalent precipitation.
    Peq(PeqArgs),
    /// Check the archive for missing or corrupt frames.
    Check(CheckArgs),
}

/// Arguments for the `cumulate` subcommand.
#[derive(clap::Args)]
pub struct CumulateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "piena.toml")]
    pub config: PathBuf,

    /// Anchor hour for the accumulation windows (e.g. 2024-03-07T12:00).
    /// Defaults to the newest frame in the archive.
    #[arg(long, value_parser = parse_hour)]
    pub end_time: Option<NaiveDateTime>,
}

/// Arguments for the `peq` subcommand.
#[derive(clap::Args)]
pub struct PeqArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "piena.toml")]
    pub config: PathBuf,

    /// Date stamped on the archived copy of the output table.
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// Arguments for the `check` subcommand.
#[derive(clap::Args)]
pub struct CheckArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "piena.toml")]
    pub config: PathBuf,

    /// Reference hour the lookback window ends at (e.g. 2024-03-07T12:00).
    /// Defaults to the current hour.
    #[arg(long, value_parser = parse_hour)]
    pub now: Option<NaiveDateTime>,
}

/// Parses an hour argument, accepting the ISO form and the compact archive
/// stamp (`2024030712`).
fn parse_hour(s: &str) -> Result<NaiveDateTime, String> {
    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ts);
        }
    }
    if s.len() == 10 && s.bytes().all(|b| b.is_ascii_digit()) {
        let day = NaiveDate::parse_from_str(&s[..8], "%Y%m%d");
        let hour: Option<u32> = s[8..].parse().ok();
        if let (Ok(day), Some(hour)) = (day, hour) {
            if let Some(ts) = day.and_hms_opt(hour, 0, 0) {
                return Ok(ts);
            }
        }
    }
    Err(format!(
        "cannot parse '{s}' as an hour; use 2024-03-07T12:00 or 2024030712"
    ))
}
