use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level Piena configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PienaConfig {
    /// Filesystem layout.
    pub paths: PathsToml,

    /// Accumulation settings.
    #[serde(default)]
    pub cumulate: CumulateToml,

    /// Archive quality check settings.
    #[serde(default)]
    pub archive_check: ArchiveCheckToml,

    /// Equivalent precipitation settings.
    #[serde(default)]
    pub peq: PeqToml,
}

impl PienaConfig {
    /// Loads and parses the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config: {}", path.display()))?;
        toml::from_str(&body).with_context(|| format!("invalid config: {}", path.display()))
    }

    /// Location of the curve number cache file.
    pub fn cn_cache_file(&self) -> PathBuf {
        self.paths
            .cn_cache_file
            .clone()
            .unwrap_or_else(|| self.paths.output_root.join("cn_cache.json"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsToml {
    /// Root of the hourly precipitation archive (`YYYY/MM/DD` layout).
    pub archive_root: PathBuf,
    /// GeoJSON feature collection with the alert zone polygons.
    pub zones_geojson: PathBuf,
    /// Directory the output tables are published to.
    pub output_root: PathBuf,
    /// Directory holding the per-zone curve number rasters.
    pub cn_raster_dir: PathBuf,
    /// Curve number cache; defaults to `cn_cache.json` under the output root.
    #[serde(default)]
    pub cn_cache_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CumulateToml {
    /// Accumulation window lengths, in hours.
    #[serde(default = "default_durations")]
    pub durations: Vec<u32>,
    /// Percentiles published per zone.
    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<f64>,
}

impl Default for CumulateToml {
    fn default() -> Self {
        Self {
            durations: default_durations(),
            percentiles: default_percentiles(),
        }
    }
}

fn default_durations() -> Vec<u32> {
    vec![3, 6, 12, 24, 36, 48, 72, 96, 120]
}
fn default_percentiles() -> Vec<f64> {
    vec![50.0, 75.0, 95.0, 99.0]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveCheckToml {
    /// Hours of archive history checked per run.
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,
    /// Newest hours skipped because frames may still be in transit.
    #[serde(default = "default_excluded_recent_hours")]
    pub excluded_recent_hours: u32,
}

impl Default for ArchiveCheckToml {
    fn default() -> Self {
        Self {
            lookback_hours: default_lookback_hours(),
            excluded_recent_hours: default_excluded_recent_hours(),
        }
    }
}

fn default_lookback_hours() -> u32 {
    120
}
fn default_excluded_recent_hours() -> u32 {
    2
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeqToml {
    /// Initial abstraction ratio of the SCS-CN transform.
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    /// Duration whose percentile table feeds the transform, in hours.
    #[serde(default = "default_input_duration")]
    pub input_duration: u32,
}

impl Default for PeqToml {
    fn default() -> Self {
        Self {
            lambda: default_lambda(),
            input_duration: default_input_duration(),
        }
    }
}

fn default_lambda() -> f64 {
    0.2
}
fn default_input_duration() -> u32 {
    24
}
