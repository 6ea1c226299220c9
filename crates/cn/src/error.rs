use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving zone curve numbers.
#[derive(Debug, Error)]
pub enum CnError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no curve number raster for zone {zone_id} under {dir}")]
    NoRasterForZone { zone_id: u32, dir: PathBuf },

    #[error("zone {zone_id} matches more than one raster: {first} and {second}")]
    AmbiguousRaster {
        zone_id: u32,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("raster for zone {zone_id} has no usable cells")]
    NoCnData { zone_id: u32 },

    #[error("curve number {cn} for zone {zone_id} is outside (0, 100]")]
    CnOutOfRange { zone_id: u32, cn: f64 },

    #[error(transparent)]
    Raster(#[from] piena_grid::GridError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn error_text_names_the_zone() {
        let err = CnError::NoRasterForZone {
            zone_id: 7,
            dir: Path::new("/data/cn").to_path_buf(),
        };
        assert_eq!(
            err.to_string(),
            "no curve number raster for zone 7 under /data/cn"
        );

        let err = CnError::CnOutOfRange {
            zone_id: 3,
            cn: 104.2,
        };
        assert_eq!(
            err.to_string(),
            "curve number 104.2 for zone 3 is outside (0, 100]"
        );
    }

    #[test]
    fn errors_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CnError>();
    }
}
