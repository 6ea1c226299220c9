//! Error types for the piena-zonal crate.

use std::path::PathBuf;

/// Error type for all fallible operations in the piena-zonal crate.
#[derive(Debug, thiserror::Error)]
pub enum ZonalError {
    /// Returned when the zone geometry file cannot be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Returned when the zone file is not valid GeoJSON.
    #[error("{}: invalid GeoJSON: {reason}", path.display())]
    InvalidGeoJson {
        /// Path of the offending file.
        path: PathBuf,
        /// Parser or structure diagnostic.
        reason: String,
    },

    /// Returned when a feature carries no usable `id` or `ZONA_IM`.
    #[error("zone feature {feature_index} has no usable 'id' or 'ZONA_IM' property")]
    MissingZoneId {
        /// Position of the feature in the collection.
        feature_index: usize,
    },

    /// Returned when a zone's geometry is not polygonal.
    #[error("zone {zone_id}: geometry must be Polygon or MultiPolygon")]
    UnsupportedGeometry {
        /// The affected zone.
        zone_id: u32,
    },

    /// Returned when two features carry the same zone id.
    #[error("duplicate zone id {zone_id}")]
    DuplicateZoneId {
        /// The duplicated id.
        zone_id: u32,
    },

    /// Returned when no percentiles are configured.
    #[error("no percentiles configured")]
    NoPercentiles,

    /// Returned when a percentile lies outside (0, 100].
    #[error("percentile must be in (0, 100], got {value}")]
    InvalidPercentile {
        /// The invalid percentile.
        value: f64,
    },

    /// Returned when the same percentile is configured twice.
    #[error("duplicate percentile {value}")]
    DuplicatePercentile {
        /// The duplicated percentile.
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_invalid_percentile() {
        let e = ZonalError::InvalidPercentile { value: 101.0 };
        assert_eq!(e.to_string(), "percentile must be in (0, 100], got 101");
    }

    #[test]
    fn error_duplicate_zone() {
        let e = ZonalError::DuplicateZoneId { zone_id: 7 };
        assert_eq!(e.to_string(), "duplicate zone id 7");
    }

    #[test]
    fn error_missing_zone_id() {
        let e = ZonalError::MissingZoneId { feature_index: 3 };
        assert_eq!(
            e.to_string(),
            "zone feature 3 has no usable 'id' or 'ZONA_IM' property"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<ZonalError>();
    }
}
