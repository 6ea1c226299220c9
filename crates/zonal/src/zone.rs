//! Zone geometry loading.

use std::collections::BTreeSet;
use std::path::Path;

use geo::MultiPolygon;
use geojson::GeoJson;
use tracing::info;

use crate::error::ZonalError;

/// An immutable polygonal zone with its integer identifier.
#[derive(Debug, Clone)]
pub struct Zone {
    /// Unique zone identifier.
    pub id: u32,
    /// Zone geometry; plain polygons are promoted to single-part
    /// multipolygons.
    pub polygon: MultiPolygon<f64>,
}

/// Extracts a zone id from an `id`/`ZONA_IM` property value.
///
/// Accepts integers, integral floats, digit strings, and the `IM-05`/`IM5`
/// label forms the zone shapefiles have carried historically.
fn parse_zone_id(value: &serde_json::Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    if let Some(f) = value.as_f64() {
        if f.fract() == 0.0 && f > 0.0 && f < u32::MAX as f64 {
            return Some(f as u32);
        }
        return None;
    }
    let s = value.as_str()?.trim().to_ascii_uppercase().replace(' ', "");
    let digits = s
        .strip_prefix("IM-")
        .or_else(|| s.strip_prefix("IM"))
        .unwrap_or(&s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn feature_zone_id(feature: &geojson::Feature) -> Option<u32> {
    let properties = feature.properties.as_ref()?;
    properties
        .get("id")
        .and_then(parse_zone_id)
        .or_else(|| properties.get("ZONA_IM").and_then(parse_zone_id))
}

/// Loads the zone collection from a GeoJSON FeatureCollection.
///
/// Each feature must be a Polygon or MultiPolygon carrying a unique integer
/// id under property `id` or `ZONA_IM`.
pub fn load_zones(path: &Path) -> Result<Vec<Zone>, ZonalError> {
    let text = std::fs::read_to_string(path).map_err(|e| ZonalError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let geojson: GeoJson = text.parse().map_err(|e| ZonalError::InvalidGeoJson {
        path: path.to_path_buf(),
        reason: format!("{e}"),
    })?;
    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(ZonalError::InvalidGeoJson {
                path: path.to_path_buf(),
                reason: "expected a FeatureCollection".to_string(),
            });
        }
    };

    let mut zones = Vec::with_capacity(collection.features.len());
    let mut seen: BTreeSet<u32> = BTreeSet::new();

    for (index, feature) in collection.features.into_iter().enumerate() {
        let id = feature_zone_id(&feature)
            .ok_or(ZonalError::MissingZoneId {
                feature_index: index,
            })?;
        if !seen.insert(id) {
            return Err(ZonalError::DuplicateZoneId { zone_id: id });
        }

        let geometry = feature.geometry.ok_or(ZonalError::UnsupportedGeometry {
            zone_id: id,
        })?;
        let geometry: geo::Geometry<f64> =
            geometry
                .value
                .try_into()
                .map_err(|_| ZonalError::UnsupportedGeometry { zone_id: id })?;
        let polygon = match geometry {
            geo::Geometry::Polygon(p) => MultiPolygon(vec![p]),
            geo::Geometry::MultiPolygon(mp) => mp,
            _ => return Err(ZonalError::UnsupportedGeometry { zone_id: id }),
        };

        zones.push(Zone { id, polygon });
    }

    info!(path = %path.display(), n_zones = zones.len(), "loaded zones");
    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_numeric_ids() {
        assert_eq!(parse_zone_id(&json!(5)), Some(5));
        assert_eq!(parse_zone_id(&json!(12.0)), Some(12));
        assert_eq!(parse_zone_id(&json!(12.5)), None);
    }

    #[test]
    fn parses_label_forms() {
        assert_eq!(parse_zone_id(&json!("5")), Some(5));
        assert_eq!(parse_zone_id(&json!("IM-05")), Some(5));
        assert_eq!(parse_zone_id(&json!("im7")), Some(7));
        assert_eq!(parse_zone_id(&json!(" IM 12 ")), Some(12));
    }

    #[test]
    fn rejects_unrecognised_labels() {
        assert_eq!(parse_zone_id(&json!("zone five")), None);
        assert_eq!(parse_zone_id(&json!("IM-")), None);
        assert_eq!(parse_zone_id(&json!(null)), None);
    }
}
