//! Converts `GeoJSON` documents into raw zone records and query polygons.
//!
//! Naming properties are read defensively: a key holding anything other
//! than a string is treated as absent so that the catalog falls back to a
//! synthetic name instead of failing the load.

use geo::{MultiPolygon, Polygon};
use geojson::{Feature, GeoJson, JsonObject};
use pop_map_zone_models::{NameKey, ZoneProperties};

use crate::{RawZone, ZoneError};

/// Parses a `GeoJSON` `FeatureCollection` into raw zone records.
///
/// Features without geometry, or whose geometry is not a `Polygon` or
/// `MultiPolygon`, are skipped with a warning.
///
/// # Errors
///
/// Returns [`ZoneError`] if the text is not valid `GeoJSON` or is not a
/// `FeatureCollection`.
pub fn parse_zones(text: &str) -> Result<Vec<RawZone>, ZoneError> {
    let GeoJson::FeatureCollection(collection) = text.parse::<GeoJson>()? else {
        return Err(ZoneError::InvalidGeometry {
            message: "expected a FeatureCollection".to_string(),
        });
    };

    let total = collection.features.len();
    let zones: Vec<RawZone> = collection
        .features
        .into_iter()
        .enumerate()
        .filter_map(|(idx, feature)| feature_to_zone(idx, feature))
        .collect();

    if zones.len() < total {
        log::warn!(
            "Skipped {} of {total} features without polygon geometry",
            total - zones.len()
        );
    }

    Ok(zones)
}

fn feature_to_zone(idx: usize, feature: Feature) -> Option<RawZone> {
    let properties = read_properties(idx, feature.properties.as_ref());
    let geometry = feature.geometry?;

    let boundary = match geo::Geometry::<f64>::try_from(geometry) {
        Ok(geo::Geometry::Polygon(p)) => MultiPolygon(vec![p]),
        Ok(geo::Geometry::MultiPolygon(mp)) => mp,
        Ok(_) => {
            log::warn!("Feature {} is not a polygon", idx + 1);
            return None;
        }
        Err(e) => {
            log::warn!("Failed to convert geometry of feature {}: {e}", idx + 1);
            return None;
        }
    };

    Some(RawZone {
        properties,
        boundary,
        source_index: idx,
    })
}

/// Extracts the naming keys from a feature's property bag.
fn read_properties(idx: usize, props: Option<&JsonObject>) -> ZoneProperties {
    let mut properties = ZoneProperties::default();
    let Some(props) = props else {
        return properties;
    };

    for key in NameKey::PRIORITY {
        match props.get(key.as_ref()) {
            Some(serde_json::Value::String(value)) => properties.set(*key, value.clone()),
            None | Some(serde_json::Value::Null) => {}
            Some(other) => {
                log::warn!(
                    "Feature {} has non-string '{}' property ({other}); ignoring it",
                    idx + 1,
                    key.as_ref()
                );
            }
        }
    }

    properties
}

/// Parses a single query polygon from a `Polygon` geometry, a `Feature`
/// wrapping one, or a `FeatureCollection` holding exactly one.
///
/// # Errors
///
/// Returns [`ZoneError`] if the text is not valid `GeoJSON` or does not
/// hold exactly one `Polygon`.
pub fn parse_polygon(text: &str) -> Result<Polygon<f64>, ZoneError> {
    let geometry = match text.parse::<GeoJson>()? {
        GeoJson::Geometry(geometry) => Some(geometry),
        GeoJson::Feature(feature) => feature.geometry,
        GeoJson::FeatureCollection(collection) => {
            let count = collection.features.len();
            let mut features = collection.features.into_iter();
            match (features.next(), count) {
                (Some(feature), 1) => feature.geometry,
                _ => {
                    return Err(ZoneError::InvalidGeometry {
                        message: format!("expected exactly one feature, found {count}"),
                    });
                }
            }
        }
    };

    let geometry = geometry.ok_or_else(|| ZoneError::InvalidGeometry {
        message: "feature has no geometry".to_string(),
    })?;

    match geo::Geometry::<f64>::try_from(geometry)? {
        geo::Geometry::Polygon(polygon) => Ok(polygon),
        _ => Err(ZoneError::InvalidGeometry {
            message: "zone geometry must be a Polygon".to_string(),
        }),
    }
}
