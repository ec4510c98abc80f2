//! JSON and `GeoJSON` writers for generated populations.
//!
//! The population file is the camelCase `Person` list. The activity point
//! layer is a `FeatureCollection` with one `Point` feature per activity,
//! carrying the attributes map layers filter and style on.

use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use pop_map_population_models::{ActivityPoint, Person};

use crate::GenerateError;

/// Serializes a population as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`GenerateError::Json`] if serialization fails.
pub fn population_to_json(people: &[Person]) -> Result<String, GenerateError> {
    Ok(serde_json::to_string_pretty(people)?)
}

/// Parses a population previously written by [`population_to_json`].
///
/// # Errors
///
/// Returns [`GenerateError::Json`] if the text is not a valid population.
pub fn parse_population(text: &str) -> Result<Vec<Person>, GenerateError> {
    Ok(serde_json::from_str(text)?)
}

/// Builds the activity point layer.
#[must_use]
pub fn points_to_feature_collection(points: &[ActivityPoint]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: points.iter().map(point_feature).collect(),
        foreign_members: None,
    }
}

fn point_feature(point: &ActivityPoint) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), JsonValue::from(point.person_id));
    properties.insert("age".to_string(), JsonValue::from(point.age));
    properties.insert("sex".to_string(), JsonValue::from(point.sex.as_ref()));
    properties.insert("activity".to_string(), JsonValue::from(point.kind.as_ref()));
    properties.insert("zone".to_string(), JsonValue::from(point.zone_name.as_str()));
    properties.insert(
        "transport".to_string(),
        point
            .transport
            .map_or(JsonValue::Null, |mode| JsonValue::from(mode.as_ref())),
    );
    properties.insert("start".to_string(), JsonValue::from(point.start));
    properties.insert("end".to_string(), JsonValue::from(point.end));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            point.coordinates.lng,
            point.coordinates.lat,
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Writes the population JSON to `path`.
///
/// # Errors
///
/// Returns [`GenerateError`] if serialization or the write fails.
pub fn write_population(path: &Path, people: &[Person]) -> Result<(), GenerateError> {
    std::fs::write(path, population_to_json(people)?)?;
    log::info!("Wrote {} people to {}", people.len(), path.display());
    Ok(())
}

/// Writes the activity point layer to `path`.
///
/// # Errors
///
/// Returns [`GenerateError`] if serialization or the write fails.
pub fn write_points(path: &Path, points: &[ActivityPoint]) -> Result<(), GenerateError> {
    let collection = points_to_feature_collection(points);
    std::fs::write(path, serde_json::to_string(&collection)?)?;
    log::info!("Wrote {} activity points to {}", points.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pop_map_population_models::{
        Activity, ActivityKind, Coordinates, Sex, TimeOfDay, TransportMode, flatten,
    };

    fn person() -> Person {
        let home = Coordinates::new(48.86, 2.34);
        Person {
            id: 7,
            age: 34,
            sex: Sex::Female,
            first_name: "Camille".to_string(),
            last_name: "Durand".to_string(),
            activities: vec![
                Activity {
                    kind: ActivityKind::Home,
                    start_time: TimeOfDay::from_minutes(0),
                    end_time: TimeOfDay::from_minutes(450),
                    zone_name: "Louvre".to_string(),
                    coordinates: home,
                    transport: None,
                },
                Activity {
                    kind: ActivityKind::Work,
                    start_time: TimeOfDay::from_minutes(450),
                    end_time: TimeOfDay::from_minutes(1439),
                    zone_name: "Bourse".to_string(),
                    coordinates: Coordinates::new(48.87, 2.34),
                    transport: Some(TransportMode::PublicTransport),
                },
            ],
        }
    }

    #[test]
    fn population_json_uses_camel_case_and_clock_times() {
        let json = population_to_json(&[person()]).unwrap();
        assert!(json.contains("\"firstName\": \"Camille\""));
        assert!(json.contains("\"startTime\": \"07:30\""));
        assert!(json.contains("\"transport\": \"public-transport\""));

        let parsed = parse_population(&json).unwrap();
        assert_eq!(parsed, vec![person()]);
    }

    #[test]
    fn point_features_carry_layer_properties() {
        let points = flatten(&[person()]);
        let collection = points_to_feature_collection(&points);
        assert_eq!(collection.features.len(), 2);

        let first = &collection.features[0];
        let props = first.properties.as_ref().unwrap();
        assert_eq!(props["id"], JsonValue::from(7));
        assert_eq!(props["sex"], JsonValue::from("female"));
        assert_eq!(props["activity"], JsonValue::from("home"));
        assert_eq!(props["zone"], JsonValue::from("Louvre"));
        assert_eq!(props["transport"], JsonValue::Null);
        assert_eq!(props["start"], JsonValue::from(0));
        assert_eq!(props["end"], JsonValue::from(450));

        let second = collection.features[1].properties.as_ref().unwrap();
        assert_eq!(second["transport"], JsonValue::from("public-transport"));
    }

    #[test]
    fn point_geometry_is_lng_lat() {
        let collection = points_to_feature_collection(&flatten(&[person()]));
        let geometry = collection.features[0].geometry.as_ref().unwrap();
        assert_eq!(geometry.value, Value::Point(vec![2.34, 48.86]));
    }

    #[test]
    fn rejects_malformed_population() {
        assert!(matches!(
            parse_population("[{\"id\": 1}]"),
            Err(GenerateError::Json(_))
        ));
    }
}
