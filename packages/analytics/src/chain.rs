//! A single person's day, reduced to distinct stops and a travel path.

use std::collections::BTreeSet;

use geo::LineString;
use pop_map_analytics_models::{ActivityChain, ChainStop};
use pop_map_population_models::{Coordinates, Person};

/// Builds the chain view of `person`.
///
/// Stops keep the first activity seen at each distinct coordinate; the
/// path keeps every activity location in order.
#[must_use]
pub fn activity_chain(person: &Person) -> ActivityChain {
    let mut seen = BTreeSet::new();
    let stops = person
        .activities
        .iter()
        .filter(|a| seen.insert(coordinate_key(a.coordinates)))
        .map(|a| ChainStop {
            kind: a.kind,
            zone_name: a.zone_name.clone(),
            coordinates: a.coordinates,
            transport: a.transport,
            start: a.start_time.minutes(),
            end: a.end_time.minutes(),
        })
        .collect();

    ActivityChain {
        person_id: person.id,
        age: person.age,
        stops,
        path: person.activities.iter().map(|a| a.coordinates).collect(),
    }
}

/// The chain's path as a line in (lng, lat) order.
///
/// `None` when the path has fewer than two points.
#[must_use]
pub fn path_line(chain: &ActivityChain) -> Option<LineString<f64>> {
    (chain.path.len() >= 2).then(|| {
        chain
            .path
            .iter()
            .map(|c| (c.lng, c.lat))
            .collect::<Vec<_>>()
            .into()
    })
}

fn coordinate_key(coordinates: Coordinates) -> (u64, u64) {
    (coordinates.lat.to_bits(), coordinates.lng.to_bits())
}
