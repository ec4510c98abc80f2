//! Activity mix of a single catalog zone.

use pop_map_analytics_models::{FilterPredicate, ZoneSnapshot};
use pop_map_population_models::{ActivityKind, ActivityPoint};
use pop_map_zone::ZoneCatalog;

use crate::{AnalyticsError, filter::matches};

/// Counts the points assigned to `zone_name` that match `predicate`,
/// broken down by activity kind.
///
/// Points are attributed by their recorded zone name, not by location.
///
/// # Errors
///
/// Returns [`AnalyticsError::UnknownZone`] if the catalog has no zone
/// named `zone_name`.
pub fn zone_snapshot(
    catalog: &ZoneCatalog,
    zone_name: &str,
    points: &[ActivityPoint],
    predicate: &FilterPredicate,
) -> Result<ZoneSnapshot, AnalyticsError> {
    let zone = catalog
        .get(zone_name)
        .ok_or_else(|| AnalyticsError::UnknownZone {
            name: zone_name.to_string(),
        })?;

    let mut snapshot = ZoneSnapshot {
        zone: zone.name().to_string(),
        ..ZoneSnapshot::default()
    };

    for point in points
        .iter()
        .filter(|p| p.zone_name == zone_name && matches(p, predicate))
    {
        snapshot.total += 1;
        match point.kind {
            ActivityKind::Home => snapshot.home += 1,
            ActivityKind::Work => snapshot.work += 1,
            ActivityKind::School => snapshot.education += 1,
            ActivityKind::Leisure => snapshot.leisure += 1,
        }
    }

    Ok(snapshot)
}
