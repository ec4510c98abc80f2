//! Per-polygon population statistics.

use geo::{Intersects, Point, Polygon};
use pop_map_analytics_models::ZoneMetrics;
use pop_map_population_models::{Activity, ActivityKind, AgeBand, Person, TimeOfDay};

/// An in-zone activity after home runs are merged.
struct Stay {
    kind: ActivityKind,
    start: TimeOfDay,
    end: TimeOfDay,
}

/// Computes statistics for every activity located inside `polygon`.
///
/// Points on the boundary count as inside. Consecutive in-zone home
/// activities at identical coordinates are merged into one stay ending at
/// the later activity's end. Each stay adds one to every hour it touches,
/// to its owner's age band and to its kind.
#[must_use]
pub fn compute(polygon: &Polygon<f64>, population: &[Person]) -> ZoneMetrics {
    let mut metrics = ZoneMetrics::empty();

    for person in population {
        let stays = in_zone_stays(polygon, &person.activities);
        if stays.is_empty() {
            continue;
        }

        metrics.unique_visitors += 1;
        let band = AgeBand::for_age(person.age).index();

        for stay in &stays {
            metrics.total_activities += 1;
            metrics.age_distribution[band].count += 1;
            *metrics.activity_type_counts.entry(stay.kind).or_insert(0) += 1;
            for hour in touched_hours(stay.start, stay.end) {
                metrics.activities_by_hour[usize::from(hour)] += 1;
            }
        }
    }

    log::debug!(
        "Zone metrics: {} activities from {} visitors",
        metrics.total_activities,
        metrics.unique_visitors
    );

    metrics
}

fn in_zone_stays(polygon: &Polygon<f64>, activities: &[Activity]) -> Vec<Stay> {
    let mut stays: Vec<Stay> = Vec::new();
    let mut last_home: Option<&Activity> = None;

    for activity in activities {
        let point = Point::new(activity.coordinates.lng, activity.coordinates.lat);
        if !polygon.intersects(&point) {
            continue;
        }

        let repeats_home = activity.kind == ActivityKind::Home
            && last_home.is_some_and(|home| home.coordinates == activity.coordinates);

        match stays.last_mut() {
            Some(stay) if repeats_home => stay.end = activity.end_time,
            _ => stays.push(Stay {
                kind: activity.kind,
                start: activity.start_time,
                end: activity.end_time,
            }),
        }

        last_home = (activity.kind == ActivityKind::Home).then_some(activity);
    }

    stays
}

/// Hours of the day overlapped by `[start, end]`, each at most once.
///
/// A window whose end is earlier than its start runs past midnight.
fn touched_hours(start: TimeOfDay, end: TimeOfDay) -> Vec<u8> {
    let (start_hour, end_hour) = (start.hour(), end.hour());

    if end >= start {
        (start_hour..=end_hour).collect()
    } else if end_hour >= start_hour {
        (0..24).collect()
    } else {
        (start_hour..24).chain(0..=end_hour).collect()
    }
}
