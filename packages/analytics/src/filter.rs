//! Time-of-day and demographic filtering of activity points.

use pop_map_analytics_models::FilterPredicate;
use pop_map_population_models::ActivityPoint;

/// Whether `point` satisfies every constrained dimension of `predicate`.
#[must_use]
pub fn matches(point: &ActivityPoint, predicate: &FilterPredicate) -> bool {
    predicate.age_band.is_none_or(|band| band.contains(point.age))
        && predicate.sex.is_none_or(|sex| sex == point.sex)
        && predicate.activity_kind.is_none_or(|kind| kind == point.kind)
        && predicate
            .minute_of_day
            .is_none_or(|minute| point.is_active_at(minute))
}

/// Returns the points matching `predicate`, in input order.
#[must_use]
pub fn filter_points(points: &[ActivityPoint], predicate: &FilterPredicate) -> Vec<ActivityPoint> {
    if predicate.is_all() {
        return points.to_vec();
    }

    let matched: Vec<ActivityPoint> = points
        .iter()
        .filter(|point| matches(point, predicate))
        .cloned()
        .collect();

    log::debug!("Filter kept {} of {} points", matched.len(), points.len());
    matched
}
