#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Query and result types for population analytics.
//!
//! A [`FilterRequest`] is the loosely-typed form a caller sends (every
//! dimension a string, with `"all"` meaning "no constraint"). It converts
//! into a typed [`FilterPredicate`], which is the only form the filter
//! engine accepts. Result types ([`ZoneMetrics`], [`ZoneSnapshot`],
//! [`ActivityChain`]) serialize as camelCase JSON.

use std::collections::BTreeMap;
use std::str::FromStr;

use pop_map_population_models::{
    ActivityKind, AgeBand, Coordinates, MINUTES_PER_DAY, Sex, TransportMode,
};
use serde::{Deserialize, Serialize};

/// Value of a request dimension that matches everything.
pub const ALL: &str = "all";

/// Raw filter request, as received from a caller.
///
/// Absent fields and the value `"all"` leave a dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    pub age_band: Option<String>,
    pub sex: Option<String>,
    pub activity_kind: Option<String>,
    pub minute_of_day: Option<i64>,
}

/// Typed filter predicate. `None` dimensions match every point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPredicate {
    pub age_band: Option<AgeBand>,
    pub sex: Option<Sex>,
    pub activity_kind: Option<ActivityKind>,
    /// Minute of the day in `[0, 1439]`.
    pub minute_of_day: Option<u16>,
}

impl FilterPredicate {
    /// A predicate that matches every point.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            age_band: None,
            sex: None,
            activity_kind: None,
            minute_of_day: None,
        }
    }

    /// Whether no dimension is constrained.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        self.age_band.is_none()
            && self.sex.is_none()
            && self.activity_kind.is_none()
            && self.minute_of_day.is_none()
    }
}

/// A filter request named an unknown value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateError {
    /// `field` held `value`, which is not one of its accepted values.
    InvalidPredicate { field: &'static str, value: String },
}

impl std::fmt::Display for PredicateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPredicate { field, value } => {
                write!(f, "Invalid predicate: unknown {field} '{value}'")
            }
        }
    }
}

impl std::error::Error for PredicateError {}

fn parse_dimension<T: FromStr>(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<T>, PredicateError> {
    let Some(raw) = raw.map(str::trim) else {
        return Ok(None);
    };
    if raw.is_empty() || raw.eq_ignore_ascii_case(ALL) {
        return Ok(None);
    }

    raw.to_ascii_lowercase()
        .parse::<T>()
        .map(Some)
        .map_err(|_| PredicateError::InvalidPredicate {
            field,
            value: raw.to_string(),
        })
}

impl TryFrom<&FilterRequest> for FilterPredicate {
    type Error = PredicateError;

    fn try_from(request: &FilterRequest) -> Result<Self, Self::Error> {
        let minute_of_day = request
            .minute_of_day
            .map(|minute| {
                u16::try_from(minute)
                    .ok()
                    .filter(|m| *m < MINUTES_PER_DAY)
                    .ok_or_else(|| PredicateError::InvalidPredicate {
                        field: "minuteOfDay",
                        value: minute.to_string(),
                    })
            })
            .transpose()?;

        Ok(Self {
            age_band: parse_dimension("ageBand", request.age_band.as_deref())?,
            sex: parse_dimension("sex", request.sex.as_deref())?,
            activity_kind: parse_dimension("activityKind", request.activity_kind.as_deref())?,
            minute_of_day,
        })
    }
}

impl TryFrom<FilterRequest> for FilterPredicate {
    type Error = PredicateError;

    fn try_from(request: FilterRequest) -> Result<Self, Self::Error> {
        Self::try_from(&request)
    }
}

/// Number of in-zone activities attributed to one age band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBandCount {
    pub age_group: AgeBand,
    pub count: u64,
}

/// Aggregate statistics for the activities inside one polygon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneMetrics {
    /// In-zone activities after merging repeated home stays.
    pub total_activities: u64,
    /// People with at least one in-zone activity.
    pub unique_visitors: u64,
    /// For each hour of the day, how many activities touch it.
    pub activities_by_hour: [u64; 24],
    /// One entry per [`AgeBand`], in band order.
    pub age_distribution: Vec<AgeBandCount>,
    /// Only kinds that occurred are present.
    pub activity_type_counts: BTreeMap<ActivityKind, u64>,
}

impl ZoneMetrics {
    /// Metrics for a zone with no activity.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_activities: 0,
            unique_visitors: 0,
            activities_by_hour: [0; 24],
            age_distribution: AgeBand::all()
                .iter()
                .map(|band| AgeBandCount {
                    age_group: *band,
                    count: 0,
                })
                .collect(),
            activity_type_counts: BTreeMap::new(),
        }
    }

    /// The busiest hour and its count, earliest first on ties.
    #[must_use]
    pub fn peak_hour(&self) -> Option<(u8, u64)> {
        (0u8..24)
            .zip(self.activities_by_hour)
            .filter(|(_, count)| *count > 0)
            .fold(None, |best, (hour, count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((hour, count)),
            })
    }
}

impl Default for ZoneMetrics {
    fn default() -> Self {
        Self::empty()
    }
}

/// Activity mix of one catalog zone under a filter predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSnapshot {
    pub zone: String,
    pub total: u64,
    pub home: u64,
    pub work: u64,
    /// School activities.
    pub education: u64,
    pub leisure: u64,
}

/// One distinct location on a person's activity chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainStop {
    pub kind: ActivityKind,
    pub zone_name: String,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportMode>,
    pub start: u16,
    pub end: u16,
}

/// A person's day as map-ready stops and path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityChain {
    pub person_id: u32,
    pub age: u8,
    /// First activity at each distinct location, in chain order.
    pub stops: Vec<ChainStop>,
    /// Every activity location in chain order, repeats included.
    pub path: Vec<Coordinates>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(age_band: &str, sex: &str, kind: &str, minute: Option<i64>) -> FilterRequest {
        FilterRequest {
            age_band: Some(age_band.to_string()),
            sex: Some(sex.to_string()),
            activity_kind: Some(kind.to_string()),
            minute_of_day: minute,
        }
    }

    #[test]
    fn all_values_leave_dimensions_open() {
        let predicate = FilterPredicate::try_from(request("all", "all", "ALL", None)).unwrap();
        assert!(predicate.is_all());
        assert!(FilterPredicate::try_from(FilterRequest::default()).unwrap().is_all());
    }

    #[test]
    fn parses_typed_dimensions() {
        let predicate =
            FilterPredicate::try_from(request("65+", "Female", "leisure", Some(600))).unwrap();
        assert_eq!(
            predicate,
            FilterPredicate {
                age_band: Some(AgeBand::Age65Plus),
                sex: Some(Sex::Female),
                activity_kind: Some(ActivityKind::Leisure),
                minute_of_day: Some(600),
            }
        );
    }

    #[test]
    fn rejects_unknown_values() {
        let err = FilterPredicate::try_from(request("26-30", "all", "all", None)).unwrap_err();
        assert_eq!(
            err,
            PredicateError::InvalidPredicate {
                field: "ageBand",
                value: "26-30".to_string(),
            }
        );

        assert_eq!(
            err.to_string(),
            "Invalid predicate: unknown ageBand '26-30'"
        );
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());

        assert!(FilterPredicate::try_from(request("all", "other", "all", None)).is_err());
        assert!(FilterPredicate::try_from(request("all", "all", "shopping", None)).is_err());
    }

    #[test]
    fn rejects_minutes_outside_the_day() {
        assert!(FilterPredicate::try_from(request("all", "all", "all", Some(1439))).is_ok());
        assert!(FilterPredicate::try_from(request("all", "all", "all", Some(1440))).is_err());
        assert!(FilterPredicate::try_from(request("all", "all", "all", Some(-1))).is_err());
    }

    #[test]
    fn request_reads_camel_case_json() {
        let json = r#"{"ageBand":"0-17","sex":"male","activityKind":"school","minuteOfDay":480}"#;
        let request: FilterRequest = serde_json::from_str(json).unwrap();
        let predicate = FilterPredicate::try_from(&request).unwrap();
        assert_eq!(predicate.age_band, Some(AgeBand::Under18));
        assert_eq!(predicate.minute_of_day, Some(480));
    }

    #[test]
    fn empty_metrics_list_every_band() {
        let metrics = ZoneMetrics::empty();
        let bands: Vec<AgeBand> = metrics.age_distribution.iter().map(|c| c.age_group).collect();
        assert_eq!(bands, AgeBand::all().to_vec());
        assert!(metrics.activity_type_counts.is_empty());
        assert_eq!(metrics.peak_hour(), None);
    }

    #[test]
    fn peak_hour_prefers_earliest_tie() {
        let mut metrics = ZoneMetrics::empty();
        metrics.activities_by_hour[9] = 4;
        metrics.activities_by_hour[17] = 4;
        metrics.activities_by_hour[3] = 1;
        assert_eq!(metrics.peak_hour(), Some((9, 4)));
    }

    #[test]
    fn metrics_serialize_camel_case() {
        let json = serde_json::to_string(&ZoneMetrics::empty()).unwrap();
        assert!(json.contains("\"totalActivities\":0"));
        assert!(json.contains("\"ageGroup\":\"65+\""));
        assert!(json.contains("\"activityTypeCounts\":{}"));
    }
}
