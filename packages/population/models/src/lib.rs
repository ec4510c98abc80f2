#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Synthetic population types.
//!
//! A [`Person`] owns an ordered chain of [`Activity`] values covering one
//! full day. Consumers that filter or render the population work on the
//! flattened [`ActivityPoint`] view instead, which carries the owner's
//! demographics alongside minute-resolution activity windows.

pub mod time;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use time::{InvalidTimeError, MINUTES_PER_DAY, TimeOfDay, normalize_minutes};

/// What a person is doing during an activity window.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActivityKind {
    /// At the person's home location
    Home,
    /// At a workplace
    Work,
    /// At school or daycare
    School,
    /// Recreation, shopping, visits
    Leisure,
}

/// Mode used to travel to an activity from the previous one.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TransportMode {
    Walk,
    Bike,
    PersonalCar,
    PublicTransport,
    Taxi,
    RideHail,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Age partition shared by demographic filtering and zone metrics.
///
/// Bands are inclusive and together cover every age.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AgeBand {
    /// 0 to 17
    #[serde(rename = "0-17")]
    #[strum(serialize = "0-17")]
    Under18,
    /// 18 to 25
    #[serde(rename = "18-25")]
    #[strum(serialize = "18-25")]
    Age18To25,
    /// 26 to 34
    #[serde(rename = "26-34")]
    #[strum(serialize = "26-34")]
    Age26To34,
    /// 35 to 64
    #[serde(rename = "35-64")]
    #[strum(serialize = "35-64")]
    Age35To64,
    /// 65 and over
    #[serde(rename = "65+")]
    #[strum(serialize = "65+")]
    Age65Plus,
}

impl AgeBand {
    /// Returns the band a given age falls into.
    #[must_use]
    pub const fn for_age(age: u8) -> Self {
        match age {
            0..=17 => Self::Under18,
            18..=25 => Self::Age18To25,
            26..=34 => Self::Age26To34,
            35..=64 => Self::Age35To64,
            _ => Self::Age65Plus,
        }
    }

    /// Whether `age` falls inside this band.
    #[must_use]
    pub fn contains(self, age: u8) -> bool {
        Self::for_age(age) == self
    }

    /// Position of this band in [`AgeBand::all`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns all variants of this enum, youngest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Under18,
            Self::Age18To25,
            Self::Age26To34,
            Self::Age35To64,
            Self::Age65Plus,
        ]
    }
}

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// One geolocated activity in a person's daily chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// What the person is doing.
    pub kind: ActivityKind,
    /// When the activity begins.
    pub start_time: TimeOfDay,
    /// When the activity ends. Earlier than `start_time` when the activity
    /// runs past midnight.
    pub end_time: TimeOfDay,
    /// Name of the catalog zone the activity takes place in.
    pub zone_name: String,
    /// Exact location of the activity.
    pub coordinates: Coordinates,
    /// Mode used for the leg arriving here. `None` for the first activity
    /// of the day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportMode>,
}

/// A synthetic person and their daily activity chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// 1-based sequential identifier.
    pub id: u32,
    pub age: u8,
    pub sex: Sex,
    pub first_name: String,
    pub last_name: String,
    /// Time-ordered activities covering the whole day.
    pub activities: Vec<Activity>,
}

impl Person {
    /// Returns the person's first home activity, if any.
    #[must_use]
    pub fn home(&self) -> Option<&Activity> {
        self.activities
            .iter()
            .find(|a| a.kind == ActivityKind::Home)
    }

    /// Flattens this person's chain into activity points.
    #[must_use]
    pub fn activity_points(&self) -> Vec<ActivityPoint> {
        self.activities
            .iter()
            .map(|activity| ActivityPoint::new(self, activity))
            .collect()
    }
}

/// Flattened, minute-resolution view of one [`Activity`].
///
/// This is the unit that time/demographic filtering and map rendering
/// operate on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPoint {
    /// Owning person's identifier.
    pub person_id: u32,
    pub age: u8,
    pub sex: Sex,
    pub kind: ActivityKind,
    pub zone_name: String,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportMode>,
    /// Start of the window in minutes since midnight.
    pub start: u16,
    /// End of the window in minutes since midnight.
    pub end: u16,
}

impl ActivityPoint {
    #[must_use]
    pub fn new(person: &Person, activity: &Activity) -> Self {
        Self {
            person_id: person.id,
            age: person.age,
            sex: person.sex,
            kind: activity.kind,
            zone_name: activity.zone_name.clone(),
            coordinates: activity.coordinates,
            transport: activity.transport,
            start: activity.start_time.minutes(),
            end: activity.end_time.minutes(),
        }
    }

    /// Whether the activity window covers `minute_of_day`.
    ///
    /// Windows with `start > end` run past midnight and match on either
    /// side of it.
    #[must_use]
    pub const fn is_active_at(&self, minute_of_day: u16) -> bool {
        if self.start <= self.end {
            self.start <= minute_of_day && minute_of_day <= self.end
        } else {
            minute_of_day >= self.start || minute_of_day <= self.end
        }
    }
}

/// Flattens a whole population into activity points, person by person.
#[must_use]
pub fn flatten(people: &[Person]) -> Vec<ActivityPoint> {
    people.iter().flat_map(Person::activity_points).collect()
}
