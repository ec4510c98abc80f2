#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Transport mode choice.
//!
//! A leg's mode depends on how far the person travels and how old they
//! are. Distances fall into four [`DistanceBucket`]s and ages into three
//! [`AgeClass`]es; each pair has its own weighted option table.

use geo::{Distance as _, Haversine, Point};
use pop_map_population_models::{Coordinates, TransportMode};
use pop_map_random::{RandomSource, pick_weighted};

use TransportMode::{Bike, PersonalCar, PublicTransport, RideHail, Taxi, Walk};

/// Age from which a person may drive.
pub const DRIVING_AGE: u8 = 18;

/// Age from which a person uses the senior tables.
pub const SENIOR_AGE: u8 = 65;

/// Travel distance class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceBucket {
    /// Under 0.5 km
    Walkable,
    /// 0.5 to 2 km
    Short,
    /// 2 to 5 km
    Medium,
    /// 5 km and over
    Long,
}

impl DistanceBucket {
    #[must_use]
    pub fn from_km(distance_km: f64) -> Self {
        if distance_km < 0.5 {
            Self::Walkable
        } else if distance_km < 2.0 {
            Self::Short
        } else if distance_km < 5.0 {
            Self::Medium
        } else {
            Self::Long
        }
    }
}

/// Traveller age class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeClass {
    /// Under 18, never drives
    Minor,
    /// 18 to 64
    Adult,
    /// 65 and over
    Senior,
}

impl AgeClass {
    #[must_use]
    pub const fn from_age(age: u8) -> Self {
        if age < DRIVING_AGE {
            Self::Minor
        } else if age < SENIOR_AGE {
            Self::Adult
        } else {
            Self::Senior
        }
    }
}

/// Weighted mode options for an (age class, distance bucket) pair.
#[must_use]
pub const fn options(age_class: AgeClass, bucket: DistanceBucket) -> &'static [(TransportMode, f64)] {
    match (age_class, bucket) {
        (AgeClass::Minor, DistanceBucket::Walkable) => {
            &[(Walk, 85.0), (Bike, 10.0), (PublicTransport, 5.0)]
        }
        (AgeClass::Minor, DistanceBucket::Short) => {
            &[(Walk, 50.0), (Bike, 25.0), (PublicTransport, 25.0)]
        }
        (AgeClass::Minor, DistanceBucket::Medium) => {
            &[(Walk, 5.0), (Bike, 20.0), (PublicTransport, 70.0), (Taxi, 5.0)]
        }
        (AgeClass::Minor, DistanceBucket::Long) => {
            &[(PublicTransport, 85.0), (Taxi, 10.0), (RideHail, 5.0)]
        }
        (AgeClass::Adult, DistanceBucket::Walkable) => {
            &[(Walk, 80.0), (Bike, 15.0), (PublicTransport, 5.0)]
        }
        (AgeClass::Adult, DistanceBucket::Short) => &[
            (Walk, 35.0),
            (Bike, 25.0),
            (PublicTransport, 25.0),
            (PersonalCar, 10.0),
            (RideHail, 5.0),
        ],
        (AgeClass::Adult, DistanceBucket::Medium) => &[
            (Bike, 15.0),
            (PublicTransport, 45.0),
            (PersonalCar, 25.0),
            (Taxi, 5.0),
            (RideHail, 10.0),
        ],
        (AgeClass::Adult, DistanceBucket::Long) => &[
            (PublicTransport, 45.0),
            (PersonalCar, 40.0),
            (Taxi, 5.0),
            (RideHail, 10.0),
        ],
        (AgeClass::Senior, DistanceBucket::Walkable) => &[(Walk, 90.0), (PublicTransport, 10.0)],
        (AgeClass::Senior, DistanceBucket::Short) => &[
            (Walk, 40.0),
            (PublicTransport, 40.0),
            (PersonalCar, 10.0),
            (Taxi, 10.0),
        ],
        (AgeClass::Senior, DistanceBucket::Medium) => &[
            (PublicTransport, 55.0),
            (PersonalCar, 25.0),
            (Taxi, 15.0),
            (RideHail, 5.0),
        ],
        (AgeClass::Senior, DistanceBucket::Long) => &[
            (PublicTransport, 45.0),
            (PersonalCar, 35.0),
            (Taxi, 15.0),
            (RideHail, 5.0),
        ],
    }
}

/// Chooses the mode for a leg of `distance_km` travelled by someone aged
/// `age`.
///
/// People under [`DRIVING_AGE`] are never offered [`TransportMode::PersonalCar`].
pub fn choose_transport<R: RandomSource + ?Sized>(
    distance_km: f64,
    age: u8,
    rng: &mut R,
) -> TransportMode {
    let table: Vec<(TransportMode, f64)> =
        options(AgeClass::from_age(age), DistanceBucket::from_km(distance_km))
            .iter()
            .copied()
            .filter(|(mode, _)| age >= DRIVING_AGE || *mode != PersonalCar)
            .collect();

    pick_weighted(&table, rng).unwrap_or(Walk)
}

/// Great-circle distance between two coordinates, in kilometres.
#[must_use]
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let from = Point::new(from.lng, from.lat);
    let to = Point::new(to.lng, to.lat);
    Haversine.distance(from, to) / 1000.0
}
