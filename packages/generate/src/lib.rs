#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Synthetic population generation.
//!
//! Builds [`Person`] records whose daily activity chains are placed inside
//! the zones of a [`ZoneCatalog`]. Each person gets an age from a weighted
//! pyramid, a home point inside a random zone, a realized daily schedule
//! for their life stage, and a transport mode for every leg between two
//! activities.

pub mod config;
pub mod export;
pub mod names;
pub mod progress;

use pop_map_mobility::{choose_transport, distance_km};
use pop_map_population_models::{Activity, ActivityKind, Coordinates, Person, Sex};
use pop_map_random::{RandomSource, pick_weighted};
use pop_map_schedule::{realize, template_for};
use pop_map_zone::{Zone, ZoneCatalog, ZoneError};
use thiserror::Error;

pub use config::GenerationConfig;
use progress::ProgressCallback;

/// Errors that can occur during population generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Generation cannot proceed with the given inputs.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of what is missing.
        message: String,
    },

    /// A configuration value is out of range.
    #[error("Invalid config: {message}")]
    InvalidConfig {
        /// Description of the offending value.
        message: String,
    },

    /// Zone loading failed.
    #[error("Zone error: {0}")]
    Zone(#[from] ZoneError),

    /// Configuration TOML failed to parse.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Generates people against a shared, read-only zone catalog.
pub struct PopulationGenerator<'a> {
    catalog: &'a ZoneCatalog,
    config: GenerationConfig,
}

impl<'a> PopulationGenerator<'a> {
    #[must_use]
    pub const fn new(catalog: &'a ZoneCatalog, config: GenerationConfig) -> Self {
        Self { catalog, config }
    }

    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generates `count` people with ids `1..=count`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Configuration`] if the catalog has no
    /// zones.
    pub fn generate<R: RandomSource + ?Sized>(
        &self,
        count: u32,
        rng: &mut R,
        progress: &dyn ProgressCallback,
    ) -> Result<Vec<Person>, GenerateError> {
        if self.catalog.is_empty() {
            return Err(GenerateError::Configuration {
                message: "at least one zone is required to place people".to_string(),
            });
        }

        log::info!(
            "Generating {count} people across {} zones",
            self.catalog.len()
        );
        progress.set_total(u64::from(count));
        progress.set_message("Generating population".to_string());

        let mut people = Vec::with_capacity(usize::try_from(count).unwrap_or_default());
        for id in 1..=count {
            people.push(self.person(id, rng));
            progress.inc(1);
        }

        let activities: usize = people.iter().map(|p| p.activities.len()).sum();
        log::info!("Generated {} people with {activities} activities", people.len());
        progress.finish(format!("Generated {} people", people.len()));

        Ok(people)
    }

    /// Builds one person and their daily chain.
    pub fn person<R: RandomSource + ?Sized>(&self, id: u32, rng: &mut R) -> Person {
        let age = self.config.draw_age(rng);
        let sex = self.draw_sex(rng);
        let first_name = names::first_name(sex, rng).to_string();
        let last_name = names::last_name(rng).to_string();

        let home_zone = self.catalog.random_zone(rng);
        let home = home_zone.sample_point(rng, self.config.max_sampling_attempts);

        let templates = template_for(age, self.config.employment_probability, rng);
        let windows = realize(templates, rng);

        let mut activities: Vec<Activity> = Vec::with_capacity(windows.len());
        for window in windows {
            let (zone, coordinates) = self.place(window.kind, home_zone, home, rng);
            let transport = activities
                .last()
                .map(|previous| choose_transport(distance_km(previous.coordinates, coordinates), age, rng));

            activities.push(Activity {
                kind: window.kind,
                start_time: window.start,
                end_time: window.end,
                zone_name: zone.name().to_string(),
                coordinates,
                transport,
            });
        }

        log::trace!("Person {id}: age {age}, {} activities", activities.len());

        Person {
            id,
            age,
            sex,
            first_name,
            last_name,
            activities,
        }
    }

    fn draw_sex<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Sex {
        let p = self.config.female_probability;
        pick_weighted(&[(Sex::Female, p), (Sex::Male, 1.0 - p)], rng).unwrap_or(Sex::Female)
    }

    /// Chooses where an activity of `kind` takes place.
    fn place<R: RandomSource + ?Sized>(
        &self,
        kind: ActivityKind,
        home_zone: &'a Zone,
        home: Coordinates,
        rng: &mut R,
    ) -> (&'a Zone, Coordinates) {
        let attempts = self.config.max_sampling_attempts;
        match kind {
            ActivityKind::Home => (home_zone, home),
            ActivityKind::Leisure if rng.chance(self.config.leisure_home_zone_probability) => {
                (home_zone, home_zone.sample_point(rng, attempts))
            }
            ActivityKind::Work | ActivityKind::School | ActivityKind::Leisure => {
                let zone = self.catalog.random_zone(rng);
                (zone, zone.sample_point(rng, attempts))
            }
        }
    }
}

/// Generates `count` people with the default configuration.
///
/// # Errors
///
/// Returns [`GenerateError::Configuration`] if the catalog has no zones.
pub fn generate<R: RandomSource + ?Sized>(
    count: u32,
    catalog: &ZoneCatalog,
    rng: &mut R,
    progress: &dyn ProgressCallback,
) -> Result<Vec<Person>, GenerateError> {
    PopulationGenerator::new(catalog, GenerationConfig::default()).generate(count, rng, progress)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use geo::{MultiPolygon, polygon};
    use pop_map_population_models::{MINUTES_PER_DAY, TransportMode};
    use pop_map_random::SeededSource;
    use pop_map_zone::RawZone;
    use pop_map_zone_models::ZoneProperties;
    use crate::progress::NullProgress;

    fn square(name: &str, min_x: f64, min_y: f64, size: f64) -> RawZone {
        RawZone {
            properties: ZoneProperties {
                name: Some(name.to_string()),
                ..ZoneProperties::default()
            },
            boundary: MultiPolygon(vec![polygon![
                (x: min_x, y: min_y),
                (x: min_x + size, y: min_y),
                (x: min_x + size, y: min_y + size),
                (x: min_x, y: min_y + size),
                (x: min_x, y: min_y),
            ]]),
            source_index: 0,
        }
    }

    fn paris_like() -> ZoneCatalog {
        ZoneCatalog::load(vec![
            square("Louvre", 2.33, 48.855, 0.02),
            square("Bourse", 2.35, 48.855, 0.02),
            square("Temple", 2.37, 48.855, 0.02),
            square("Batignolles", 2.30, 48.88, 0.03),
            square("Vincennes", 2.42, 48.83, 0.05),
        ])
        .unwrap()
    }

    fn population(count: u32, seed: u64) -> Vec<Person> {
        let catalog = paris_like();
        let mut rng = SeededSource::from_seed_u64(seed);
        generate(count, &catalog, &mut rng, &NullProgress).unwrap()
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let people = population(50, 1);
        let ids: Vec<u32> = people.iter().map(|p| p.id).collect();
        assert_eq!(ids, (1..=50).collect::<Vec<_>>());
    }

    #[test]
    fn chains_cover_the_day_without_gaps() {
        for person in population(300, 2) {
            let activities = &person.activities;
            assert!(activities.len() >= 3, "person {} has a short chain", person.id);

            for pair in activities.windows(2) {
                assert_eq!(
                    pair[1].start_time, pair[0].end_time,
                    "person {}: gap between activities",
                    person.id
                );
            }

            let first = activities[0].start_time.minutes();
            let last = activities[activities.len() - 1].end_time.minutes();
            assert_eq!((last + 1) % MINUTES_PER_DAY, first, "person {}: day not closed", person.id);
        }
    }

    #[test]
    fn home_activities_share_zone_and_coordinates() {
        for person in population(300, 3) {
            let home = person.home().unwrap();
            for activity in person.activities.iter().filter(|a| a.kind == ActivityKind::Home) {
                assert_eq!(activity.zone_name, home.zone_name, "person {}", person.id);
                assert_eq!(activity.coordinates, home.coordinates, "person {}", person.id);
            }
        }
    }

    #[test]
    fn only_first_activity_lacks_transport() {
        for person in population(200, 4) {
            assert_eq!(person.activities[0].transport, None);
            assert!(
                person.activities[1..].iter().all(|a| a.transport.is_some()),
                "person {} has a leg without transport",
                person.id
            );
        }
    }

    #[test]
    fn minors_never_drive() {
        for person in population(1_000, 5).iter().filter(|p| p.age < 18) {
            assert!(
                person
                    .activities
                    .iter()
                    .all(|a| a.transport != Some(TransportMode::PersonalCar)),
                "minor {} drove",
                person.id
            );
        }
    }

    #[test]
    fn activities_fall_inside_their_zone() {
        let catalog = paris_like();
        let mut rng = SeededSource::from_seed_u64(6);
        let people = generate(200, &catalog, &mut rng, &NullProgress).unwrap();
        for activity in people.iter().flat_map(|p| &p.activities) {
            let zone = catalog.get(&activity.zone_name).unwrap();
            assert!(zone.contains(activity.coordinates), "{activity:?} outside its zone");
        }
    }

    #[test]
    fn work_only_appears_for_working_ages() {
        for person in population(1_000, 7) {
            if person.activities.iter().any(|a| a.kind == ActivityKind::Work) {
                assert!((19..=65).contains(&person.age), "age {} works", person.age);
            }
        }
    }

    #[test]
    fn single_square_zone_hosts_every_home() {
        let catalog = ZoneCatalog::load(vec![square("Centre", 2.0, 48.0, 0.1)]).unwrap();
        let mut rng = SeededSource::from_seed_u64(8);
        let people = generate(100, &catalog, &mut rng, &NullProgress).unwrap();

        assert_eq!(people.len(), 100);
        for person in &people {
            let homes: BTreeSet<&str> = person
                .activities
                .iter()
                .filter(|a| a.kind == ActivityKind::Home)
                .map(|a| a.zone_name.as_str())
                .collect();
            assert_eq!(homes, BTreeSet::from(["Centre"]));
        }
    }

    #[test]
    fn same_seed_reproduces_population() {
        assert_eq!(population(40, 9), population(40, 9));
    }

    #[test]
    fn leisure_sometimes_stays_home_zone() {
        let people = population(500, 10);
        let leisure_at_home = people
            .iter()
            .filter(|p| {
                let home = p.home().map(|h| h.zone_name.as_str());
                p.activities
                    .iter()
                    .any(|a| a.kind == ActivityKind::Leisure && Some(a.zone_name.as_str()) == home)
            })
            .count();
        assert!(leisure_at_home > 0, "no local leisure in 500 people");
    }
}
