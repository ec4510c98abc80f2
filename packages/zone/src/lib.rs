#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory catalog of named zones.
//!
//! Builds a uniquely-named set of zone polygons from raw source records,
//! indexes their bounding boxes in an R-tree for point lookups, and
//! samples random locations inside a zone for population generation.
//! Built once and then shared read-only.

pub mod features;

use std::collections::BTreeMap;

use geo::{BoundingRect, Centroid, CoordsIter, Intersects, MultiPolygon, Point, Rect};
use pop_map_population_models::Coordinates;
use pop_map_random::RandomSource;
use pop_map_zone_models::{ZoneProperties, disambiguated_name, fallback_name};
use rstar::{AABB, RTree, RTreeObject};
use thiserror::Error;

/// Errors that can occur while building or using a zone catalog.
#[derive(Debug, Error)]
pub enum ZoneError {
    /// The source contained no usable zones.
    #[error("No zones available: at least one zone polygon is required")]
    NoZones,

    /// Rejection sampling never landed inside the zone.
    #[error("Failed to sample a point inside zone '{zone}' after {attempts} attempts")]
    SamplingExhausted {
        /// Zone that was being sampled.
        zone: String,
        /// Number of draws made.
        attempts: u32,
    },

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The source geometry was not of the expected shape.
    #[error("Invalid geometry: {message}")]
    InvalidGeometry {
        /// Description of what went wrong.
        message: String,
    },
}

/// One source zone record, before naming is resolved.
#[derive(Debug, Clone)]
pub struct RawZone {
    /// Naming properties found on the record.
    pub properties: ZoneProperties,
    /// Zone boundary in (lng, lat) order.
    pub boundary: MultiPolygon<f64>,
    /// 0-based position of the record in its source collection, counting
    /// features that were skipped while parsing.
    pub source_index: usize,
}

/// A uniquely named zone.
#[derive(Debug, Clone)]
pub struct Zone {
    name: String,
    boundary: MultiPolygon<f64>,
    bounds: Rect<f64>,
}

impl Zone {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn boundary(&self) -> &MultiPolygon<f64> {
        &self.boundary
    }

    #[must_use]
    pub const fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    /// Whether the point lies inside the zone or on its boundary.
    #[must_use]
    pub fn contains(&self, coordinates: Coordinates) -> bool {
        self.boundary.intersects(&to_point(coordinates))
    }

    /// Draws uniform points in the zone's bounding box until one falls
    /// inside the boundary.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::SamplingExhausted`] if none of the
    /// `max_attempts` draws lands inside the zone.
    pub fn try_sample_point<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
        max_attempts: u32,
    ) -> Result<Coordinates, ZoneError> {
        let min = self.bounds.min();
        let max = self.bounds.max();

        for _ in 0..max_attempts {
            let lng = rng.uniform(min.x, max.x);
            let lat = rng.uniform(min.y, max.y);
            let candidate = Coordinates::new(lat, lng);
            if self.contains(candidate) {
                return Ok(candidate);
            }
        }

        Err(ZoneError::SamplingExhausted {
            zone: self.name.clone(),
            attempts: max_attempts,
        })
    }

    /// Samples a point inside the zone, falling back to
    /// [`Zone::representative_point`] when sampling is exhausted.
    pub fn sample_point<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
        max_attempts: u32,
    ) -> Coordinates {
        self.try_sample_point(rng, max_attempts)
            .unwrap_or_else(|e| {
                log::warn!("{e}; using representative point");
                self.representative_point()
            })
    }

    /// Deterministic stand-in location: the centroid, or the bounding box
    /// center for geometry without a centroid.
    #[must_use]
    pub fn representative_point(&self) -> Coordinates {
        let point = self
            .boundary
            .centroid()
            .unwrap_or_else(|| self.bounds.center().into());
        Coordinates::new(point.y(), point.x())
    }
}

/// R-tree entry pointing back into the catalog's zone list.
struct ZoneEnvelope {
    idx: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for ZoneEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Immutable set of uniquely named zones.
pub struct ZoneCatalog {
    zones: Vec<Zone>,
    by_name: BTreeMap<String, usize>,
    index: RTree<ZoneEnvelope>,
    bounds: Rect<f64>,
}

impl ZoneCatalog {
    /// Builds a catalog from raw zone records.
    ///
    /// Each zone is named from its properties in priority order, falling
    /// back to `zone-<n>`. A name that is already taken gets a `-<n>`
    /// suffix, where `n` is the record's 1-based position. Records with
    /// empty geometry are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::NoZones`] if no usable record remains.
    pub fn load(raw: Vec<RawZone>) -> Result<Self, ZoneError> {
        let mut zones = Vec::with_capacity(raw.len());
        let mut by_name = BTreeMap::new();

        for record in raw {
            let idx = record.source_index;
            let Some(bounds) = record.boundary.bounding_rect() else {
                log::warn!("Skipping zone record {} with empty geometry", idx + 1);
                continue;
            };

            let mut name = record.properties.display_name().map_or_else(
                || {
                    log::debug!("Zone record {} has no name property", idx + 1);
                    fallback_name(idx)
                },
                ToString::to_string,
            );
            while by_name.contains_key(&name) {
                let renamed = disambiguated_name(&name, idx);
                log::debug!("Zone name '{name}' already taken, using '{renamed}'");
                name = renamed;
            }

            by_name.insert(name.clone(), zones.len());
            zones.push(Zone {
                name,
                boundary: record.boundary,
                bounds,
            });
        }

        let bounds = zones
            .iter()
            .map(|z| z.bounds)
            .reduce(|a, b| {
                Rect::new(
                    (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                    (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
                )
            })
            .ok_or(ZoneError::NoZones)?;

        let index = RTree::bulk_load(
            zones
                .iter()
                .enumerate()
                .map(|(idx, zone)| ZoneEnvelope {
                    idx,
                    envelope: AABB::from_corners(
                        [zone.bounds.min().x, zone.bounds.min().y],
                        [zone.bounds.max().x, zone.bounds.max().y],
                    ),
                })
                .collect(),
        );

        log::info!("Loaded {} zones into catalog", zones.len());

        Ok(Self {
            zones,
            by_name,
            index,
            bounds,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Always `false` for a successfully loaded catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zone names in source order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().map(Zone::name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Zone> {
        self.by_name.get(name).map(|&idx| &self.zones[idx])
    }

    /// Overall extent of every zone.
    #[must_use]
    pub const fn bounding_box(&self) -> Rect<f64> {
        self.bounds
    }

    /// Picks a zone uniformly at random.
    ///
    /// # Panics
    ///
    /// Never panics for a catalog built by [`ZoneCatalog::load`], which
    /// rejects empty inputs.
    pub fn random_zone<R: RandomSource + ?Sized>(&self, rng: &mut R) -> &Zone {
        &self.zones[rng.index(self.zones.len())]
    }

    /// Looks up the zone containing a point.
    ///
    /// Zones may overlap; the earliest zone in source order wins.
    #[must_use]
    pub fn zone_at(&self, coordinates: Coordinates) -> Option<&Zone> {
        let query_env = AABB::from_point([coordinates.lng, coordinates.lat]);

        self.index
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| self.zones[entry.idx].contains(coordinates))
            .map(|entry| entry.idx)
            .min()
            .map(|idx| &self.zones[idx])
    }

    /// Total number of boundary vertices, for load diagnostics.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.zones.iter().map(|z| z.boundary.coords_count()).sum()
    }
}

/// Converts a coordinate into a `geo` point in (lng, lat) order.
#[must_use]
pub fn to_point(coordinates: Coordinates) -> Point<f64> {
    Point::new(coordinates.lng, coordinates.lat)
}
