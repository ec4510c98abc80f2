#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Query engine over a generated population.
//!
//! Every function here is a pure, read-only pass over an immutable
//! population snapshot: time and demographic filtering of activity
//! points, per-polygon metrics, per-zone snapshots, and single-person
//! activity chains.

pub mod chain;
pub mod filter;
pub mod snapshot;
pub mod zone_metrics;

use pop_map_analytics_models::PredicateError;
use thiserror::Error;

pub use chain::activity_chain;
pub use filter::filter_points;
pub use snapshot::zone_snapshot;
pub use zone_metrics::compute;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A filter request could not be converted into a predicate.
    #[error("Predicate error: {0}")]
    Predicate(#[from] PredicateError),

    /// The named zone is not in the catalog.
    #[error("Unknown zone: {name}")]
    UnknownZone {
        /// Name that was looked up.
        name: String,
    },
}
