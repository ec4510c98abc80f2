#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the pop-map toolchain.
//!
//! `generate` builds a synthetic population from a zone `GeoJSON` file;
//! `metrics`, `snapshot` and `chain` query a previously written
//! population. Query results are printed as JSON, or written to
//! `--output` when given.
//!
//! Uses `indicatif-log-bridge` (via [`pop_map_cli_utils::init_logger`]) so
//! that log lines and the generation progress bar share the terminal.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use pop_map_analytics::{activity_chain, chain::path_line, compute, zone_snapshot};
use pop_map_analytics_models::{ActivityChain, FilterPredicate, FilterRequest};
use pop_map_cli_utils::{IndicatifProgress, MultiProgress};
use pop_map_generate::{GenerationConfig, PopulationGenerator, export};
use pop_map_population_models::{Person, flatten};
use pop_map_random::SeededSource;
use pop_map_zone::{ZoneCatalog, features};
use serde::Serialize;

/// People generated when no count is given.
const DEFAULT_COUNT: u32 = 10_000;

#[derive(Parser)]
#[command(name = "pop_map", about = "Synthetic population generator and query tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a population and write it as JSON
    Generate {
        /// Number of people to generate
        #[arg(default_value_t = DEFAULT_COUNT)]
        count: u32,

        /// Zone `GeoJSON` `FeatureCollection`
        #[arg(long, default_value = "data/zones.geojson")]
        zones: PathBuf,

        /// Population JSON output path
        #[arg(long, default_value = "data/population.json")]
        output: PathBuf,

        /// Also write the activity point `GeoJSON` layer here
        #[arg(long)]
        points: Option<PathBuf>,

        /// Seed for reproducible output (overrides the config seed)
        #[arg(long)]
        seed: Option<u64>,

        /// Generation config TOML (defaults to the built-in config)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compute metrics for the activities inside a polygon
    Metrics {
        /// Population JSON
        #[arg(long, default_value = "data/population.json")]
        population: PathBuf,

        /// Query polygon (`GeoJSON` `Polygon` geometry or feature)
        #[arg(long)]
        polygon: PathBuf,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Count activities in one catalog zone under a filter
    Snapshot {
        #[arg(long, default_value = "data/population.json")]
        population: PathBuf,

        #[arg(long, default_value = "data/zones.geojson")]
        zones: PathBuf,

        /// Zone name as resolved by the catalog
        #[arg(long)]
        zone: String,

        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show one person's distinct stops and travel path
    Chain {
        #[arg(long, default_value = "data/population.json")]
        population: PathBuf,

        /// Person id
        #[arg(long)]
        id: u32,

        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Filter dimensions; `all` or omission leaves a dimension open.
#[derive(clap::Args)]
struct FilterArgs {
    /// One of 0-17, 18-25, 26-34, 35-64, 65+
    #[arg(long)]
    age_band: Option<String>,

    /// male or female
    #[arg(long)]
    sex: Option<String>,

    /// home, work, school or leisure
    #[arg(long)]
    activity: Option<String>,

    /// Minute of the day, 0-1439
    #[arg(long, allow_negative_numbers = true)]
    minute: Option<i64>,
}

impl From<FilterArgs> for FilterRequest {
    fn from(args: FilterArgs) -> Self {
        Self {
            age_band: args.age_band,
            sex: args.sex,
            activity_kind: args.activity,
            minute_of_day: args.minute,
        }
    }
}

/// An activity chain plus its path as a `GeoJSON` `LineString`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChainView {
    #[serde(flatten)]
    chain: ActivityChain,
    /// `null` when the person never moves between two locations.
    line: Option<geojson::Geometry>,
}

impl ChainView {
    fn new(chain: ActivityChain) -> Self {
        let line = path_line(&chain)
            .map(|line| geojson::Geometry::new(geojson::Value::from(&line)));
        Self { chain, line }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = pop_map_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            count,
            zones,
            output,
            points,
            seed,
            config,
        } => run_generate(
            &multi,
            count,
            &zones,
            &output,
            points.as_deref(),
            seed,
            config.as_deref(),
        )?,
        Commands::Metrics {
            population,
            polygon,
            output,
        } => {
            let people = load_population(&population)?;
            let polygon = features::parse_polygon(&std::fs::read_to_string(&polygon)?)?;
            let metrics = compute(&polygon, &people);
            log::info!(
                "{} activities from {} visitors inside the polygon",
                metrics.total_activities,
                metrics.unique_visitors
            );
            if let Some((hour, count)) = metrics.peak_hour() {
                log::info!("Busiest hour is {hour:02}:00 with {count} activities");
            }
            emit(&metrics, output.as_deref())?;
        }
        Commands::Snapshot {
            population,
            zones,
            zone,
            filter,
            output,
        } => {
            let predicate = FilterPredicate::try_from(FilterRequest::from(filter))?;
            let catalog = load_catalog(&zones)?;
            let points = flatten(&load_population(&population)?);
            let snapshot = zone_snapshot(&catalog, &zone, &points, &predicate)?;
            emit(&snapshot, output.as_deref())?;
        }
        Commands::Chain {
            population,
            id,
            output,
        } => {
            let people = load_population(&population)?;
            let person = people
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| format!("No person with id {id}"))?;
            emit(&ChainView::new(activity_chain(person)), output.as_deref())?;
        }
    }

    Ok(())
}

fn run_generate(
    multi: &MultiProgress,
    count: u32,
    zones: &Path,
    output: &Path,
    points: Option<&Path>,
    seed: Option<u64>,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => GenerationConfig::load(path)?,
        None => GenerationConfig::default(),
    };
    let catalog = load_catalog(zones)?;

    let mut rng = match seed.or(config.seed) {
        Some(seed) => {
            log::info!("Using seed {seed}");
            SeededSource::from_seed_u64(seed)
        }
        None => SeededSource::from_entropy(),
    };

    let progress = IndicatifProgress::people_bar(multi, "Generating population");
    let people =
        PopulationGenerator::new(&catalog, config).generate(count, &mut rng, progress.as_ref())?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    export::write_population(output, &people)?;

    if let Some(points) = points {
        export::write_points(points, &flatten(&people))?;
    }

    Ok(())
}

fn load_catalog(path: &Path) -> Result<ZoneCatalog, Box<dyn std::error::Error>> {
    log::info!("Loading zones from {}", path.display());
    let raw = features::parse_zones(&std::fs::read_to_string(path)?)?;
    let catalog = ZoneCatalog::load(raw)?;
    log::debug!("Catalog holds {} boundary vertices", catalog.vertex_count());
    Ok(catalog)
}

fn load_population(path: &Path) -> Result<Vec<Person>, Box<dyn std::error::Error>> {
    let people = export::parse_population(&std::fs::read_to_string(path)?)?;
    log::info!("Loaded {} people from {}", people.len(), path.display());
    Ok(people)
}

/// Prints `value` as pretty JSON, or writes it to `output`.
fn emit<T: Serialize>(value: &T, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
