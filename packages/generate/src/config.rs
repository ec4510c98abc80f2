//! Generation parameters.
//!
//! The defaults live in `config/default.toml`, embedded at compile time.
//! A user-supplied TOML file replaces them wholesale.

use std::path::Path;

use pop_map_random::{RandomSource, pick_weighted};
use serde::{Deserialize, Serialize};

use crate::GenerateError;

/// Embedded default configuration.
const DEFAULT_TOML: &str = include_str!("../config/default.toml");

/// An inclusive age range with a relative weight in the age pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeBandWeight {
    pub min: u8,
    pub max: u8,
    pub weight: f64,
}

/// Tunable parameters for [`crate::PopulationGenerator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    pub female_probability: f64,
    pub employment_probability: f64,
    pub leisure_home_zone_probability: f64,
    pub max_sampling_attempts: u32,
    /// Seed for reproducible runs. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    pub age_bands: Vec<AgeBandWeight>,
}

impl GenerationConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Toml`] if the document does not parse and
    /// [`GenerateError::InvalidConfig`] if a value is out of range.
    pub fn from_toml_str(text: &str) -> Result<Self, GenerateError> {
        let config: Self = toml::de::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Io`] if the file cannot be read, or any
    /// error of [`GenerationConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, GenerateError> {
        log::info!("Loading generation config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks that probabilities are in `[0, 1]` and that the age pyramid
    /// is usable.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidConfig`] describing the first
    /// offending value.
    pub fn validate(&self) -> Result<(), GenerateError> {
        for (field, value) in [
            ("female_probability", self.female_probability),
            ("employment_probability", self.employment_probability),
            (
                "leisure_home_zone_probability",
                self.leisure_home_zone_probability,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GenerateError::InvalidConfig {
                    message: format!("{field} must be within [0, 1], got {value}"),
                });
            }
        }

        if self.max_sampling_attempts == 0 {
            return Err(GenerateError::InvalidConfig {
                message: "max_sampling_attempts must be at least 1".to_string(),
            });
        }

        if let Some(band) = self.age_bands.iter().find(|b| b.min > b.max) {
            return Err(GenerateError::InvalidConfig {
                message: format!("age band {}-{} has min above max", band.min, band.max),
            });
        }

        if !self.age_bands.iter().any(|b| b.weight > 0.0) {
            return Err(GenerateError::InvalidConfig {
                message: "age_bands must contain at least one positive weight".to_string(),
            });
        }

        Ok(())
    }

    /// Draws an age: a band by weight, then a uniform age inside it.
    pub fn draw_age<R: RandomSource + ?Sized>(&self, rng: &mut R) -> u8 {
        let options: Vec<(AgeBandWeight, f64)> =
            self.age_bands.iter().map(|b| (*b, b.weight)).collect();
        let Some(band) = pick_weighted(&options, rng) else {
            return 0;
        };

        let span = usize::from(band.max.saturating_sub(band.min)) + 1;
        let offset = u8::try_from(rng.index(span)).unwrap_or(0);
        band.min + offset
    }
}

impl Default for GenerationConfig {
    /// The embedded default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse. It is a compile-time
    /// constant, so a failure is a development error caught by tests.
    fn default() -> Self {
        Self::from_toml_str(DEFAULT_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded generation config: {e}"))
    }
}
