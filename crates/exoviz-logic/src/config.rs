//! Sky configuration: everything that shapes the fixed tables.
//!
//! Every field has a default matching the stock dashboard, so a config file
//! only needs to name what it overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::defaults;
use crate::error::ConfigError;

/// Top-level configuration consumed by [`crate::context::SkyContext`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    /// CSV catalog to load.
    pub data_path: PathBuf,
    /// Keep only the first `planet_limit` rows of the catalog.
    pub planet_limit: usize,
    /// Seed for planet angular placement. `None` draws from entropy.
    pub planet_seed: Option<u64>,
    /// Seed for the star field and synthetic columns. `None` draws from entropy.
    pub star_seed: Option<u64>,
    /// Number of background stars.
    pub star_count: usize,
    /// Radians added to each planet's azimuth per tick.
    pub orbital_speed: f64,
    /// Milliseconds between ticks, used by the collaborators' timers.
    pub tick_interval_ms: u64,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(defaults::DATA_PATH),
            planet_limit: defaults::PLANET_LIMIT,
            planet_seed: Some(defaults::PLANET_SEED),
            star_seed: None,
            star_count: defaults::STAR_COUNT,
            orbital_speed: defaults::ORBITAL_SPEED,
            tick_interval_ms: defaults::TICK_INTERVAL_MS,
        }
    }
}

impl SkyConfig {
    /// Load a config from a JSON file. Missing fields fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Same config with the catalog path replaced.
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }
}
