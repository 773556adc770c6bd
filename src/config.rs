//! Runtime configuration
//!
//! Defaults match the dashboard's initial slider positions. Every field can be
//! overridden from the environment (`QUAKE_*`) or from a JSON document.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::pipeline::{Params, Pipeline};
use crate::theme::Palette;
use crate::zones::ZoneAssigner;

/// Catalog file read when `QUAKE_CATALOG` is not set
pub const DEFAULT_CATALOG: &str = "katalog_gempa_v2.tsv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog source path
    pub catalog: PathBuf,
    /// Initial pipeline parameters
    pub params: Params,
    /// Seed of the k-means++ initialization
    pub seed: u64,
    pub max_iterations: usize,
    /// Seeded k-means restarts per run
    pub restarts: usize,
    /// Magnitude floor applied once when the catalog is loaded
    pub load_floor: Option<f64>,
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from(DEFAULT_CATALOG),
            params: Params::default(),
            seed: ZoneAssigner::DEFAULT_SEED,
            max_iterations: ZoneAssigner::DEFAULT_MAX_ITERATIONS,
            restarts: 1,
            load_floor: None,
            palette: Palette::default(),
        }
    }
}

impl Config {
    /// Defaults overridden by `QUAKE_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns per variable name.
    /// Unparsable values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("QUAKE_CATALOG") {
            config.catalog = PathBuf::from(path);
        }
        override_parsed(&lookup, "QUAKE_MIN_MAGNITUDE", &mut config.params.min_magnitude);
        override_parsed(&lookup, "QUAKE_ZONES", &mut config.params.zones);
        override_parsed(&lookup, "QUAKE_DISPLAY_CAP", &mut config.params.display_cap);
        override_parsed(&lookup, "QUAKE_SEED", &mut config.seed);
        override_parsed(&lookup, "QUAKE_MAX_ITERATIONS", &mut config.max_iterations);
        override_parsed(&lookup, "QUAKE_RESTARTS", &mut config.restarts);

        if let Some(raw) = lookup("QUAKE_LOAD_FLOOR") {
            match raw.trim().parse::<f64>() {
                Ok(floor) => config.load_floor = Some(floor),
                Err(e) => warn!(key = "QUAKE_LOAD_FLOOR", value = %raw, error = %e, "Ignoring invalid value"),
            }
        }

        if let Some(raw) = lookup("QUAKE_PALETTE") {
            let hex: Vec<&str> = raw.split(',').map(str::trim).collect();
            match Palette::from_hex(&hex) {
                Ok(palette) => config.palette = palette,
                Err(e) => warn!(key = "QUAKE_PALETTE", value = %raw, error = %e, "Ignoring invalid value"),
            }
        }

        config
    }

    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn zone_assigner(&self) -> ZoneAssigner {
        ZoneAssigner::new(self.seed)
            .with_max_iterations(self.max_iterations)
            .with_restarts(self.restarts)
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.zone_assigner(), self.palette.clone())
    }
}

fn override_parsed<F, T>(lookup: &F, key: &str, slot: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => *slot = value,
        Err(e) => warn!(key, value = %raw, error = %e, "Ignoring invalid value"),
    }
}
