//! Race configuration, loadable from RON.

use crate::constants::*;
use crate::error::ConfigError;
use crate::search::*;
use crate::topology::WorldGeometry;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Size of the world and how many obstacles the generator places.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub main_width: u8,
    pub pab_width: u8,
    pub bridge_length: u8,
    pub walls_main: u32,
    pub walls_pab: u32,
    pub angry_main: u32,
    pub angry_pab: u32,
    pub max_attempts: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            main_width: 20,
            pab_width: 8,
            bridge_length: DEFAULT_BRIDGE_LENGTH,
            walls_main: 10,
            walls_pab: 5,
            angry_main: 4,
            angry_pab: 2,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub start_score: i32,
    pub start_time: i32,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        ResourceConfig {
            start_score: DEFAULT_START_SCORE,
            start_time: DEFAULT_START_TIME,
        }
    }
}

/// Everything a race needs besides its seeds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub world: WorldConfig,
    /// Algorithm of agents 0, 1 and 2.
    pub agents: [AlgorithmKind; 3],
    pub resources: ResourceConfig,
    pub search: SearchParams,
}

impl Default for RaceConfig {
    fn default() -> Self {
        RaceConfig {
            world: WorldConfig::default(),
            agents: AlgorithmKind::ALL,
            resources: ResourceConfig::default(),
            search: SearchParams::default(),
        }
    }
}

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), ConfigError> {
    if value < min || value > max {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    } else {
        Ok(())
    }
}

fn check_param(field: &'static str, value: f64, valid: bool) -> Result<(), ConfigError> {
    if valid && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { field, value })
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    check_param(field, value, (0.0..=1.0).contains(&value))
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let main_width = self.main_width as i64;
        let pab_width = self.pab_width as i64;
        let angry_main = self.angry_main as i64;
        let angry_pab = self.angry_pab as i64;

        check_range(
            "world.main_width",
            main_width,
            MIN_MAIN_WIDTH as i64,
            MAX_MAIN_WIDTH as i64,
        )?;
        check_range(
            "world.pab_width",
            pab_width,
            MIN_PAB_WIDTH as i64,
            MAX_PAB_WIDTH as i64,
        )?;
        check_range(
            "world.bridge_length",
            self.bridge_length as i64,
            MIN_BRIDGE_LENGTH as i64,
            MAX_BRIDGE_LENGTH as i64,
        )?;
        check_range("world.angry_main", angry_main, 0, main_width)?;
        check_range(
            "world.walls_main",
            self.walls_main as i64,
            0,
            main_width - angry_main,
        )?;
        check_range("world.angry_pab", angry_pab, 0, pab_width)?;
        check_range(
            "world.walls_pab",
            self.walls_pab as i64,
            0,
            pab_width - angry_pab,
        )?;
        check_range(
            "world.max_attempts",
            self.max_attempts as i64,
            1,
            u32::MAX as i64,
        )?;

        Ok(())
    }

    pub fn geometry(&self) -> WorldGeometry {
        WorldGeometry::new(self.main_width, self.bridge_length, self.pab_width)
    }
}

impl SearchParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let hc = &self.hill_climbing;
        check_probability("search.hill_climbing.sideways_probability", hc.sideways_probability)?;

        let shc = &self.stochastic;
        check_probability("search.stochastic.uphill_probability", shc.uphill_probability)?;

        let sa = &self.annealing;
        check_param(
            "search.annealing.initial_temperature",
            sa.initial_temperature,
            sa.initial_temperature > 0.0,
        )?;
        check_param(
            "search.annealing.alpha",
            sa.alpha,
            sa.alpha > 0.0 && sa.alpha < 1.0,
        )?;
        check_param(
            "search.annealing.min_temperature",
            sa.min_temperature,
            sa.min_temperature > 0.0 && sa.min_temperature < sa.initial_temperature,
        )?;

        Ok(())
    }
}

impl RaceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;

        for (i, kind) in self.agents.iter().enumerate() {
            if self.agents[..i].contains(kind) {
                return Err(ConfigError::DuplicateAlgorithm(kind.to_string()));
            }
        }

        check_range(
            "resources.start_score",
            self.resources.start_score as i64,
            1,
            i32::MAX as i64,
        )?;
        check_range(
            "resources.start_time",
            self.resources.start_time as i64,
            1,
            i32::MAX as i64,
        )?;

        self.search.validate()
    }

    /// Parse and validate a RON document. Missing fields take their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: RaceConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    pub fn geometry(&self) -> WorldGeometry {
        self.world.geometry()
    }
}
