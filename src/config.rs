//! Tunable parameters for terrain, flocking and the life coupling.
//!
//! Every field has a serde default so a scenario file only needs to name
//! what it changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest grid edge that still leaves an interior after border forcing.
pub const MIN_GRID_EDGE: u32 = 3;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid must be at least {min}x{min} tiles, got {width}x{height}")]
    GridTooSmall { width: u32, height: u32, min: u32 },
    #[error("tile size must be a positive finite number, got {0}")]
    InvalidTileSize(f64),
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("seed odds must sum to at most 1, got {0}")]
    SeedOddsOverflow(f64),
    #[error("{name} must be a finite non-negative number, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),
    #[error("expected {expected} tiles in row-major order, got {actual}")]
    TileLayoutMismatch { expected: usize, actual: usize },
}

fn default_mountain_seed_odds() -> f64 {
    0.1
}

fn default_plain_seed_odds() -> f64 {
    0.2
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainConfig {
    #[serde(default = "default_mountain_seed_odds")]
    pub mountain_seed_odds: f64,
    #[serde(default = "default_plain_seed_odds")]
    pub plain_seed_odds: f64,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            mountain_seed_odds: default_mountain_seed_odds(),
            plain_seed_odds: default_plain_seed_odds(),
        }
    }
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("terrain.mountain_seed_odds", self.mountain_seed_odds)?;
        check_probability("terrain.plain_seed_odds", self.plain_seed_odds)?;
        let total = self.mountain_seed_odds + self.plain_seed_odds;
        if total > 1.0 {
            return Err(ConfigError::SeedOddsOverflow(total));
        }
        Ok(())
    }
}

fn default_neighbor_radius() -> f64 {
    25.0
}

fn default_cruise_speed() -> f64 {
    50.0
}

fn default_alignment_weight() -> f64 {
    0.0
}

fn default_cohesion_weight() -> f64 {
    0.0
}

fn default_separation_weight() -> f64 {
    0.7
}

fn default_follow_speed() -> f64 {
    100.0
}

fn default_turn_step_degrees() -> f64 {
    5.0
}

fn default_standoff_distance() -> f64 {
    50.0
}

fn default_speed_multiplier() -> f64 {
    4.0
}

/// Steering constants for followers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlockConfig {
    /// Radius of the neighbourhood and length of the forward projection.
    #[serde(default = "default_neighbor_radius")]
    pub neighbor_radius: f64,
    #[serde(default = "default_cruise_speed")]
    pub cruise_speed: f64,
    #[serde(default = "default_alignment_weight")]
    pub alignment_weight: f64,
    #[serde(default = "default_cohesion_weight")]
    pub cohesion_weight: f64,
    #[serde(default = "default_separation_weight")]
    pub separation_weight: f64,
    /// Speed of the leader-following contribution.
    #[serde(default = "default_follow_speed")]
    pub follow_speed: f64,
    #[serde(default = "default_turn_step_degrees")]
    pub turn_step_degrees: f64,
    /// Inside this distance to the leader, followers turn away instead.
    #[serde(default = "default_standoff_distance")]
    pub standoff_distance: f64,
    #[serde(default = "default_speed_multiplier")]
    pub speed_multiplier: f64,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            neighbor_radius: default_neighbor_radius(),
            cruise_speed: default_cruise_speed(),
            alignment_weight: default_alignment_weight(),
            cohesion_weight: default_cohesion_weight(),
            separation_weight: default_separation_weight(),
            follow_speed: default_follow_speed(),
            turn_step_degrees: default_turn_step_degrees(),
            standoff_distance: default_standoff_distance(),
            speed_multiplier: default_speed_multiplier(),
        }
    }
}

impl FlockConfig {
    pub fn turn_step_radians(&self) -> f64 {
        self.turn_step_degrees.to_radians()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("flock.neighbor_radius", self.neighbor_radius)?;
        check_non_negative("flock.cruise_speed", self.cruise_speed)?;
        check_non_negative("flock.follow_speed", self.follow_speed)?;
        check_non_negative("flock.turn_step_degrees", self.turn_step_degrees)?;
        check_non_negative("flock.standoff_distance", self.standoff_distance)?;
        check_non_negative("flock.speed_multiplier", self.speed_multiplier)?;
        // weights may be negative to invert a rule, but must be finite
        for (name, value) in [
            ("flock.alignment_weight", self.alignment_weight),
            ("flock.cohesion_weight", self.cohesion_weight),
            ("flock.separation_weight", self.separation_weight),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

fn default_tile_decay() -> f64 {
    0.1
}

fn default_follower_heal() -> f64 {
    0.9
}

fn default_follower_decay() -> f64 {
    0.1
}

fn default_tile_regrowth() -> f64 {
    0.0
}

fn default_max_spawn_per_death() -> u32 {
    2
}

fn default_spawn_spread() -> f64 {
    200.0
}

fn default_initial_velocity_spread() -> f64 {
    5.0
}

/// Rates for the tile/follower life exchange, all per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeConfig {
    #[serde(default = "default_tile_decay")]
    pub tile_decay: f64,
    #[serde(default = "default_follower_heal")]
    pub follower_heal: f64,
    #[serde(default = "default_follower_decay")]
    pub follower_decay: f64,
    /// Life returned to a dead plain tile while a follower stands on it.
    #[serde(default = "default_tile_regrowth")]
    pub tile_regrowth: f64,
    #[serde(default = "default_max_spawn_per_death")]
    pub max_spawn_per_death: u32,
    /// Half-width of the square around the leader where followers appear.
    #[serde(default = "default_spawn_spread")]
    pub spawn_spread: f64,
    #[serde(default = "default_initial_velocity_spread")]
    pub initial_velocity_spread: f64,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            tile_decay: default_tile_decay(),
            follower_heal: default_follower_heal(),
            follower_decay: default_follower_decay(),
            tile_regrowth: default_tile_regrowth(),
            max_spawn_per_death: default_max_spawn_per_death(),
            spawn_spread: default_spawn_spread(),
            initial_velocity_spread: default_initial_velocity_spread(),
        }
    }
}

impl LifeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("life.tile_decay", self.tile_decay)?;
        check_non_negative("life.follower_heal", self.follower_heal)?;
        check_non_negative("life.follower_decay", self.follower_decay)?;
        check_non_negative("life.tile_regrowth", self.tile_regrowth)?;
        check_non_negative("life.spawn_spread", self.spawn_spread)?;
        check_non_negative("life.initial_velocity_spread", self.initial_velocity_spread)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}
