use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    agent::Body,
    config::{ConfigError, FlockConfig, LifeConfig, LoggingConfig, TerrainConfig, MIN_GRID_EDGE},
    engine::{EngineBuilder, EngineSettings},
    leader::Leader,
    mapgen::{MapGenerator, DEFAULT_TILE_SIZE},
    population::Population,
    rng::{RngExt, RngManager},
    systems::{LeaderSystem, SwarmSystem, TallySystem},
    vector::Vec2,
    viewport::Viewport,
    world::World,
};

fn default_name() -> String {
    "plague".to_string()
}

fn default_seed() -> u64 {
    7
}

fn default_width() -> u32 {
    100
}

fn default_height() -> u32 {
    100
}

fn default_tile_size() -> f64 {
    DEFAULT_TILE_SIZE
}

fn default_initial_follower_count() -> usize {
    1
}

fn default_dt() -> f64 {
    1.0 / 60.0
}

fn default_ticks() -> u64 {
    36_000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_tile_size")]
    pub tile_size: f64,
    #[serde(default = "default_initial_follower_count")]
    pub initial_follower_count: usize,
    /// Seconds per tick.
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default)]
    pub snapshot_interval_ticks: u64,
    /// Leader start in world units; the world centre when omitted.
    #[serde(default)]
    pub leader_start: Option<Vec2>,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub terrain: TerrainConfig,
    #[serde(default)]
    pub flock: FlockConfig,
    #[serde(default)]
    pub life: LifeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: None,
            seed: default_seed(),
            width: default_width(),
            height: default_height(),
            tile_size: default_tile_size(),
            initial_follower_count: default_initial_follower_count(),
            dt: default_dt(),
            ticks: None,
            snapshot_interval_ticks: 0,
            leader_start: None,
            viewport: Viewport::default(),
            terrain: TerrainConfig::default(),
            flock: FlockConfig::default(),
            life: LifeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

/// Command-line adjustments layered over a loaded scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioOverrides {
    pub seed: Option<u64>,
    pub dt: Option<f64>,
    pub snapshot_interval_ticks: Option<u64>,
}

impl Scenario {
    /// Applies whichever overrides are set, then revalidates.
    pub fn apply_overrides(&mut self, overrides: &ScenarioOverrides) -> Result<(), ConfigError> {
        if let Some(seed) = overrides.seed {
            self.seed = seed;
        }
        if let Some(dt) = overrides.dt {
            self.dt = dt;
        }
        if let Some(interval) = overrides.snapshot_interval_ticks {
            self.snapshot_interval_ticks = interval;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_GRID_EDGE || self.height < MIN_GRID_EDGE {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
                min: MIN_GRID_EDGE,
            });
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidTimeStep(self.dt));
        }
        self.terrain.validate()?;
        self.flock.validate()?;
        self.life.validate()?;
        Ok(())
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or_else(default_ticks)
    }

    /// Generates the map and places the leader and the starting swarm.
    /// Fails before building anything if the scenario is invalid.
    pub fn build_world(&self) -> Result<World, ConfigError> {
        self.validate()?;
        let mut rng = RngManager::new(self.seed);
        let grid = MapGenerator::new(self.terrain.clone(), self.tile_size).generate(
            self.width,
            self.height,
            &mut rng.stream("terrain"),
        )?;

        let mut spawn_rng = rng.stream("population");
        let start = self
            .leader_start
            .unwrap_or_else(|| grid.world_size() * 0.5);
        let spread = self.life.initial_velocity_spread;
        let leader = Leader::new(Body::new(
            start,
            Vec2::new(spawn_rng.jitter(spread), spawn_rng.jitter(spread)),
        ));
        let mut population = Population::new();
        for _ in 0..self.initial_follower_count {
            population.spawn_near(start, &self.life, &mut spawn_rng);
        }

        let world = World::new(grid, leader, population, self.viewport);
        info!(
            scenario = %self.name,
            seed = self.seed,
            width = self.width,
            height = self.height,
            followers = world.follower_count(),
            alive_percent = world.alive_tile_percent(),
            "world built"
        );
        Ok(world)
    }

    /// Engine with the standard system order: leader, swarm, tally.
    pub fn engine_builder(&self, snapshot_dir: impl Into<PathBuf>) -> EngineBuilder {
        let settings = EngineSettings {
            scenario_name: self.name.clone(),
            seed: self.seed,
            dt: self.dt,
            snapshot_interval_ticks: self.snapshot_interval_ticks,
            snapshot_dir: snapshot_dir.into(),
        };
        EngineBuilder::new(settings)
            .with_system(LeaderSystem::new())
            .with_system(SwarmSystem::new(self.flock.clone(), self.life.clone()))
            .with_system(TallySystem::new())
    }
}
