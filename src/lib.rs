pub mod agent;
pub mod config;
pub mod coupling;
pub mod engine;
pub mod flock;
pub mod grid;
pub mod leader;
pub mod mapgen;
pub mod population;
pub mod rng;
pub mod scenario;
pub mod snapshot;
pub mod systems;
pub mod vector;
pub mod viewport;
pub mod world;

pub use config::ConfigError;
pub use engine::{Engine, EngineBuilder, EngineSettings, RunSummary, TickSummary};
pub use scenario::{Scenario, ScenarioLoader, ScenarioOverrides};
pub use vector::Vec2;
pub use world::{Outcome, World};
