use std::f64::consts::TAU;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use plague::{scenario::ScenarioLoader, Scenario, ScenarioOverrides, Vec2, World};

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless locust swarm runner")]
struct Cli {
    /// Path to the scenario YAML file; built-in defaults when omitted
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override tick budget (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override seconds of simulated time per tick
    #[arg(long)]
    dt: Option<f64>,

    /// Override snapshot interval in ticks (0 disables)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Log filter, e.g. "info" or "plague=debug"; RUST_LOG wins when set
    #[arg(long)]
    log_level: Option<String>,

    /// Radius in pixels of the scripted pointer's circle
    #[arg(long, default_value_t = 200.0)]
    pointer_radius: f64,

    /// Ticks for the scripted pointer to complete one circle
    #[arg(long, default_value_t = 600)]
    pointer_period: u64,
}

/// Stand-in for the mouse: circles the viewport centre so the leader sweeps
/// a loop across the map.
struct PointerScript {
    radius: f64,
    period: u64,
}

impl PointerScript {
    fn target(&self, world: &World) -> Vec2 {
        let phase = (world.tick_count() % self.period.max(1)) as f64 / self.period.max(1) as f64;
        world.viewport().half() + Vec2::from_angle(phase * TAU) * self.radius
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut scenario = match &cli.scenario {
        Some(path) => ScenarioLoader::new(".").load(path)?,
        None => Scenario::default(),
    };
    scenario.apply_overrides(&ScenarioOverrides {
        seed: cli.seed,
        dt: cli.dt,
        snapshot_interval_ticks: cli.snapshot_interval,
    })?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| scenario.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    let ticks = scenario.ticks(cli.ticks);
    let snapshot_dir = cli
        .snapshot_dir
        .unwrap_or_else(|| PathBuf::from("snapshots"));
    let mut world = scenario.build_world()?;
    let mut engine = scenario.engine_builder(snapshot_dir).build();
    let pointer = PointerScript {
        radius: cli.pointer_radius,
        period: cli.pointer_period,
    };

    let mut ticks_run = 0;
    while ticks_run < ticks && !world.is_terminal() {
        world.steer_leader(pointer.target(&world));
        engine.tick(&mut world)?;
        ticks_run += 1;
    }

    println!(
        "Scenario '{}' stopped after {} ticks: {:?}. Alive tiles: {}%, dead tiles: {}%, locusts: {}",
        scenario.name,
        ticks_run,
        world.outcome(),
        world.alive_tile_percent_floor(),
        world.dead_tile_percent_floor(),
        world.follower_count()
    );
    Ok(())
}
