use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::rng::{RngManager, SystemRng};
use crate::snapshot::SnapshotWriter;
use crate::world::{Outcome, World};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    /// Seconds of simulated time per tick.
    pub dt: f64,
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_ticks,
            ),
            settings: self.settings,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SystemRunReport {
    pub name: String,
    pub duration_ms: f64,
}

#[derive(Clone, Debug)]
pub struct TickSummary {
    pub tick: u64,
    pub system_reports: Vec<SystemRunReport>,
    pub follower_count: usize,
    pub alive_tile_percent: f64,
    pub outcome: Outcome,
    pub snapshot_path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub ticks_run: u64,
    pub outcome: Outcome,
    pub follower_count: usize,
    pub alive_tile_percent: f64,
}

/// Advances a [`World`] through its systems, in registration order.
///
/// `tick` always advances, even after the world reached an outcome; stopping
/// is the caller's call. The `run*` helpers are such callers and stop at the
/// first win or loss.
pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
}

impl Engine {
    /// One tick with the configured time step.
    pub fn tick(&mut self, world: &mut World) -> Result<TickSummary> {
        let dt = self.settings.dt;
        self.tick_with(world, dt)
    }

    pub fn tick_with(&mut self, world: &mut World, dt: f64) -> Result<TickSummary> {
        let current_tick = world.tick_count() + 1;
        let mut system_reports = Vec::with_capacity(self.systems.len());
        for system in &mut self.systems {
            let mut rng_stream = self.rng.stream(system.name());
            let ctx = SystemContext {
                tick: current_tick,
                dt,
                scenario_name: &self.settings.scenario_name,
            };
            let start = Instant::now();
            system
                .run(&ctx, world, &mut rng_stream)
                .with_context(|| format!("system '{}' failed on tick {current_tick}", system.name()))?;
            system_reports.push(SystemRunReport {
                name: system.name().to_string(),
                duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
            });
        }
        world.advance_time();
        let snapshot_path = self
            .snapshot_writer
            .maybe_write(world, &self.settings.scenario_name)?;
        if let Some(path) = &snapshot_path {
            debug!(tick = current_tick, path = %path.display(), "wrote snapshot");
        }

        Ok(TickSummary {
            tick: current_tick,
            system_reports,
            follower_count: world.follower_count(),
            alive_tile_percent: world.alive_tile_percent(),
            outcome: world.outcome(),
            snapshot_path,
        })
    }

    pub fn run(&mut self, world: &mut World, ticks: u64) -> Result<RunSummary> {
        self.run_with_hook(world, ticks, |_| {})
    }

    /// Runs up to `ticks` ticks, handing the fully updated world to `hook`
    /// after each one.
    pub fn run_with_hook<F>(&mut self, world: &mut World, ticks: u64, mut hook: F) -> Result<RunSummary>
    where
        F: FnMut(&World),
    {
        let mut ticks_run = 0;
        while ticks_run < ticks && !world.is_terminal() {
            self.tick(world)?;
            ticks_run += 1;
            hook(world);
        }
        let summary = RunSummary {
            ticks_run,
            outcome: world.outcome(),
            follower_count: world.follower_count(),
            alive_tile_percent: world.alive_tile_percent(),
        };
        info!(
            scenario = %self.settings.scenario_name,
            ticks = ticks_run,
            outcome = ?summary.outcome,
            followers = summary.follower_count,
            alive_percent = summary.alive_tile_percent,
            "run finished"
        );
        Ok(summary)
    }
}

pub struct SystemContext<'a> {
    pub tick: u64,
    pub dt: f64,
    pub scenario_name: &'a str,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}
