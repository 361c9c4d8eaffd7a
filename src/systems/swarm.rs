use anyhow::Result;
use rand::Rng;
use tracing::debug;

use crate::{
    config::{FlockConfig, LifeConfig},
    coupling::occupy,
    engine::{System, SystemContext},
    flock::FlockEngine,
    rng::SystemRng,
    world::World,
};

/// Steers, moves and feeds every follower, then applies the tick's deaths
/// and births.
///
/// Steering reads a copy of the swarm taken before anyone moves, so the
/// result does not depend on population order. Deaths and births are held
/// back until the pass is over; newborns first act on the next tick.
pub struct SwarmSystem {
    flock: FlockEngine,
    life: LifeConfig,
}

impl SwarmSystem {
    pub fn new(flock: FlockConfig, life: LifeConfig) -> Self {
        Self {
            flock: FlockEngine::new(flock),
            life,
        }
    }
}

impl Default for SwarmSystem {
    fn default() -> Self {
        Self::new(FlockConfig::default(), LifeConfig::default())
    }
}

impl System for SwarmSystem {
    fn name(&self) -> &str {
        "swarm"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let bodies = world.population.bodies();
        let leader = world.leader.position();
        let mut deaths = Vec::new();
        let mut births = 0u32;

        for index in 0..bodies.len() {
            let velocity = self.flock.velocity(index, &bodies, leader);
            let Some(follower) = world.population.get_mut(index) else {
                continue;
            };
            let body = follower.body_mut();
            body.velocity = velocity;
            body.advance(ctx.dt);

            let tile = world.grid.tile_at_mut(body.position);
            let pos = tile.pos();
            let occupancy = occupy(tile, follower, &self.life);
            if occupancy.tile_died {
                let spawned = rng.gen_range(0..=self.life.max_spawn_per_death);
                births += spawned;
                debug!(tick = ctx.tick, x = pos.x, y = pos.y, spawned, "tile died");
            }
            if follower.is_dead() {
                deaths.push(index);
            }
        }

        let buried = world.population.bury(&deaths);
        for _ in 0..births {
            world.population.spawn_near(leader, &self.life, rng);
        }
        if buried > 0 || births > 0 {
            debug!(
                tick = ctx.tick,
                buried,
                born = births,
                followers = world.population.count(),
                "swarm changed size"
            );
        }
        Ok(())
    }
}
