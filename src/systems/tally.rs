use anyhow::Result;
use tracing::{info, trace};

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

/// Recounts living tiles and raises the win/lose flags.
pub struct TallySystem;

impl TallySystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TallySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for TallySystem {
    fn name(&self) -> &str {
        "tally"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let (was_won, was_lost) = (world.is_won(), world.is_lost());
        let alive_percent = world.recompute_alive_ratio();
        world.recompute_extinction();
        trace!(tick = ctx.tick, alive_percent, followers = world.follower_count(), "tally");

        if world.is_won() && !was_won {
            info!(tick = ctx.tick, followers = world.follower_count(), "every plain tile is dead");
        }
        if world.is_lost() && !was_lost {
            info!(tick = ctx.tick, alive_percent, "the swarm has died out");
        }
        Ok(())
    }
}
