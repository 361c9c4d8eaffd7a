use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

/// Moves the leader first so the swarm chases where it is this tick.
pub struct LeaderSystem;

impl LeaderSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LeaderSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for LeaderSystem {
    fn name(&self) -> &str {
        "leader"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        world.leader.update(ctx.dt, &world.grid);
        Ok(())
    }
}
