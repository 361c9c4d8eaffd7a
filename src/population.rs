//! The follower swarm and its birth/death bookkeeping.

use rand::Rng;

use crate::agent::{Body, Follower};
use crate::config::LifeConfig;
use crate::grid::MAX_LIFE;
use crate::rng::RngExt;
use crate::vector::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    members: Vec<Follower>,
    /// Starting life handed to newly spawned followers. Reset to full
    /// whenever a death leaves survivors behind.
    respawn_baseline: f64,
}

impl Default for Population {
    fn default() -> Self {
        Self::new()
    }
}

impl Population {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            respawn_baseline: MAX_LIFE,
        }
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Follower] {
        &self.members
    }

    pub fn get(&self, index: usize) -> Option<&Follower> {
        self.members.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Follower> {
        self.members.get_mut(index)
    }

    pub fn respawn_baseline(&self) -> f64 {
        self.respawn_baseline
    }

    /// Copy of every follower's body, in population order.
    pub fn bodies(&self) -> Vec<Body> {
        self.members.iter().map(|f| *f.body()).collect()
    }

    pub fn spawn(&mut self, body: Body, life: &LifeConfig) -> &Follower {
        if self.respawn_baseline <= 0.0 {
            self.respawn_baseline = MAX_LIFE;
        }
        let index = self.members.len();
        self.members.push(Follower::new(
            body,
            self.respawn_baseline,
            life.follower_decay,
            life.follower_heal,
        ));
        &self.members[index]
    }

    /// Spawns a follower somewhere in the square of half-width
    /// `life.spawn_spread` around `center`, with a small random velocity.
    pub fn spawn_near<R: Rng + ?Sized>(
        &mut self,
        center: Vec2,
        life: &LifeConfig,
        rng: &mut R,
    ) -> &Follower {
        let offset = Vec2::new(rng.jitter(life.spawn_spread), rng.jitter(life.spawn_spread));
        let velocity = Vec2::new(
            rng.jitter(life.initial_velocity_spread),
            rng.jitter(life.initial_velocity_spread),
        );
        self.spawn(Body::new(center + offset, velocity), life)
    }

    /// Removes the followers at `indices` (any order, duplicates ignored)
    /// by swap-with-last. Returns how many were removed.
    pub fn bury(&mut self, indices: &[usize]) -> usize {
        let mut doomed: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.members.len())
            .collect();
        doomed.sort_unstable_by(|a, b| b.cmp(a));
        doomed.dedup();
        for &index in &doomed {
            self.members.swap_remove(index);
        }
        // no-op while the baseline only ever holds MAX_LIFE
        if !doomed.is_empty() && !self.members.is_empty() {
            self.respawn_baseline = MAX_LIFE;
        }
        doomed.len()
    }
}
