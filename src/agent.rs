//! Agents: the shared kinematic body plus the two roles built on it.

use serde::{Deserialize, Serialize};

use crate::grid::MAX_LIFE;
use crate::leader::Leader;
use crate::vector::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Body {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self { position, velocity }
    }

    /// Euler step: `position += velocity * dt`.
    pub fn advance(&mut self, dt: f64) {
        self.position = self.position + self.velocity * dt;
    }
}

/// A swarm member. Life is kept in `[0, MAX_LIFE]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Follower {
    body: Body,
    life: f64,
    decay_rate: f64,
    heal_rate: f64,
}

impl Follower {
    pub fn new(body: Body, life: f64, decay_rate: f64, heal_rate: f64) -> Self {
        Self {
            body,
            life: life.clamp(0.0, MAX_LIFE),
            decay_rate,
            heal_rate,
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn life(&self) -> f64 {
        self.life
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    pub fn heal_rate(&self) -> f64 {
        self.heal_rate
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Feeding on a living tile.
    pub fn heal(&mut self) {
        if self.life < MAX_LIFE {
            self.life = (self.life + self.heal_rate).min(MAX_LIFE);
        }
    }

    /// Starving on dead ground.
    pub fn wither(&mut self) {
        if self.life > 0.0 {
            self.life = (self.life - self.decay_rate).max(0.0);
        }
    }

    pub fn set_life(&mut self, life: f64) {
        self.life = life.clamp(0.0, MAX_LIFE);
    }
}

/// Read-only view over either agent role, for observers that walk every
/// agent in the world.
#[derive(Debug, Clone, Copy)]
pub enum Agent<'a> {
    Leader(&'a Leader),
    Follower(&'a Follower),
}

impl<'a> Agent<'a> {
    pub fn body(&self) -> &'a Body {
        match self {
            Agent::Leader(leader) => leader.body(),
            Agent::Follower(follower) => follower.body(),
        }
    }

    pub fn life(&self) -> Option<f64> {
        match self {
            Agent::Leader(_) => None,
            Agent::Follower(follower) => Some(follower.life()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn follower(life: f64) -> Follower {
        Follower::new(Body::default(), life, 0.1, 0.9)
    }

    #[test]
    fn test_advance() {
        let mut body = Body::new(Vec2::new(1.0, 1.0), Vec2::new(60.0, -30.0));
        body.advance(0.5);
        assert_eq!(body.position, Vec2::new(31.0, -14.0));
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut f = follower(99.5);
        f.heal();
        assert_eq!(f.life(), MAX_LIFE);
        f.heal();
        assert_eq!(f.life(), MAX_LIFE);
    }

    #[test]
    fn test_wither_floors_at_zero() {
        let mut f = follower(0.05);
        f.wither();
        assert_eq!(f.life(), 0.0);
        assert!(f.is_dead());
        f.wither();
        assert_eq!(f.life(), 0.0);
    }

    #[test]
    fn test_construction_clamps() {
        assert_eq!(follower(150.0).life(), MAX_LIFE);
        assert_eq!(follower(-1.0).life(), 0.0);
    }
}
