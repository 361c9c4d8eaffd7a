//! The player-steered leader the swarm chases.

use serde::{Deserialize, Serialize};

use crate::agent::Body;
use crate::grid::TileGrid;
use crate::vector::Vec2;
use crate::viewport::Viewport;

/// Effective time is divided by this while the leader crosses a mountain.
pub const MOUNTAIN_SLOWDOWN: f64 = 2.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    body: Body,
}

impl Leader {
    pub fn new(body: Body) -> Self {
        Self { body }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.body.position = position;
    }

    /// Points the leader at a screen-space target. The leader sits at the
    /// viewport centre, so the offset from the centre is the new velocity.
    pub fn follow(&mut self, target_screen: Vec2, viewport: &Viewport) {
        self.body.velocity = target_screen - viewport.half();
    }

    pub fn update(&mut self, dt: f64, grid: &TileGrid) {
        let effective_dt = if grid.tile_at(self.body.position).is_mountain() {
            dt / MOUNTAIN_SLOWDOWN
        } else {
            dt
        };
        self.body.advance(effective_dt);
        self.contain(grid.world_size());
    }

    /// Clamps the position into `[0, bounds.x] x [0, bounds.y]`.
    pub fn contain(&mut self, bounds: Vec2) {
        let position = &mut self.body.position;
        position.x = position.x.clamp(0.0, bounds.x);
        position.y = position.y.clamp(0.0, bounds.y);
    }
}
