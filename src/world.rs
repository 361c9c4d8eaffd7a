use serde::{Deserialize, Serialize};

use crate::agent::{Agent, Body};
use crate::grid::{LifeCensus, TileGrid, TilePos};
use crate::leader::Leader;
use crate::population::Population;
use crate::vector::Vec2;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Running,
    /// Every plain tile is dead.
    Won,
    /// The swarm died out.
    Lost,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowerSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub life: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub scenario: String,
    pub tick: u64,
    pub width: u32,
    pub height: u32,
    pub tile_size: f64,
    pub outcome: Outcome,
    pub alive_tile_percent: f64,
    pub follower_count: usize,
    pub leader: Body,
    pub followers: Vec<FollowerSnapshot>,
    /// Row-major tile life; mountains read 0.
    pub tile_life: Vec<f64>,
}

/// Everything one simulation owns. Systems mutate it once per tick; between
/// ticks it is only read.
pub struct World {
    tick: u64,
    viewport: Viewport,
    census: LifeCensus,
    won: bool,
    lost: bool,
    pub(crate) grid: TileGrid,
    pub(crate) population: Population,
    pub(crate) leader: Leader,
}

impl World {
    pub fn new(grid: TileGrid, leader: Leader, population: Population, viewport: Viewport) -> Self {
        let census = grid.census();
        Self {
            tick: 0,
            viewport,
            census,
            won: false,
            lost: false,
            grid,
            population,
            leader,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn advance_time(&mut self) {
        self.tick += 1;
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }

    pub fn leader(&self) -> &Leader {
        &self.leader
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Latest pointer position, in screen coordinates.
    pub fn steer_leader(&mut self, target_screen: Vec2) {
        self.leader.follow(target_screen, &self.viewport);
    }

    pub fn set_tile_life(&mut self, pos: TilePos, life: f64) {
        self.grid.set_life(pos, life);
    }

    /// Every agent, leader first.
    pub fn agents(&self) -> impl Iterator<Item = Agent<'_>> + '_ {
        std::iter::once(Agent::Leader(&self.leader))
            .chain(self.population.members().iter().map(Agent::Follower))
    }

    /// Recounts plain tiles and returns the alive percentage. Reaching zero
    /// marks the world as won.
    pub fn recompute_alive_ratio(&mut self) -> f64 {
        self.census = self.grid.census();
        if self.census.alive == 0 {
            self.won = true;
        }
        self.census.alive_percent()
    }

    /// Marks the world as lost once the swarm is gone.
    pub fn recompute_extinction(&mut self) -> bool {
        if self.population.is_empty() {
            self.lost = true;
        }
        self.lost
    }

    pub fn census(&self) -> LifeCensus {
        self.census
    }

    /// Alive percentage as of the last recount.
    pub fn alive_tile_percent(&self) -> f64 {
        self.census.alive_percent()
    }

    /// Whole-number alive percentage for status panels, rounded down.
    pub fn alive_tile_percent_floor(&self) -> u32 {
        self.alive_tile_percent().floor() as u32
    }

    pub fn dead_tile_percent_floor(&self) -> u32 {
        100 - self.alive_tile_percent_floor()
    }

    pub fn follower_count(&self) -> usize {
        self.population.count()
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn is_lost(&self) -> bool {
        self.lost
    }

    pub fn is_terminal(&self) -> bool {
        self.won || self.lost
    }

    /// Loss takes precedence if both flags were raised on the same tick.
    pub fn outcome(&self) -> Outcome {
        if self.lost {
            Outcome::Lost
        } else if self.won {
            Outcome::Won
        } else {
            Outcome::Running
        }
    }

    /// Screen position of `world_pos` in a window centred on the leader.
    pub fn to_display_coords(&self, world_pos: Vec2) -> Vec2 {
        self.viewport
            .to_display_coords(world_pos, self.leader.position())
    }

    pub fn snapshot(&self, scenario: &str) -> WorldSnapshot {
        WorldSnapshot {
            scenario: scenario.to_string(),
            tick: self.tick,
            width: self.grid.width(),
            height: self.grid.height(),
            tile_size: self.grid.tile_size(),
            outcome: self.outcome(),
            alive_tile_percent: self.alive_tile_percent(),
            follower_count: self.follower_count(),
            leader: *self.leader.body(),
            followers: self
                .population
                .members()
                .iter()
                .map(|f| FollowerSnapshot {
                    position: f.body().position,
                    velocity: f.body().velocity,
                    life: f.life(),
                })
                .collect(),
            tile_life: self.grid.tiles().iter().map(|t| t.life()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LifeConfig;

    fn world(followers: usize) -> World {
        let grid = TileGrid::uniform(5, 5, 100.0, 40.0).unwrap();
        let leader = Leader::new(Body::new(Vec2::new(250.0, 250.0), Vec2::ZERO));
        let mut population = Population::new();
        for _ in 0..followers {
            population.spawn(Body::new(Vec2::new(250.0, 250.0), Vec2::ZERO), &LifeConfig::default());
        }
        World::new(grid, leader, population, Viewport::default())
    }

    #[test]
    fn test_forced_dead_tiles_win() {
        let mut world = world(1);
        assert_eq!(world.alive_tile_percent(), 100.0);
        for y in 1..4 {
            for x in 1..4 {
                world.set_tile_life(TilePos::new(x, y), 0.0);
            }
        }
        assert_eq!(world.recompute_alive_ratio(), 0.0);
        assert!(world.is_won());
        assert_eq!(world.outcome(), Outcome::Won);
        assert_eq!(world.dead_tile_percent_floor(), 100);
    }

    #[test]
    fn test_flags_are_sticky() {
        let mut world = world(0);
        assert!(world.recompute_extinction());
        world.population_mut().spawn(Body::default(), &LifeConfig::default());
        assert!(world.recompute_extinction());
        assert!(world.is_lost());
    }

    #[test]
    fn test_agents_lists_leader_first() {
        let world = world(3);
        let agents: Vec<_> = world.agents().collect();
        assert_eq!(agents.len(), 4);
        assert!(matches!(agents[0], Agent::Leader(_)));
        assert!(agents[0].life().is_none());
        assert_eq!(agents[1].life(), Some(100.0));
    }

    #[test]
    fn test_display_coords_follow_leader() {
        let world = world(0);
        assert_eq!(
            world.to_display_coords(Vec2::new(250.0, 250.0)),
            Vec2::new(512.0, 384.0)
        );
    }

    #[test]
    fn test_snapshot_shape() {
        let world = world(2);
        let snapshot = world.snapshot("meadow");
        assert_eq!(snapshot.tile_life.len(), 25);
        assert_eq!(snapshot.followers.len(), 2);
        assert_eq!(snapshot.outcome, Outcome::Running);
    }
}
