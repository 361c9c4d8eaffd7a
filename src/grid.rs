//! Tile grid - the world's ground layer.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, MIN_GRID_EDGE};
use crate::vector::Vec2;

pub const MAX_LIFE: f64 = 100.0;

/// Tile position in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePos {
    pub x: u32,
    pub y: u32,
}

impl TilePos {
    pub const ORIGIN: TilePos = TilePos { x: 0, y: 0 };

    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Biome {
    Plain,
    Mountain,
}

/// Coarse life bands used by observers to pick a tile's look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifeTier {
    Lush,
    Healthy,
    Sparse,
    Withered,
    Dead,
    Mountain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pos: TilePos,
    biome: Biome,
    life: f64,
    has_died: bool,
}

impl Tile {
    pub fn plain(pos: TilePos, life: f64) -> Self {
        let life = clamp_life(life);
        Self {
            pos,
            biome: Biome::Plain,
            life,
            has_died: life <= 0.0,
        }
    }

    pub fn mountain(pos: TilePos) -> Self {
        Self {
            pos,
            biome: Biome::Mountain,
            life: 0.0,
            has_died: false,
        }
    }

    pub fn pos(&self) -> TilePos {
        self.pos
    }

    pub fn biome(&self) -> Biome {
        self.biome
    }

    pub fn life(&self) -> f64 {
        self.life
    }

    pub fn is_mountain(&self) -> bool {
        self.biome == Biome::Mountain
    }

    pub fn is_alive(&self) -> bool {
        self.biome == Biome::Plain && self.life > 0.0
    }

    /// Removes `amount` life from a living tile. Returns `true` only when this
    /// call kills a tile that had never died before.
    pub fn drain(&mut self, amount: f64) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.life = clamp_life(self.life - amount);
        if self.life > 0.0 {
            return false;
        }
        let first_death = !self.has_died;
        self.has_died = true;
        first_death
    }

    /// Adds life to a plain tile, reviving it if it was dead. Mountains stay
    /// barren.
    pub fn heal(&mut self, amount: f64) {
        if self.is_mountain() {
            return;
        }
        self.life = clamp_life(self.life + amount);
    }

    /// Overwrites a plain tile's life. A forced zero counts as a death that
    /// spawns nothing.
    pub fn set_life(&mut self, life: f64) {
        if self.is_mountain() {
            return;
        }
        self.life = clamp_life(life);
        if self.life <= 0.0 {
            self.has_died = true;
        }
    }

    pub fn tier(&self) -> LifeTier {
        match self.biome {
            Biome::Mountain => LifeTier::Mountain,
            Biome::Plain if self.life <= 0.0 => LifeTier::Dead,
            Biome::Plain if self.life >= 75.0 => LifeTier::Lush,
            Biome::Plain if self.life >= 50.0 => LifeTier::Healthy,
            Biome::Plain if self.life >= 25.0 => LifeTier::Sparse,
            Biome::Plain => LifeTier::Withered,
        }
    }
}

fn clamp_life(life: f64) -> f64 {
    if life.is_nan() {
        0.0
    } else {
        life.clamp(0.0, MAX_LIFE)
    }
}

/// Alive/dead tallies over plain tiles; mountains count as neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LifeCensus {
    pub alive: usize,
    pub dead: usize,
}

impl LifeCensus {
    /// Percentage of plain tiles still alive. A grid without plain tiles
    /// reports zero.
    pub fn alive_percent(&self) -> f64 {
        let total = self.alive + self.dead;
        if total == 0 {
            0.0
        } else {
            self.alive as f64 / total as f64 * 100.0
        }
    }
}

/// Tile grid representing the world
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tile_size: f64,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Builds a grid from row-major tiles. Border cells are turned into
    /// mountains whatever they were. Every cell must be present exactly once,
    /// in row-major order.
    pub fn from_tiles(
        width: u32,
        height: u32,
        tile_size: f64,
        mut tiles: Vec<Tile>,
    ) -> Result<Self, ConfigError> {
        check_dimensions(width, height)?;
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(ConfigError::InvalidTileSize(tile_size));
        }
        let expected = (width * height) as usize;
        let in_order = tiles
            .iter()
            .enumerate()
            .all(|(index, tile)| index == (tile.pos.y * width + tile.pos.x) as usize);
        if tiles.len() != expected || !in_order {
            return Err(ConfigError::TileLayoutMismatch {
                expected,
                actual: tiles.len(),
            });
        }
        for tile in tiles.iter_mut() {
            let TilePos { x, y } = tile.pos;
            if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                *tile = Tile::mountain(tile.pos);
            }
        }
        Ok(Self {
            width,
            height,
            tile_size,
            tiles,
        })
    }

    /// A grid whose interior is plain at `life`, ringed by mountains.
    pub fn uniform(width: u32, height: u32, tile_size: f64, life: f64) -> Result<Self, ConfigError> {
        check_dimensions(width, height)?;
        let tiles = (0..height)
            .flat_map(|y| (0..width).map(move |x| Tile::plain(TilePos::new(x, y), life)))
            .collect();
        Self::from_tiles(width, height, tile_size, tiles)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Extent of the grid in world units.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f64 * self.tile_size,
            self.height as f64 * self.tile_size,
        )
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, pos: TilePos) -> Option<&Tile> {
        self.index_of(pos).map(|index| &self.tiles[index])
    }

    pub fn tile_mut(&mut self, pos: TilePos) -> Option<&mut Tile> {
        match self.index_of(pos) {
            Some(index) => Some(&mut self.tiles[index]),
            None => None,
        }
    }

    /// Grid cell under a world position. Positions off the grid (or NaN)
    /// resolve to the origin tile, which is always a border mountain.
    pub fn locate(&self, position: Vec2) -> TilePos {
        let x = (position.x / self.tile_size).floor();
        let y = (position.y / self.tile_size).floor();
        let in_bounds = x >= 0.0 && y >= 0.0 && x < self.width as f64 && y < self.height as f64;
        if in_bounds {
            TilePos::new(x as u32, y as u32)
        } else {
            TilePos::ORIGIN
        }
    }

    pub fn tile_at(&self, position: Vec2) -> &Tile {
        let index = self.index_of(self.locate(position)).unwrap_or(0);
        &self.tiles[index]
    }

    pub fn tile_at_mut(&mut self, position: Vec2) -> &mut Tile {
        let index = self.index_of(self.locate(position)).unwrap_or(0);
        &mut self.tiles[index]
    }

    pub fn set_life(&mut self, pos: TilePos, life: f64) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.set_life(life);
        }
    }

    pub fn census(&self) -> LifeCensus {
        self.tiles
            .iter()
            .filter(|tile| !tile.is_mountain())
            .fold(LifeCensus::default(), |mut census, tile| {
                if tile.is_alive() {
                    census.alive += 1;
                } else {
                    census.dead += 1;
                }
                census
            })
    }

    fn index_of(&self, pos: TilePos) -> Option<usize> {
        if pos.x < self.width && pos.y < self.height {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), ConfigError> {
    if width < MIN_GRID_EDGE || height < MIN_GRID_EDGE {
        Err(ConfigError::GridTooSmall {
            width,
            height,
            min: MIN_GRID_EDGE,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_grid_has_mountain_border() {
        let grid = TileGrid::uniform(5, 4, 10.0, 50.0).unwrap();
        assert_eq!(grid.tile_count(), 20);
        for tile in grid.tiles() {
            let TilePos { x, y } = tile.pos();
            let border = x == 0 || y == 0 || x == 4 || y == 3;
            assert_eq!(tile.is_mountain(), border, "tile {:?}", tile.pos());
        }
    }

    #[test]
    fn test_rejects_small_grids() {
        assert_eq!(
            TileGrid::uniform(2, 10, 10.0, 50.0),
            Err(ConfigError::GridTooSmall {
                width: 2,
                height: 10,
                min: 3
            })
        );
        assert!(TileGrid::uniform(3, 3, 10.0, 50.0).is_ok());
        assert!(matches!(
            TileGrid::uniform(3, 3, 0.0, 50.0),
            Err(ConfigError::InvalidTileSize(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_tile_layout() {
        let short = vec![Tile::plain(TilePos::ORIGIN, 50.0)];
        assert_eq!(
            TileGrid::from_tiles(4, 4, 10.0, short),
            Err(ConfigError::TileLayoutMismatch {
                expected: 16,
                actual: 1
            })
        );

        let mut shuffled: Vec<Tile> = (0..3)
            .flat_map(|y| (0..3).map(move |x| Tile::plain(TilePos::new(x, y), 50.0)))
            .collect();
        shuffled.swap(0, 4);
        assert!(matches!(
            TileGrid::from_tiles(3, 3, 10.0, shuffled),
            Err(ConfigError::TileLayoutMismatch { expected: 9, actual: 9 })
        ));
    }

    #[test]
    fn test_locate_and_fallback() {
        let grid = TileGrid::uniform(4, 4, 10.0, 50.0).unwrap();
        assert_eq!(grid.locate(Vec2::new(15.0, 25.0)), TilePos::new(1, 2));
        assert_eq!(grid.locate(Vec2::new(39.9, 0.0)), TilePos::new(3, 0));
        assert_eq!(grid.locate(Vec2::new(40.0, 5.0)), TilePos::ORIGIN);
        assert_eq!(grid.locate(Vec2::new(-0.1, 5.0)), TilePos::ORIGIN);
        assert_eq!(grid.locate(Vec2::new(f64::NAN, 5.0)), TilePos::ORIGIN);
        assert!(grid.tile_at(Vec2::new(1e9, 1e9)).is_mountain());
    }

    #[test]
    fn test_drain_reports_first_death_only() {
        let mut tile = Tile::plain(TilePos::new(1, 1), 0.15);
        assert!(!tile.drain(0.1));
        assert!(tile.is_alive());
        assert!(tile.drain(0.1));
        assert_eq!(tile.life(), 0.0);
        assert!(!tile.is_alive());
        assert!(!tile.drain(0.1));

        tile.heal(1.0);
        assert!(tile.is_alive());
        assert!(!tile.drain(5.0));
        assert_eq!(tile.life(), 0.0);
    }

    #[test]
    fn test_mountains_never_change() {
        let mut tile = Tile::mountain(TilePos::ORIGIN);
        tile.heal(50.0);
        tile.set_life(80.0);
        assert!(!tile.drain(1.0));
        assert_eq!(tile.life(), 0.0);
        assert_eq!(tile.tier(), LifeTier::Mountain);
    }

    #[test]
    fn test_life_is_clamped() {
        let mut tile = Tile::plain(TilePos::ORIGIN, 100.1);
        assert_eq!(tile.life(), MAX_LIFE);
        tile.heal(10.0);
        assert_eq!(tile.life(), MAX_LIFE);
        tile.set_life(-5.0);
        assert_eq!(tile.life(), 0.0);
    }

    #[test]
    fn test_tiers() {
        let tier = |life| Tile::plain(TilePos::ORIGIN, life).tier();
        assert_eq!(tier(90.0), LifeTier::Lush);
        assert_eq!(tier(75.0), LifeTier::Lush);
        assert_eq!(tier(60.0), LifeTier::Healthy);
        assert_eq!(tier(30.0), LifeTier::Sparse);
        assert_eq!(tier(0.5), LifeTier::Withered);
        assert_eq!(tier(0.0), LifeTier::Dead);
    }

    #[test]
    fn test_census_ignores_mountains() {
        let mut grid = TileGrid::uniform(4, 4, 10.0, 50.0).unwrap();
        assert_eq!(grid.census(), LifeCensus { alive: 4, dead: 0 });
        grid.set_life(TilePos::new(1, 1), 0.0);
        let census = grid.census();
        assert_eq!(census, LifeCensus { alive: 3, dead: 1 });
        assert!((census.alive_percent() - 75.0).abs() < 1e-12);
    }
}
