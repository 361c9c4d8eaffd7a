//! Procedural terrain: scatter biome seeds, then give every cell the biome
//! of its nearest seed.

use rand::Rng;
use tracing::debug;

use crate::config::{ConfigError, TerrainConfig, MIN_GRID_EDGE};
use crate::grid::{Tile, TileGrid, TilePos};
use crate::rng::RngManager;

pub const DEFAULT_TILE_SIZE: f64 = 300.0;

/// Added to every plain tile's starting life so none begins dead.
const LIFE_FLOOR: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seed {
    Mountain,
    Plain,
    Unassigned,
}

/// Distance from a cell to the closest seed of each kind. A kind with no
/// seeds at all is infinitely far away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedDistances {
    pub mountain: f64,
    pub plain: f64,
}

pub struct SeedMap {
    width: u32,
    height: u32,
    cells: Vec<Seed>,
    mountains: Vec<(u32, u32)>,
    plains: Vec<(u32, u32)>,
}

impl SeedMap {
    pub fn scatter<R: Rng + ?Sized>(
        width: u32,
        height: u32,
        terrain: &TerrainConfig,
        rng: &mut R,
    ) -> Self {
        let mut cells = Vec::with_capacity((width * height) as usize);
        let mut mountains = Vec::new();
        let mut plains = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let roll: f64 = rng.gen();
                let seed = if roll < terrain.mountain_seed_odds {
                    mountains.push((x, y));
                    Seed::Mountain
                } else if roll < terrain.mountain_seed_odds + terrain.plain_seed_odds {
                    plains.push((x, y));
                    Seed::Plain
                } else {
                    Seed::Unassigned
                };
                cells.push(seed);
            }
        }
        Self {
            width,
            height,
            cells,
            mountains,
            plains,
        }
    }

    pub fn seed(&self, x: u32, y: u32) -> Seed {
        if x < self.width && y < self.height {
            self.cells[(y * self.width + x) as usize]
        } else {
            Seed::Unassigned
        }
    }

    pub fn mountain_seeds(&self) -> usize {
        self.mountains.len()
    }

    pub fn plain_seeds(&self) -> usize {
        self.plains.len()
    }

    /// Brute-force scan over every seed. This is the hot path of generation
    /// (cells x seeds); a spatial index would be needed for much larger maps.
    pub fn nearest(&self, x: u32, y: u32) -> SeedDistances {
        match self.seed(x, y) {
            Seed::Mountain => SeedDistances {
                mountain: 0.0,
                plain: f64::INFINITY,
            },
            Seed::Plain => SeedDistances {
                mountain: f64::INFINITY,
                plain: 0.0,
            },
            Seed::Unassigned => SeedDistances {
                mountain: closest(&self.mountains, x, y),
                plain: closest(&self.plains, x, y),
            },
        }
    }
}

fn closest(seeds: &[(u32, u32)], x: u32, y: u32) -> f64 {
    seeds
        .iter()
        .map(|&(sx, sy)| {
            let dx = sx as f64 - x as f64;
            let dy = sy as f64 - y as f64;
            dx.hypot(dy)
        })
        .fold(f64::INFINITY, f64::min)
}

pub struct MapGenerator {
    terrain: TerrainConfig,
    tile_size: f64,
}

impl MapGenerator {
    pub fn new(terrain: TerrainConfig, tile_size: f64) -> Self {
        Self { terrain, tile_size }
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        width: u32,
        height: u32,
        rng: &mut R,
    ) -> Result<TileGrid, ConfigError> {
        if width < MIN_GRID_EDGE || height < MIN_GRID_EDGE {
            return Err(ConfigError::GridTooSmall {
                width,
                height,
                min: MIN_GRID_EDGE,
            });
        }
        self.terrain.validate()?;

        let seeds = SeedMap::scatter(width, height, &self.terrain, rng);
        debug!(
            width,
            height,
            mountain_seeds = seeds.mountain_seeds(),
            plain_seeds = seeds.plain_seeds(),
            "scattered terrain seeds"
        );

        let mut tiles = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let pos = TilePos::new(x, y);
                let distances = seeds.nearest(x, y);
                // ties go to plain
                if distances.mountain < distances.plain {
                    tiles.push(Tile::mountain(pos));
                } else {
                    let life = rng.gen::<f64>() * 100.0 + LIFE_FLOOR;
                    tiles.push(Tile::plain(pos, life));
                }
            }
        }
        TileGrid::from_tiles(width, height, self.tile_size, tiles)
    }
}

/// Generates a map with the default terrain odds and tile size.
pub fn generate(width: u32, height: u32, seed: u64) -> Result<TileGrid, ConfigError> {
    let mut rng = RngManager::new(seed);
    let generator = MapGenerator::new(TerrainConfig::default(), DEFAULT_TILE_SIZE);
    generator.generate(width, height, &mut rng.stream("terrain"))
}
