//! How a follower and the tile under it feed on each other.

use crate::agent::Follower;
use crate::config::LifeConfig;
use crate::grid::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Occupancy {
    /// The tile died for the first time during this visit.
    pub tile_died: bool,
}

/// One tick of a follower standing on `tile`.
///
/// A living tile loses `tile_decay` and the follower heals. On dead ground
/// (including mountains) the follower withers instead, and a dead plain tile
/// that did not die this very tick regrows by `tile_regrowth`.
pub fn occupy(tile: &mut Tile, follower: &mut Follower, life: &LifeConfig) -> Occupancy {
    let tile_died = tile.drain(life.tile_decay);
    if tile.is_alive() {
        follower.heal();
    } else {
        follower.wither();
        if !tile_died && life.tile_regrowth > 0.0 {
            tile.heal(life.tile_regrowth);
        }
    }
    Occupancy { tile_died }
}
