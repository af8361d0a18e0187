//! # Write-Once Tile Store
//!
//! Sparse storage for the infinite world. A coordinate starts out
//! [`TileState::Unset`] and moves to a wall or floor exactly once; later
//! writes to it are refused.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::tile::{Tile, TileCoord};

/// Materialization state of one coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TileState {
    /// Not generated yet.
    #[default]
    Unset,
    /// Generated as wall.
    Wall,
    /// Generated as floor.
    Floor,
}

impl TileState {
    /// The materialized tile, if any.
    #[inline]
    #[must_use]
    pub const fn tile(self) -> Option<Tile> {
        match self {
            Self::Unset => None,
            Self::Wall => Some(Tile::Wall),
            Self::Floor => Some(Tile::Floor),
        }
    }

    /// Returns true once the coordinate has a tile.
    #[inline]
    #[must_use]
    pub const fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }
}

impl From<Tile> for TileState {
    fn from(tile: Tile) -> Self {
        match tile {
            Tile::Wall => Self::Wall,
            Tile::Floor => Self::Floor,
        }
    }
}

/// Sparse coordinate-keyed tile map with monotonic writes.
#[derive(Clone, Debug, Default)]
pub struct TileStore {
    tiles: HashMap<TileCoord, Tile>,
}

impl TileStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State of `coord`.
    #[inline]
    #[must_use]
    pub fn state(&self, coord: TileCoord) -> TileState {
        self.tiles.get(&coord).map_or(TileState::Unset, |t| TileState::from(*t))
    }

    /// Tile at `coord`, `None` if not yet materialized.
    #[inline]
    #[must_use]
    pub fn get(&self, coord: TileCoord) -> Option<Tile> {
        self.tiles.get(&coord).copied()
    }

    /// Returns true if `coord` has been materialized.
    #[inline]
    #[must_use]
    pub fn contains(&self, coord: TileCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    /// Writes `tile` at `coord` if it is still unset.
    ///
    /// Returns whether the write happened.
    pub fn set_once(&mut self, coord: TileCoord, tile: Tile) -> bool {
        match self.tiles.entry(coord) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(tile);
                true
            }
        }
    }

    /// Number of materialized coordinates.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns true if nothing has been materialized.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Every materialized tile, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, Tile)> + '_ {
        self.tiles.iter().map(|(c, t)| (*c, *t))
    }
}
