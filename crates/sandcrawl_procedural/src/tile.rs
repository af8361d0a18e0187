//! # Tile Data Model
//!
//! Shared by both pipelines: a tile is either a wall or a floor, and it
//! lives at an integer grid coordinate.

use bytemuck::NoUninit;

/// Classification of one grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, NoUninit)]
#[repr(u8)]
pub enum Tile {
    /// Impassable.
    #[default]
    Wall = 0,
    /// Walkable.
    Floor = 1,
}

impl Tile {
    /// Returns true for floor tiles.
    #[inline]
    #[must_use]
    pub const fn is_floor(self) -> bool {
        matches!(self, Self::Floor)
    }

    /// Returns true for wall tiles.
    #[inline]
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }
}

/// Integer grid coordinate.
///
/// Unbounded for the infinite world, `0..width` x `0..height` for a dungeon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileCoord {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
}

impl TileCoord {
    /// Creates a new coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate offset by `dir` scaled by `steps`.
    #[inline]
    #[must_use]
    pub const fn step(self, dir: Self, steps: i32) -> Self {
        Self {
            x: self.x + dir.x * steps,
            y: self.y + dir.y * steps,
        }
    }

    /// Returns the four cardinal neighbours, in [`CARDINALS`] order.
    #[inline]
    #[must_use]
    pub fn neighbors(self) -> [Self; 4] {
        CARDINALS.map(|dir| self.step(dir, 1))
    }

    /// Euclidean distance to `other`.
    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Coordinate of the tile containing a continuous world position.
    #[inline]
    #[must_use]
    pub fn from_world_pos(x: f32, y: f32) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self::new(x.floor() as i32, y.floor() as i32)
    }
}

/// Cardinal directions: north, south, east, west.
pub const CARDINALS: [TileCoord; 4] = [
    TileCoord::new(0, 1),
    TileCoord::new(0, -1),
    TileCoord::new(1, 0),
    TileCoord::new(-1, 0),
];
