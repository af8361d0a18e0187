//! # Room Placement
//!
//! Rooms are odd-sized rectangles dropped at odd coordinates. Keeping both
//! on the odd lattice means two rooms that do not overlap are always
//! separated by at least one wall cell, and mazes grown afterwards line up
//! with room edges.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::grid::Grid;
use crate::tile::TileCoord;

/// Axis-aligned room rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Room {
    /// Left edge (inclusive).
    pub x: i32,
    /// Bottom edge (inclusive).
    pub y: i32,
    /// Width in tiles.
    pub width: i32,
    /// Height in tiles.
    pub height: i32,
}

impl Room {
    /// Creates a new room.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Half-open AABB intersection test.
    #[inline]
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }

    /// Returns true if `pos` lies inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains(&self, pos: TileCoord) -> bool {
        pos.x >= self.x && pos.x < self.x + self.width && pos.y >= self.y && pos.y < self.y + self.height
    }

    /// Center tile (rounded towards the origin corner).
    #[inline]
    #[must_use]
    pub const fn center(&self) -> TileCoord {
        TileCoord::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Every tile of the rectangle, row-major.
    pub fn cells(&self) -> impl Iterator<Item = TileCoord> {
        let Self { x, y, width, height } = *self;
        (y..y + height).flat_map(move |ry| (x..x + width).map(move |rx| TileCoord::new(rx, ry)))
    }
}

/// Makes up to `tries` attempts at placing a room and carves every one
/// that does not overlap an earlier room. Each accepted room gets its own
/// region.
///
/// Failed attempts are skipped silently; fewer rooms than tries is normal.
pub fn add_rooms(grid: &mut Grid, rng: &mut ChaCha8Rng, tries: u32, extra_size: u32) -> Vec<Room> {
    let mut rooms: Vec<Room> = Vec::new();
    let grid_w = grid.width() as i32;
    let grid_h = grid.height() as i32;
    let size_bound = 3 + extra_size as i32;

    for _ in 0..tries {
        let square = rng.gen_range(1..size_bound) * 2 + 1;
        let variation = rng.gen_range(0..1 + square / 2) * 2;

        let (mut width, mut height) = (square, square);
        if rng.gen_bool(0.5) {
            width += variation;
        } else {
            height += variation;
        }

        let x_slots = (grid_w - width) / 2;
        let y_slots = (grid_h - height) / 2;
        if x_slots <= 0 || y_slots <= 0 {
            continue;
        }
        let x = rng.gen_range(0..x_slots) * 2 + 1;
        let y = rng.gen_range(0..y_slots) * 2 + 1;

        let room = Room::new(x, y, width, height);
        if rooms.iter().any(|r| r.overlaps(&room)) {
            continue;
        }

        rooms.push(room);
        grid.start_region();
        for cell in room.cells() {
            grid.carve_floor(cell);
        }
    }

    debug!(placed = rooms.len(), tries, "rooms placed");
    rooms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Tile;
    use rand::SeedableRng;

    #[test]
    fn test_overlap_is_half_open() {
        let a = Room::new(1, 1, 3, 3);
        let touching = Room::new(4, 1, 3, 3);
        let crossing = Room::new(3, 3, 3, 3);

        assert!(!a.overlaps(&touching), "Edge-adjacent rooms must not overlap");
        assert!(a.overlaps(&crossing));
        assert!(crossing.overlaps(&a));
    }

    #[test]
    fn test_rooms_never_overlap() {
        for seed in 0..20 {
            let mut grid = Grid::new(41, 41, 1);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let rooms = add_rooms(&mut grid, &mut rng, 200, 2);

            for (i, a) in rooms.iter().enumerate() {
                for b in &rooms[i + 1..] {
                    assert!(!a.overlaps(b), "Seed {seed}: {a:?} overlaps {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_rooms_are_odd_and_inside_ring() {
        let mut grid = Grid::new(31, 25, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let rooms = add_rooms(&mut grid, &mut rng, 100, 1);
        assert!(!rooms.is_empty());

        for room in &rooms {
            assert_eq!(room.x % 2, 1, "{room:?} not on odd column");
            assert_eq!(room.y % 2, 1, "{room:?} not on odd row");
            assert_eq!(room.width % 2, 1, "{room:?} has even width");
            assert_eq!(room.height % 2, 1, "{room:?} has even height");
            assert!(room.cells().all(|c| grid.in_bounds(c)), "{room:?} touches the outer ring");
        }
    }

    #[test]
    fn test_each_room_has_own_region() {
        let mut grid = Grid::new(41, 41, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let rooms = add_rooms(&mut grid, &mut rng, 60, 0);

        assert_eq!(grid.region_count(), rooms.len());
        for (id, room) in rooms.iter().enumerate() {
            for cell in room.cells() {
                assert_eq!(grid.tile(cell), Tile::Floor);
                assert_eq!(grid.region(cell), id as i32);
            }
        }
    }

    #[test]
    fn test_room_too_big_for_grid_is_skipped() {
        let mut grid = Grid::new(5, 5, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rooms = add_rooms(&mut grid, &mut rng, 50, 10);

        for room in &rooms {
            assert!(room.cells().all(|c| grid.in_bounds(c)));
        }
    }
}
