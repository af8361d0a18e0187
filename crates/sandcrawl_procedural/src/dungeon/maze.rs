//! # Maze Carving
//!
//! Fills the solid space between rooms with growing-tree mazes. Corridors
//! advance two cells at a time from odd cells to odd cells, so parallel
//! corridors always keep a wall between them.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::grid::Grid;
use crate::tile::{Tile, TileCoord, CARDINALS};

/// Grows a maze from every odd-lattice cell that is still solid.
///
/// Returns the number of mazes grown (one region each).
pub fn fill_with_mazes(grid: &mut Grid, rng: &mut ChaCha8Rng, winding_percent: u32) -> usize {
    let mut mazes = 0;
    let (w, h) = (grid.width() as i32, grid.height() as i32);

    for y in (1..h - 1).step_by(2) {
        for x in (1..w - 1).step_by(2) {
            let start = TileCoord::new(x, y);
            if grid.tile(start) != Tile::Wall {
                continue;
            }
            grow_maze(grid, rng, start, winding_percent);
            mazes += 1;
        }
    }

    debug!(mazes, winding_percent, "mazes grown");
    mazes
}

/// Runs one growing-tree maze from `start` until its stack empties.
fn grow_maze(grid: &mut Grid, rng: &mut ChaCha8Rng, start: TileCoord, winding_percent: u32) {
    let mut cells = vec![start];
    let mut last_dir: Option<TileCoord> = None;

    grid.start_region();
    grid.carve_floor(start);

    while let Some(&cell) = cells.last() {
        let unmade: Vec<TileCoord> = CARDINALS
            .into_iter()
            .filter(|dir| can_carve(grid, cell, *dir))
            .collect();

        if unmade.is_empty() {
            // Dead end: backtrack.
            cells.pop();
            last_dir = None;
            continue;
        }

        let keep_straight = rng.gen_range(0..100) >= winding_percent;
        let dir = match last_dir {
            Some(last) if keep_straight && unmade.contains(&last) => last,
            _ => match unmade.choose(rng) {
                Some(dir) => *dir,
                None => continue,
            },
        };

        grid.carve_floor(cell.step(dir, 1));
        let next = cell.step(dir, 2);
        grid.carve_floor(next);
        cells.push(next);
        last_dir = Some(dir);
    }
}

/// A direction is carvable when the cell two steps away is inside the wall
/// ring and still solid.
fn can_carve(grid: &Grid, cell: TileCoord, dir: TileCoord) -> bool {
    let target = cell.step(dir, 2);
    grid.in_bounds(target) && grid.tile(target) == Tile::Wall
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn carved(width: usize, height: usize, seed: u64, winding: u32) -> Grid {
        let mut grid = Grid::new(width, height, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        fill_with_mazes(&mut grid, &mut rng, winding);
        grid
    }

    #[test]
    fn test_every_odd_cell_is_carved() {
        let grid = carved(21, 15, 42, 50);
        for y in (1..14).step_by(2) {
            for x in (1..20).step_by(2) {
                assert_eq!(grid.tile(TileCoord::new(x, y)), Tile::Floor, "({x}, {y}) left solid");
            }
        }
    }

    #[test]
    fn test_even_even_cells_stay_solid() {
        // Corridors only connect odd cells through a single odd/even cell,
        // so no even/even cell is ever carved.
        let grid = carved(25, 25, 9, 100);
        for y in (0..25).step_by(2) {
            for x in (0..25).step_by(2) {
                assert_eq!(grid.tile(TileCoord::new(x, y)), Tile::Wall, "({x}, {y}) carved");
            }
        }
    }

    #[test]
    fn test_single_maze_fills_empty_grid() {
        let mut grid = Grid::new(11, 11, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mazes = fill_with_mazes(&mut grid, &mut rng, 0);

        assert_eq!(mazes, 1, "One growth should reach every odd cell of an empty grid");
        for cell in grid.floor_cells() {
            assert_eq!(grid.region(cell), 0);
        }
    }

    #[test]
    fn test_perfect_maze_is_a_tree() {
        // 5x5 odd cells, spanning tree has 24 edges: 25 + 24 floor cells.
        let grid = carved(11, 11, 77, 30);
        assert_eq!(grid.floor_cells().len(), 49);
    }

    /// Odd cells a corridor passes straight through.
    fn straight_runs(grid: &Grid) -> usize {
        grid.floor_cells()
            .into_iter()
            .filter(|cell| cell.x % 2 == 1 && cell.y % 2 == 1)
            .filter(|cell| {
                let open = |dx: i32, dy: i32| grid.tile(TileCoord::new(cell.x + dx, cell.y + dy)).is_floor();
                let horizontal = open(1, 0) && open(-1, 0) && !open(0, 1) && !open(0, -1);
                let vertical = open(0, 1) && open(0, -1) && !open(1, 0) && !open(-1, 0);
                horizontal || vertical
            })
            .count()
    }

    #[test]
    fn test_winding_bends_corridors() {
        let mut straight = 0;
        let mut twisty = 0;
        for seed in 0..10 {
            straight += straight_runs(&carved(41, 41, seed, 0));
            twisty += straight_runs(&carved(41, 41, seed, 100));
        }

        assert!(
            straight > twisty * 3 / 2,
            "winding 0 should run straight more often: {straight} vs {twisty}"
        );
    }

    #[test]
    fn test_outer_ring_untouched() {
        let grid = carved(13, 9, 5, 70);
        for x in 0..13 {
            assert_eq!(grid.tile(TileCoord::new(x, 0)), Tile::Wall);
            assert_eq!(grid.tile(TileCoord::new(x, 8)), Tile::Wall);
        }
        for y in 0..9 {
            assert_eq!(grid.tile(TileCoord::new(0, y)), Tile::Wall);
            assert_eq!(grid.tile(TileCoord::new(12, y)), Tile::Wall);
        }
    }
}
