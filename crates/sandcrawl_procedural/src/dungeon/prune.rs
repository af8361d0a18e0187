//! Dead-end removal.

use tracing::debug;

use super::grid::Grid;
use crate::tile::Tile;

/// Fills in every corridor tip until none remain.
///
/// A floor cell with exactly one floor neighbour is a dead end and becomes
/// wall. Filling one can expose another, so full scans repeat until a scan
/// changes nothing. Returns the number of cells filled; calling it again on
/// the result returns 0.
pub fn remove_dead_ends(grid: &mut Grid) -> usize {
    let mut filled = 0;
    let mut passes = 0;

    loop {
        passes += 1;
        let mut changed = false;

        let cells: Vec<_> = grid.interior().collect();
        for cell in cells {
            if grid.tile(cell) == Tile::Wall {
                continue;
            }
            if grid.floor_exits(cell) != 1 {
                continue;
            }
            grid.set_tile(cell, Tile::Wall);
            filled += 1;
            changed = true;
        }

        if !changed {
            break;
        }
    }

    debug!(filled, passes, "dead ends removed");
    filled
}
