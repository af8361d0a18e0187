//! # Finite Dungeon Pipeline
//!
//! One-shot generation of a bounded dungeon:
//!
//! 1. Fill the grid with walls
//! 2. Place non-overlapping rooms ([`rooms`])
//! 3. Grow mazes through the remaining solid space ([`maze`])
//! 4. Open connectors until all regions are joined ([`regions`])
//! 5. Fill corridor dead ends back in ([`prune`])
//!
//! The run is blocking and never exposes a partially generated grid.
//!
//! ## Example
//!
//! ```rust,ignore
//! let params = DungeonParams::with_size(41, 31);
//! let dungeon = generate_dungeon(&params, 1234)?;
//!
//! let start = dungeon.pick_spawn(&mut rng).expect("dungeon has floor");
//! assert_eq!(dungeon.classify_tile(start), Tile::Floor);
//! ```

pub mod grid;
pub mod maze;
pub mod prune;
pub mod regions;
pub mod rooms;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::config::DungeonParams;
use crate::error::GenerationResult;
use crate::tile::{Tile, TileCoord};

pub use grid::{Grid, NO_REGION};
pub use regions::{ConnectStats, RegionForest};
pub use rooms::Room;

/// Summary of one generation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DungeonStats {
    /// Rooms accepted.
    pub rooms: usize,
    /// Mazes grown.
    pub mazes: usize,
    /// Connector pass outcome.
    pub connect: ConnectStats,
    /// Floor cells filled by dead-end removal.
    pub dead_ends_removed: usize,
    /// Floor cells in the finished grid.
    pub floor_cells: usize,
}

/// Step-wise driver for the finite pipeline.
///
/// [`generate_dungeon`] runs every phase in order; the phases are public so
/// a caller can stop early or inspect intermediate grids.
pub struct DungeonGenerator {
    params: DungeonParams,
    grid: Grid,
    rooms: Vec<Room>,
    rng: ChaCha8Rng,
    stats: DungeonStats,
}

impl DungeonGenerator {
    /// Creates a generator over a solid grid.
    ///
    /// # Errors
    ///
    /// Returns the first parameter violation; nothing is allocated for
    /// invalid parameters.
    pub fn new(params: DungeonParams, seed: u64) -> GenerationResult<Self> {
        params.validate()?;
        let grid = Grid::new(params.width, params.height, params.buffer_scale);
        Ok(Self {
            params,
            grid,
            rooms: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            stats: DungeonStats::default(),
        })
    }

    /// Resets every cell (and the render buffer) to `tile`.
    pub fn fill(&mut self, tile: Tile) {
        self.grid.fill(tile);
    }

    /// Room placement phase.
    pub fn add_rooms(&mut self) {
        let placed = rooms::add_rooms(
            &mut self.grid,
            &mut self.rng,
            self.params.num_room_tries,
            self.params.room_extra_size,
        );
        self.stats.rooms += placed.len();
        self.rooms.extend(placed);
    }

    /// Maze phase.
    pub fn fill_with_mazes(&mut self) {
        self.stats.mazes += maze::fill_with_mazes(&mut self.grid, &mut self.rng, self.params.winding_percent);
    }

    /// Connector phase.
    pub fn connect_regions(&mut self) {
        self.stats.connect =
            regions::connect_regions(&mut self.grid, &mut self.rng, self.params.extra_connector_chance);
    }

    /// Dead-end removal phase.
    pub fn remove_dead_ends(&mut self) {
        self.stats.dead_ends_removed += prune::remove_dead_ends(&mut self.grid);
    }

    /// Grid in its current state.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Rooms accepted so far.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Runs every remaining phase and hands over the finished dungeon.
    #[must_use]
    pub fn run(mut self) -> Dungeon {
        self.fill(Tile::Wall);
        self.add_rooms();
        self.fill_with_mazes();
        self.connect_regions();
        if self.params.prune_dead_ends {
            self.remove_dead_ends();
        }
        self.finish()
    }

    /// Freezes the grid as it is now.
    #[must_use]
    pub fn finish(mut self) -> Dungeon {
        self.stats.floor_cells = self.grid.floor_cells().len();
        info!(
            width = self.params.width,
            height = self.params.height,
            rooms = self.stats.rooms,
            mazes = self.stats.mazes,
            floor = self.stats.floor_cells,
            "dungeon generated"
        );
        Dungeon {
            grid: self.grid,
            rooms: self.rooms,
            stats: self.stats,
        }
    }
}

/// Generates a complete dungeon.
///
/// # Errors
///
/// Returns [`crate::GenerationError`] if `params` fails validation.
pub fn generate_dungeon(params: &DungeonParams, seed: u64) -> GenerationResult<Dungeon> {
    Ok(DungeonGenerator::new(params.clone(), seed)?.run())
}

/// A finished, read-only dungeon.
#[derive(Clone, Debug)]
pub struct Dungeon {
    grid: Grid,
    rooms: Vec<Room>,
    stats: DungeonStats,
}

impl Dungeon {
    /// Tile at `coord`; anything outside the grid is wall.
    #[inline]
    #[must_use]
    pub fn classify_tile(&self, coord: TileCoord) -> Tile {
        self.grid.tile(coord)
    }

    /// Every floor cell, row-major.
    #[must_use]
    pub fn list_floor_cells(&self) -> Vec<TileCoord> {
        self.grid.floor_cells()
    }

    /// Rooms in placement order.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Underlying grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Run summary.
    #[must_use]
    pub const fn stats(&self) -> DungeonStats {
        self.stats
    }

    /// Picks a player start uniformly among floor cells.
    ///
    /// Returns `None` (and logs a warning) for a dungeon with no floor.
    pub fn pick_spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<TileCoord> {
        let floors = self.grid.floor_cells();
        let spawn = floors.choose(rng).copied();
        if spawn.is_none() {
            warn!("no floor cell to spawn on");
        }
        spawn
    }

    /// World-space centre of `coord`, with the dungeon centred on the origin.
    #[must_use]
    pub fn spawn_world_position(&self, coord: TileCoord) -> (f32, f32) {
        let half_w = (self.grid.width() / 2) as f32;
        let half_h = (self.grid.height() / 2) as f32;
        (coord.x as f32 + 0.5 - half_w, coord.y as f32 + 0.5 - half_h)
    }
}
