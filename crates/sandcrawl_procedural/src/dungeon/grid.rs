//! # Dungeon Grid
//!
//! Dense tile + region storage for one finite generation run.
//!
//! The outermost ring of cells is never carved by the generators, so a
//! finished dungeon is always enclosed by walls.

use crate::tile::{Tile, TileCoord};

/// Region id of a cell that no room or maze has claimed.
pub const NO_REGION: i32 = -1;

/// Fixed-size tile grid with a parallel region-id array.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Tile data (indexed as `y * width + x`).
    tiles: Vec<Tile>,
    /// Region id per cell, [`NO_REGION`] when unassigned.
    regions: Vec<i32>,
    /// Oversized grid for the secondary full-resolution render pass.
    buffer: Vec<Tile>,
    buffer_scale: usize,
    /// Last region id handed out.
    current_region: i32,
}

impl Grid {
    /// Creates a grid of walls with no regions assigned.
    #[must_use]
    pub fn new(width: usize, height: usize, buffer_scale: usize) -> Self {
        let cells = width * height;
        Self {
            width,
            height,
            tiles: vec![Tile::Wall; cells],
            regions: vec![NO_REGION; cells],
            buffer: vec![Tile::Wall; cells * buffer_scale * buffer_scale],
            buffer_scale,
            current_region: NO_REGION,
        }
    }

    /// Grid width in tiles.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in tiles.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Buffer dimensions `(width, height)`.
    #[inline]
    #[must_use]
    pub const fn buffer_size(&self) -> (usize, usize) {
        (self.width * self.buffer_scale, self.height * self.buffer_scale)
    }

    /// Sets every grid and buffer cell to `tile`.
    pub fn fill(&mut self, tile: Tile) {
        self.tiles.fill(tile);
        self.buffer.fill(tile);
    }

    /// Returns true for cells strictly inside the outer wall ring.
    #[inline]
    #[must_use]
    pub fn in_bounds(&self, pos: TileCoord) -> bool {
        match (usize::try_from(pos.x), usize::try_from(pos.y)) {
            (Ok(x), Ok(y)) => x > 0 && y > 0 && x + 1 < self.width && y + 1 < self.height,
            _ => false,
        }
    }

    /// Returns true for any cell of the grid, wall ring included.
    #[inline]
    #[must_use]
    pub fn contains(&self, pos: TileCoord) -> bool {
        match (usize::try_from(pos.x), usize::try_from(pos.y)) {
            (Ok(x), Ok(y)) => x < self.width && y < self.height,
            _ => false,
        }
    }

    #[inline]
    fn index(&self, pos: TileCoord) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.width + pos.x as usize)
    }

    /// Tile at `pos`. Cells outside the grid read as walls.
    #[inline]
    #[must_use]
    pub fn tile(&self, pos: TileCoord) -> Tile {
        self.index(pos).map_or(Tile::Wall, |i| self.tiles[i])
    }

    /// Region id at `pos`, [`NO_REGION`] outside the grid.
    #[inline]
    #[must_use]
    pub fn region(&self, pos: TileCoord) -> i32 {
        self.index(pos).map_or(NO_REGION, |i| self.regions[i])
    }

    /// Overwrites a tile without touching its region stamp.
    #[inline]
    pub fn set_tile(&mut self, pos: TileCoord, tile: Tile) {
        if let Some(i) = self.index(pos) {
            self.tiles[i] = tile;
        }
    }

    /// Sets the tile at `pos` and stamps it with the current region.
    #[inline]
    pub fn carve(&mut self, pos: TileCoord, tile: Tile) {
        if let Some(i) = self.index(pos) {
            self.tiles[i] = tile;
            self.regions[i] = self.current_region;
        }
    }

    /// Sets the tile at `pos` and stamps it with an existing `region`.
    #[inline]
    pub fn carve_into(&mut self, pos: TileCoord, tile: Tile, region: i32) {
        if let Some(i) = self.index(pos) {
            self.tiles[i] = tile;
            self.regions[i] = region;
        }
    }

    /// Carves a floor tile into the current region.
    #[inline]
    pub fn carve_floor(&mut self, pos: TileCoord) {
        self.carve(pos, Tile::Floor);
    }

    /// Allocates a new region id and makes it current.
    pub fn start_region(&mut self) -> i32 {
        self.current_region += 1;
        self.current_region
    }

    /// Number of region ids allocated so far.
    #[inline]
    #[must_use]
    pub fn region_count(&self) -> usize {
        usize::try_from(self.current_region + 1).unwrap_or(0)
    }

    /// Iterates every cell coordinate strictly inside the wall ring.
    pub fn interior(&self) -> impl Iterator<Item = TileCoord> {
        let (w, h) = (self.width as i32, self.height as i32);
        (1..h - 1).flat_map(move |y| (1..w - 1).map(move |x| TileCoord::new(x, y)))
    }

    /// Every floor cell, in row-major order.
    #[must_use]
    pub fn floor_cells(&self) -> Vec<TileCoord> {
        let w = self.width;
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.is_floor())
            .map(|(i, _)| TileCoord::new((i % w) as i32, (i / w) as i32))
            .collect()
    }

    /// Number of cardinal neighbours of `pos` that are floor.
    #[inline]
    #[must_use]
    pub fn floor_exits(&self, pos: TileCoord) -> usize {
        pos.neighbors()
            .into_iter()
            .filter(|n| self.tile(*n).is_floor())
            .count()
    }

    /// Tile grid as raw bytes, row-major (`0` = wall, `1` = floor).
    #[must_use]
    pub fn tile_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tiles)
    }

    /// Render buffer as raw bytes, row-major.
    #[must_use]
    pub fn buffer_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.buffer)
    }
}
