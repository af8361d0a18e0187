//! # Region Connection
//!
//! After rooms and mazes are carved the dungeon is a set of disjoint
//! regions. This pass opens single wall cells ("connectors") between them
//! until every region is reachable from every other, then opens a few
//! more at random so the layout has loops.
//!
//! Merged regions are tracked with a union-find forest keyed by region id.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::grid::{Grid, NO_REGION};
use crate::tile::{Tile, TileCoord};

/// Union-find over region ids.
///
/// Ids that were never merged have no entry and are their own root.
#[derive(Clone, Debug, Default)]
pub struct RegionForest {
    parent: HashMap<i32, i32>,
    rank: HashMap<i32, u32>,
}

impl RegionForest {
    /// Creates an empty forest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Representative root of `id`, compressing the path behind it.
    pub fn find(&mut self, id: i32) -> i32 {
        let mut root = id;
        while let Some(&next) = self.parent.get(&root) {
            root = next;
        }

        let mut cursor = id;
        while let Some(&next) = self.parent.get(&cursor) {
            if next == root {
                break;
            }
            self.parent.insert(cursor, root);
            cursor = next;
        }
        root
    }

    /// Read-only root lookup, no compression.
    #[must_use]
    pub fn root_of(&self, id: i32) -> i32 {
        let mut root = id;
        while let Some(&next) = self.parent.get(&root) {
            root = next;
        }
        root
    }

    /// Merges the sets containing `a` and `b`. Returns false if they were
    /// already joined.
    pub fn union(&mut self, a: i32, b: i32) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }

        let rank_a = self.rank.get(&ra).copied().unwrap_or(0);
        let rank_b = self.rank.get(&rb).copied().unwrap_or(0);
        let (child, root) = if rank_a < rank_b { (ra, rb) } else { (rb, ra) };
        self.parent.insert(child, root);
        if rank_a == rank_b {
            self.rank.insert(root, rank_a + 1);
        }
        true
    }

    /// Returns true if `a` and `b` share a root.
    #[must_use]
    pub fn connected(&self, a: i32, b: i32) -> bool {
        self.root_of(a) == self.root_of(b)
    }
}

/// Outcome of a [`connect_regions`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConnectStats {
    /// Wall cells touching two or more distinct regions.
    pub candidates: usize,
    /// Connectors opened to merge regions.
    pub merges: usize,
    /// Redundant connectors opened to add loops.
    pub extra_loops: usize,
}

/// Joins every region of `grid` into one connected whole.
///
/// Connectors are visited in random order; one is opened only when its
/// neighbours still belong to at least two different merged sets, so the
/// first pass carves a spanning tree over the regions. A second pass then
/// opens each remaining connector with probability `extra_chance`.
pub fn connect_regions(grid: &mut Grid, rng: &mut ChaCha8Rng, extra_chance: f64) -> ConnectStats {
    let mut connectors = find_connectors(grid);
    let candidates = connectors.len();

    connectors.shuffle(rng);

    let mut forest = RegionForest::new();
    let mut merges = 0;
    let mut roots: Vec<i32> = Vec::with_capacity(4);

    for &connector in &connectors {
        roots.clear();
        let mut joined = NO_REGION;
        for neighbor in connector.neighbors() {
            let region = grid.region(neighbor);
            if grid.tile(neighbor) != Tile::Floor || region == NO_REGION {
                continue;
            }
            if joined == NO_REGION {
                joined = region;
            }
            let root = forest.find(region);
            if !roots.contains(&root) {
                roots.push(root);
            }
        }

        if roots.len() < 2 {
            continue;
        }

        // Opened connectors belong to a region they join, so a later
        // neighbour resolves them through the forest.
        grid.carve_into(connector, Tile::Floor, joined);
        let representative = roots[0];
        for &other in &roots[1..] {
            forest.union(representative, other);
        }
        merges += 1;
    }

    let mut extra_loops = 0;
    for &connector in &connectors {
        if grid.tile(connector) == Tile::Wall && rng.gen_bool(extra_chance) {
            let region = connector
                .neighbors()
                .into_iter()
                .map(|n| grid.region(n))
                .find(|&r| r != NO_REGION)
                .unwrap_or(NO_REGION);
            grid.carve_into(connector, Tile::Floor, region);
            extra_loops += 1;
        }
    }

    debug!(candidates, merges, extra_loops, "regions connected");
    ConnectStats {
        candidates,
        merges,
        extra_loops,
    }
}

/// Interior wall cells adjacent to floor cells of two or more regions.
fn find_connectors(grid: &Grid) -> Vec<TileCoord> {
    let mut regions: Vec<i32> = Vec::with_capacity(4);
    grid.interior()
        .filter(|&cell| {
            if grid.tile(cell) != Tile::Wall {
                return false;
            }
            regions.clear();
            for neighbor in cell.neighbors() {
                if grid.tile(neighbor) == Tile::Floor {
                    let region = grid.region(neighbor);
                    if !regions.contains(&region) {
                        regions.push(region);
                    }
                }
            }
            regions.len() >= 2
        })
        .collect()
}
