//! # Building Placement
//!
//! Buildings are not pre-listed: they are discovered lazily the first time
//! any tile of their footprint is queried.
//!
//! ## Arbitration
//!
//! Every odd-lattice point is a candidate origin. A candidate is *seeded*
//! when its decorrelated noise value is below `room_density`; its size comes
//! from the same value through a 9-entry bucket table. Overlaps are settled
//! by "lowest value wins": a seeded candidate only stands if no seeded
//! candidate within `max_room_size` of it has a lower value. Because the
//! rule never depends on where the query came from, every tile inside a
//! footprint agrees on the same winner, whatever order tiles are visited in.
//!
//! Standing buildings are at least `max_room_size + 1` apart on one axis,
//! so footprints (interior plus wall ring) never touch.
//!
//! ## Rejection
//!
//! A standing building is dropped if any footprint cell is plateau or lies
//! inside the spawn area.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::{trace, warn};

use crate::biome::{Biome, BiomeClassifier};
use crate::config::WorldConfig;
use crate::store::TileStore;
use crate::streamer::{PlacementEvent, TickReport};
use crate::tile::{Tile, TileCoord};

/// A building discovered in the infinite world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Building {
    /// Minimum corner of the floor interior (odd on both axes).
    pub origin: TileCoord,
    /// Interior width (odd).
    pub width: i32,
    /// Interior height (odd).
    pub height: i32,
    /// Noise value that seeded and sized the building.
    pub noise_value: f64,
}

impl Building {
    /// Returns true if `pos` is an interior floor cell.
    #[inline]
    #[must_use]
    pub const fn interior_contains(&self, pos: TileCoord) -> bool {
        pos.x >= self.origin.x
            && pos.x < self.origin.x + self.width
            && pos.y >= self.origin.y
            && pos.y < self.origin.y + self.height
    }

    /// Returns true if `pos` is in the interior or the wall ring.
    #[inline]
    #[must_use]
    pub const fn footprint_contains(&self, pos: TileCoord) -> bool {
        pos.x >= self.origin.x - 1
            && pos.x <= self.origin.x + self.width
            && pos.y >= self.origin.y - 1
            && pos.y <= self.origin.y + self.height
    }

    /// Interior cells, row-major.
    pub fn interior(&self) -> impl Iterator<Item = TileCoord> {
        let (ox, oy, w, h) = (self.origin.x, self.origin.y, self.width, self.height);
        (oy..oy + h).flat_map(move |y| (ox..ox + w).map(move |x| TileCoord::new(x, y)))
    }

    /// Interior and wall ring cells, row-major.
    pub fn footprint(&self) -> impl Iterator<Item = TileCoord> {
        let (ox, oy, w, h) = (self.origin.x, self.origin.y, self.width, self.height);
        (oy - 1..=oy + h).flat_map(move |y| (ox - 1..=ox + w).map(move |x| TileCoord::new(x, y)))
    }

    /// The four wall ring corners.
    #[must_use]
    pub const fn corners(&self) -> [TileCoord; 4] {
        let (x0, y0) = (self.origin.x - 1, self.origin.y - 1);
        let (x1, y1) = (self.origin.x + self.width, self.origin.y + self.height);
        [
            TileCoord::new(x0, y0),
            TileCoord::new(x1, y0),
            TileCoord::new(x0, y1),
            TileCoord::new(x1, y1),
        ]
    }

    /// Non-corner wall ring cells, each paired with its outward neighbour.
    #[must_use]
    pub fn wall_sides(&self) -> Vec<(TileCoord, TileCoord)> {
        let (ox, oy, w, h) = (self.origin.x, self.origin.y, self.width, self.height);
        let mut sides = Vec::with_capacity(usize::try_from(2 * (w + h)).unwrap_or_default());
        for x in ox..ox + w {
            sides.push((TileCoord::new(x, oy - 1), TileCoord::new(x, oy - 2)));
            sides.push((TileCoord::new(x, oy + h), TileCoord::new(x, oy + h + 1)));
        }
        for y in oy..oy + h {
            sides.push((TileCoord::new(ox - 1, y), TileCoord::new(ox - 2, y)));
            sides.push((TileCoord::new(ox + w, y), TileCoord::new(ox + w + 1, y)));
        }
        sides
    }

    /// Arbitration order: lowest noise value first, then coordinates.
    fn precedence(&self, other: &Self) -> Ordering {
        self.noise_value
            .total_cmp(&other.noise_value)
            .then(self.origin.y.cmp(&other.origin.y))
            .then(self.origin.x.cmp(&other.origin.x))
    }
}

/// Cached verdict for one standing candidate origin.
#[derive(Clone, Copy, Debug)]
enum Verdict {
    Accepted(Building),
    Rejected,
}

/// Discovers and materializes buildings.
pub struct BuildingPlacer {
    config: WorldConfig,
    /// Interior edges for the small / medium / large buckets.
    edges: [i32; 3],
    verdicts: HashMap<TileCoord, Verdict>,
    materialized: HashSet<TileCoord>,
}

impl BuildingPlacer {
    /// Bucket table: indices into `edges` for (width, height).
    const SIZE_BUCKETS: [(usize, usize); 9] = [
        (0, 0), (0, 1), (1, 0),
        (1, 1), (0, 2), (2, 0),
        (1, 2), (2, 1), (2, 2),
    ];

    /// Offsets applied per door attempt so every retry reads fresh noise.
    const DOOR_STRIDE: (i32, i32) = (7919, 104_729);

    /// Creates a placer. `config` is assumed validated.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        #[allow(clippy::cast_possible_wrap)]
        let large = config.max_room_size as i32 - 2;
        let medium = (large - 2).max(3);
        let small = (large - 4).max(3);
        Self {
            config,
            edges: [small, medium, large],
            verdicts: HashMap::new(),
            materialized: HashSet::new(),
        }
    }

    /// Number of buildings materialized so far.
    #[must_use]
    pub fn materialized_count(&self) -> usize {
        self.materialized.len()
    }

    /// Returns true if the building at `origin` has been materialized.
    #[must_use]
    pub fn is_materialized(&self, origin: TileCoord) -> bool {
        self.materialized.contains(&origin)
    }

    /// Seeded candidate at `origin`, or `None` if the origin is not on the
    /// odd lattice or its noise is above `room_density`.
    fn candidate(&self, classifier: &BiomeClassifier, origin: TileCoord) -> Option<Building> {
        if origin.x.rem_euclid(2) != 1 || origin.y.rem_euclid(2) != 1 {
            return None;
        }
        let value = classifier.field().noise(origin.x, origin.y);
        if value >= self.config.room_density {
            return None;
        }

        // value / density is in [0, 1): pick one of the nine buckets
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bucket = ((value / self.config.room_density * 9.0) as usize).min(8);
        let (wi, hi) = Self::SIZE_BUCKETS[bucket];
        Some(Building {
            origin,
            width: self.edges[wi],
            height: self.edges[hi],
            noise_value: value,
        })
    }

    /// Odd values in `lo..=hi`.
    fn odd_range(lo: i32, hi: i32) -> impl Iterator<Item = i32> {
        let start = if lo.rem_euclid(2) == 1 { lo } else { lo + 1 };
        (start..=hi).step_by(2)
    }

    /// Lowest-precedence seeded candidate whose footprint covers `pos`.
    fn covering_winner(&self, classifier: &BiomeClassifier, pos: TileCoord) -> Option<Building> {
        let reach = self.edges[2];
        let mut best: Option<Building> = None;

        for oy in Self::odd_range(pos.y - reach, pos.y + 1) {
            for ox in Self::odd_range(pos.x - reach, pos.x + 1) {
                let Some(candidate) = self.candidate(classifier, TileCoord::new(ox, oy)) else {
                    continue;
                };
                if !candidate.footprint_contains(pos) {
                    continue;
                }
                if best.map_or(true, |b| candidate.precedence(&b) == Ordering::Less) {
                    best = Some(candidate);
                }
            }
        }
        best
    }

    /// Re-validates `winner` against every seeded candidate within
    /// `max_room_size` of its origin.
    fn stands(&self, classifier: &BiomeClassifier, winner: &Building) -> bool {
        #[allow(clippy::cast_possible_wrap)]
        let radius = self.config.max_room_size as i32;
        let (wx, wy) = (winner.origin.x, winner.origin.y);

        for oy in Self::odd_range(wy - radius, wy + radius) {
            for ox in Self::odd_range(wx - radius, wx + radius) {
                if ox == wx && oy == wy {
                    continue;
                }
                if let Some(rival) = self.candidate(classifier, TileCoord::new(ox, oy)) {
                    if rival.precedence(winner) == Ordering::Less {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Returns true if the footprint touches plateau or the spawn area.
    fn rejected(classifier: &BiomeClassifier, building: &Building) -> bool {
        building.footprint().any(|cell| {
            classifier.in_spawn_area(cell.x, cell.y)
                || classifier.biome(cell.x, cell.y) == Biome::Plateau
        })
    }

    /// Accepted building whose footprint covers `pos`, without
    /// materializing anything.
    pub fn winner_at(&mut self, classifier: &BiomeClassifier, pos: TileCoord) -> Option<Building> {
        let winner = self.covering_winner(classifier, pos)?;

        if let Some(verdict) = self.verdicts.get(&winner.origin) {
            return match verdict {
                Verdict::Accepted(b) => Some(*b),
                Verdict::Rejected => None,
            };
        }

        let verdict = if self.stands(classifier, &winner) && !Self::rejected(classifier, &winner) {
            Verdict::Accepted(winner)
        } else {
            Verdict::Rejected
        };
        self.verdicts.insert(winner.origin, verdict);

        match verdict {
            Verdict::Accepted(b) => Some(b),
            Verdict::Rejected => None,
        }
    }

    /// Membership query for `(x, y)`.
    ///
    /// The first time any footprint cell of a building is queried, the whole
    /// footprint is written to `store` before this returns.
    pub fn room_at(
        &mut self,
        classifier: &BiomeClassifier,
        store: &mut TileStore,
        x: i32,
        y: i32,
        report: &mut TickReport,
    ) -> Option<Building> {
        let building = self.winner_at(classifier, TileCoord::new(x, y))?;
        if self.materialized.insert(building.origin) {
            self.materialize(classifier, store, &building, report);
        }
        Some(building)
    }

    fn materialize(
        &self,
        classifier: &BiomeClassifier,
        store: &mut TileStore,
        building: &Building,
        report: &mut TickReport,
    ) {
        let mut write = |coord: TileCoord, tile: Tile| {
            if store.set_once(coord, tile) {
                report.tiles.push((coord, tile));
            }
        };

        for cell in building.interior() {
            write(cell, Tile::Floor);
        }
        for corner in building.corners() {
            write(corner, Tile::Wall);
        }

        let sides = building.wall_sides();
        let doors = self.find_doors(classifier, &sides);
        if doors.is_empty() {
            warn!(
                x = building.origin.x,
                y = building.origin.y,
                attempts = self.config.door_attempts,
                "no door found for building"
            );
        }
        for (cell, _) in &sides {
            let tile = if doors.contains(cell) { Tile::Floor } else { Tile::Wall };
            write(*cell, tile);
        }

        report.events.push(PlacementEvent::Building(*building));

        let field = classifier.field();
        for cell in building.interior() {
            if field.noise2(cell.x, cell.y) < self.config.enemy_density {
                report.events.push(PlacementEvent::Enemy(cell));
            }
        }

        trace!(
            x = building.origin.x,
            y = building.origin.y,
            width = building.width,
            height = building.height,
            doors = doors.len(),
            "building materialized"
        );
    }

    /// Wall cells opened as doors. Each attempt rescans every side cell
    /// with shifted noise; the first attempt yielding a door wins.
    fn find_doors(&self, classifier: &BiomeClassifier, sides: &[(TileCoord, TileCoord)]) -> Vec<TileCoord> {
        let field = classifier.field();
        let (sx, sy) = Self::DOOR_STRIDE;
        let attempts = i32::try_from(self.config.door_attempts).unwrap_or(i32::MAX);

        for attempt in 0..attempts {
            let (dx, dy) = (attempt.wrapping_mul(sx), attempt.wrapping_mul(sy));
            let doors: Vec<TileCoord> = sides
                .iter()
                .filter(|(cell, outside)| {
                    field.noise2(cell.x.wrapping_add(dx), cell.y.wrapping_add(dy)) < self.config.door_density
                        && classifier.biome(outside.x, outside.y) != Biome::Plateau
                })
                .map(|(cell, _)| *cell)
                .collect();

            if !doors.is_empty() {
                return doors;
            }
        }
        Vec::new()
    }
}
