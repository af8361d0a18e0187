//! # World Streaming
//!
//! Materializes the infinite world around a moving focus point.
//!
//! Every tick scans a window centred on the focus. Coordinates that were
//! never generated are resolved in this order:
//!
//! 1. Building footprint (the whole building is written at once)
//! 2. Plateau or spawn-silhouette wall
//! 3. Open floor, possibly with a cactus
//!
//! Written tiles never change, so walking back over old ground is free.

use tracing::{debug, info};

use crate::biome::{Biome, BiomeClassifier};
use crate::building::{Building, BuildingPlacer};
use crate::config::WorldConfig;
use crate::error::GenerationResult;
use crate::noise::NoiseOffsets;
use crate::store::TileStore;
use crate::tile::{Tile, TileCoord};

/// Something an external collaborator should spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlacementEvent {
    /// A building was materialized.
    Building(Building),
    /// A cactus stands on this outdoor floor tile.
    Cactus(TileCoord, Biome),
    /// An enemy starts on this building floor tile.
    Enemy(TileCoord),
}

/// Everything one tick produced.
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    /// Newly written tiles, in write order.
    pub tiles: Vec<(TileCoord, Tile)>,
    /// Placement events, in emission order.
    pub events: Vec<PlacementEvent>,
}

impl TickReport {
    /// Returns true if the tick wrote nothing and emitted nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty() && self.events.is_empty()
    }
}

/// Streams tiles of one infinite world.
pub struct WorldStreamer {
    config: WorldConfig,
    classifier: BiomeClassifier,
    placer: BuildingPlacer,
    store: TileStore,
}

impl WorldStreamer {
    /// Focus positions are clamped to this many tiles from the origin so
    /// window and building arithmetic stays inside `i32`.
    pub const WORLD_EDGE: i32 = 1 << 30;

    /// Creates a streamer for the world identified by `offsets`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GenerationError::InvalidConfig`] if `config` fails
    /// validation.
    pub fn new(config: WorldConfig, offsets: NoiseOffsets) -> GenerationResult<Self> {
        config.validate()?;
        info!(
            seed_x = offsets.seed_x,
            seed_y = offsets.seed_y,
            window_width = config.window_width,
            window_height = config.window_height,
            "world streamer created"
        );
        Ok(Self {
            classifier: BiomeClassifier::new(offsets, config.spawn_area_radius),
            placer: BuildingPlacer::new(config.clone()),
            store: TileStore::new(),
            config,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Biome classifier for this world.
    #[must_use]
    pub fn classifier(&self) -> &BiomeClassifier {
        &self.classifier
    }

    /// Materializes the configured window around `focus`.
    pub fn tick(&mut self, focus: (f32, f32)) -> TickReport {
        let window = (self.config.window_width, self.config.window_height);
        self.tick_world(focus, window)
    }

    /// Materializes an explicit `window` (width, height) around `focus`.
    ///
    /// The window is inclusive: `width + 1` columns by `height + 1` rows.
    /// Non-finite or out-of-range focus coordinates are clamped to
    /// [`Self::WORLD_EDGE`]; NaN maps to 0.
    pub fn tick_world(&mut self, focus: (f32, f32), window: (u32, u32)) -> TickReport {
        let raw = TileCoord::from_world_pos(focus.0, focus.1);
        let center = TileCoord::new(
            raw.x.clamp(-Self::WORLD_EDGE, Self::WORLD_EDGE),
            raw.y.clamp(-Self::WORLD_EDGE, Self::WORLD_EDGE),
        );
        let half_extent = |edge: u32| i32::try_from(edge / 2).unwrap_or(i32::MAX).min(Self::WORLD_EDGE / 2);
        let (half_w, half_h) = (half_extent(window.0), half_extent(window.1));
        let mut report = TickReport::default();

        let (x0, x1) = (center.x.saturating_sub(half_w), center.x.saturating_add(half_w));
        let (y0, y1) = (center.y.saturating_sub(half_h), center.y.saturating_add(half_h));

        for y in y0..=y1 {
            for x in x0..=x1 {
                let coord = TileCoord::new(x, y);
                if self.store.contains(coord) {
                    continue;
                }

                if self
                    .placer
                    .room_at(&self.classifier, &mut self.store, x, y, &mut report)
                    .is_some()
                {
                    continue;
                }

                self.generate_terrain(coord, &mut report);
            }
        }

        if !report.is_empty() {
            debug!(
                x = center.x,
                y = center.y,
                tiles = report.tiles.len(),
                events = report.events.len(),
                total = self.store.len(),
                "tick"
            );
        }
        report
    }

    fn generate_terrain(&mut self, coord: TileCoord, report: &mut TickReport) {
        let biome = self.classifier.biome(coord.x, coord.y);
        let tile = if biome == Biome::Plateau || self.is_spawn_wall(coord) {
            Tile::Wall
        } else {
            Tile::Floor
        };

        if self.store.set_once(coord, tile) {
            report.tiles.push((coord, tile));
        }

        if tile.is_floor() && !self.classifier.in_spawn_area(coord.x, coord.y) {
            let roll = self.classifier.field().noise2(coord.x, coord.y);
            if roll < biome.cactus_density(&self.config) {
                report.events.push(PlacementEvent::Cactus(coord, biome));
            }
        }
    }

    /// Wall ring around the spawn point, with a door in the middle of each
    /// side.
    fn is_spawn_wall(&self, coord: TileCoord) -> bool {
        #[allow(clippy::cast_possible_wrap)]
        let radius = self.config.spawn_building_radius as i32;
        let ring = coord.x.abs().max(coord.y.abs()) == radius;
        ring && coord.x != 0 && coord.y != 0
    }

    /// Tile at `coord`, `None` if not materialized yet.
    #[must_use]
    pub fn query_tile(&self, coord: TileCoord) -> Option<Tile> {
        self.store.get(coord)
    }

    /// Biome at `coord`. Pure, does not materialize anything.
    #[must_use]
    pub fn biome_at(&self, coord: TileCoord) -> Biome {
        self.classifier.biome(coord.x, coord.y)
    }

    /// World-space position the player starts at.
    #[must_use]
    pub const fn spawn_point(&self) -> (f32, f32) {
        (0.5, 0.5)
    }

    /// Number of materialized tiles.
    #[must_use]
    pub fn materialized_count(&self) -> usize {
        self.store.len()
    }

    /// Number of materialized buildings.
    #[must_use]
    pub fn building_count(&self) -> usize {
        self.placer.materialized_count()
    }

    /// Read-only view of the tile store.
    #[must_use]
    pub fn store(&self) -> &TileStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streamer(seed: u64) -> WorldStreamer {
        WorldStreamer::new(WorldConfig::default(), NoiseOffsets::from_seed(seed)).unwrap()
    }

    #[test]
    fn test_window_size() {
        let mut world = streamer(1);
        let report = world.tick(world.spawn_point());

        // inclusive 20x12 window; buildings may spill past its edge
        assert!(report.tiles.len() >= 21 * 13);
        assert_eq!(world.materialized_count(), report.tiles.len());
        for y in -6..=6 {
            for x in -10..=10 {
                assert!(world.query_tile(TileCoord::new(x, y)).is_some(), "({x}, {y}) missing");
            }
        }
    }

    #[test]
    fn test_extreme_focus_is_clamped() {
        let mut world = streamer(6);
        let edge = WorldStreamer::WORLD_EDGE;

        for focus in [(f32::MAX, f32::MAX), (f32::MIN, f32::MIN), (f32::INFINITY, f32::NAN)] {
            let report = world.tick(focus);
            assert!(!report.tiles.is_empty(), "Focus {focus:?} produced nothing");
        }

        assert!(world.query_tile(TileCoord::new(edge, edge)).is_some());
        assert!(world.query_tile(TileCoord::new(edge + 10, edge + 6)).is_some());
        assert!(world.query_tile(TileCoord::new(-edge - 10, -edge - 6)).is_some());
        assert!(world.query_tile(TileCoord::new(edge, 0)).is_some());
    }

    #[test]
    fn test_second_tick_is_empty() {
        let mut world = streamer(2);
        let first = world.tick((0.5, 0.5));
        assert!(!first.is_empty());

        let second = world.tick((0.9, 0.1));
        assert!(second.is_empty(), "Same window must not regenerate");
    }

    #[test]
    fn test_spawn_silhouette() {
        let mut world = streamer(3);
        world.tick(world.spawn_point());

        assert_eq!(world.query_tile(TileCoord::new(0, 0)), Some(Tile::Floor));
        assert_eq!(world.query_tile(TileCoord::new(3, 3)), Some(Tile::Wall));
        assert_eq!(world.query_tile(TileCoord::new(-3, 1)), Some(Tile::Wall));
        for door in [(0, 3), (0, -3), (3, 0), (-3, 0)] {
            assert_eq!(world.query_tile(TileCoord::new(door.0, door.1)), Some(Tile::Floor));
        }
        assert_eq!(world.query_tile(TileCoord::new(2, -1)), Some(Tile::Floor));
    }

    #[test]
    fn test_no_events_in_spawn_area() {
        for seed in 0..20 {
            let mut world = streamer(seed);
            let report = world.tick(world.spawn_point());
            for event in &report.events {
                if let PlacementEvent::Cactus(pos, _) = event {
                    assert!(pos.distance(TileCoord::default()) > 7.0);
                }
            }
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = WorldConfig {
            window_width: 0,
            ..WorldConfig::default()
        };
        assert!(WorldStreamer::new(config, NoiseOffsets::new(1000, 1000)).is_err());
    }

    #[test]
    fn test_plateau_tiles_are_wall() {
        let mut world = streamer(4);
        for step in 0..40 {
            world.tick((step as f32 * 10.0, 0.0));
        }

        let mut plateaus = 0;
        for (coord, tile) in world.store().iter() {
            if world.biome_at(coord) == Biome::Plateau {
                assert_eq!(tile, Tile::Wall, "Plateau floor at {coord:?}");
                plateaus += 1;
            }
        }
        assert!(plateaus > 0, "Walk should cross some plateau");
    }
}
