//! # Biome Classification
//!
//! Determines terrain type from three independent smooth noise channels:
//!
//! - Channel 1 raises plateaus (impassable high ground)
//! - Channels 2 and 3 together mark cactus fields
//!
//! Near the world origin a spawn bias pushes every threshold out of reach,
//! so the player always starts on open plains.

use crate::config::WorldConfig;
use crate::noise::{NoiseField, NoiseOffsets};
use crate::tile::TileCoord;

/// Biome types in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Biome {
    /// Open ground.
    Plains = 0,
    /// Raised ground, rendered as wall.
    Plateau = 1,
    /// Open ground with dense cacti.
    CactusBiome = 2,
}

impl Biome {
    /// Returns whether the biome's ground is walkable.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::Plateau)
    }

    /// `noise2` threshold under which a floor tile grows a cactus.
    #[must_use]
    pub fn cactus_density(self, config: &WorldConfig) -> f64 {
        match self {
            Self::Plains => config.cactus_density_plains,
            Self::CactusBiome => config.cactus_density_cactus_biome,
            Self::Plateau => 0.0,
        }
    }
}

/// Biome classifier that determines biome from tile coordinates.
pub struct BiomeClassifier {
    field: NoiseField,
    spawn_area_radius: f64,
}

impl BiomeClassifier {
    /// Plateau channel threshold outside the spawn area.
    pub const PLATEAU_THRESHOLD: f64 = 0.55;
    /// Both cactus channels must exceed this.
    pub const CACTUS_THRESHOLD: f64 = 0.65;

    /// Creates a classifier for one world.
    #[must_use]
    pub fn new(offsets: NoiseOffsets, spawn_area_radius: f64) -> Self {
        Self {
            field: NoiseField::new(offsets),
            spawn_area_radius,
        }
    }

    /// Underlying noise field.
    #[inline]
    #[must_use]
    pub fn field(&self) -> &NoiseField {
        &self.field
    }

    /// Radius around the origin protected from plateaus.
    #[inline]
    #[must_use]
    pub const fn spawn_area_radius(&self) -> f64 {
        self.spawn_area_radius
    }

    /// Spawn bias in `[0, 1]`.
    ///
    /// Exactly 1 within `spawn_area_radius` of the origin, falling linearly
    /// to 0 at twice that distance, and 0 beyond.
    #[must_use]
    pub fn spawn_bias(&self, x: i32, y: i32) -> f64 {
        let distance = TileCoord::new(x, y).distance(TileCoord::default());
        (2.0 - distance / self.spawn_area_radius).clamp(0.0, 1.0)
    }

    /// Returns true if `(x, y)` is within the spawn area.
    #[inline]
    #[must_use]
    pub fn in_spawn_area(&self, x: i32, y: i32) -> bool {
        TileCoord::new(x, y).distance(TileCoord::default()) <= self.spawn_area_radius
    }

    /// Classifies the biome at tile coordinates.
    #[must_use]
    pub fn biome(&self, x: i32, y: i32) -> Biome {
        let offsets = self.field.offsets();
        let (sx, sy) = (f64::from(offsets.seed_x), f64::from(offsets.seed_y));
        let (fx, fy) = (f64::from(x), f64::from(y));

        let bias = self.spawn_bias(x, y);

        let plateau = self.field.channel(fx, fy, sx, sy);
        if plateau > Self::PLATEAU_THRESHOLD + bias {
            return Biome::Plateau;
        }

        let cactus_threshold = Self::CACTUS_THRESHOLD + bias;
        let cactus_a = self.field.channel(fx, fy, sy, sx);
        let cactus_b = self.field.channel(fx, fy, sx * 2.0, sy * 3.0);
        if cactus_a > cactus_threshold && cactus_b > cactus_threshold {
            return Biome::CactusBiome;
        }

        Biome::Plains
    }
}
