//! # Generator Configuration
//!
//! Both pipelines are driven by plain data loaded once at startup, either
//! built in code or parsed from TOML:
//!
//! ```toml
//! width = 41
//! height = 31
//! num_room_tries = 80
//! winding_percent = 25
//! ```
//!
//! Every value is validated before generation starts. Out-of-range input is
//! rejected with [`GenerationError::InvalidConfig`] instead of being clamped.

use serde::Deserialize;

use crate::error::{GenerationError, GenerationResult};

/// Parameters for a finite dungeon.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DungeonParams {
    /// Grid width in tiles (including the outer wall ring).
    pub width: usize,
    /// Grid height in tiles (including the outer wall ring).
    pub height: usize,
    /// Number of room placement attempts.
    pub num_room_tries: u32,
    /// Added onto the upper bound of the base room size.
    pub room_extra_size: u32,
    /// Corridor turn bias, 0 (straight) to 100 (twisty).
    pub winding_percent: u32,
    /// How much bigger the secondary render buffer is than the grid.
    pub buffer_scale: usize,
    /// Whether dead-end corridors are filled back in.
    pub prune_dead_ends: bool,
    /// Chance that a redundant connector is opened to form a loop.
    pub extra_connector_chance: f64,
}

impl Default for DungeonParams {
    fn default() -> Self {
        Self {
            width: 51,
            height: 51,
            num_room_tries: 50,
            room_extra_size: 0,
            winding_percent: 0,
            buffer_scale: 2,
            prune_dead_ends: true,
            extra_connector_chance: 0.05,
        }
    }
}

impl DungeonParams {
    /// Creates default parameters for a `width` x `height` grid.
    #[must_use]
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Parses and validates parameters from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::ConfigParse`] for malformed TOML and
    /// [`GenerationError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> GenerationResult<Self> {
        let params: Self =
            toml::from_str(source).map_err(|e| GenerationError::ConfigParse(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Checks every parameter against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> GenerationResult<()> {
        if self.width < 3 || self.height < 3 {
            return Err(GenerationError::DimensionsTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(GenerationError::InvalidConfig(format!(
                "grid {}x{} exceeds the coordinate range",
                self.width, self.height
            )));
        }
        if self.winding_percent > 100 {
            return Err(GenerationError::InvalidConfig(format!(
                "winding_percent must be within 0..=100, got {}",
                self.winding_percent
            )));
        }
        if self.buffer_scale == 0 {
            return Err(GenerationError::InvalidConfig(
                "buffer_scale must be at least 1".to_string(),
            ));
        }
        check_unit("extra_connector_chance", self.extra_connector_chance)
    }
}

/// Parameters for the infinite world.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the window materialized around the focus, in tiles.
    pub window_width: u32,
    /// Height of the window materialized around the focus, in tiles.
    pub window_height: u32,
    /// Radius around the origin kept free of plateaus and buildings.
    pub spawn_area_radius: f64,
    /// Edge of the building search neighbourhood; also the largest footprint.
    pub max_room_size: u32,
    /// Noise threshold below which an odd-lattice origin seeds a building.
    pub room_density: f64,
    /// `noise2` threshold for an enemy on a building floor tile.
    pub enemy_density: f64,
    /// `noise2` threshold for a door on a building wall tile.
    pub door_density: f64,
    /// How many door scans are attempted before giving up.
    pub door_attempts: u32,
    /// `noise2` threshold for a cactus on a plains floor tile.
    pub cactus_density_plains: f64,
    /// `noise2` threshold for a cactus on a cactus-biome floor tile.
    pub cactus_density_cactus_biome: f64,
    /// Chebyshev radius of the wall ring around the spawn point.
    pub spawn_building_radius: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            window_width: 20,
            window_height: 12,
            spawn_area_radius: 7.0,
            max_room_size: 9,
            room_density: 0.3,
            enemy_density: 0.05,
            door_density: 0.15,
            door_attempts: 1000,
            cactus_density_plains: 0.004,
            cactus_density_cactus_biome: 0.06,
            spawn_building_radius: 3,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a world configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::ConfigParse`] for malformed TOML and
    /// [`GenerationError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> GenerationResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| GenerationError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> GenerationResult<()> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err(GenerationError::InvalidConfig(format!(
                "window must be non-empty, got {}x{}",
                self.window_width, self.window_height
            )));
        }
        if !self.spawn_area_radius.is_finite() || self.spawn_area_radius <= 0.0 {
            return Err(GenerationError::InvalidConfig(format!(
                "spawn_area_radius must be positive, got {}",
                self.spawn_area_radius
            )));
        }
        if self.max_room_size < 5 || self.max_room_size % 2 == 0 || self.max_room_size > 101 {
            return Err(GenerationError::InvalidConfig(format!(
                "max_room_size must be odd and within 5..=101, got {}",
                self.max_room_size
            )));
        }
        if self.door_attempts == 0 {
            return Err(GenerationError::InvalidConfig(
                "door_attempts must be at least 1".to_string(),
            ));
        }
        check_unit("room_density", self.room_density)?;
        check_unit("enemy_density", self.enemy_density)?;
        check_unit("door_density", self.door_density)?;
        check_unit("cactus_density_plains", self.cactus_density_plains)?;
        check_unit("cactus_density_cactus_biome", self.cactus_density_cactus_biome)
    }
}

fn check_unit(name: &str, value: f64) -> GenerationResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GenerationError::InvalidConfig(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(DungeonParams::default().validate().is_ok());
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_small_grid() {
        let params = DungeonParams::with_size(2, 9);
        assert_eq!(
            params.validate(),
            Err(GenerationError::DimensionsTooSmall { width: 2, height: 9 })
        );
    }

    #[test]
    fn test_rejects_winding_out_of_range() {
        let params = DungeonParams {
            winding_percent: 101,
            ..DungeonParams::default()
        };
        assert!(matches!(params.validate(), Err(GenerationError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_zero_buffer_scale() {
        let params = DungeonParams {
            buffer_scale: 0,
            ..DungeonParams::default()
        };
        assert!(matches!(params.validate(), Err(GenerationError::InvalidConfig(_))));
    }

    #[test]
    fn test_world_rejects_even_room_size() {
        let config = WorldConfig {
            max_room_size: 8,
            ..WorldConfig::default()
        };
        assert!(matches!(config.validate(), Err(GenerationError::InvalidConfig(_))));
    }

    #[test]
    fn test_world_rejects_density_out_of_range() {
        let config = WorldConfig {
            room_density: 1.5,
            ..WorldConfig::default()
        };
        assert!(matches!(config.validate(), Err(GenerationError::InvalidConfig(_))));
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let params = DungeonParams::from_toml_str(
            r"
            width = 41
            height = 31
            winding_percent = 25
            ",
        )
        .unwrap();

        assert_eq!(params.width, 41);
        assert_eq!(params.height, 31);
        assert_eq!(params.winding_percent, 25);
        assert_eq!(params.num_room_tries, DungeonParams::default().num_room_tries);
    }

    #[test]
    fn test_toml_rejects_invalid_values() {
        let result = DungeonParams::from_toml_str("winding_percent = 400");
        assert!(matches!(result, Err(GenerationError::InvalidConfig(_))));

        let result = WorldConfig::from_toml_str("window_width = \"wide\"");
        assert!(matches!(result, Err(GenerationError::ConfigParse(_))));
    }
}
