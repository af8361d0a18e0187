//! # Sandcrawl Procedural Generation
//!
//! Deterministic layout generation for a top-down 2D grid world.
//!
//! ## Pipelines
//!
//! 1. **Finite dungeon**: rooms and maze corridors on a bounded grid,
//!    joined into one connected floor and optionally pruned of dead ends
//! 2. **Infinite world**: biome terrain, buildings and cacti streamed in
//!    around a moving focus; every tile is written at most once
//!
//! ## Core Components
//!
//! - `DungeonGenerator` / `generate_dungeon`: the finite pipeline
//! - `NoiseField`: smooth and decorrelated noise over tile coordinates
//! - `BiomeClassifier`: plains, plateau and cactus fields
//! - `BuildingPlacer`: order-independent building discovery
//! - `WorldStreamer`: window materialization around the focus
//! - `SharedWorld`: lock-guarded handle for multi-threaded hosts
//!
//! ## Example
//!
//! ```rust,ignore
//! use sandcrawl_procedural::{NoiseOffsets, WorldConfig, WorldStreamer};
//!
//! let mut world = WorldStreamer::new(WorldConfig::default(), NoiseOffsets::from_seed(7))?;
//! let report = world.tick(world.spawn_point());
//!
//! for event in report.events {
//!     // hand buildings, cacti and enemies to the scene layer
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod building;
pub mod config;
pub mod dungeon;
pub mod error;
pub mod noise;
pub mod shared;
pub mod store;
pub mod streamer;
pub mod tile;

pub use biome::{Biome, BiomeClassifier};
pub use building::{Building, BuildingPlacer};
pub use config::{DungeonParams, WorldConfig};
pub use dungeon::{generate_dungeon, Dungeon, DungeonGenerator, DungeonStats, Grid, Room};
pub use error::{GenerationError, GenerationResult};
pub use noise::{NoiseField, NoiseOffsets, SimplexNoise};
pub use shared::SharedWorld;
pub use store::{TileState, TileStore};
pub use streamer::{PlacementEvent, TickReport, WorldStreamer};
pub use tile::{Tile, TileCoord, CARDINALS};
